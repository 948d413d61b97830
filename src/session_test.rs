#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::{PreviewBox, ViewportOffset};

// =============================================================
// Helpers
// =============================================================

const SOURCE: &str = "/images/painting-large.jpg";
const LOADING: &str = "Loading high resolution image...";

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn session() -> ZoomSession {
    ZoomSession::new(SOURCE, ZoomConfig::default())
}

/// Preview of 200x150 at the page origin with a 300x200 zoom window.
fn layout() -> PreviewLayout {
    PreviewLayout {
        origin: pt(0.0, 0.0),
        size: Size::new(200.0, 150.0),
        offset_parent_origin: pt(0.0, 0.0),
        window_size: Size::new(300.0, 200.0),
    }
}

fn load_requests(actions: &[Action]) -> Vec<LoadTicket> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::LoadRequested { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .collect()
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn start_loading(session: &mut ZoomSession) -> LoadTicket {
    let actions = session.on_hover_start();
    let tickets = load_requests(&actions);
    assert_eq!(tickets.len(), 1);
    tickets[0]
}

fn loaded_session() -> ZoomSession {
    let mut s = session();
    let ticket = start_loading(&mut s);
    s.on_load_succeeded(ticket, Size::new(800.0, 600.0), Size::new(200.0, 150.0));
    assert_eq!(s.state(), ResourceState::Loaded);
    s
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_session_is_not_requested() {
    let s = session();
    assert_eq!(s.state(), ResourceState::NotRequested);
    assert!(s.scale_ratio().is_none());
    assert!(s.loaded_size().is_none());
    assert!(s.in_flight().is_none());
    assert!(!s.is_hovering());
    assert_eq!(s.source_reference(), SOURCE);
    assert_eq!(s.config(), &ZoomConfig::default());
}

// =============================================================
// Hover start
// =============================================================

#[test]
fn first_hover_start_requests_load() {
    let mut s = session();
    let actions = s.on_hover_start();
    assert_eq!(s.state(), ResourceState::Loading);
    assert!(s.is_hovering());
    assert_eq!(
        actions,
        vec![
            Action::SetCursor(CursorMode::Default),
            Action::SetCursor(CursorMode::Busy),
            Action::ShowNotification(LOADING.to_owned()),
            Action::LoadRequested { reference: SOURCE.to_owned(), ticket: LoadTicket(0) },
        ]
    );
    assert_eq!(s.in_flight(), Some(LoadTicket(0)));
}

#[test]
fn hover_start_while_loading_does_not_request_again() {
    let mut s = session();
    start_loading(&mut s);
    let second = s.on_hover_start();
    assert!(load_requests(&second).is_empty());
    assert_eq!(s.state(), ResourceState::Loading);
    assert!(has_action(&second, |a| matches!(a, Action::ShowNotification(_))));
    assert!(has_action(&second, |a| *a == Action::SetCursor(CursorMode::Busy)));
}

#[test]
fn rapid_hover_starts_issue_exactly_one_request() {
    let mut s = session();
    let total: usize = (0..5).map(|_| load_requests(&s.on_hover_start()).len()).sum();
    assert_eq!(total, 1);
}

#[test]
fn hover_start_when_loaded_shows_zoom_window() {
    let mut s = loaded_session();
    let actions = s.on_hover_start();
    assert_eq!(actions, vec![Action::SetCursor(CursorMode::Default), Action::ShowZoomWindow]);
}

#[test]
fn custom_loading_notification_is_used() {
    let config = ZoomConfig::from_json(r#"{"notifications": {"loading": "Lade..."}}"#).expect("config");
    let mut s = ZoomSession::new(SOURCE, config);
    let actions = s.on_hover_start();
    assert!(actions.contains(&Action::ShowNotification("Lade...".to_owned())));
}

// =============================================================
// Load completion
// =============================================================

#[test]
fn load_success_computes_ratio() {
    let s = loaded_session();
    assert_eq!(s.scale_ratio(), Some(ScaleRatio { width: 4.0, height: 4.0 }));
    assert_eq!(s.loaded_size(), Some(Size::new(800.0, 600.0)));
    assert!(s.in_flight().is_none());
}

#[test]
fn load_success_while_hovering_renders_immediately() {
    let mut s = session();
    let ticket = start_loading(&mut s);
    let actions = s.on_load_succeeded(ticket, Size::new(800.0, 600.0), Size::new(200.0, 150.0));
    assert_eq!(actions, vec![Action::SetCursor(CursorMode::Default), Action::ShowZoomWindow]);
}

#[test]
fn load_success_after_pointer_left_only_restores_cursor() {
    let mut s = session();
    let ticket = start_loading(&mut s);
    s.on_hover_end(pt(500.0, 500.0), &layout());
    let actions = s.on_load_succeeded(ticket, Size::new(800.0, 600.0), Size::new(200.0, 150.0));
    assert_eq!(actions, vec![Action::SetCursor(CursorMode::Default)]);
    assert_eq!(s.state(), ResourceState::Loaded);
}

#[test]
fn load_success_with_zero_preview_is_failure() {
    let mut s = session();
    let ticket = start_loading(&mut s);
    let actions = s.on_load_succeeded(ticket, Size::new(800.0, 600.0), Size::new(0.0, 150.0));
    assert_eq!(s.state(), ResourceState::Failed);
    assert!(s.scale_ratio().is_none());
    assert!(has_action(&actions, |a| matches!(a, Action::DeferredHideAll { .. })));
}

#[test]
fn load_success_with_unsized_source_is_failure() {
    let mut s = session();
    let ticket = start_loading(&mut s);
    let actions = s.on_load_succeeded(ticket, Size::new(0.0, 0.0), Size::new(200.0, 150.0));
    assert_eq!(s.state(), ResourceState::Failed);
    assert!(s.scale_ratio().is_none());
    assert!(has_action(&actions, |a| matches!(a, Action::DeferredHideAll { .. })));
    assert!(s.on_hover_move(pt(100.0, 75.0), &layout()).is_empty());
}

#[test]
fn load_failure_shows_error_and_schedules_hide() {
    let mut s = session();
    let ticket = start_loading(&mut s);
    let actions = s.on_load_failed(ticket);
    assert_eq!(s.state(), ResourceState::Failed);
    assert_eq!(
        actions,
        vec![
            Action::SetCursor(CursorMode::Default),
            Action::ShowNotification("There has been a problem with loading the image!".to_owned()),
            Action::DeferredHideAll { delay_ms: 2000 },
        ]
    );
}

#[test]
fn load_failure_uses_configured_delay() {
    let config = ZoomConfig { error_hide_delay_ms: 750, ..ZoomConfig::default() };
    let mut s = ZoomSession::new(SOURCE, config);
    let ticket = start_loading(&mut s);
    let actions = s.on_load_failed(ticket);
    assert!(actions.contains(&Action::DeferredHideAll { delay_ms: 750 }));
}

#[test]
fn hover_start_after_failure_retries() {
    let mut s = session();
    let first = start_loading(&mut s);
    s.on_load_failed(first);
    let actions = s.on_hover_start();
    let tickets = load_requests(&actions);
    assert_eq!(tickets.len(), 1);
    assert_ne!(tickets[0], first);
    assert_eq!(s.state(), ResourceState::Loading);
}

#[test]
fn failure_then_immediate_hover_start_shows_loading() {
    let mut s = session();
    let ticket = start_loading(&mut s);
    s.on_load_failed(ticket);
    let actions = s.on_hover_start();
    // The loading notification replaces the error text on the same surface.
    assert!(actions.contains(&Action::ShowNotification(LOADING.to_owned())));
    assert!(!has_action(&actions, |a| matches!(a, Action::DeferredHideAll { .. })));
}

#[test]
fn completion_without_request_is_ignored() {
    let mut s = session();
    assert!(s.on_load_succeeded(LoadTicket(0), Size::new(800.0, 600.0), Size::new(200.0, 150.0)).is_empty());
    assert!(s.on_load_failed(LoadTicket(0)).is_empty());
    assert_eq!(s.state(), ResourceState::NotRequested);
}

#[test]
fn stale_completion_after_reset_is_ignored() {
    let mut s = session();
    let stale = start_loading(&mut s);
    s.reset();
    let fresh = start_loading(&mut s);

    assert!(s.on_load_succeeded(stale, Size::new(800.0, 600.0), Size::new(200.0, 150.0)).is_empty());
    assert_eq!(s.state(), ResourceState::Loading);
    assert!(s.on_load_failed(stale).is_empty());
    assert_eq!(s.in_flight(), Some(fresh));
}

#[test]
fn duplicate_completion_is_ignored_once_loaded() {
    let mut s = session();
    let ticket = start_loading(&mut s);
    s.on_load_succeeded(ticket, Size::new(800.0, 600.0), Size::new(200.0, 150.0));
    assert!(s.on_load_failed(ticket).is_empty());
    assert_eq!(s.state(), ResourceState::Loaded);
}

// =============================================================
// Hover move
// =============================================================

#[test]
fn hover_move_before_load_is_noop() {
    let mut s = session();
    assert!(s.on_hover_move(pt(100.0, 75.0), &layout()).is_empty());
    start_loading(&mut s);
    assert!(s.on_hover_move(pt(100.0, 75.0), &layout()).is_empty());
}

#[test]
fn hover_move_after_failure_is_noop() {
    let mut s = session();
    let ticket = start_loading(&mut s);
    s.on_load_failed(ticket);
    assert!(s.on_hover_move(pt(100.0, 75.0), &layout()).is_empty());
}

#[test]
fn hover_move_inside_pans_and_shows_both_surfaces() {
    let mut s = loaded_session();
    let actions = s.on_hover_move(pt(100.0, 75.0), &layout());
    assert_eq!(
        actions,
        vec![
            Action::PanZoomImage(ViewportOffset { left: 250.0, top: 200.0 }),
            Action::ShowPreviewBox(PreviewBox { width: 75.0, height: 50.0, left: 62.5, top: 50.0 }),
            Action::ShowZoomWindow,
        ]
    );
}

#[test]
fn hover_move_uses_layout_offsets() {
    let mut s = loaded_session();
    let shifted = PreviewLayout {
        origin: pt(40.0, 30.0),
        offset_parent_origin: pt(20.0, 10.0),
        ..layout()
    };
    let actions = s.on_hover_move(pt(140.0, 105.0), &shifted);
    assert_eq!(actions[0], Action::PanZoomImage(ViewportOffset { left: 250.0, top: 200.0 }));
    assert_eq!(actions[1], Action::ShowPreviewBox(PreviewBox { width: 75.0, height: 50.0, left: 82.5, top: 70.0 }));
}

#[test]
fn hover_move_outside_hides() {
    let mut s = loaded_session();
    assert_eq!(s.on_hover_move(pt(201.0, 75.0), &layout()), vec![Action::HideAll]);
    assert_eq!(s.on_hover_move(pt(100.0, -1.0), &layout()), vec![Action::HideAll]);
}

#[test]
fn hover_move_on_edge_is_inside() {
    let mut s = loaded_session();
    let actions = s.on_hover_move(pt(200.0, 150.0), &layout());
    assert_eq!(actions.len(), 3);
}

#[test]
fn hover_moves_are_processed_in_order() {
    let mut s = loaded_session();
    let offsets: Vec<ViewportOffset> = [pt(50.0, 50.0), pt(100.0, 75.0), pt(150.0, 100.0)]
        .into_iter()
        .filter_map(|p| match s.on_hover_move(p, &layout()).first() {
            Some(Action::PanZoomImage(offset)) => Some(*offset),
            _ => None,
        })
        .collect();
    let lefts: Vec<f64> = offsets.iter().map(|o| o.left).collect();
    assert_eq!(lefts, vec![50.0, 250.0, 450.0]);
}

// =============================================================
// Hover end
// =============================================================

#[test]
fn hover_end_inside_preview_keeps_outputs() {
    let mut s = loaded_session();
    assert!(s.on_hover_end(pt(199.0, 149.0), &layout()).is_empty());
    assert!(s.is_hovering());
}

#[test]
fn hover_end_outside_hides() {
    let mut s = loaded_session();
    assert_eq!(s.on_hover_end(pt(350.0, 40.0), &layout()), vec![Action::HideAll]);
    assert!(!s.is_hovering());
}

#[test]
fn hover_end_outside_hides_loading_notification() {
    let mut s = session();
    start_loading(&mut s);
    assert_eq!(s.on_hover_end(pt(-5.0, 10.0), &layout()), vec![Action::HideAll]);
    assert_eq!(s.state(), ResourceState::Loading);
}

// =============================================================
// Reset
// =============================================================

#[test]
fn reset_returns_to_not_requested() {
    let mut s = loaded_session();
    let actions = s.reset();
    assert_eq!(actions, vec![Action::SetCursor(CursorMode::Default), Action::HideAll]);
    assert_eq!(s.state(), ResourceState::NotRequested);
    assert!(s.scale_ratio().is_none());
    assert!(!s.is_hovering());
}

#[test]
fn reset_while_loading_restores_cursor() {
    let mut s = session();
    let actions = s.on_hover_start();
    assert!(actions.contains(&Action::SetCursor(CursorMode::Busy)));
    let actions = s.reset();
    assert_eq!(actions.first(), Some(&Action::SetCursor(CursorMode::Default)));
    assert!(actions.contains(&Action::HideAll));
    assert!(s.in_flight().is_none());
}

#[test]
fn reset_is_idempotent() {
    let mut s = loaded_session();
    let first = s.reset();
    let second = s.reset();
    assert_eq!(first, second);
    assert_eq!(s.state(), ResourceState::NotRequested);
}

#[test]
fn hover_start_after_reset_reloads() {
    let mut s = loaded_session();
    s.reset();
    let actions = s.on_hover_start();
    assert_eq!(load_requests(&actions).len(), 1);
}

// =============================================================
// State machine
// =============================================================

#[test]
fn only_hover_start_leaves_not_requested() {
    let mut s = session();
    s.on_hover_move(pt(10.0, 10.0), &layout());
    s.on_hover_end(pt(500.0, 500.0), &layout());
    s.on_load_failed(LoadTicket(7));
    assert_eq!(s.state(), ResourceState::NotRequested);
    s.on_hover_start();
    assert_eq!(s.state(), ResourceState::Loading);
}

#[test]
fn only_completion_leaves_loading() {
    let mut s = session();
    let ticket = start_loading(&mut s);
    s.on_hover_start();
    s.on_hover_move(pt(10.0, 10.0), &layout());
    s.on_hover_end(pt(500.0, 500.0), &layout());
    assert_eq!(s.state(), ResourceState::Loading);
    s.on_load_succeeded(ticket, Size::new(400.0, 300.0), Size::new(200.0, 150.0));
    assert_eq!(s.state(), ResourceState::Loaded);
    assert_eq!(s.scale_ratio(), Some(ScaleRatio { width: 2.0, height: 2.0 }));
}

#[test]
fn ticket_ids_increase() {
    let mut s = session();
    let first = start_loading(&mut s);
    s.on_load_failed(first);
    let second = start_loading(&mut s);
    assert_eq!(first.id(), 0);
    assert_eq!(second.id(), 1);
}

// =============================================================
// Source resolution
// =============================================================

#[test]
fn explicit_reference_wins_over_attribute() {
    let reference = resolve_source_reference(Some("/a.jpg".to_owned()), Some("/b.jpg".to_owned()), "data-image");
    assert_eq!(reference.expect("reference"), "/a.jpg");
}

#[test]
fn attribute_used_when_no_explicit_reference() {
    let reference = resolve_source_reference(None, Some("/b.jpg".to_owned()), "data-image");
    assert_eq!(reference.expect("reference"), "/b.jpg");
}

#[test]
fn empty_explicit_reference_falls_back_to_attribute() {
    let reference = resolve_source_reference(Some(String::new()), Some("/b.jpg".to_owned()), "data-image");
    assert_eq!(reference.expect("reference"), "/b.jpg");
}

#[test]
fn missing_reference_is_an_error() {
    let err = resolve_source_reference(None, Some(String::new()), "data-zoom").expect_err("missing");
    assert!(matches!(err, ZoomError::MissingSourceReference { ref attribute } if attribute == "data-zoom"));
}

#[test]
fn state_names_for_javascript() {
    assert_eq!(ResourceState::NotRequested.as_str(), "notRequested");
    assert_eq!(ResourceState::Loading.as_str(), "loading");
    assert_eq!(ResourceState::Loaded.as_str(), "loaded");
    assert_eq!(ResourceState::Failed.as_str(), "failed");
}
