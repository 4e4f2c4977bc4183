#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::schedule::TimerQueue;

const TIMEOUT: f64 = 250.0;

fn fire_due(buttons: &mut ButtonDispatcher, queue: &mut TimerQueue, now: f64) -> Vec<ButtonEvent> {
    queue.pop_due(now).into_iter().filter_map(|f| buttons.fire(f.token)).collect()
}

#[test]
fn single_click_reported_after_timeout() {
    let mut buttons = ButtonDispatcher::new();
    let mut queue = TimerQueue::new();
    buttons.click("btn", &mut queue, TIMEOUT);
    assert_eq!(buttons.pending(), Some("btn"));
    assert!(fire_due(&mut buttons, &mut queue, 100.0).is_empty());

    let events = fire_due(&mut buttons, &mut queue, 300.0);
    assert_eq!(events, vec![ButtonEvent { count: 1, id: Some("btn".to_string()), kind: ClickKind::Single }]);
    assert_eq!(buttons.pending(), None);
}

#[test]
fn double_click_suppresses_pending_single() {
    let mut buttons = ButtonDispatcher::new();
    let mut queue = TimerQueue::new();
    buttons.click("btn", &mut queue, TIMEOUT);
    let event = buttons.double_click(Some("btn"), &mut queue).unwrap();
    assert_eq!(event.kind, ClickKind::Double);
    assert_eq!(event.count, 1);
    assert!(queue.is_empty());
    assert!(fire_due(&mut buttons, &mut queue, 1000.0).is_empty());
}

#[test]
fn double_click_without_button_reports_nothing() {
    let mut buttons = ButtonDispatcher::new();
    let mut queue = TimerQueue::new();
    buttons.click("btn", &mut queue, TIMEOUT);
    assert_eq!(buttons.double_click(None, &mut queue), None);
    assert_eq!(buttons.pending(), None);
    assert_eq!(buttons.count(), 0);
}

#[test]
fn second_click_rearms_the_timer() {
    let mut buttons = ButtonDispatcher::new();
    let mut queue = TimerQueue::new();
    buttons.click("one", &mut queue, TIMEOUT);
    queue.pop_due(200.0);
    buttons.click("two", &mut queue, TIMEOUT);
    assert_eq!(queue.len(), 1);

    assert!(fire_due(&mut buttons, &mut queue, 300.0).is_empty());
    let events = fire_due(&mut buttons, &mut queue, 450.0);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id.as_deref(), Some("two"));
}

#[test]
fn stale_token_does_not_fire() {
    let mut buttons = ButtonDispatcher::new();
    let mut queue = TimerQueue::new();
    let stale = queue.schedule(0.0, TimerKind::ButtonSingle);
    buttons.click("btn", &mut queue, TIMEOUT);
    assert_eq!(buttons.fire(stale), None);
    assert_eq!(buttons.pending(), Some("btn"));
}

#[test]
fn count_grows_across_notifications() {
    let mut buttons = ButtonDispatcher::new();
    let mut queue = TimerQueue::new();
    buttons.click("a", &mut queue, TIMEOUT);
    fire_due(&mut buttons, &mut queue, 300.0);
    let event = buttons.double_click(Some("b"), &mut queue).unwrap();
    assert_eq!(event.count, 2);
    assert_eq!(buttons.count(), 2);
}

#[test]
fn event_serializes_kind_in_lowercase() {
    let event = ButtonEvent { count: 3, id: Some("b".to_string()), kind: ClickKind::Double };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json, serde_json::json!({"count": 3, "id": "b", "kind": "double"}));
}
