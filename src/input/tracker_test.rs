use crate::{
    drivers::rpi_touch::event::{TouchPoint, TouchSample},
    input::{
        event::native::{Axis, InputEvent, Key, TrackingId},
        tracker::{emit, SlotState, SyncPolicy, Tracker, TrackerConfig},
    },
};

fn slot_only(sync_policy: SyncPolicy) -> TrackerConfig {
    TrackerConfig {
        legacy_single_touch: false,
        sync_policy,
    }
}

fn sample(points: &[(usize, u16, u16)]) -> TouchSample {
    let mut sample = TouchSample::default();
    for &(slot, x, y) in points {
        sample.points[slot] = TouchPoint { active: true, x, y };
    }
    sample
}

#[test]
fn test_press_single_slot() {
    let mut tracker = Tracker::new(slot_only(SyncPolicy::OnChange));
    let events = tracker.emit(&sample(&[(2, 100, 200)]));
    assert_eq!(
        events,
        vec![
            InputEvent::SlotSelect(2),
            InputEvent::TrackingId(TrackingId::Id(2)),
            InputEvent::AbsMove(Axis::PositionX, 100),
            InputEvent::AbsMove(Axis::PositionY, 200),
            InputEvent::SyncReport,
        ]
    );
    assert!(tracker.state().previous().points[2].active);
}

#[test]
fn test_release_multiple_slots() {
    let mut state = SlotState::default();
    let config = slot_only(SyncPolicy::OnChange);
    emit(&sample(&[(0, 10, 10), (3, 30, 30)]), &mut state, &config);

    let events = emit(&TouchSample::default(), &mut state, &config);
    assert_eq!(
        events,
        vec![
            InputEvent::SlotSelect(0),
            InputEvent::TrackingId(TrackingId::Release),
            InputEvent::SlotSelect(3),
            InputEvent::TrackingId(TrackingId::Release),
            InputEvent::SyncReport,
        ]
    );
    assert_eq!(state.previous(), &TouchSample::default());
}

#[test]
fn test_unchanged_release_is_idempotent() {
    let mut tracker = Tracker::new(slot_only(SyncPolicy::OnChange));
    tracker.emit(&sample(&[(1, 5, 5)]));

    let released = TouchSample::default();
    let first = tracker.emit(&released);
    assert_eq!(first.len(), 3);
    let second = tracker.emit(&released);
    assert!(second.is_empty(), "nothing changed, nothing to emit");
}

#[test]
fn test_slots_emitted_in_order() {
    let mut tracker = Tracker::new(slot_only(SyncPolicy::OnChange));
    tracker.emit(&sample(&[(1, 1, 1)]));

    // Slot 1 released while slots 0 and 4 are pressed
    let events = tracker.emit(&sample(&[(0, 10, 20), (4, 40, 50)]));
    assert_eq!(
        events,
        vec![
            InputEvent::SlotSelect(0),
            InputEvent::TrackingId(TrackingId::Id(0)),
            InputEvent::AbsMove(Axis::PositionX, 10),
            InputEvent::AbsMove(Axis::PositionY, 20),
            InputEvent::SlotSelect(1),
            InputEvent::TrackingId(TrackingId::Release),
            InputEvent::SlotSelect(4),
            InputEvent::TrackingId(TrackingId::Id(4)),
            InputEvent::AbsMove(Axis::PositionX, 40),
            InputEvent::AbsMove(Axis::PositionY, 50),
            InputEvent::SyncReport,
        ]
    );
}

#[test]
fn test_held_contact_is_reported_every_cycle() {
    let mut tracker = Tracker::new(slot_only(SyncPolicy::OnChange));
    let held = sample(&[(0, 300, 100)]);
    let first = tracker.emit(&held);
    let second = tracker.emit(&held);
    assert_eq!(first, second);
    assert_eq!(second.last(), Some(&InputEvent::SyncReport));
}

#[test]
fn test_release_has_no_position_events() {
    let mut tracker = Tracker::new(slot_only(SyncPolicy::OnChange));
    tracker.emit(&sample(&[(2, 100, 200)]));
    let events = tracker.emit(&TouchSample::default());
    assert!(!events
        .iter()
        .any(|event| matches!(event, InputEvent::AbsMove(_, _))));
}

#[test]
fn test_always_sync_policy() {
    let mut tracker = Tracker::new(slot_only(SyncPolicy::Always));
    let events = tracker.emit(&TouchSample::default());
    assert_eq!(events, vec![InputEvent::SyncReport]);

    let events = tracker.emit(&sample(&[(0, 1, 2)]));
    let syncs = events
        .iter()
        .filter(|event| **event == InputEvent::SyncReport)
        .count();
    assert_eq!(syncs, 1);
    assert_eq!(events.last(), Some(&InputEvent::SyncReport));
}

#[test]
fn test_legacy_layer_follows_lowest_active_slot() {
    let mut tracker = Tracker::new(TrackerConfig::default());
    let events = tracker.emit(&sample(&[(1, 11, 12), (3, 31, 32)]));
    assert_eq!(
        &events[..3],
        &[
            InputEvent::AbsMove(Axis::X, 11),
            InputEvent::AbsMove(Axis::Y, 12),
            InputEvent::KeyState(Key::Touch, true),
        ]
    );
    assert_eq!(events[3], InputEvent::SlotSelect(1));
    let legacy = events
        .iter()
        .filter(|event| !event.is_slot_event() && **event != InputEvent::SyncReport)
        .count();
    assert_eq!(legacy, 3, "only one contact drives the legacy stream");

    // Lifting slot 1 moves the legacy pointer to slot 3
    let events = tracker.emit(&sample(&[(3, 33, 34)]));
    assert_eq!(
        &events[..3],
        &[
            InputEvent::AbsMove(Axis::X, 33),
            InputEvent::AbsMove(Axis::Y, 34),
            InputEvent::KeyState(Key::Touch, true),
        ]
    );
}

#[test]
fn test_legacy_release() {
    let mut tracker = Tracker::new(TrackerConfig::default());
    tracker.emit(&sample(&[(0, 1, 1)]));
    let events = tracker.emit(&TouchSample::default());
    assert_eq!(
        events,
        vec![
            InputEvent::KeyState(Key::Touch, false),
            InputEvent::SlotSelect(0),
            InputEvent::TrackingId(TrackingId::Release),
            InputEvent::SyncReport,
        ]
    );

    // Idle reports are dropped entirely, legacy events included
    let events = tracker.emit(&TouchSample::default());
    assert!(events.is_empty());
}

#[test]
fn test_legacy_idle_with_always_sync() {
    let mut tracker = Tracker::new(TrackerConfig {
        legacy_single_touch: true,
        sync_policy: SyncPolicy::Always,
    });
    let events = tracker.emit(&TouchSample::default());
    assert_eq!(
        events,
        vec![
            InputEvent::KeyState(Key::Touch, false),
            InputEvent::SyncReport
        ]
    );
}
