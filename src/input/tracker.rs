use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    drivers::rpi_touch::event::{TouchPoint, TouchSample},
    input::event::native::{Axis, InputEvent, Key, TrackingId},
};

/// When a batch of events is terminated with a [InputEvent::SyncReport]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SyncPolicy {
    /// Only reports that produced slot events are emitted and synced. A report
    /// that changes nothing produces no events at all.
    #[default]
    OnChange,
    /// Every report is emitted and ends with exactly one sync.
    Always,
}

/// Configuration of the slot tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Emit the single-pointer ABS_X/ABS_Y/BTN_TOUCH stream ahead of the
    /// multi-touch stream.
    pub legacy_single_touch: bool,
    pub sync_policy: SyncPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            legacy_single_touch: true,
            sync_policy: SyncPolicy::default(),
        }
    }
}

/// Activation state carried from one report to the next. Lives exactly as
/// long as one device session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotState {
    previous: TouchSample,
}

impl SlotState {
    /// Returns the last sample that was processed
    pub fn previous(&self) -> &TouchSample {
        &self.previous
    }
}

/// Produce the events that bring a multi-touch consumer from `state` to
/// `sample`, then commit `sample` as the new previous state.
pub fn emit(sample: &TouchSample, state: &mut SlotState, config: &TrackerConfig) -> Vec<InputEvent> {
    let mut events = Vec::new();

    if config.legacy_single_touch {
        emit_single_touch(sample, &mut events);
    }

    for (slot, point) in sample.points.iter().enumerate() {
        let was_active = state.previous.points[slot].active;
        emit_slot(slot as u8, point, was_active, &mut events);
    }

    let changed = events.iter().any(InputEvent::is_slot_event);
    match config.sync_policy {
        SyncPolicy::OnChange if !changed => events.clear(),
        _ => events.push(InputEvent::SyncReport),
    }

    state.previous = *sample;
    events
}

/// Single-pointer stream that follows the lowest-numbered active slot
fn emit_single_touch(sample: &TouchSample, events: &mut Vec<InputEvent>) {
    match sample.primary() {
        Some((_, point)) => {
            events.push(InputEvent::AbsMove(Axis::X, point.x));
            events.push(InputEvent::AbsMove(Axis::Y, point.y));
            events.push(InputEvent::KeyState(Key::Touch, true));
        }
        None => events.push(InputEvent::KeyState(Key::Touch, false)),
    }
}

/// Emit the events for one slot. Slots that are and were up emit nothing.
fn emit_slot(slot: u8, point: &TouchPoint, was_active: bool, events: &mut Vec<InputEvent>) {
    if point.active {
        events.push(InputEvent::SlotSelect(slot));
        events.push(InputEvent::TrackingId(TrackingId::Id(slot as u16)));
        events.push(InputEvent::AbsMove(Axis::PositionX, point.x));
        events.push(InputEvent::AbsMove(Axis::PositionY, point.y));
    } else if was_active {
        events.push(InputEvent::SlotSelect(slot));
        events.push(InputEvent::TrackingId(TrackingId::Release));
    }
}

/// Owns the [SlotState] of a session and turns each decoded sample into an
/// ordered batch of input events.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    config: TrackerConfig,
    state: SlotState,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            state: SlotState::default(),
        }
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn emit(&mut self, sample: &TouchSample) -> Vec<InputEvent> {
        let events = emit(sample, &mut self.state, &self.config);
        log::trace!(
            "Emitting {} event(s) for {} contact(s): {events:?}",
            events.len(),
            sample.active_count()
        );
        events
    }
}
