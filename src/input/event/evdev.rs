use evdev::{AbsoluteAxisCode, EventType, InputEvent, KeyCode, SynchronizationCode};

use super::native::{self, Axis, Key};

impl From<Axis> for AbsoluteAxisCode {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => AbsoluteAxisCode::ABS_X,
            Axis::Y => AbsoluteAxisCode::ABS_Y,
            Axis::PositionX => AbsoluteAxisCode::ABS_MT_POSITION_X,
            Axis::PositionY => AbsoluteAxisCode::ABS_MT_POSITION_Y,
        }
    }
}

impl From<Key> for KeyCode {
    fn from(key: Key) -> Self {
        match key {
            Key::Touch => KeyCode::BTN_TOUCH,
        }
    }
}

/// Translate the given native event into the evdev event written to uinput
pub fn translate_event(event: &native::InputEvent) -> InputEvent {
    match *event {
        native::InputEvent::AbsMove(axis, value) => InputEvent::new(
            EventType::ABSOLUTE.0,
            AbsoluteAxisCode::from(axis).0,
            value as i32,
        ),
        native::InputEvent::KeyState(key, pressed) => {
            InputEvent::new(EventType::KEY.0, KeyCode::from(key).0, pressed as i32)
        }
        native::InputEvent::SlotSelect(slot) => InputEvent::new(
            EventType::ABSOLUTE.0,
            AbsoluteAxisCode::ABS_MT_SLOT.0,
            slot as i32,
        ),
        native::InputEvent::TrackingId(id) => InputEvent::new(
            EventType::ABSOLUTE.0,
            AbsoluteAxisCode::ABS_MT_TRACKING_ID.0,
            id.value(),
        ),
        native::InputEvent::SyncReport => InputEvent::new(
            EventType::SYNCHRONIZATION.0,
            SynchronizationCode::SYN_REPORT.0,
            0,
        ),
    }
}
