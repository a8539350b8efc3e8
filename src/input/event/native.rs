use std::fmt;

/// Absolute axes written by the bridge
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    /// Single-touch X (ABS_X)
    X,
    /// Single-touch Y (ABS_Y)
    Y,
    /// Multi-touch X (ABS_MT_POSITION_X)
    PositionX,
    /// Multi-touch Y (ABS_MT_POSITION_Y)
    PositionY,
}

impl Axis {
    pub fn name(&self) -> &'static str {
        match self {
            Axis::X => "ABS_X",
            Axis::Y => "ABS_Y",
            Axis::PositionX => "ABS_MT_POSITION_X",
            Axis::PositionY => "ABS_MT_POSITION_Y",
        }
    }
}

/// Keys written by the bridge
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    /// BTN_TOUCH
    Touch,
}

impl Key {
    pub fn name(&self) -> &'static str {
        match self {
            Key::Touch => "BTN_TOUCH",
        }
    }
}

/// Value of an ABS_MT_TRACKING_ID event
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackingId {
    /// Contact is (still) down with this id
    Id(u16),
    /// Contact in the selected slot was lifted
    Release,
}

impl TrackingId {
    /// Returns the value as written on the wire, where a release is -1
    pub fn value(&self) -> i32 {
        match self {
            TrackingId::Id(id) => *id as i32,
            TrackingId::Release => -1,
        }
    }
}

/// A single logical input event. The order in which a batch of these is
/// written is significant to multi-touch consumers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    AbsMove(Axis, u16),
    KeyState(Key, bool),
    SlotSelect(u8),
    TrackingId(TrackingId),
    SyncReport,
}

impl InputEvent {
    /// Returns true if this event belongs to the multi-touch slot protocol
    pub fn is_slot_event(&self) -> bool {
        match self {
            InputEvent::SlotSelect(_) | InputEvent::TrackingId(_) => true,
            InputEvent::AbsMove(axis, _) => matches!(axis, Axis::PositionX | Axis::PositionY),
            InputEvent::KeyState(_, _) | InputEvent::SyncReport => false,
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEvent::AbsMove(axis, value) => write!(f, "EV_ABS {} {value}", axis.name()),
            InputEvent::KeyState(key, pressed) => {
                write!(f, "EV_KEY {} {}", key.name(), *pressed as i32)
            }
            InputEvent::SlotSelect(slot) => write!(f, "EV_ABS ABS_MT_SLOT {slot}"),
            InputEvent::TrackingId(id) => write!(f, "EV_ABS ABS_MT_TRACKING_ID {}", id.value()),
            InputEvent::SyncReport => write!(f, "EV_SYN SYN_REPORT 0"),
        }
    }
}
