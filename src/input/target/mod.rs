use std::{error::Error, io};

use thiserror::Error;

use super::event::native::InputEvent;

pub mod debug;
pub mod touchscreen;

/// Possible errors while writing to a target device
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to write events to device: {0}")]
    DeviceError(#[from] io::Error),
}

/// A [TargetInputDevice] receives ordered batches of [InputEvent]s. A batch
/// is terminated by [InputEvent::SyncReport]; events written after the last
/// sync stay pending until the next one.
pub trait TargetInputDevice {
    fn write_events(&mut self, events: &[InputEvent]) -> Result<(), InputError>;
}

/// Kind of virtual device to create for a session
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TargetDeviceTypeId {
    #[default]
    Touchscreen,
    Debug,
}

/// A [TargetDevice] is any virtual input device that emits input events
#[derive(Debug)]
pub enum TargetDevice {
    Touchscreen(touchscreen::TouchscreenDevice),
    Debug(debug::DebugDevice),
}

impl TargetDevice {
    /// Create the virtual device of the given kind
    pub fn create(
        kind: TargetDeviceTypeId,
        config: touchscreen::TouchscreenConfig,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let device = match kind {
            TargetDeviceTypeId::Touchscreen => {
                Self::Touchscreen(touchscreen::TouchscreenDevice::new_with_config(config)?)
            }
            TargetDeviceTypeId::Debug => Self::Debug(debug::DebugDevice::new(config.name)),
        };
        Ok(device)
    }
}

impl TargetInputDevice for TargetDevice {
    fn write_events(&mut self, events: &[InputEvent]) -> Result<(), InputError> {
        match self {
            TargetDevice::Touchscreen(device) => device.write_events(events),
            TargetDevice::Debug(device) => device.write_events(events),
        }
    }
}
