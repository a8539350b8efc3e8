use crate::input::event::native::InputEvent;

use super::{InputError, TargetInputDevice};

/// A [DebugDevice] logs every event instead of writing to uinput. Useful for
/// checking a controller without creating a virtual device.
#[derive(Debug, Default)]
pub struct DebugDevice {
    name: String,
    batches: u64,
}

impl DebugDevice {
    pub fn new(name: String) -> Self {
        log::info!("Using debug target device '{name}'; no virtual device will be created");
        Self { name, batches: 0 }
    }
}

impl TargetInputDevice for DebugDevice {
    fn write_events(&mut self, events: &[InputEvent]) -> Result<(), InputError> {
        for event in events {
            log::info!("[{}] {event}", self.name);
            if *event == InputEvent::SyncReport {
                self.batches += 1;
            }
        }
        Ok(())
    }
}

impl Drop for DebugDevice {
    fn drop(&mut self) {
        log::debug!("Debug target device '{}' saw {} batch(es)", self.name, self.batches);
    }
}
