use std::error::Error;

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AbsInfo, AbsoluteAxisCode, AttributeSet, BusType, InputId, KeyCode, PropType,
    UinputAbsSetup,
};

use crate::{
    drivers::rpi_touch::{
        event::MAX_TOUCHES,
        hid_report::{TOUCHSCREEN_X_MAX, TOUCHSCREEN_Y_MAX},
    },
    input::event::{evdev::translate_event, native::InputEvent},
};

use super::{InputError, TargetInputDevice};

/// Configuration of the target touchscreen device.
#[derive(Debug, Clone)]
pub struct TouchscreenConfig {
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub version: u16,
    pub width: u16,
    pub height: u16,
}

impl Default for TouchscreenConfig {
    fn default() -> Self {
        Self {
            name: "RPI_TOUCH_uinput".to_string(),
            vendor_id: 1,
            product_id: 1,
            version: 1,
            width: TOUCHSCREEN_X_MAX,
            height: TOUCHSCREEN_Y_MAX,
        }
    }
}

/// Multi-touch touchscreen implementation using evdev/uinput. The virtual
/// device exists for as long as this value does.
#[derive(Debug)]
pub struct TouchscreenDevice {
    device: VirtualDevice,
    pending: Vec<evdev::InputEvent>,
}

impl TouchscreenDevice {
    /// Create a new emulated touchscreen device with the given configuration.
    pub fn new_with_config(config: TouchscreenConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let device = TouchscreenDevice::create_virtual_device(&config)?;
        Ok(Self {
            device,
            pending: Vec::new(),
        })
    }

    /// Create the virtual device to emulate
    fn create_virtual_device(
        config: &TouchscreenConfig,
    ) -> Result<VirtualDevice, Box<dyn Error + Send + Sync>> {
        log::debug!("Creating virtual touchscreen '{}'", config.name);

        // Setup Key inputs
        let mut keys = AttributeSet::<KeyCode>::new();
        keys.insert(KeyCode::BTN_TOUCH);

        // Setup ABS inputs
        let screen_width_setup = AbsInfo::new(0, 0, config.width as i32, 0, 0, 0);
        let screen_height_setup = AbsInfo::new(0, 0, config.height as i32, 0, 0, 0);
        let abs_x = UinputAbsSetup::new(AbsoluteAxisCode::ABS_X, screen_width_setup);
        let abs_y = UinputAbsSetup::new(AbsoluteAxisCode::ABS_Y, screen_height_setup);
        let abs_mt_pos_x =
            UinputAbsSetup::new(AbsoluteAxisCode::ABS_MT_POSITION_X, screen_width_setup);
        let abs_mt_pos_y =
            UinputAbsSetup::new(AbsoluteAxisCode::ABS_MT_POSITION_Y, screen_height_setup);

        // Slots and tracking ids both range over the slot indices
        let slot_setup = AbsInfo::new(0, 0, MAX_TOUCHES as i32 - 1, 0, 0, 0);
        let abs_mt_slot = UinputAbsSetup::new(AbsoluteAxisCode::ABS_MT_SLOT, slot_setup);
        let abs_mt_tracking_id =
            UinputAbsSetup::new(AbsoluteAxisCode::ABS_MT_TRACKING_ID, slot_setup);

        // Setup properties
        let mut properties = AttributeSet::<PropType>::new();
        properties.insert(PropType::DIRECT);

        // BUS_VIRTUAL
        let id = InputId::new(
            BusType(0x06),
            config.vendor_id,
            config.product_id,
            config.version,
        );

        // Build the device
        let device = VirtualDeviceBuilder::new()?
            .name(config.name.as_str())
            .input_id(id)
            .with_properties(&properties)?
            .with_keys(&keys)?
            .with_absolute_axis(&abs_x)?
            .with_absolute_axis(&abs_y)?
            .with_absolute_axis(&abs_mt_slot)?
            .with_absolute_axis(&abs_mt_tracking_id)?
            .with_absolute_axis(&abs_mt_pos_x)?
            .with_absolute_axis(&abs_mt_pos_y)?
            .build()?;

        Ok(device)
    }
}

impl TargetInputDevice for TouchscreenDevice {
    fn write_events(&mut self, events: &[InputEvent]) -> Result<(), InputError> {
        // VirtualDevice::emit() terminates every batch with SYN_REPORT itself
        for batch in queue_events(&mut self.pending, events) {
            log::trace!("Writing batch of {} event(s)", batch.len());
            self.device.emit(batch.as_slice())?;
        }
        Ok(())
    }
}

impl Drop for TouchscreenDevice {
    fn drop(&mut self) {
        log::debug!("Destroying virtual touchscreen");
    }
}

/// Translate the given events and append them to `pending`. Every
/// [InputEvent::SyncReport] closes the pending batch; the closed batches are
/// returned without their sync event.
pub fn queue_events(
    pending: &mut Vec<evdev::InputEvent>,
    events: &[InputEvent],
) -> Vec<Vec<evdev::InputEvent>> {
    let mut batches = Vec::new();
    for event in events {
        match event {
            InputEvent::SyncReport => batches.push(std::mem::take(pending)),
            _ => pending.push(translate_event(event)),
        }
    }
    batches
}
