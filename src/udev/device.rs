use std::{error::Error, ffi::OsStr, path::Path};

/// A hidraw node and the udev information needed to identify it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UdevDevice {
    devnode: String,
    subsystem: String,
    syspath: String,
}

impl UdevDevice {
    /// returns a udev::Device from the stored syspath.
    pub fn get_device(&self) -> Result<::udev::Device, Box<dyn Error + Send + Sync>> {
        match ::udev::Device::from_syspath(Path::new(self.syspath.as_str())) {
            Ok(device) => Ok(device),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns true if this is a hidraw node
    pub fn is_hidraw(&self) -> bool {
        self.subsystem == "hidraw"
    }

    pub fn devnode(&self) -> String {
        self.devnode.clone()
    }

    pub fn id_vendor(&self) -> u16 {
        self.get_id_attribute("idVendor", |(vendor, _)| vendor)
    }

    pub fn id_product(&self) -> u16 {
        self.get_id_attribute("idProduct", |(_, product)| product)
    }

    /// Returns true if the device has the given vendor and product ids
    pub fn matches(&self, vid: u16, pid: u16) -> bool {
        self.id_vendor() == vid && self.id_product() == pid
    }

    pub fn name(&self) -> String {
        let Ok(device) = self.get_device() else {
            return "".to_string();
        };
        let attr = get_property_from_tree(&device, "HID_NAME");
        if !attr.is_empty() {
            return attr;
        }
        get_attribute_from_tree(&device, "product")
    }

    /// USB devices expose idVendor/idProduct further up the tree. Devices on
    /// other buses only carry the HID_ID property of their hid parent.
    fn get_id_attribute(&self, attribute: &str, pick: fn((u16, u16)) -> u16) -> u16 {
        let Ok(device) = self.get_device() else {
            return 0;
        };
        let attr = parse_hex_id(get_attribute_from_tree(&device, attribute).as_str());
        if attr != 0 {
            return attr;
        }
        let hid_id = get_property_from_tree(&device, "HID_ID");
        parse_hid_id(hid_id.as_str()).map(pick).unwrap_or(0)
    }
}

/// Parse a hexadecimal sysfs id such as "0eef" or "0x0eef". Returns 0 if the
/// value cannot be parsed.
pub fn parse_hex_id(value: &str) -> u16 {
    let value = value.trim();
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    u16::from_str_radix(stripped, 16).unwrap_or(0)
}

/// Parse the vendor and product ids from a HID_ID property.
/// e.g. "0003:00000EEF:00000005" -> (0x0eef, 0x0005)
pub fn parse_hid_id(value: &str) -> Option<(u16, u16)> {
    let mut parts = value.trim().split(':');
    let _bus = parts.next()?;
    let vendor = u32::from_str_radix(parts.next()?, 16).ok()?;
    let product = u32::from_str_radix(parts.next()?, 16).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((
        u16::try_from(vendor).ok()?,
        u16::try_from(product).ok()?,
    ))
}

/// Gets an attribute from the first device in the device tree to match the attribute.
pub fn get_attribute_from_tree(device: &::udev::Device, attribute: &str) -> String {
    match device.attribute_value(attribute) {
        Some(attr) => attr.to_string_lossy().to_string(),
        None => match device.parent() {
            Some(parent) => get_attribute_from_tree(&parent, attribute),
            None => "".to_string(),
        },
    }
}

/// Gets a udev property from the first device in the device tree that has it.
pub fn get_property_from_tree(device: &::udev::Device, property: &str) -> String {
    match device.property_value(property) {
        Some(value) => value.to_string_lossy().to_string(),
        None => match device.parent() {
            Some(parent) => get_property_from_tree(&parent, property),
            None => "".to_string(),
        },
    }
}

impl From<::udev::Device> for UdevDevice {
    fn from(device: ::udev::Device) -> Self {
        let devnode = device
            .devnode()
            .unwrap_or(Path::new(""))
            .to_string_lossy()
            .to_string();
        let subsystem = device
            .subsystem()
            .unwrap_or(OsStr::new(""))
            .to_string_lossy()
            .to_string();
        let syspath = device.syspath().to_string_lossy().to_string();

        Self {
            devnode,
            subsystem,
            syspath,
        }
    }
}
