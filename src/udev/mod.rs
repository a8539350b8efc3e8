
pub mod device;

use std::error::Error;

use udev::Enumerator;

use self::device::UdevDevice;

/// Returns a list of devices in the given subsystem that have a devnode property.
pub fn discover_devices(subsystem: &str) -> Result<Vec<UdevDevice>, Box<dyn Error + Send + Sync>> {
    let mut enumerator = Enumerator::new()?;
    enumerator.match_subsystem(subsystem)?;

    log::debug!("Started udev {subsystem} enumerator.");

    Ok(enumerator
        .scan_devices()?
        .map(UdevDevice::from)
        .filter(|device| !device.devnode().is_empty())
        .collect())
}

/// Returns the devnode of the first hidraw device with the given vendor and
/// product ids, e.g. "/dev/hidraw3".
pub fn find_touch_device(vid: u16, pid: u16) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
    let devices = discover_devices("hidraw")?;
    let found = devices.into_iter().find(|device| {
        let matches = device.is_hidraw() && device.matches(vid, pid);
        log::trace!(
            "Checking {}: {:04x}:{:04x} match={matches}",
            device.devnode(),
            device.id_vendor(),
            device.id_product()
        );
        matches
    });

    Ok(found.map(|device| device.devnode()))
}
