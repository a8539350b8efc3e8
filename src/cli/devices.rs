use std::error::Error;

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::config::BridgeConfig;
use crate::udev::discover_devices;

#[derive(Tabled)]
struct HidrawDeviceRow {
    path: String,
    name: String,
    vendor: String,
    product: String,
    touch: String,
}

/// Print all hidraw devices as a table, marking the configured controller
pub fn handle_devices(config: &BridgeConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let vid = config.device.vendor_id;
    let pid = config.device.product_id;

    let mut devices = discover_devices("hidraw")?;
    devices.sort_by_key(|device| device.devnode());
    let count = devices.len();

    let rows: Vec<HidrawDeviceRow> = devices
        .iter()
        .map(|device| {
            let vendor = device.id_vendor();
            let product = device.id_product();
            let touch = if vendor == vid && product == pid {
                "*"
            } else {
                ""
            };
            HidrawDeviceRow {
                path: device.devnode(),
                name: device.name(),
                vendor: format!("{vendor:04x}"),
                product: format!("{product:04x}"),
                touch: touch.to_string(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("HIDRaw Devices"));
    println!("{table}");
    println!("Found {count} hidraw device(s)");

    Ok(())
}
