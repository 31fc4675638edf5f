//! Finds the tty node the force sensor is attached to
use std::error::Error;

use udev::Enumerator;

use super::is_fse103;

/// A tty device that could be the force sensor
#[derive(Debug, Clone, PartialEq)]
pub struct PortCandidate {
    /// Kernel name, e.g. "ttyACM0"
    pub sysname: String,
    /// Device node, e.g. "/dev/ttyACM0"
    pub devnode: String,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
}

impl PortCandidate {
    /// Returns true if the USB ids identify an FSE103
    pub fn is_sensor(&self) -> bool {
        match (self.vendor_id, self.product_id) {
            (Some(vid), Some(pid)) => is_fse103(vid, pid),
            _ => false,
        }
    }

    /// Numeric suffix of the kernel name (ttyACM12 -> 12)
    fn index(&self) -> u32 {
        let digits: String = self
            .sysname
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(u32::MAX)
    }
}

/// Pick the port to use: an FSE103 by USB id if one is present, otherwise the
/// lowest numbered ttyACM device.
pub fn select_port(candidates: &[PortCandidate]) -> Option<&PortCandidate> {
    let mut acm: Vec<&PortCandidate> = candidates
        .iter()
        .filter(|c| c.sysname.starts_with("ttyACM"))
        .collect();
    acm.sort_by_key(|c| c.index());

    if let Some(sensor) = acm.iter().find(|c| c.is_sensor()) {
        return Some(sensor);
    }
    acm.first().copied()
}

/// Enumerate all tty devices through udev
pub fn list_ports() -> Result<Vec<PortCandidate>, Box<dyn Error + Send + Sync>> {
    let mut enumerator = Enumerator::new()?;
    enumerator.match_subsystem("tty")?;

    log::debug!("Started udev tty enumerator.");

    let ports = enumerator
        .scan_devices()?
        .filter_map(|device| {
            let devnode = device.devnode()?.to_string_lossy().to_string();
            let sysname = device.sysname().to_string_lossy().to_string();
            let vendor_id = parse_hex_id(&get_attribute_from_tree(&device, "idVendor"));
            let product_id = parse_hex_id(&get_attribute_from_tree(&device, "idProduct"));
            Some(PortCandidate {
                sysname,
                devnode,
                vendor_id,
                product_id,
            })
        })
        .collect();

    Ok(ports)
}

/// Find the device node of the force sensor
pub fn find_port() -> Result<String, Box<dyn Error + Send + Sync>> {
    let ports = list_ports()?;
    for port in &ports {
        log::trace!("Found tty device: {:?}", port);
    }
    let Some(port) = select_port(&ports) else {
        return Err("No available port. Ensure sensor is plugged in.".into());
    };
    if !port.is_sensor() {
        log::warn!(
            "No tty reported the FSE103 id {:04x}:{:04x}. Using {}",
            super::FSE103_VID,
            super::FSE103_PID,
            port.devnode
        );
    }

    Ok(port.devnode.clone())
}

/// Parse a sysfs USB id such as "16d0"
pub fn parse_hex_id(value: &str) -> Option<u16> {
    let value = value.trim();
    let value = value.strip_prefix("0x").unwrap_or(value);
    u16::from_str_radix(value, 16).ok()
}

/// Gets an attribute from the first device in the device tree to match the attribute.
fn get_attribute_from_tree(device: &udev::Device, attribute: &str) -> String {
    match device.attribute_value(attribute) {
        Some(attr) => attr.to_string_lossy().to_string(),
        None => match device.parent() {
            Some(parent) => get_attribute_from_tree(&parent, attribute),
            None => "".to_string(),
        },
    }
}
