use crate::drivers::fse103::discovery::{parse_hex_id, select_port, PortCandidate};

fn candidate(sysname: &str, ids: Option<(u16, u16)>) -> PortCandidate {
    PortCandidate {
        sysname: sysname.to_string(),
        devnode: format!("/dev/{sysname}"),
        vendor_id: ids.map(|(vid, _)| vid),
        product_id: ids.map(|(_, pid)| pid),
    }
}

#[test]
fn test_prefers_sensor_by_usb_id() {
    let ports = vec![
        candidate("ttyS0", None),
        candidate("ttyACM0", Some((0x2341, 0x0043))),
        candidate("ttyACM1", Some((0x16d0, 0x0c21))),
    ];
    let port = select_port(&ports).unwrap();
    assert_eq!(port.devnode, "/dev/ttyACM1");
}

#[test]
fn test_falls_back_to_lowest_acm() {
    let ports = vec![
        candidate("ttyACM10", None),
        candidate("ttyAMA0", None),
        candidate("ttyACM2", None),
    ];
    let port = select_port(&ports).unwrap();
    assert_eq!(port.devnode, "/dev/ttyACM2");
}

#[test]
fn test_no_acm_ports() {
    let ports = vec![candidate("ttyS0", None), candidate("ttyUSB0", None)];
    assert!(select_port(&ports).is_none());
}

#[test]
fn test_parse_hex_id() {
    assert_eq!(parse_hex_id("16d0"), Some(0x16d0));
    assert_eq!(parse_hex_id("0x0c21\n"), Some(0x0c21));
    assert_eq!(parse_hex_id(""), None);
}
