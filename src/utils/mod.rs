use std::net::Ipv4Addr;

/// Prefix of rendered fabric interface names
pub const INTERFACE_PREFIX: &str = "eth";

/// Interface name for an ordinal, e.g. 3 -> "eth3"
pub fn interface_name(ordinal: u32) -> String {
    format!("{}{}", INTERFACE_PREFIX, ordinal)
}

/// Last octet of an address, used in compact link labels
pub fn last_octet(addr: Ipv4Addr) -> u8 {
    addr.octets()[3]
}

/// Convert a device name to its rendered config filename
/// e.g., "leaf1" -> "leaf1.txt"
pub fn config_filename(device: &str) -> String {
    format!("{}.txt", device)
}

/// Link from a diagram to a device's rendered config, relative to the
/// diagrams directory
pub fn config_url(device: &str) -> String {
    format!("../config/{}", config_filename(device))
}
