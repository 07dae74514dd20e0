use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use serde::Serialize;

use crate::utils::last_octet;

/// One side of a fabric link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEnd {
    pub device: String,
    pub interface: u32,
    pub address: Ipv4Addr,
}

impl LinkEnd {
    /// Edge label used by the diagrams, e.g. `e3 ip: .5`
    pub fn label(&self) -> String {
        format!("e{} ip: .{}", self.interface, last_octet(self.address))
    }
}

/// Point-to-point connection between one spine and one leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub spine: LinkEnd,
    pub leaf: LinkEnd,
    pub subnet: Ipv4Net,
}
