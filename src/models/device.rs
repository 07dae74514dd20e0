use std::collections::{BTreeMap, VecDeque};
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use serde::Serialize;

use super::Role;
use crate::fabric::FabricError;

/// Device represents one spine or leaf switch of the fabric.
///
/// Identity, loopback and ASN are fixed at creation. Interface and neighbor
/// tables only grow while links are wired, one entry per link on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    name: String,
    role: Role,
    loopback: Ipv4Net,
    asn: u32,
    available_interfaces: VecDeque<u32>,
    #[serde(skip)]
    interfaces_consumed: usize,
    interface_addresses: BTreeMap<u32, Ipv4Net>,
    bgp_neighbors: BTreeMap<Ipv4Addr, u32>,
}

impl Device {
    pub(crate) fn new(name: String, role: Role, loopback: Ipv4Net, asn: u32, interfaces: Vec<u32>) -> Self {
        Self {
            name,
            role,
            loopback,
            asn,
            available_interfaces: interfaces.into(),
            interfaces_consumed: 0,
            interface_addresses: BTreeMap::new(),
            bgp_neighbors: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Loopback host route, e.g. `10.0.0.1/32`
    pub fn loopback(&self) -> Ipv4Net {
        self.loopback
    }

    /// Loopback address without its prefix length
    pub fn router_id(&self) -> Ipv4Addr {
        self.loopback.addr()
    }

    pub fn asn(&self) -> u32 {
        self.asn
    }

    /// Fabric interface ordinals not yet wired, in allocation order
    pub fn available_interfaces(&self) -> &VecDeque<u32> {
        &self.available_interfaces
    }

    pub fn interfaces_consumed(&self) -> usize {
        self.interfaces_consumed
    }

    /// Interface ordinal to point-to-point address, ascending by ordinal
    pub fn interface_addresses(&self) -> &BTreeMap<u32, Ipv4Net> {
        &self.interface_addresses
    }

    /// Peer address to peer ASN
    pub fn bgp_neighbors(&self) -> &BTreeMap<Ipv4Addr, u32> {
        &self.bgp_neighbors
    }

    /// Pop the first free fabric interface
    pub(crate) fn take_interface(&mut self) -> Result<u32, FabricError> {
        let interface = self
            .available_interfaces
            .pop_front()
            .ok_or_else(|| FabricError::InterfaceExhausted {
                device: self.name.clone(),
            })?;
        self.interfaces_consumed += 1;
        Ok(interface)
    }

    pub(crate) fn assign_interface(&mut self, interface: u32, address: Ipv4Net) -> Result<(), FabricError> {
        if self.interface_addresses.contains_key(&interface) {
            return Err(FabricError::AssignmentConflict {
                device: self.name.clone(),
                key: crate::utils::interface_name(interface),
            });
        }
        self.interface_addresses.insert(interface, address);
        Ok(())
    }

    pub(crate) fn add_neighbor(&mut self, peer: Ipv4Addr, peer_asn: u32) -> Result<(), FabricError> {
        if self.bgp_neighbors.contains_key(&peer) {
            return Err(FabricError::AssignmentConflict {
                device: self.name.clone(),
                key: peer.to_string(),
            });
        }
        self.bgp_neighbors.insert(peer, peer_asn);
        Ok(())
    }
}
