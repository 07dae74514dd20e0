//! Address and number allocation for the fabric build.
//!
//! Leases are strictly sequential: the pools walk their supernet in
//! ascending order and never hand a value back. One `AddressPool` lives for
//! exactly one fabric build.

mod range;

pub use range::parse_range;

use std::net::Ipv4Addr;

use ipnet::{Ipv4Net, Ipv4Subnets};

use crate::fabric::{FabricError, PoolKind};

/// Prefix length of a loopback lease
pub const LOOPBACK_PREFIX_LEN: u8 = 32;
/// Prefix length of a point-to-point lease
pub const PTP_PREFIX_LEN: u8 = 31;

/// Leases loopback host routes and point-to-point subnets from two supernets
#[derive(Debug, Clone)]
pub struct AddressPool {
    loopbacks: Ipv4Subnets,
    ptp_subnets: Ipv4Subnets,
    leased_loopbacks: usize,
    leased_subnets: usize,
}

impl AddressPool {
    /// Pool with the fabric's fixed /32 loopback and /31 link lengths
    pub fn new(loopback_block: Ipv4Net, ptp_block: Ipv4Net) -> Result<Self, FabricError> {
        Self::with_prefix_lengths(loopback_block, LOOPBACK_PREFIX_LEN, ptp_block, PTP_PREFIX_LEN)
    }

    /// Pool with explicit lease lengths.
    ///
    /// The point-to-point length must leave room for two endpoints, so /32
    /// is rejected there.
    pub fn with_prefix_lengths(
        loopback_block: Ipv4Net,
        loopback_len: u8,
        ptp_block: Ipv4Net,
        ptp_len: u8,
    ) -> Result<Self, FabricError> {
        let loopbacks = loopback_block
            .subnets(loopback_len)
            .map_err(|_| FabricError::InvalidPrefix {
                network: loopback_block,
                prefix_len: loopback_len,
            })?;

        let invalid_ptp = FabricError::InvalidPrefix {
            network: ptp_block,
            prefix_len: ptp_len,
        };
        if ptp_len > PTP_PREFIX_LEN {
            return Err(invalid_ptp);
        }
        let ptp_subnets = ptp_block.subnets(ptp_len).map_err(|_| invalid_ptp)?;

        Ok(Self {
            loopbacks,
            ptp_subnets,
            leased_loopbacks: 0,
            leased_subnets: 0,
        })
    }

    /// Next unused loopback, as a host route
    pub fn lease_loopback(&mut self) -> Result<Ipv4Net, FabricError> {
        let loopback = self.loopbacks.next().ok_or(FabricError::PoolExhausted {
            pool: PoolKind::Loopback,
        })?;
        self.leased_loopbacks += 1;
        Ok(loopback)
    }

    /// Next unused point-to-point block
    pub fn lease_ptp_subnet(&mut self) -> Result<Ipv4Net, FabricError> {
        let subnet = self.ptp_subnets.next().ok_or(FabricError::PoolExhausted {
            pool: PoolKind::PointToPoint,
        })?;
        self.leased_subnets += 1;
        Ok(subnet)
    }

    pub fn leased_loopbacks(&self) -> usize {
        self.leased_loopbacks
    }

    pub fn leased_subnets(&self) -> usize {
        self.leased_subnets
    }
}

/// Spine and leaf addresses of a point-to-point block.
///
/// The spine always takes the numerically lower address. A /31 has no
/// network or broadcast address, so both of its addresses are used; longer
/// blocks skip them.
pub fn ptp_endpoints(subnet: Ipv4Net) -> (Ipv4Addr, Ipv4Addr) {
    let network = u32::from(subnet.network());
    let broadcast = u32::from(subnet.broadcast());
    if subnet.prefix_len() >= PTP_PREFIX_LEN {
        (Ipv4Addr::from(network), Ipv4Addr::from(broadcast))
    } else {
        (Ipv4Addr::from(network + 1), Ipv4Addr::from(broadcast - 1))
    }
}
