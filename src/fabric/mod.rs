//! Spine/leaf fabric construction.
//!
//! `FabricBuilder` owns the address pool, the shared AS number sequence and
//! the per-role interface ranges for one build. It moves through
//! `Unbuilt -> DevicesCreated -> LinksCreated -> Built` exactly once; each
//! stage takes the builder by value and refuses to run from any other
//! state, so pools are never leased twice. A failed stage drops the
//! builder: callers get a complete `Fabric` or nothing.

mod error;
#[cfg(test)]
mod tests;

pub use error::{FabricError, PoolKind};

use std::fmt;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

use ipnet::Ipv4Net;
use serde::Serialize;

use crate::ipam::{parse_range, ptp_endpoints, AddressPool};
use crate::models::{Device, FabricConfig, Link, LinkEnd, Role};

/// Build progress of a `FabricBuilder`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Unbuilt,
    DevicesCreated,
    LinksCreated,
    Built,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildState::Unbuilt => "unbuilt",
            BuildState::DevicesCreated => "devices-created",
            BuildState::LinksCreated => "links-created",
            BuildState::Built => "built",
        };
        f.write_str(name)
    }
}

/// Device counts and interface ranges for one tier
#[derive(Debug, Clone)]
struct TierPlan {
    role: Role,
    count: usize,
    interfaces: Vec<u32>,
}

/// Orchestrates pools and ranges into a fully meshed fabric
#[derive(Debug)]
pub struct FabricBuilder {
    name: String,
    pool: AddressPool,
    asns: RangeInclusive<u32>,
    spine_plan: TierPlan,
    leaf_plan: TierPlan,
    state: BuildState,
    spines: Vec<Device>,
    leaves: Vec<Device>,
    links: Vec<Link>,
}

impl FabricBuilder {
    /// Seed a builder from the declarative fabric input.
    ///
    /// Ranges are expanded and pools carved here; nothing is leased yet.
    pub fn from_config(config: &FabricConfig) -> Result<Self, FabricError> {
        let pool = AddressPool::new(config.ip.loopbacks, config.ip.fabric_ptp)?;
        Ok(Self::new(
            &config.dc_name,
            pool,
            parse_range(&config.ip.asn_range)?,
            (config.spines.number, parse_range(&config.spines.fabric_interfaces)?.collect()),
            (config.leaves.number, parse_range(&config.leaves.fabric_interfaces)?.collect()),
        ))
    }

    /// Seed a builder from already expanded inputs.
    ///
    /// `asns` is drawn lazily; `spines` and `leaves` are
    /// `(count, interface ordinals)`.
    pub fn new(
        name: &str,
        pool: AddressPool,
        asns: RangeInclusive<u32>,
        spines: (usize, Vec<u32>),
        leaves: (usize, Vec<u32>),
    ) -> Self {
        Self {
            name: name.to_string(),
            pool,
            asns,
            spine_plan: TierPlan {
                role: Role::Spine,
                count: spines.0,
                interfaces: spines.1,
            },
            leaf_plan: TierPlan {
                role: Role::Leaf,
                count: leaves.0,
                interfaces: leaves.1,
            },
            state: BuildState::Unbuilt,
            spines: Vec::new(),
            leaves: Vec::new(),
            links: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Run every stage and hand back the finished fabric
    pub fn build(self) -> Result<Fabric, FabricError> {
        self.create_devices()?.create_links()?.finish()
    }

    /// Create all spines, then all leaves.
    ///
    /// Spines are created first, so they draw the lowest AS numbers and
    /// loopbacks from the shared sequences.
    pub fn create_devices(mut self) -> Result<Self, FabricError> {
        self.expect_state(BuildState::Unbuilt)?;

        let spine_plan = self.spine_plan.clone();
        let leaf_plan = self.leaf_plan.clone();
        self.spines = self.create_tier(&spine_plan)?;
        self.leaves = self.create_tier(&leaf_plan)?;

        self.state = BuildState::DevicesCreated;
        tracing::info!(
            "Created {} spines and {} leaves for {} ({} loopbacks leased)",
            self.spines.len(),
            self.leaves.len(),
            self.name,
            self.pool.leased_loopbacks()
        );
        Ok(self)
    }

    fn create_tier(&mut self, plan: &TierPlan) -> Result<Vec<Device>, FabricError> {
        let mut devices = Vec::new();
        for ordinal in 1..=plan.count {
            let name = plan.role.device_name(ordinal);
            let loopback = self.pool.lease_loopback()?;
            let asn = self.asns.next().ok_or(FabricError::PoolExhausted { pool: PoolKind::Asn })?;
            tracing::debug!("{}: loopback {} asn {}", name, loopback, asn);
            devices.push(Device::new(name, plan.role, loopback, asn, plan.interfaces.clone()));
        }
        Ok(devices)
    }

    /// Wire every leaf to every spine with one point-to-point subnet.
    ///
    /// Leaves are the outer loop and spines the inner one; this order fixes
    /// which subnet and which interfaces every pair gets.
    pub fn create_links(mut self) -> Result<Self, FabricError> {
        self.expect_state(BuildState::DevicesCreated)?;

        let mut links = Vec::new();
        for leaf in self.leaves.iter_mut() {
            for spine in self.spines.iter_mut() {
                links.push(wire(&mut self.pool, spine, leaf)?);
            }
        }
        self.links = links;

        self.state = BuildState::LinksCreated;
        tracing::info!(
            "Created {} fabric links for {} ({} subnets leased)",
            self.links.len(),
            self.name,
            self.pool.leased_subnets()
        );
        Ok(self)
    }

    /// Seal the build
    pub fn finish(mut self) -> Result<Fabric, FabricError> {
        self.expect_state(BuildState::LinksCreated)?;
        for device in self.spines.iter().chain(self.leaves.iter()) {
            tracing::debug!(
                "{}: {} fabric interfaces wired, {} spare",
                device.name(),
                device.interfaces_consumed(),
                device.available_interfaces().len()
            );
        }
        self.state = BuildState::Built;
        Ok(Fabric {
            name: self.name,
            spines: self.spines,
            leaves: self.leaves,
            links: self.links,
        })
    }

    fn expect_state(&self, expected: BuildState) -> Result<(), FabricError> {
        if self.state != expected {
            return Err(FabricError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}

/// Allocate one spine-leaf link and record it on both devices
fn wire(pool: &mut AddressPool, spine: &mut Device, leaf: &mut Device) -> Result<Link, FabricError> {
    let subnet = pool.lease_ptp_subnet()?;
    let (spine_ip, leaf_ip) = ptp_endpoints(subnet);
    let spine_if = spine.take_interface()?;
    let leaf_if = leaf.take_interface()?;

    spine.assign_interface(spine_if, host_net(spine_ip, subnet)?)?;
    leaf.assign_interface(leaf_if, host_net(leaf_ip, subnet)?)?;
    spine.add_neighbor(leaf_ip, leaf.asn())?;
    leaf.add_neighbor(spine_ip, spine.asn())?;

    tracing::debug!(
        "{} eth{} {} <-> {} eth{} {} [{}]",
        spine.name(),
        spine_if,
        spine_ip,
        leaf.name(),
        leaf_if,
        leaf_ip,
        subnet
    );

    Ok(Link {
        spine: LinkEnd {
            device: spine.name().to_string(),
            interface: spine_if,
            address: spine_ip,
        },
        leaf: LinkEnd {
            device: leaf.name().to_string(),
            interface: leaf_if,
            address: leaf_ip,
        },
        subnet,
    })
}

/// Interface address: an endpoint with the prefix length of its subnet
fn host_net(address: Ipv4Addr, subnet: Ipv4Net) -> Result<Ipv4Net, FabricError> {
    Ipv4Net::new(address, subnet.prefix_len()).map_err(|_| FabricError::InvalidPrefix {
        network: subnet,
        prefix_len: subnet.prefix_len(),
    })
}

/// Fabric is the finished, read-only result of one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fabric {
    name: String,
    spines: Vec<Device>,
    leaves: Vec<Device>,
    links: Vec<Link>,
}

impl Fabric {
    /// Fabric label, the configured `dc_name`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spines(&self) -> &[Device] {
        &self.spines
    }

    pub fn leaves(&self) -> &[Device] {
        &self.leaves
    }

    /// Spines then leaves, in creation order
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.spines.iter().chain(self.leaves.iter())
    }

    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices().find(|d| d.name() == name)
    }

    /// Links in creation order: grouped by leaf, spines ascending within
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Links touching one device
    pub fn links_for<'a>(&'a self, device: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links
            .iter()
            .filter(move |l| l.spine.device == device || l.leaf.device == device)
    }
}
