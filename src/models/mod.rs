mod device;
mod fabric_config;
mod link;
mod topology;

pub use device::Device;
pub use fabric_config::FabricConfig;
#[cfg(test)]
pub use fabric_config::{IpConfig, TierConfig};
pub use link::{Link, LinkEnd};
pub use topology::Role;
