use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::models::Device;
use crate::utils::interface_name;

const TEMPLATE_NAME: &str = "device";

/// Interface row of the device template context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceEntry {
    pub name: String,
    pub address: String,
}

/// BGP neighbor row of the device template context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborEntry {
    pub ip: String,
    pub asn: u32,
}

/// Everything a device template can reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceContext {
    pub hostname: String,
    pub role: String,
    pub asn: u32,
    pub loopback: String,
    pub router_id: String,
    pub ip_interfaces: Vec<InterfaceEntry>,
    pub bgp_neighbors: Vec<NeighborEntry>,
}

impl From<&Device> for DeviceContext {
    fn from(device: &Device) -> Self {
        Self {
            hostname: device.name().to_string(),
            role: device.role().to_string(),
            asn: device.asn(),
            loopback: device.loopback().to_string(),
            router_id: device.router_id().to_string(),
            ip_interfaces: device
                .interface_addresses()
                .iter()
                .map(|(ordinal, address)| InterfaceEntry {
                    name: interface_name(*ordinal),
                    address: address.to_string(),
                })
                .collect(),
            bgp_neighbors: device
                .bgp_neighbors()
                .iter()
                .map(|(ip, asn)| NeighborEntry {
                    ip: ip.to_string(),
                    asn: *asn,
                })
                .collect(),
        }
    }
}

/// Compiled device config template
pub struct ConfigRenderer {
    tera: Tera,
}

impl ConfigRenderer {
    pub fn new(template: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, template)
            .map_err(|e| anyhow::anyhow!("Invalid template: {}", e))?;
        Ok(Self { tera })
    }

    pub async fn from_file(path: &str) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read template {}: {}", path, e))?;
        Self::new(&content)
    }

    pub fn render(&self, device: &Device) -> Result<String> {
        let context = Context::from_serialize(DeviceContext::from(device))
            .map_err(|e| anyhow::anyhow!("Invalid template context for {}: {}", device.name(), e))?;
        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| anyhow::anyhow!("Template rendering failed for {}: {}", device.name(), e))
    }
}
