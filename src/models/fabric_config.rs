use std::path::Path;

use anyhow::{Context, Result};
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

/// Per-tier switch count and fabric interface range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    pub number: usize,
    /// Inclusive interface ordinal range, e.g. `"1-4"`
    pub fabric_interfaces: String,
}

/// Addressing and AS number pools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpConfig {
    pub loopbacks: Ipv4Net,
    pub fabric_ptp: Ipv4Net,
    /// Inclusive AS number range, e.g. `"65000-65100"`
    pub asn_range: String,
}

/// FabricConfig is the declarative input of one fabric build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricConfig {
    pub dc_name: String,
    pub spines: TierConfig,
    pub leaves: TierConfig,
    pub ip: IpConfig,
}

impl FabricConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Invalid fabric configuration")
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read fabric configuration {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
