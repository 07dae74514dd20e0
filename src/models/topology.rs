use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical CLOS topology role values
pub mod topology_role {
    pub const SPINE: &str = "spine";
    pub const LEAF: &str = "leaf";
}

/// Tier a switch sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Spine,
    Leaf,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Spine => topology_role::SPINE,
            Role::Leaf => topology_role::LEAF,
        }
    }

    /// Device name for the 1-based ordinal within this role, e.g. `spine1`
    pub fn device_name(&self, ordinal: usize) -> String {
        format!("{}{}", self.as_str(), ordinal)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
