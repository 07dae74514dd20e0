use std::fmt;

use ipnet::Ipv4Net;

use super::BuildState;

/// Address or number pool a lease was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Loopback,
    PointToPoint,
    Asn,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolKind::Loopback => "loopback",
            PoolKind::PointToPoint => "point-to-point",
            PoolKind::Asn => "AS number",
        };
        f.write_str(name)
    }
}

/// Errors raised while allocating and wiring the fabric.
///
/// Every variant is fatal for the build that raised it: the builder is
/// consumed and no partial device/link collection is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FabricError {
    /// A range string is not two ascending integers around one hyphen.
    #[error("malformed range '{input}': {reason}")]
    MalformedRange { input: String, reason: String },

    /// A loopback, point-to-point or AS number pool ran dry.
    #[error("{pool} pool exhausted")]
    PoolExhausted { pool: PoolKind },

    /// A device has no fabric interface left for the next link.
    #[error("no fabric interfaces left on {device}")]
    InterfaceExhausted { device: String },

    /// A leased prefix length cannot be carved out of its supernet.
    #[error("cannot lease /{prefix_len} blocks from {network}")]
    InvalidPrefix { network: Ipv4Net, prefix_len: u8 },

    /// An interface or neighbor entry would overwrite an existing one.
    #[error("{device} already has an entry for {key}")]
    AssignmentConflict { device: String, key: String },

    /// A build stage was invoked out of order.
    #[error("builder is {actual}, expected {expected}")]
    InvalidState { expected: BuildState, actual: BuildState },
}

impl FabricError {
    pub(crate) fn malformed_range(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRange {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
