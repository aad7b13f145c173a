//! Block-ring portals: validation, split/merge and paired teleportation.
#![forbid(unsafe_code)]

pub mod error;
pub mod graph;
pub mod portal;

use std::fmt;

pub use error::PortalError;
pub use graph::{PortalGraph, PortalParams};
pub use portal::{Portal, PortalFrame, is_valid_ring, partition};

/// Arena handle for a portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalId(pub u32);

impl fmt::Display for PortalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
