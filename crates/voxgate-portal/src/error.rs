use crate::PortalId;

/// Misuse of the portal registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PortalError {
    #[error("no portal with id {0}")]
    UnknownPortal(PortalId),

    #[error("portal {0} cannot be linked to itself")]
    SelfLink(PortalId),
}
