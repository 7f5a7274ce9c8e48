//! # Driven Ports (Outbound)
//!
//! The governance component drives the marketplace only through this
//! gateway: typed privileged calls after quorum, and the operational
//! withdrawal of its accrued fee balance. Keeping the surface behind a
//! trait keeps the quorum logic independent of the ledger's concrete
//! types.

use shared_types::{AdminCall, U256};
use thiserror::Error;

/// Errors surfaced by the marketplace gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The marketplace rejected the call; the message carries its error.
    #[error("marketplace call rejected: {0}")]
    Rejected(String),
}

/// The governance component's view of the marketplace it governs.
pub trait MarketplaceGateway {
    /// Executes a privileged marketplace call, optionally forwarding
    /// `value` alongside it.
    fn execute_admin(&mut self, call: &AdminCall, value: U256) -> Result<(), GatewayError>;

    /// Withdraws the governance component's accumulated marketplace
    /// balance into governance custody. Returns the amount pulled.
    fn withdraw_accrued(&mut self) -> Result<U256, GatewayError>;
}
