//! # Collaborator Contracts
//!
//! Abstract contracts for the external services checkout talks to. These
//! describe behavior, not transport: the storefront wires in HTTP or IPC
//! implementations, tests wire in stubs.

use async_trait::async_trait;
use thiserror::Error;

use lumiere_core::{CustomerSnapshot, OrderDraft, OrderReference, ShippingAddress};

// =============================================================================
// Collaborator Error
// =============================================================================

/// Failure reported by an external collaborator.
///
/// The orchestrator maps every collaborator failure to a retryable checkout
/// error; nothing the collaborators report is terminal for the session.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    /// The service could not be reached.
    #[error("service unreachable: {0}")]
    Transport(String),

    /// The service rejected the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

// =============================================================================
// Contracts
// =============================================================================

/// The external address book.
///
/// Checkout only reads candidates and forwards explicit save requests; all
/// other address CRUD lives with the collaborator.
#[async_trait]
pub trait AddressBook: Send + Sync {
    /// Lists the customer's saved shipping addresses.
    async fn list(&self, customer_id: &str) -> CollaboratorResult<Vec<ShippingAddress>>;

    /// Stores a new address and returns it with its assigned id.
    async fn create(
        &self,
        customer_id: &str,
        address: ShippingAddress,
    ) -> CollaboratorResult<ShippingAddress>;
}

/// The external customer profile service.
#[async_trait]
pub trait CustomerProfile: Send + Sync {
    /// Fetches the profile snapshot (loyalty balance) for a customer.
    async fn get(&self, customer_id: &str) -> CollaboratorResult<CustomerSnapshot>;
}

/// The external order submission service.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Creates an order from a fully-assembled draft.
    async fn create(&self, draft: &OrderDraft) -> CollaboratorResult<OrderReference>;
}
