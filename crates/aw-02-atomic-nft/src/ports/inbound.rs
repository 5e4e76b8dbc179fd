//! # Driving Ports (API - Inbound)

use crate::domain::entities::NftState;
use crate::output::NftQueryResult;
use async_trait::async_trait;
use shared_types::{ContractError, Interaction};

/// Primary API of the atomic NFT.
#[async_trait]
pub trait AtomicNftApi: Send + Sync {
    /// Applies one interaction to `state`.
    ///
    /// Mutations return `Ok(None)`; queries return their result. On error
    /// `state` is unchanged.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason, including a failed linked-state read.
    async fn apply_interaction(
        &self,
        state: &mut NftState,
        interaction: &Interaction,
    ) -> Result<Option<NftQueryResult>, ContractError>;
}
