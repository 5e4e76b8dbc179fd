//! # Driving Ports (API - Inbound)
//!
//! The interface a host uses to run interactions against a wiki state.
//! Hosts own the state and its persistence; the contract only transforms it.

use crate::domain::entities::WikiState;
use crate::output::QueryResult;
use shared_types::{BlockContext, ContractError, Interaction};

/// Primary API of the wiki contract.
pub trait WikiContractApi: Send {
    /// Applies one interaction to `state`.
    ///
    /// Mutating operations return `Ok(None)` and leave the new state in
    /// `state`; queries return their result and never touch `state`. On
    /// error `state` is exactly as it was before the call.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason when any precondition fails.
    fn apply_interaction(
        &mut self,
        state: &mut WikiState,
        interaction: &Interaction,
        block: BlockContext,
    ) -> Result<Option<QueryResult>, ContractError>;
}
