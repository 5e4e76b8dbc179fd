//! # Operation Inputs
//!
//! Decodes the raw interaction input into one of the four token operations.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use shared_types::ContractError;

/// `balance{target?}` and `transfer{target, qty}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TargetQtyInput {
    /// Account to inspect or receive.
    #[serde(default)]
    pub target: Option<String>,
    /// Transfer amount; must be exactly 1.
    #[serde(default)]
    pub qty: Option<f64>,
}

/// `updateLinkedContract{contractAddress}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkedContractInput {
    /// New wiki contract address.
    #[serde(default)]
    pub contract_address: Option<String>,
}

/// A decoded atomic NFT call.
#[derive(Debug, Clone, PartialEq)]
pub enum NftInput {
    /// Holder balance query.
    Balance(TargetQtyInput),
    /// Hand the token to the page sponsor.
    Transfer(TargetQtyInput),
    /// Linked contract and page query.
    LinkedInfo,
    /// Re-point the token to another wiki contract.
    UpdateLinkedContract(UpdateLinkedContractInput),
}

impl NftInput {
    /// Decodes a raw interaction input.
    ///
    /// # Errors
    ///
    /// `Invalid function!` for an unknown or missing function name and
    /// `ContractError::InvalidInput` for a payload of the wrong shape.
    pub fn decode(input: &Value) -> Result<Self, ContractError> {
        let function = input.get("function").and_then(Value::as_str);
        Ok(match function {
            Some("balance") => Self::Balance(payload(input)?),
            Some("transfer") => Self::Transfer(payload(input)?),
            Some("linkedInfo") => Self::LinkedInfo,
            Some("updateLinkedContract") => Self::UpdateLinkedContract(payload(input)?),
            _ => return Err(ContractError::rejected("Invalid function!")),
        })
    }

    /// True for calls that never change state.
    #[must_use]
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Balance(_) | Self::LinkedInfo)
    }
}

fn payload<T: DeserializeOwned>(input: &Value) -> Result<T, ContractError> {
    T::deserialize(input).map_err(|e| ContractError::InvalidInput(e.to_string()))
}
