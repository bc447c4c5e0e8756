use ethers::types::{Bytes, H256};
use serde::{Deserialize, Serialize};

use crate::{
    common::{ChecksumAddress, Operation},
    utils::DecimalU256,
};

/// An address as rendered by the client gateway
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    /// The address
    pub value: ChecksumAddress,
    /// Display name, if the gateway knows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<ChecksumAddress> for AddressInfo {
    fn from(value: ChecksumAddress) -> Self {
        Self { value, name: None }
    }
}

/// What was transferred
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum TransferInfo {
    /// Fungible token
    #[serde(rename = "ERC20", rename_all = "camelCase")]
    Erc20 {
        /// Token contract
        token_address: ChecksumAddress,
        /// Amount in the token's base unit
        value: DecimalU256,
    },
    /// NFT
    #[serde(rename = "ERC721", rename_all = "camelCase")]
    Erc721 {
        /// Token contract
        token_address: ChecksumAddress,
        /// Token id
        token_id: DecimalU256,
    },
    /// Ether
    #[serde(rename = "NATIVE_COIN")]
    NativeCoin {
        /// Amount in wei
        value: DecimalU256,
    },
}

/// High level classification of a Safe transaction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum TransactionInfo {
    /// Ether, token or NFT transfer
    #[serde(rename_all = "camelCase")]
    Transfer {
        /// Sending account
        sender: AddressInfo,
        /// Receiving account
        recipient: AddressInfo,
        /// What moved
        transfer_info: TransferInfo,
    },
    /// Owner, threshold, module or guard change on the Safe itself
    SettingsChange {},
    /// Any other contract interaction
    Custom {
        /// Call target
        to: AddressInfo,
        /// Wei forwarded
        value: DecimalU256,
    },
    /// Safe deployment
    Creation {},
    /// Anything the gateway adds later
    #[serde(other)]
    Unknown,
}

/// Raw call data of a Safe transaction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    /// Inner call data, `null` for plain transfers
    #[serde(default)]
    pub hex_data: Option<Bytes>,
    /// Wei forwarded
    pub value: DecimalU256,
    /// Call or delegate call
    #[serde(default)]
    pub operation: Operation,
}

/// Execution parameters of a multisig transaction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MultisigExecutionDetails {
    /// Safe nonce
    pub nonce: DecimalU256,
    /// Gas forwarded to the inner call
    pub safe_tx_gas: DecimalU256,
    /// Refunded gas overhead
    pub base_gas: DecimalU256,
    /// Refund price per gas unit
    pub gas_price: DecimalU256,
    /// Refund token
    pub gas_token: ChecksumAddress,
    /// Refund receiver
    pub refund_receiver: AddressInfo,
    /// The hash the owners sign, as reported by the gateway
    pub safe_tx_hash: H256,
    /// Number of confirmations needed
    #[serde(default)]
    pub confirmations_required: u64,
}

/// How a transaction gets executed
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum DetailedExecutionInfo {
    /// Signed by the owners
    #[serde(rename = "MULTISIG")]
    Multisig(MultisigExecutionDetails),
    /// Module or anything else
    #[serde(other)]
    Other,
}

/// A transaction as returned by the client gateway
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    /// Classification
    pub tx_info: TransactionInfo,
    /// Raw call data
    #[serde(default)]
    pub tx_data: Option<TxData>,
    /// Execution parameters
    #[serde(default)]
    pub detailed_execution_info: Option<DetailedExecutionInfo>,
}

impl TransactionDetails {
    /// Multisig execution parameters, if this is a multisig transaction
    pub fn multisig_execution_details(&self) -> Option<&MultisigExecutionDetails> {
        match &self.detailed_execution_info {
            Some(DetailedExecutionInfo::Multisig(details)) => Some(details),
            _ => None,
        }
    }
}
