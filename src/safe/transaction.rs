use ethers::{
    abi::{self, Tokenize},
    types::{Address, Bytes, H256, U256},
    utils::keccak256,
};

use crate::common::Operation;

/// The payload a Safe executes, as signed by its owners. Distinct from the
/// outer Ethereum transaction that carries it.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransaction {
    /// Target of the inner call
    pub to: Address,
    /// Wei forwarded with the inner call
    #[serde(default)]
    pub value: U256,
    /// Inner call data
    #[serde(default)]
    pub data: Bytes,
    /// Call or delegate call
    #[serde(default)]
    pub operation: Operation,
    /// Gas to be forwarded to the callee. 0 for all available
    #[serde(default)]
    pub safe_tx_gas: U256,
    /// Gas cost that is independent of the internal transaction execution,
    /// (e.g. base transaction fee, signature check, payment of the refund).
    /// Called `dataGas` before 1.0.0
    #[serde(default, alias = "dataGas")]
    pub base_gas: U256,
    /// Refund price per gas unit. 0 for no refund
    #[serde(default)]
    pub gas_price: U256,
    /// Token address (or 0 if ETH) that is used for the reimbursement payment
    /// to the executor.
    #[serde(default)]
    pub gas_token: Address,
    /// The address which receives the refund. `tx.origin` if zero
    #[serde(default)]
    pub refund_receiver: Address,
    /// The Safe nonce to use
    #[serde(default)]
    pub nonce: U256,
}

// `typehash` followed by the fields in struct order, `data` hashed
struct SafeTxStruct<'a> {
    typehash: H256,
    tx: &'a SafeTransaction,
}

impl Tokenize for SafeTxStruct<'_> {
    fn into_tokens(self) -> Vec<abi::Token> {
        let tx = self.tx;
        (
            self.typehash,
            tx.to,
            tx.value,
            H256::from(keccak256(&tx.data)),
            tx.operation,
            tx.safe_tx_gas,
            tx.base_gas,
            tx.gas_price,
            tx.gas_token,
            tx.refund_receiver,
            tx.nonce,
        )
            .into_tokens()
    }
}

impl SafeTransaction {
    /// A call with no refund settings and nonce 0
    pub fn new(to: Address, value: U256, data: Bytes, operation: Operation) -> Self {
        Self { to, value, data, operation, ..Default::default() }
    }

    /// Set the Safe nonce
    pub fn with_nonce(mut self, nonce: impl Into<U256>) -> Self {
        self.nonce = nonce.into();
        self
    }

    /// ABI encoding of the typed struct under `typehash`: 11 words
    pub(crate) fn encode_struct(&self, typehash: H256) -> Vec<u8> {
        abi::encode(&SafeTxStruct { typehash, tx: self }.into_tokens())
    }
}
