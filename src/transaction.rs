use ethers::{
    types::{Address, Bytes, H256, U256},
    utils::{keccak256, rlp::RlpStream},
};

use crate::utils::to_hex;

/// A legacy Ethereum transaction, before signing
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Recipient
    pub to: Address,
    /// Wei sent
    #[serde(default)]
    pub value: U256,
    /// Call data
    #[serde(default)]
    pub data: Bytes,
    /// Gas limit
    pub gas: U256,
    /// Price per gas unit in wei
    pub gas_price: U256,
    /// Sender nonce
    pub nonce: U256,
    /// EIP-155 chain id. 0 signs without replay protection
    #[serde(default)]
    pub chain_id: U256,
}

impl Transaction {
    fn rlp_base(&self, rlp: &mut RlpStream) {
        rlp.append(&self.nonce);
        rlp.append(&self.gas_price);
        rlp.append(&self.gas);
        rlp.append(&self.to);
        rlp.append(&self.value);
        rlp.append(&self.data.to_vec());
    }

    /// True if signing binds the chain id (EIP-155)
    pub fn is_replay_protected(&self) -> bool {
        !self.chain_id.is_zero()
    }

    /// The signing pre-image: `nonce, gasPrice, gas, to, value, data` followed
    /// by `chainId, "", ""` under EIP-155. Without a chain id only the first 6
    /// items are encoded.
    pub fn rlp(&self) -> Bytes {
        if !self.is_replay_protected() {
            let mut rlp = RlpStream::new_list(6);
            self.rlp_base(&mut rlp);
            return rlp.out().freeze().into();
        }
        let mut rlp = RlpStream::new_list(9);
        self.rlp_base(&mut rlp);
        rlp.append(&self.chain_id);
        rlp.append_empty_data();
        rlp.append_empty_data();
        rlp.out().freeze().into()
    }

    /// Hash to be signed
    pub fn sighash(&self) -> H256 {
        keccak256(self.rlp()).into()
    }

    /// All 9 items with the signature in place
    pub fn rlp_signed(&self, v: U256, r: U256, s: U256) -> Bytes {
        let mut rlp = RlpStream::new_list(9);
        self.rlp_base(&mut rlp);
        rlp.append(&v);
        rlp.append(&r);
        rlp.append(&s);
        rlp.out().freeze().into()
    }
}

/// A transaction with its signature. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: Transaction,
    v: U256,
    r: U256,
    s: U256,
}

impl SignedTransaction {
    pub(crate) fn new(transaction: Transaction, v: U256, r: U256, s: U256) -> Self {
        Self { transaction, v, r, s }
    }

    /// The unsigned transaction
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Final `v`: `recoveryId + chainId * 2 + 35`, or `27 + recoveryId`
    /// without a chain id
    pub fn v(&self) -> U256 {
        self.v
    }

    /// Signature `r`
    pub fn r(&self) -> U256 {
        self.r
    }

    /// Signature `s`
    pub fn s(&self) -> U256 {
        self.s
    }

    /// Network encoding
    pub fn raw(&self) -> Bytes {
        self.transaction.rlp_signed(self.v, self.r, self.s)
    }

    /// `0x`-prefixed network encoding, as sent with `eth_sendRawTransaction`
    pub fn raw_hex(&self) -> String {
        format!("0x{}", to_hex(self.raw()))
    }

    /// Transaction hash
    pub fn hash(&self) -> H256 {
        keccak256(self.raw()).into()
    }
}
