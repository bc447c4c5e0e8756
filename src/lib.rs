#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Transaction construction, encoding and hashing for Safe multisig
//! accounts.
//!
//! The pipeline runs intent -> call data ([`abi`]) -> transaction
//! ([`transaction`], [`safe`]) -> hash and signature ([`signer`],
//! [`signature`]) -> wire bytes. Everything here is pure and synchronous:
//! nonces, gas prices, signing keys and broadcasting belong to the caller.

mod macros;

/// Protocol constants and shared primitives
pub mod common;

/// Hex and word helpers
pub mod utils;

/// Call data codec for the known contract methods
pub mod abi;

/// Ethereum transactions and their RLP encoding
pub mod transaction;

/// Transaction signing
pub mod signer;

/// Safe owner signatures
pub mod signature;

/// Safe transactions and their hash
pub mod safe;

/// Relay gas estimation
pub mod estimate;

pub use abi::{ContractCall, DecodedMultisigCall};
pub use common::{ChecksumAddress, Operation};
pub use estimate::{estimate_data_gas, DataGasSchedule, RelayEstimate};
pub use safe::{safe_tx_hash, HashError, SafeTransaction, SemVer, SemVerError};
pub use signature::{pack_signatures, Signature, SignatureError};
pub use signer::{sign_transaction, HashSigner, RecoverableSignature};
pub use transaction::{SignedTransaction, Transaction};
