//! Minimal ABI codec for the fixed set of multisig, Safe and ERC20 methods
//! the wallet talks to. This is not a general purpose ABI decoder: anything
//! outside the known shapes decodes to `None`.

/// Hard-coded method selectors
pub mod selectors;

/// Call data encoders
pub mod encode;

/// Fixed-shape call data decoders
pub mod decode;

/// First 4 bytes of the keccak of a method's canonical signature
pub type Selector = [u8; 4];

/// Size of an ABI word in bytes
pub const WORD_SIZE: usize = 32;

pub use decode::{decode_confirm, decode_revoke, decode_transaction_result, DecodedMultisigCall};
pub use encode::{ContractCall, ExecAndPay, ExecTransaction};
