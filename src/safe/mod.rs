//! Safe transactions and the hash their owners sign

/// Gateway transaction model
pub mod details;

/// Safe tx hash calculation
pub mod hash;

mod transaction;
mod version;

pub use details::{
    AddressInfo, DetailedExecutionInfo, MultisigExecutionDetails, TransactionDetails,
    TransactionInfo, TransferInfo, TxData,
};
pub use hash::{
    calculate_safe_tx_hash, domain_separator, safe_transaction_from_details, safe_tx_hash,
    struct_hash, verify_safe_tx_hash, HashError,
};
pub use transaction::SafeTransaction;
pub use version::{SemVer, SemVerError};
