use ethers::{
    types::{Address, H256, U256},
    utils::keccak256,
};

use crate::{
    common::{
        DOMAIN_SEPARATOR_TYPEHASH, LEGACY_DOMAIN_SEPARATOR_TYPEHASH, LEGACY_SAFE_TX_TYPEHASH,
        SAFE_TX_TYPEHASH,
    },
    safe::{
        details::{MultisigExecutionDetails, TransactionDetails, TransactionInfo, TransferInfo},
        SafeTransaction, SemVer,
    },
    utils::{address_word, u256_word},
};

/// Safe tx hash errors
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// No rule for finding the `to` address of this kind of transaction
    #[error("Unsupported transaction type: {0}")]
    UnsupportedTransactionType(&'static str),
    /// The gateway did not include the raw call data
    #[error("Transaction details carry no tx data")]
    MissingTxData,
}

/// EIP-712 domain separator of the Safe at `safe`.
///
/// From 1.3.0 the domain binds the chain id; older Safes only bind their
/// own address.
pub fn domain_separator(version: &SemVer, chain_id: U256, safe: Address) -> H256 {
    let encoded = if *version >= SemVer::V1_3_0 {
        tracing::debug!(%version, %chain_id, "chain-bound domain separator");
        [
            DOMAIN_SEPARATOR_TYPEHASH.as_bytes(),
            &u256_word(chain_id)[..],
            &address_word(safe)[..],
        ]
        .concat()
    } else {
        tracing::debug!(%version, "legacy domain separator");
        [LEGACY_DOMAIN_SEPARATOR_TYPEHASH.as_bytes(), &address_word(safe)[..]].concat()
    };
    keccak256(encoded).into()
}

/// Hash of the typed `SafeTx` struct. Safes older than 1.0.0 name `baseGas`
/// `dataGas`, which changes the type hash.
pub fn struct_hash(version: &SemVer, tx: &SafeTransaction) -> H256 {
    let typehash =
        if *version >= SemVer::V1_0_0 { *SAFE_TX_TYPEHASH } else { *LEGACY_SAFE_TX_TYPEHASH };
    keccak256(tx.encode_struct(typehash)).into()
}

/// The hash every owner signs to approve `tx` on the Safe at `safe`
pub fn safe_tx_hash(version: &SemVer, chain_id: U256, safe: Address, tx: &SafeTransaction) -> H256 {
    let domain_separator = domain_separator(version, chain_id, safe);
    let struct_hash = struct_hash(version, tx);
    // abi.encodePacked(0x19, 0x01, domainSeparator, structHash)
    let digest_input = [&[0x19, 0x01], domain_separator.as_bytes(), struct_hash.as_bytes()].concat();
    let hash: H256 = keccak256(digest_input).into();
    tracing::debug!(?hash, nonce = %tx.nonce, "computed safe tx hash");
    hash
}

/// The `to` of the Safe transaction described by `info`
fn resolve_to(info: &TransactionInfo, safe: Address) -> Result<Address, HashError> {
    match info {
        TransactionInfo::Transfer { recipient, transfer_info, .. } => match transfer_info {
            TransferInfo::Erc20 { token_address, .. } | TransferInfo::Erc721 { token_address, .. } => {
                Ok(**token_address)
            }
            TransferInfo::NativeCoin { .. } => Ok(*recipient.value),
        },
        TransactionInfo::Custom { to, .. } => Ok(*to.value),
        TransactionInfo::SettingsChange {} => Ok(safe),
        TransactionInfo::Creation {} => Err(HashError::UnsupportedTransactionType("Creation")),
        TransactionInfo::Unknown => Err(HashError::UnsupportedTransactionType("Unknown")),
    }
}

/// Rebuild the [`SafeTransaction`] behind gateway transaction details
///
/// # Errors
///
/// - `UnsupportedTransactionType` for creations and unknown kinds
/// - `MissingTxData` if the details carry no call data
pub fn safe_transaction_from_details(
    safe: Address,
    details: &TransactionDetails,
    execution: &MultisigExecutionDetails,
) -> Result<SafeTransaction, HashError> {
    let to = resolve_to(&details.tx_info, safe)?;
    let tx_data = details.tx_data.as_ref().ok_or(HashError::MissingTxData)?;
    Ok(SafeTransaction {
        to,
        value: *tx_data.value,
        data: tx_data.hex_data.clone().unwrap_or_default(),
        operation: tx_data.operation,
        safe_tx_gas: *execution.safe_tx_gas,
        base_gas: *execution.base_gas,
        gas_price: *execution.gas_price,
        gas_token: *execution.gas_token,
        refund_receiver: *execution.refund_receiver.value,
        nonce: *execution.nonce,
    })
}

/// Compute the safe tx hash of a transaction described by the client
/// gateway
///
/// # Errors
///
/// See [`safe_transaction_from_details`]
pub fn calculate_safe_tx_hash(
    version: &SemVer,
    chain_id: U256,
    safe: Address,
    details: &TransactionDetails,
    execution: &MultisigExecutionDetails,
) -> Result<H256, HashError> {
    let tx = safe_transaction_from_details(safe, details, execution)?;
    Ok(safe_tx_hash(version, chain_id, safe, &tx))
}

/// True if the hash reported by the gateway matches the one computed from
/// the transaction fields. A mismatch means the transaction must not be
/// signed.
///
/// # Errors
///
/// See [`safe_transaction_from_details`]
pub fn verify_safe_tx_hash(
    version: &SemVer,
    chain_id: U256,
    safe: Address,
    details: &TransactionDetails,
    execution: &MultisigExecutionDetails,
) -> Result<bool, HashError> {
    let calculated = calculate_safe_tx_hash(version, chain_id, safe, details, execution)?;
    if calculated != execution.safe_tx_hash {
        tracing::warn!(
            reported = ?execution.safe_tx_hash,
            ?calculated,
            "safe tx hash mismatch"
        );
    }
    Ok(calculated == execution.safe_tx_hash)
}
