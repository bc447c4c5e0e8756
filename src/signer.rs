use std::convert::Infallible;

use ethers::{
    signers::LocalWallet,
    types::{Address, H256, U256},
};

use crate::{
    signature::Signature,
    transaction::{SignedTransaction, Transaction},
};

/// An ECDSA signature with its recovery id (0 or 1)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// Signature `r`
    pub r: U256,
    /// Signature `s`
    pub s: U256,
    /// Parity of the ephemeral public key's y coordinate
    pub recovery_id: u8,
}

impl RecoverableSignature {
    /// Safe (and pre-EIP-155) encoding, `v = 27 + recoveryId`
    pub fn to_signature(self) -> Signature {
        Signature { r: self.r, s: self.s, v: 27 + self.recovery_id }
    }
}

/// A key that signs 32-byte hashes. The key material stays behind this
/// trait; hardware or remote signers report failures through `Error`.
pub trait HashSigner {
    /// Signer failure, e.g. a locked or missing key
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sign `hash` as is, without any message prefix
    fn sign_hash(&self, hash: H256) -> Result<RecoverableSignature, Self::Error>;

    /// The signing account
    fn address(&self) -> Address;
}

impl HashSigner for LocalWallet {
    type Error = Infallible;

    fn sign_hash(&self, hash: H256) -> Result<RecoverableSignature, Self::Error> {
        let signature = LocalWallet::sign_hash(self, hash);
        // local wallets report v as 27 + recovery id
        Ok(RecoverableSignature {
            r: signature.r,
            s: signature.s,
            recovery_id: (signature.v - 27) as u8,
        })
    }

    fn address(&self) -> Address {
        ethers::signers::Signer::address(self)
    }
}

impl<T: HashSigner + ?Sized> HashSigner for &T {
    type Error = T::Error;

    fn sign_hash(&self, hash: H256) -> Result<RecoverableSignature, Self::Error> {
        (**self).sign_hash(hash)
    }

    fn address(&self) -> Address {
        (**self).address()
    }
}

/// Sign `tx` with `signer`.
///
/// With a chain id the EIP-155 pre-image is signed and
/// `v = recoveryId + chainId * 2 + 35`. A chain id of 0 signs the legacy
/// 6 item pre-image with `v = 27 + recoveryId`.
///
/// # Errors
///
/// Whatever the signer reports. Nothing is retried.
pub fn sign_transaction<S: HashSigner>(
    tx: &Transaction,
    signer: &S,
) -> Result<SignedTransaction, S::Error> {
    let sighash = tx.sighash();
    tracing::debug!(?sighash, chain_id = %tx.chain_id, "signing transaction");
    let signature = signer.sign_hash(sighash)?;
    let recovery_id = U256::from(signature.recovery_id);
    let v = if tx.is_replay_protected() {
        recovery_id + tx.chain_id * 2 + 35
    } else {
        recovery_id + 27
    };
    tracing::debug!(%v, "signed transaction");
    Ok(SignedTransaction::new(tx.clone(), v, signature.r, signature.s))
}

/// Sign a Safe tx hash for one owner
///
/// # Errors
///
/// Whatever the signer reports
pub fn sign_safe_tx_hash<S: HashSigner>(
    safe_tx_hash: H256,
    signer: &S,
) -> Result<(Address, Signature), S::Error> {
    let signature = signer.sign_hash(safe_tx_hash)?.to_signature();
    Ok((signer.address(), signature))
}
