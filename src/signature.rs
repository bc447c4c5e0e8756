use std::{fmt, str::FromStr};

use ethers::types::{Address, Bytes, H256, U256};

use crate::utils::{hex_to_bytes, padded_hex, strip_hex_prefix};

/// Length of a packed signature in hex characters
pub const PACKED_SIGNATURE_HEX_LEN: usize = 130;

/// Signature errors
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Not `r ‖ s ‖ v` in hex
    #[error("Expected 130 hex characters, got {0}")]
    InvalidLength(usize),
    /// Bad hex character
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),
    /// Could not recover a signer
    #[error(transparent)]
    Recovery(#[from] ethers::types::SignatureError),
}

/// An owner's ECDSA signature in Safe encoding, `v` being 27 or 28 for
/// plain hash signatures
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Signature `r`
    pub r: U256,
    /// Signature `s`
    pub s: U256,
    /// Recovery byte
    pub v: u8,
}

impl Signature {
    /// `r ‖ s ‖ v` as 130 lowercase hex characters, without `0x`
    pub fn pack(&self) -> String {
        format!("{}{}{:02x}", padded_hex(self.r, 64), padded_hex(self.s, 64), self.v)
    }

    /// Inverse of [`Signature::pack`]. Accepts an optional `0x`.
    ///
    /// # Errors
    ///
    /// Anything but 130 hex characters after the prefix
    pub fn unpack(packed: &str) -> Result<Self, SignatureError> {
        let packed = strip_hex_prefix(packed);
        if packed.len() != PACKED_SIGNATURE_HEX_LEN {
            return Err(SignatureError::InvalidLength(packed.len()));
        }
        let bytes = hex_to_bytes(packed)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// The 65 signature bytes
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        self.r.to_big_endian(&mut bytes[..32]);
        self.s.to_big_endian(&mut bytes[32..64]);
        bytes[64] = self.v;
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            r: U256::from_big_endian(&bytes[..32]),
            s: U256::from_big_endian(&bytes[32..64]),
            v: bytes[64],
        }
    }

    /// The account that signed `hash`
    ///
    /// # Errors
    ///
    /// If `v` is not a recovery byte or the signature is invalid
    pub fn recover(&self, hash: H256) -> Result<Address, SignatureError> {
        Ok(ethers::types::Signature::from(*self).recover(hash)?)
    }
}

impl From<Signature> for ethers::types::Signature {
    fn from(sig: Signature) -> Self {
        Self { r: sig.r, s: sig.s, v: sig.v.into() }
    }
}

impl TryFrom<ethers::types::Signature> for Signature {
    type Error = SignatureError;

    fn try_from(sig: ethers::types::Signature) -> Result<Self, Self::Error> {
        let v = u8::try_from(sig.v)
            .map_err(|_| SignatureError::Recovery(ethers::types::SignatureError::RecoveryError))?;
        Ok(Self { r: sig.r, s: sig.s, v })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.pack())
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::unpack(s)
    }
}

impl serde::Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Concatenate owner signatures in ascending owner order, the order Safe
/// contracts require. Input order does not matter.
pub fn pack_signatures<I>(signatures: I) -> Bytes
where
    I: IntoIterator<Item = (Address, Signature)>,
{
    let mut signatures: Vec<_> = signatures.into_iter().collect();
    signatures.sort_by_key(|(owner, _)| *owner);
    signatures
        .iter()
        .flat_map(|(_, signature)| signature.to_bytes())
        .collect::<Vec<u8>>()
        .into()
}

#[cfg(test)]
mod test {
    use super::*;

    fn sig(r: u64, s: u64, v: u8) -> Signature {
        Signature { r: r.into(), s: s.into(), v }
    }

    #[test]
    fn it_packs() {
        let signature = sig(0xabcd, 0x1, 27);
        let packed = signature.pack();
        assert_eq!(packed.len(), PACKED_SIGNATURE_HEX_LEN);
        assert_eq!(
            packed,
            format!("{}abcd{}01{}", "0".repeat(60), "0".repeat(62), "1b")
        );
        assert_eq!(Signature::unpack(&packed).unwrap(), signature);
        assert_eq!(Signature::unpack(&signature.to_string()).unwrap(), signature);
    }

    #[test]
    fn it_unpacks_extremes() {
        for signature in [
            Signature { r: U256::MAX, s: U256::MAX, v: 28 },
            Signature { r: U256::zero(), s: U256::zero(), v: 27 },
            sig(u64::MAX, 1 << 63, 28),
        ] {
            assert_eq!(signature.pack().parse::<Signature>().unwrap(), signature);
        }
    }

    #[test]
    fn it_rejects_bad_lengths() {
        assert!(matches!(Signature::unpack("0x1b"), Err(SignatureError::InvalidLength(2))));
        assert!(matches!(
            Signature::unpack(&"0".repeat(131)),
            Err(SignatureError::InvalidLength(131))
        ));
        assert!(matches!(Signature::unpack(&"zz".repeat(65)), Err(SignatureError::Hex(_))));
    }

    #[test]
    fn it_sorts_by_owner() {
        let a: Address = "0x1000000000000000000000000000000000000001".parse().unwrap();
        let b: Address = "0x2000000000000000000000000000000000000002".parse().unwrap();
        let c: Address = "0xf000000000000000000000000000000000000003".parse().unwrap();
        let (sig_a, sig_b, sig_c) = (sig(1, 1, 27), sig(2, 2, 28), sig(3, 3, 27));

        let expected = [sig_a.to_bytes(), sig_b.to_bytes(), sig_c.to_bytes()].concat();
        for collected in [
            vec![(c, sig_c), (a, sig_a), (b, sig_b)],
            vec![(b, sig_b), (c, sig_c), (a, sig_a)],
            vec![(a, sig_a), (b, sig_b), (c, sig_c)],
        ] {
            assert_eq!(&pack_signatures(collected)[..], &expected[..]);
        }
        assert!(pack_signatures([]).is_empty());
    }

    #[test]
    fn it_serializes_as_hex() {
        let signature = sig(1, 2, 28);
        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(json, format!("\"0x{}\"", signature.pack()));
        assert_eq!(serde_json::from_str::<Signature>(&json).unwrap(), signature);
    }
}
