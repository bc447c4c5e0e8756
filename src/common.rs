use std::{fmt::Display, str::FromStr};

use ethers::{
    abi::{InvalidOutputType, Token, Tokenizable},
    types::{Address, H256, U256},
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

fn parse_hash(hex: &str) -> H256 {
    hex.parse()
        .unwrap_or_else(|_| panic!("hard-coded hash constant {} is not 32 bytes of hex", hex))
}

/// EIP-712 Tx Details typehash. Copied from gnosis safe contracts
///
/// keccak256(
///     "SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)"
/// );
pub static SAFE_TX_TYPEHASH: Lazy<H256> =
    Lazy::new(|| parse_hash("0xbb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8"));

/// Tx Details typehash used by Safe contracts older than 1.0.0, where
/// `baseGas` was still called `dataGas`
///
/// keccak256(
///     "SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 dataGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)"
/// );
pub static LEGACY_SAFE_TX_TYPEHASH: Lazy<H256> =
    Lazy::new(|| parse_hash("0x14d461bc7412367e924637b363c7bf29b8f47e2f84869f4426e5633d8af47b20"));

/// EIP-712 typehash domain binding for Safe >= 1.3.0. Copied from gnosis
/// safe contracts
///
/// keccak256(
///     "EIP712Domain(uint256 chainId,address verifyingContract)"
/// );
pub static DOMAIN_SEPARATOR_TYPEHASH: Lazy<H256> =
    Lazy::new(|| parse_hash("0x47e79534a245952e8b16893a336b85a3d9ea9fa8c573f3d803afb92a79469218"));

/// Domain binding for Safe < 1.3.0. The chain id is not part of the domain.
///
/// keccak256(
///     "EIP712Domain(address verifyingContract)"
/// );
pub static LEGACY_DOMAIN_SEPARATOR_TYPEHASH: Lazy<H256> =
    Lazy::new(|| parse_hash("0x035aff83d86937d35b32e04f0ddc6ff469290eef2f1b692d8a815c89404d4749"));

/// Safe operations
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// CALL opcode
    #[default]
    Call = 0,
    /// DELEGATECALL opcode.
    /// Note: please exercise caution, as this can brick a SAFE
    DelegateCall = 1,
}

impl Operation {
    /// Numeric value as encoded on chain
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// `None` for anything but 0 or 1
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Operation::Call),
            1 => Some(Operation::DelegateCall),
            _ => None,
        }
    }
}

impl Tokenizable for Operation {
    fn from_token(token: Token) -> Result<Self, InvalidOutputType>
    where
        Self: Sized,
    {
        match token {
            Token::Uint(x) if x.is_zero() => Ok(Operation::Call),
            Token::Uint(x) if x == U256::one() => Ok(Operation::DelegateCall),
            other => Err(InvalidOutputType(format!("Expected 0 or 1, got {}", other))),
        }
    }

    fn into_token(self) -> Token {
        Token::Uint(self.as_u8().into())
    }
}

impl Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_u8().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let num = u8::deserialize(deserializer)?;
        Operation::from_u8(num).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid operation {}, expected 0 or 1", num))
        })
    }
}

/// An address wrapper that ensures checksum encoding
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ChecksumAddress(pub Address);

impl std::ops::Deref for ChecksumAddress {
    type Target = Address;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Address> for ChecksumAddress {
    fn from(addr: Address) -> Self {
        Self(addr)
    }
}

impl From<ChecksumAddress> for Address {
    fn from(val: ChecksumAddress) -> Self {
        val.0
    }
}

impl Serialize for ChecksumAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ethers::utils::to_checksum(self, None).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChecksumAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Address::deserialize(deserializer)?.into())
    }
}

impl std::fmt::Debug for ChecksumAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ethers::utils::to_checksum(self, None))
    }
}

impl Display for ChecksumAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ethers::utils::to_checksum(self, None))
    }
}

impl FromStr for ChecksumAddress {
    type Err = <Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Address>().map(Into::into)
    }
}

impl Tokenizable for ChecksumAddress {
    fn from_token(token: Token) -> Result<Self, InvalidOutputType>
    where
        Self: Sized,
    {
        Address::from_token(token).map(Into::into)
    }

    fn into_token(self) -> Token {
        self.0.into_token()
    }
}
