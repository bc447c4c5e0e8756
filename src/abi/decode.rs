use ethers::types::{Address, U256};

use crate::{
    abi::{selectors, Selector, WORD_SIZE},
    refuse,
    utils::{
        hex_to_bytes, is_solidity_method, remove_solidity_method_prefix, strip_hex_prefix, to_hex,
        word_to_address,
    },
};

/// Offset of the `data` tail in a `transactions(uint256)` return value:
/// four head words (destination, value, offset, executed)
const DATA_OFFSET: u64 = 4 * WORD_SIZE as u64;

/// What a multisig wallet transaction does, reconstructed from the return
/// value of `transactions(uint256)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedMultisigCall {
    /// Plain ether transfer
    Transfer {
        /// Recipient
        to: Address,
        /// Amount in wei
        value: U256,
    },
    /// ERC20 `transfer` on `token`
    TokenTransfer {
        /// Token contract, the multisig transaction's destination
        token: Address,
        /// Token receiver
        recipient: Address,
        /// Amount in the token's base unit
        tokens: U256,
    },
    /// `changeDailyLimit(uint256)`
    ChangeDailyLimit {
        /// New limit in wei
        daily_limit: U256,
    },
    /// `addOwner(address)`
    AddOwner {
        /// Owner to add
        owner: Address,
    },
    /// `removeOwner(address)`
    RemoveOwner {
        /// Owner to remove
        owner: Address,
    },
    /// `replaceOwner(address,address)`
    ReplaceOwner {
        /// Owner to replace
        owner: Address,
        /// Replacement
        new_owner: Address,
    },
    /// `changeRequirement(uint256)`
    ChangeConfirmations {
        /// New number of required confirmations
        required: U256,
    },
}

/// Head of a `transactions(uint256)` return value with its inner call data
struct MultisigTransaction<'a> {
    destination: Address,
    value: U256,
    data: &'a [u8],
}

fn uint(word: &[u8]) -> U256 {
    U256::from_big_endian(word)
}

fn split_call(data: &[u8]) -> (Selector, &[u8]) {
    let mut selector = Selector::default();
    selector.copy_from_slice(&data[..4]);
    (selector, &data[4..])
}

impl<'a> MultisigTransaction<'a> {
    /// Read the head words and slice out the inner call data. `None` unless
    /// the offset and length words describe exactly the bytes present.
    fn parse(bytes: &'a [u8]) -> Option<Self> {
        let words: Vec<&[u8]> = bytes.chunks(WORD_SIZE).collect();
        if words.len() < 5 {
            refuse!(words = words.len(), "too few words for a multisig transaction");
        }
        let destination = match word_to_address(words[0]) {
            Some(destination) => destination,
            None => refuse!("destination word is not an address"),
        };
        if uint(words[2]) != U256::from(DATA_OFFSET) {
            refuse!(offset = %uint(words[2]), "unexpected data offset");
        }
        let len = uint(words[4]);
        let tail = &bytes[5 * WORD_SIZE..];
        if len > U256::from(tail.len()) {
            refuse!(%len, available = tail.len(), "data length overruns the payload");
        }
        let len = len.as_usize();
        // the tail holds the data right-padded to a whole word
        if (len + WORD_SIZE - 1) / WORD_SIZE * WORD_SIZE != tail.len() {
            refuse!(len, tail = tail.len(), "padding does not match the data length");
        }
        Some(Self { destination, value: uint(words[1]), data: &tail[..len] })
    }
}

/// Decode the hex return value of `transactions(uint256)` into one of the
/// known multisig calls.
///
/// Only these shapes are recognized:
/// - 5 words, empty data: [`DecodedMultisigCall::Transfer`]
/// - 7 words, 36 bytes of data calling `changeDailyLimit`, `addOwner`,
///   `removeOwner` or `changeRequirement`
/// - 8 words, 68 bytes of data calling `replaceOwner` or ERC20 `transfer`
///
/// Everything else, including a known word count with an unknown selector,
/// is `None`. This never panics on malformed input.
pub fn decode_transaction_result(hex: &str) -> Option<DecodedMultisigCall> {
    let hex = strip_hex_prefix(hex);
    if hex.is_empty() || hex.len() % (2 * WORD_SIZE) != 0 {
        refuse!(len = hex.len(), "not a whole number of words");
    }
    let bytes = match hex_to_bytes(hex) {
        Ok(bytes) => bytes,
        Err(e) => refuse!(error = %e, "invalid hex"),
    };
    let word_count = bytes.len() / WORD_SIZE;
    let tx = MultisigTransaction::parse(&bytes)?;

    match (word_count, tx.data.len()) {
        (5, 0) => Some(DecodedMultisigCall::Transfer { to: tx.destination, value: tx.value }),
        (7, 36) => {
            let (selector, args) = split_call(tx.data);
            match selector {
                selectors::CHANGE_DAILY_LIMIT => {
                    Some(DecodedMultisigCall::ChangeDailyLimit { daily_limit: uint(args) })
                }
                selectors::ADD_OWNER => {
                    word_to_address(args).map(|owner| DecodedMultisigCall::AddOwner { owner })
                }
                selectors::REMOVE_OWNER => {
                    word_to_address(args).map(|owner| DecodedMultisigCall::RemoveOwner { owner })
                }
                selectors::CHANGE_REQUIREMENT => {
                    Some(DecodedMultisigCall::ChangeConfirmations { required: uint(args) })
                }
                other => {
                    tracing::warn!(selector = %to_hex(other), "unknown selector in single argument call");
                    None
                }
            }
        }
        (8, 68) => {
            let (selector, args) = split_call(tx.data);
            let (first, second) = args.split_at(WORD_SIZE);
            match selector {
                selectors::REPLACE_OWNER => Some(DecodedMultisigCall::ReplaceOwner {
                    owner: word_to_address(first)?,
                    new_owner: word_to_address(second)?,
                }),
                selectors::ERC20_TRANSFER => Some(DecodedMultisigCall::TokenTransfer {
                    token: tx.destination,
                    recipient: word_to_address(first)?,
                    tokens: uint(second),
                }),
                other => {
                    tracing::warn!(selector = %to_hex(other), "unknown selector in two argument call");
                    None
                }
            }
        }
        (words, len) => refuse!(words, len, "unrecognized multisig transaction shape"),
    }
}

fn decode_id_call(data: &str, selector: Selector) -> Option<U256> {
    let selector = to_hex(selector);
    if !is_solidity_method(data, &selector) {
        return None;
    }
    let argument = remove_solidity_method_prefix(data, &selector);
    if argument.len() != 2 * WORD_SIZE {
        refuse!(len = argument.len(), "transaction id is not a single word");
    }
    U256::from_str_radix(argument, 16).ok()
}

/// Transaction id of a `confirmTransaction(uint256)` call
pub fn decode_confirm(data: &str) -> Option<U256> {
    decode_id_call(data, selectors::CONFIRM_TRANSACTION)
}

/// Transaction id of a `revokeConfirmation(uint256)` call
pub fn decode_revoke(data: &str) -> Option<U256> {
    decode_id_call(data, selectors::REVOKE_CONFIRMATION)
}

#[cfg(test)]
mod test {
    use ethers::abi::{encode, Token};

    use super::*;
    use crate::abi::ContractCall;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    /// Return value of `transactions(uint256)`
    fn transactions_result(destination: Address, value: U256, data: &[u8]) -> String {
        format!(
            "0x{}",
            to_hex(encode(&[
                Token::Address(destination),
                Token::Uint(value),
                Token::Bytes(data.to_vec()),
                Token::Bool(false),
            ]))
        )
    }

    #[test]
    fn it_decodes_transfers() {
        let to = addr("0x3535353535353535353535353535353535353535");
        let hex = transactions_result(to, U256::exp10(18), &[]);
        assert_eq!(strip_hex_prefix(&hex).len(), 5 * 64);
        assert_eq!(
            decode_transaction_result(&hex),
            Some(DecodedMultisigCall::Transfer { to, value: U256::exp10(18) })
        );
    }

    #[test]
    fn it_decodes_single_argument_calls() {
        let wallet = addr("0x1111111111111111111111111111111111111111");
        let owner = addr("0xa5056c8efadb5d6a1a6eb0176615692b6e648313");
        let cases = [
            (
                ContractCall::ChangeDailyLimit { daily_limit: U256::exp10(17) },
                DecodedMultisigCall::ChangeDailyLimit { daily_limit: U256::exp10(17) },
            ),
            (ContractCall::AddOwner { owner }, DecodedMultisigCall::AddOwner { owner }),
            (ContractCall::RemoveOwner { owner }, DecodedMultisigCall::RemoveOwner { owner }),
            (
                ContractCall::ChangeRequirement { required: 3.into() },
                DecodedMultisigCall::ChangeConfirmations { required: 3.into() },
            ),
        ];
        for (call, expected) in cases {
            let hex = transactions_result(wallet, U256::zero(), &call.encode());
            assert_eq!(strip_hex_prefix(&hex).len(), 7 * 64);
            assert_eq!(decode_transaction_result(&hex), Some(expected));
        }
    }

    #[test]
    fn it_decodes_two_argument_calls() {
        let token = addr("0x9999999999999999999999999999999999999999");
        let owner = addr("0xa5056c8efadb5d6a1a6eb0176615692b6e648313");
        let new_owner = addr("0x3535353535353535353535353535353535353535");

        let replace = ContractCall::ReplaceOwner { owner, new_owner }.encode();
        assert_eq!(
            decode_transaction_result(&transactions_result(token, U256::zero(), &replace)),
            Some(DecodedMultisigCall::ReplaceOwner { owner, new_owner })
        );

        let transfer = ContractCall::Erc20Transfer { recipient: new_owner, value: 1000.into() }.encode();
        assert_eq!(
            decode_transaction_result(&transactions_result(token, U256::zero(), &transfer)),
            Some(DecodedMultisigCall::TokenTransfer {
                token,
                recipient: new_owner,
                tokens: 1000.into()
            })
        );
    }

    #[test]
    fn it_refuses_malformed_input() {
        assert_eq!(decode_transaction_result(""), None);
        assert_eq!(decode_transaction_result("0x"), None);
        assert_eq!(decode_transaction_result("0x1234"), None);
        assert_eq!(decode_transaction_result(&"zz".repeat(32 * 5)), None);
        // one hex char short of a word
        assert_eq!(decode_transaction_result(&"0".repeat(5 * 64 - 1)), None);
        // four words is not a known shape
        assert_eq!(decode_transaction_result(&"0".repeat(4 * 64)), None);
        // all zero: offset word is not 0x80
        assert_eq!(decode_transaction_result(&"0".repeat(5 * 64)), None);
    }

    #[test]
    #[tracing_test::traced_test]
    fn it_refuses_unknown_selectors() {
        let wallet = addr("0x1111111111111111111111111111111111111111");
        let mut data = ContractCall::AddOwner { owner: wallet }.encode().to_vec();
        data[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_transaction_result(&transactions_result(wallet, U256::zero(), &data)), None);
        assert!(logs_contain("unknown selector"));

        // known selector, wrong shape
        let confirm = ContractCall::ConfirmTransaction { transaction_id: 1.into() }.encode();
        assert_eq!(decode_transaction_result(&transactions_result(wallet, U256::zero(), &confirm)), None);
    }

    #[test]
    fn it_refuses_dirty_addresses() {
        let wallet = addr("0x1111111111111111111111111111111111111111");
        let mut data = ContractCall::AddOwner { owner: wallet }.encode().to_vec();
        data[4] = 1;
        assert_eq!(decode_transaction_result(&transactions_result(wallet, U256::zero(), &data)), None);
    }

    #[test]
    fn it_decodes_confirm_and_revoke() {
        let confirm = ContractCall::ConfirmTransaction { transaction_id: 42.into() }.encode_hex();
        assert_eq!(decode_confirm(&confirm), Some(42.into()));
        assert_eq!(decode_revoke(&confirm), None);

        let revoke = ContractCall::RevokeConfirmation { transaction_id: 7.into() }.encode_hex();
        assert_eq!(decode_revoke(&revoke), Some(7.into()));
        assert_eq!(decode_revoke(strip_hex_prefix(&revoke)), Some(7.into()));

        assert_eq!(decode_confirm("0xc01a8c84"), None);
        assert_eq!(decode_confirm("0xc01a8c8400"), None);
    }
}
