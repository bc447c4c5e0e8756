use ethers::{
    abi::{self, Token, Tokenizable},
    types::{Address, Bytes, U256},
};

use crate::{
    abi::{selectors, Selector},
    common::Operation,
    safe::SafeTransaction,
    signature::{pack_signatures, Signature},
    utils::to_hex,
};

/// Arguments of `execAndPayTransaction`, the relayed execution entry point
/// of the personal edition Safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecAndPay {
    /// Target of the inner call
    pub to: Address,
    /// Wei forwarded with the inner call
    pub value: U256,
    /// Inner call data
    pub data: Bytes,
    /// Call or delegate call
    pub operation: Operation,
    /// Gas forwarded to the inner call
    pub safe_tx_gas: U256,
    /// Gas charged on top of the execution, refunded to the relayer
    pub data_gas: U256,
    /// Refund price per gas unit
    pub gas_price: U256,
    /// Refund token, zero for ether
    pub gas_token: Address,
    /// Concatenated owner signatures, ascending by owner address
    pub signatures: Bytes,
}

impl ExecAndPay {
    /// Build the call for `tx`, packing `signatures` in ascending owner
    /// order
    pub fn new<I>(tx: &SafeTransaction, signatures: I) -> Self
    where
        I: IntoIterator<Item = (Address, Signature)>,
    {
        Self {
            to: tx.to,
            value: tx.value,
            data: tx.data.clone(),
            operation: tx.operation,
            safe_tx_gas: tx.safe_tx_gas,
            data_gas: tx.base_gas,
            gas_price: tx.gas_price,
            gas_token: tx.gas_token,
            signatures: pack_signatures(signatures),
        }
    }

    fn into_tokens(self) -> Vec<Token> {
        vec![
            Token::Address(self.to),
            Token::Uint(self.value),
            Token::Bytes(self.data.to_vec()),
            self.operation.into_token(),
            Token::Uint(self.safe_tx_gas),
            Token::Uint(self.data_gas),
            Token::Uint(self.gas_price),
            Token::Address(self.gas_token),
            Token::Bytes(self.signatures.to_vec()),
        ]
    }
}

/// Arguments of `execTransaction` (Safe >= 1.0.0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecTransaction {
    /// The Safe transaction being executed
    pub tx: SafeTransaction,
    /// Concatenated owner signatures, ascending by owner address
    pub signatures: Bytes,
}

impl ExecTransaction {
    /// Build the call for `tx`, packing `signatures` in ascending owner
    /// order
    pub fn new<I>(tx: SafeTransaction, signatures: I) -> Self
    where
        I: IntoIterator<Item = (Address, Signature)>,
    {
        Self { tx, signatures: pack_signatures(signatures) }
    }

    fn into_tokens(self) -> Vec<Token> {
        let tx = self.tx;
        vec![
            Token::Address(tx.to),
            Token::Uint(tx.value),
            Token::Bytes(tx.data.to_vec()),
            tx.operation.into_token(),
            Token::Uint(tx.safe_tx_gas),
            Token::Uint(tx.base_gas),
            Token::Uint(tx.gas_price),
            Token::Address(tx.gas_token),
            Token::Address(tx.refund_receiver),
            Token::Bytes(self.signatures.to_vec()),
        ]
    }
}

/// A call to one of the known contract methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// `confirmTransaction(uint256)`
    ConfirmTransaction {
        /// Index in the multisig transaction table
        transaction_id: U256,
    },
    /// `revokeConfirmation(uint256)`
    RevokeConfirmation {
        /// Index in the multisig transaction table
        transaction_id: U256,
    },
    /// `transactions(uint256)`
    Transactions {
        /// Index in the multisig transaction table
        transaction_id: U256,
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
    ChangeRequirement {
        /// New number of required confirmations
        required: U256,
    },
    /// ERC20 `transfer(address,uint256)`
    Erc20Transfer {
        /// Token receiver
        recipient: Address,
        /// Amount in the token's base unit
        value: U256,
    },
    /// `requiredTxGas(address,uint256,bytes,uint8)`
    RequiredTxGas {
        /// Target of the inner call
        to: Address,
        /// Wei forwarded with the inner call
        value: U256,
        /// Inner call data
        data: Bytes,
        /// Call or delegate call
        operation: Operation,
    },
    /// `execAndPayTransaction(...)`
    ExecAndPayTransaction(ExecAndPay),
    /// `execTransaction(...)`
    ExecTransaction(ExecTransaction),
}

impl ContractCall {
    /// The hard-coded selector of the method
    pub fn selector(&self) -> Selector {
        match self {
            ContractCall::ConfirmTransaction { .. } => selectors::CONFIRM_TRANSACTION,
            ContractCall::RevokeConfirmation { .. } => selectors::REVOKE_CONFIRMATION,
            ContractCall::Transactions { .. } => selectors::TRANSACTIONS,
            ContractCall::ChangeDailyLimit { .. } => selectors::CHANGE_DAILY_LIMIT,
            ContractCall::AddOwner { .. } => selectors::ADD_OWNER,
            ContractCall::RemoveOwner { .. } => selectors::REMOVE_OWNER,
            ContractCall::ReplaceOwner { .. } => selectors::REPLACE_OWNER,
            ContractCall::ChangeRequirement { .. } => selectors::CHANGE_REQUIREMENT,
            ContractCall::Erc20Transfer { .. } => selectors::ERC20_TRANSFER,
            ContractCall::RequiredTxGas { .. } => selectors::REQUIRED_TX_GAS,
            ContractCall::ExecAndPayTransaction(_) => selectors::EXEC_AND_PAY_TRANSACTION,
            ContractCall::ExecTransaction(_) => selectors::EXEC_TRANSACTION,
        }
    }

    fn tokens(&self) -> Vec<Token> {
        match self.clone() {
            ContractCall::ConfirmTransaction { transaction_id }
            | ContractCall::RevokeConfirmation { transaction_id }
            | ContractCall::Transactions { transaction_id } => vec![Token::Uint(transaction_id)],
            ContractCall::ChangeDailyLimit { daily_limit } => vec![Token::Uint(daily_limit)],
            ContractCall::AddOwner { owner } | ContractCall::RemoveOwner { owner } => {
                vec![Token::Address(owner)]
            }
            ContractCall::ReplaceOwner { owner, new_owner } => {
                vec![Token::Address(owner), Token::Address(new_owner)]
            }
            ContractCall::ChangeRequirement { required } => vec![Token::Uint(required)],
            ContractCall::Erc20Transfer { recipient, value } => {
                vec![Token::Address(recipient), Token::Uint(value)]
            }
            ContractCall::RequiredTxGas { to, value, data, operation } => vec![
                Token::Address(to),
                Token::Uint(value),
                Token::Bytes(data.to_vec()),
                operation.into_token(),
            ],
            ContractCall::ExecAndPayTransaction(exec) => exec.into_tokens(),
            ContractCall::ExecTransaction(exec) => exec.into_tokens(),
        }
    }

    /// Selector followed by the ABI-encoded arguments
    pub fn encode(&self) -> Bytes {
        let mut out = self.selector().to_vec();
        out.extend(abi::encode(&self.tokens()));
        out.into()
    }

    /// `0x`-prefixed hex of [`ContractCall::encode`]
    pub fn encode_hex(&self) -> String {
        format!("0x{}", to_hex(self.encode()))
    }
}

impl From<ExecAndPay> for ContractCall {
    fn from(exec: ExecAndPay) -> Self {
        ContractCall::ExecAndPayTransaction(exec)
    }
}

impl From<ExecTransaction> for ContractCall {
    fn from(exec: ExecTransaction) -> Self {
        ContractCall::ExecTransaction(exec)
    }
}
