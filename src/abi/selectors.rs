use crate::selectors;

selectors! {
    /// MultiSigWallet: confirm a pending transaction
    CONFIRM_TRANSACTION = "confirmTransaction(uint256)" => [0xc0, 0x1a, 0x8c, 0x84];
    /// MultiSigWallet: withdraw a confirmation
    REVOKE_CONFIRMATION = "revokeConfirmation(uint256)" => [0x20, 0xea, 0x8d, 0x86];
    /// MultiSigWallet: public getter of the transaction table
    TRANSACTIONS = "transactions(uint256)" => [0x9a, 0xce, 0x38, 0xc2];
    CHANGE_DAILY_LIMIT = "changeDailyLimit(uint256)" => [0xce, 0xa0, 0x86, 0x21];
    ADD_OWNER = "addOwner(address)" => [0x70, 0x65, 0xcb, 0x48];
    REMOVE_OWNER = "removeOwner(address)" => [0x17, 0x38, 0x25, 0xd9];
    REPLACE_OWNER = "replaceOwner(address,address)" => [0xe2, 0x00, 0x56, 0xe6];
    /// MultiSigWallet: change the number of required confirmations
    CHANGE_REQUIREMENT = "changeRequirement(uint256)" => [0xba, 0x51, 0xa6, 0xdf];
    /// ERC20
    ERC20_TRANSFER = "transfer(address,uint256)" => [0xa9, 0x05, 0x9c, 0xbb];
    /// Safe personal edition: execute and refund the relayer
    EXEC_AND_PAY_TRANSACTION = "execAndPayTransaction(address,uint256,bytes,uint8,uint256,uint256,uint256,address,bytes)" => [0x50, 0xa4, 0x53, 0x73];
    /// Safe >= 1.0.0
    EXEC_TRANSACTION = "execTransaction(address,uint256,bytes,uint8,uint256,uint256,uint256,address,address,bytes)" => [0x6a, 0x76, 0x12, 0x02];
    /// Always reverts, the revert data carries the gas used
    REQUIRED_TX_GAS = "requiredTxGas(address,uint256,bytes,uint8)" => [0xc4, 0xca, 0x3a, 0x9c];
}
