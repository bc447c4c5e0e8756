use ethers::{
    abi::{encode, Token},
    signers::LocalWallet,
    types::{Address, Bytes, U256},
};
use once_cell::sync::Lazy;
use safe_tx_engine::{
    abi::{decode_transaction_result, selectors, ExecTransaction},
    estimate::RelayEstimate,
    safe::TransactionDetails,
    safe_tx_hash,
    signer::sign_safe_tx_hash,
    utils::to_hex,
    ContractCall, DecodedMultisigCall, HashSigner, Operation, SafeTransaction, SemVer, Signature,
    Transaction,
};

pub const SAFE_ADDRESS: &str = "0x1230B3d59858296A31053C1b8562Ecf89A2f888b";
pub const TOKEN_ADDRESS: &str = "0x9999999999999999999999999999999999999999";
pub const RECIPIENT: &str = "0x3535353535353535353535353535353535353535";

pub static OWNERS: Lazy<Vec<LocalWallet>> = Lazy::new(|| {
    [
        "1c3a7cdd2270579847aaec11680312cbf4d3c36886232b413ab6529593228ec2",
        "4646464646464646464646464646464646464646464646464646464646464646",
        "8678adf78db8d1c8a40028795077b3463ca06a743ca37dfd28a5b4442c27b457",
    ]
    .iter()
    .map(|key| key.parse().unwrap())
    .collect()
});
pub static SAFE: Lazy<Address> = Lazy::new(|| SAFE_ADDRESS.parse().unwrap());
pub static TOKEN: Lazy<Address> = Lazy::new(|| TOKEN_ADDRESS.parse().unwrap());
pub static TO: Lazy<Address> = Lazy::new(|| RECIPIENT.parse().unwrap());

fn token_transfer() -> SafeTransaction {
    let data = ContractCall::Erc20Transfer { recipient: *TO, value: 1000.into() }.encode();
    SafeTransaction::new(*TOKEN, U256::zero(), data, Operation::Call).with_nonce(3)
}

#[test]
#[tracing_test::traced_test]
fn it_executes_a_token_transfer() {
    let tx = token_transfer();
    let chain_id = U256::from(5);
    let hash = safe_tx_hash(&SemVer::V1_3_0, chain_id, *SAFE, &tx);
    assert_eq!(
        format!("{:?}", hash),
        "0x8d76e95c9044c6a300fda8b07645caa11a929a203b3e9612ceb044cb7bfba707"
    );

    // collected in reverse order
    let confirmations: Vec<(Address, Signature)> = OWNERS
        .iter()
        .rev()
        .map(|owner| sign_safe_tx_hash(hash, owner).unwrap())
        .collect();
    for (owner, signature) in &confirmations {
        assert_eq!(signature.recover(hash).unwrap(), *owner);
    }

    let call = ContractCall::from(ExecTransaction::new(tx, confirmations.clone()));
    let data = call.encode();
    assert_eq!(&data[..4], &selectors::EXEC_TRANSACTION);

    // signatures are the last dynamic argument: 3 * 65 bytes, ascending owners
    let blob_len = 3 * 65;
    let padded = (blob_len + 31) / 32 * 32;
    let blob = &data[data.len() - padded..data.len() - padded + blob_len];
    let mut owners: Vec<Address> = OWNERS.iter().map(HashSigner::address).collect();
    owners.sort();
    for (chunk, owner) in blob.chunks(65).zip(&owners) {
        let signature = Signature::unpack(&to_hex(chunk)).unwrap();
        assert_eq!(signature.recover(hash).unwrap(), *owner);
    }

    let outer = Transaction {
        to: *SAFE,
        value: U256::zero(),
        data: data.clone(),
        gas: 200_000.into(),
        gas_price: 20_000_000_000u64.into(),
        nonce: 0.into(),
        chain_id,
    };
    let signed = safe_tx_engine::sign_transaction(&outer, &OWNERS[0]).unwrap();
    assert!(signed.v() == U256::from(45) || signed.v() == U256::from(46));
    assert!(signed.raw_hex().contains(&to_hex(&data)));
    assert!(logs_contain("signing transaction"));
}

#[test]
fn it_signs_the_reference_transaction() {
    let tx = Transaction {
        to: *TO,
        value: U256::exp10(18),
        data: Bytes::default(),
        gas: 21000.into(),
        gas_price: 20_000_000_000u64.into(),
        nonce: 9.into(),
        chain_id: 1.into(),
    };
    let signed = safe_tx_engine::sign_transaction(&tx, &OWNERS[1]).unwrap();
    assert_eq!(
        signed.raw_hex(),
        "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
    );
}

#[test]
fn it_checks_gateway_hashes() {
    let details: TransactionDetails = serde_json::from_str(&format!(
        r#"{{
            "txInfo": {{
                "type": "Transfer",
                "sender": {{"value": "{safe}"}},
                "recipient": {{"value": "{to}"}},
                "transferInfo": {{"type": "ERC20", "tokenAddress": "{token}", "value": "1000"}}
            }},
            "txData": {{"hexData": "{data}", "value": "0", "operation": 0}},
            "detailedExecutionInfo": {{
                "type": "MULTISIG",
                "nonce": 3,
                "safeTxGas": "0",
                "baseGas": "0",
                "gasPrice": "0",
                "gasToken": "0x0000000000000000000000000000000000000000",
                "refundReceiver": {{"value": "0x0000000000000000000000000000000000000000"}},
                "safeTxHash": "0x8d76e95c9044c6a300fda8b07645caa11a929a203b3e9612ceb044cb7bfba707",
                "confirmationsRequired": 2
            }}
        }}"#,
        safe = SAFE_ADDRESS,
        to = RECIPIENT,
        token = TOKEN_ADDRESS,
        data = format!("0x{}", to_hex(&token_transfer().data)),
    ))
    .unwrap();
    let execution = details.multisig_execution_details().unwrap();
    let version: SemVer = "1.3.0+L2".parse().unwrap();
    let verified =
        safe_tx_engine::safe::verify_safe_tx_hash(&version, 5.into(), *SAFE, &details, execution);
    assert!(verified.unwrap());
}

#[test]
fn it_decodes_multisig_transactions() {
    let inner = ContractCall::Erc20Transfer { recipient: *TO, value: 1000.into() }.encode();
    let result = encode(&[
        Token::Address(*TOKEN),
        Token::Uint(U256::zero()),
        Token::Bytes(inner.to_vec()),
        Token::Bool(true),
    ]);
    assert_eq!(
        decode_transaction_result(&format!("0x{}", to_hex(result))),
        Some(DecodedMultisigCall::TokenTransfer { token: *TOKEN, recipient: *TO, tokens: 1000.into() })
    );
}

#[test]
fn it_prices_a_relayed_execution() {
    let tx = SafeTransaction::new(*TO, U256::exp10(18), Bytes::default(), Operation::Call);
    let revert = format!("0x08c379a0{:064x}{:064x}{:064x}", 0x20, 0x20, 21000);
    let estimate = RelayEstimate::new(&tx, &revert, 20_000_000_000u64.into(), 2).unwrap();
    assert_eq!(estimate.safe_tx_gas, U256::from(31000));
    assert_eq!(estimate.data_gas, U256::from(45520));
}
