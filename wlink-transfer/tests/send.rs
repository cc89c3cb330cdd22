mod common;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::json;
use wlink_eth::transaction::Transaction;
use wlink_eth::{parse_address, Signer};
use wlink_transfer::{Error, EthereumProvider, SendState, Sender, SolanaProvider};

use common::{eth_record, fast_poll, sol_record, ScriptedRpc, ETH_SECRET};

const RECIPIENT: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
const ETH_RECIPIENT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const SEPOLIA: u64 = 11_155_111;

fn solana_script(rpc: &ScriptedRpc, lamports: u64) {
    rpc.ok("getBalance", json!({"context": {"slot": 1}, "value": lamports}))
        .ok(
            "getLatestBlockhash",
            json!({"value": {"blockhash": bs58::encode([1u8; 32]).into_string(), "lastValidBlockHeight": 9}}),
        )
        .ok("sendTransaction", json!("5sig"));
}

#[tokio::test]
async fn test_zero_amount_never_reaches_building() {
    let rpc = ScriptedRpc::new();
    let provider = SolanaProvider::new(rpc.clone());
    let mut sender = Sender::new(&provider);

    let err = sender.send(&sol_record(1), RECIPIENT, "0").await.unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)));
    assert!(err.is_warning());
    assert_eq!(sender.visited(), [SendState::Validating, SendState::Idle]);
    assert!(rpc.calls().is_empty());
}

#[tokio::test]
async fn test_amount_over_balance_never_reaches_building() {
    let rpc = ScriptedRpc::new();
    rpc.ok("getBalance", json!({"value": 1_000}));
    let provider = SolanaProvider::new(rpc.clone());
    let mut sender = Sender::new(&provider);

    let err = sender.send(&sol_record(1), RECIPIENT, "1").await.unwrap_err();
    assert_eq!(
        err,
        Error::InsufficientBalance {
            balance: 1_000,
            amount: 1_000_000_000
        }
    );
    assert!(err.is_warning());
    assert_eq!(sender.state(), SendState::Idle);
    assert!(!sender.visited().contains(&SendState::Building));
    assert_eq!(rpc.methods(), ["getBalance"]);
}

#[tokio::test]
async fn test_invalid_input_makes_no_network_call() {
    let rpc = ScriptedRpc::new();
    let provider = SolanaProvider::new(rpc.clone());
    let mut sender = Sender::new(&provider);

    let err = sender
        .send(&sol_record(1), "not-an-address", "0.1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidAddress { .. }));

    let err = sender.send(&sol_record(1), RECIPIENT, "-1").await.unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)));

    let err = sender
        .send(&sol_record(1), RECIPIENT, "0.0000000001")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)));

    assert!(rpc.calls().is_empty());
}

#[tokio::test]
async fn test_solana_send_confirms() {
    let rpc = ScriptedRpc::new();
    solana_script(&rpc, 2_000_000_000);
    rpc.ok("getSignatureStatuses", json!({"value": [null]}))
        .ok(
            "getSignatureStatuses",
            json!({"value": [{"slot": 5, "confirmationStatus": "confirmed", "err": null}]}),
        );
    let provider = SolanaProvider::new(rpc.clone()).with_poll(fast_poll());
    let record = sol_record(1);
    let mut sender = Sender::new(&provider);

    let receipt = sender.send(&record, RECIPIENT, "0.5").await.unwrap();
    assert_eq!(receipt.id, "5sig");
    assert_eq!(receipt.amount.base_units(), 500_000_000);
    assert_eq!(
        sender.visited(),
        [
            SendState::Validating,
            SendState::Building,
            SendState::Signing,
            SendState::Broadcasting,
            SendState::Confirmed,
        ]
    );

    // the wire transaction carries one valid signature by the sender
    let params = rpc.params("sendTransaction");
    assert_eq!(params[0][1]["encoding"], "base64");
    let wire = BASE64.decode(params[0][0].as_str().unwrap()).unwrap();
    assert_eq!(wire[0], 1);
    let signature: [u8; 64] = wire[1..65].try_into().unwrap();
    wlink_sol::verify_message(&wire[65..], &signature, record.public_key()).unwrap();

    assert_eq!(rpc.params("getBalance")[0][0], record.public_key());
}

#[tokio::test]
async fn test_rpc_error_on_broadcast_is_a_rejection() {
    let rpc = ScriptedRpc::new();
    rpc.ok("getBalance", json!({"value": 2_000_000_000u64}))
        .ok(
            "getLatestBlockhash",
            json!({"value": {"blockhash": bs58::encode([1u8; 32]).into_string()}}),
        )
        .on(
            "sendTransaction",
            Err(Error::Rpc {
                code: -32002,
                message: "Transaction simulation failed".into(),
            }),
        );
    let provider = SolanaProvider::new(rpc.clone());
    let mut sender = Sender::new(&provider);

    let err = sender.send(&sol_record(1), RECIPIENT, "0.5").await.unwrap_err();
    assert_eq!(
        err,
        Error::BroadcastRejected("Transaction simulation failed".into())
    );
    assert!(!err.is_warning());
    assert_eq!(sender.state(), SendState::Rejected);
    assert!(!rpc.methods().contains(&"getSignatureStatuses".to_owned()));
}

#[tokio::test]
async fn test_failed_on_chain_is_rejected() {
    let rpc = ScriptedRpc::new();
    solana_script(&rpc, 2_000_000_000);
    rpc.ok(
        "getSignatureStatuses",
        json!({"value": [{"confirmationStatus": "processed", "err": {"InstructionError": [0, "Custom"]}}]}),
    );
    let provider = SolanaProvider::new(rpc.clone()).with_poll(fast_poll());
    let mut sender = Sender::new(&provider);

    let err = sender.send(&sol_record(1), RECIPIENT, "0.5").await.unwrap_err();
    assert!(matches!(err, Error::BroadcastRejected(_)));
    assert_eq!(sender.state(), SendState::Rejected);
}

#[tokio::test]
async fn test_confirmation_timeout() {
    let rpc = ScriptedRpc::new();
    solana_script(&rpc, 2_000_000_000);
    rpc.ok("getSignatureStatuses", json!({"value": [null]}));
    let provider = SolanaProvider::new(rpc.clone()).with_poll(fast_poll());
    let mut sender = Sender::new(&provider);

    let err = sender.send(&sol_record(1), RECIPIENT, "0.5").await.unwrap_err();
    assert_eq!(
        err,
        Error::ConfirmationTimeout {
            signature: "5sig".into()
        }
    );
    assert_eq!(sender.state(), SendState::Rejected);
}

#[tokio::test]
async fn test_key_for_another_address_is_rejected_at_signing() {
    let rpc = ScriptedRpc::new();
    solana_script(&rpc, 2_000_000_000);
    let provider = SolanaProvider::new(rpc.clone());
    let mut sender = Sender::new(&provider);

    let honest = sol_record(1);
    let other = sol_record(2);
    let record = wlink_vault::WalletRecord::from_entry(
        wlink_core::Chain::Solana,
        wlink_vault::WalletEntry {
            secret_key: other.entry().secret_key.clone(),
            ..honest.entry().clone()
        },
    );

    let err = sender.send(&record, RECIPIENT, "0.5").await.unwrap_err();
    assert!(matches!(err, Error::InvalidKey(_)));
    assert_eq!(
        &sender.visited()[sender.visited().len() - 2..],
        [SendState::Signing, SendState::Rejected]
    );
    assert!(!rpc.methods().contains(&"sendTransaction".to_owned()));
}

#[tokio::test]
async fn test_network_failure_is_not_a_zero_balance() {
    let rpc = ScriptedRpc::new();
    rpc.on("getBalance", Err(Error::Network("connection refused".into())));
    let provider = SolanaProvider::new(rpc.clone());
    let mut sender = Sender::new(&provider);

    let err = sender.send(&sol_record(1), RECIPIENT, "0.5").await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert!(!err.is_warning());
    assert_eq!(sender.state(), SendState::Rejected);
}

#[tokio::test]
async fn test_record_for_other_chain_is_refused() {
    let rpc = ScriptedRpc::new();
    let provider = SolanaProvider::new(rpc.clone());
    let mut sender = Sender::new(&provider);

    let err = sender.send(&eth_record(), RECIPIENT, "0.5").await.unwrap_err();
    assert!(matches!(err, Error::InvalidKey(_)));
    assert!(rpc.calls().is_empty());
}

fn ethereum_script(rpc: &ScriptedRpc, balance: &str) {
    rpc.ok("eth_getBalance", json!(balance))
        .ok("eth_getTransactionCount", json!("0x7"))
        .ok("eth_gasPrice", json!("0x3b9aca00"))
        .ok("eth_sendRawTransaction", json!("0xabc"));
}

#[tokio::test]
async fn test_ethereum_send_confirms() {
    let rpc = ScriptedRpc::new();
    // 1 ETH
    ethereum_script(&rpc, "0xde0b6b3a7640000");
    rpc.ok("eth_getTransactionReceipt", json!(null))
        .ok("eth_getTransactionReceipt", json!({"status": "0x1"}));
    let provider = EthereumProvider::new(rpc.clone(), SEPOLIA).with_poll(fast_poll());
    let mut sender = Sender::new(&provider);

    let receipt = sender.send(&eth_record(), ETH_RECIPIENT, "0.25").await.unwrap();
    assert_eq!(receipt.id, "0xabc");
    assert_eq!(receipt.amount.to_string(), "0.25 ETH");
    assert_eq!(sender.state(), SendState::Confirmed);

    let signer = Signer::from_hex(ETH_SECRET).unwrap();
    let expected = Transaction::transfer(
        parse_address(ETH_RECIPIENT).unwrap(),
        250_000_000_000_000_000,
        7,
        1_000_000_000,
        SEPOLIA,
    )
    .sign(&signer)
    .unwrap();
    assert_eq!(
        rpc.params("eth_sendRawTransaction")[0][0],
        expected.to_hex()
    );
    assert_eq!(
        rpc.params("eth_getTransactionCount")[0],
        json!([common::ETH_ADDRESS, "pending"])
    );
}

#[tokio::test]
async fn test_ethereum_fee_counts_against_balance() {
    let rpc = ScriptedRpc::new();
    // exactly 0.25 ETH, nothing left for gas
    ethereum_script(&rpc, "0x3782dace9d90000");
    let provider = EthereumProvider::new(rpc.clone(), SEPOLIA);
    let mut sender = Sender::new(&provider);

    let err = sender.send(&eth_record(), ETH_RECIPIENT, "0.25").await.unwrap_err();
    assert_eq!(
        err,
        Error::InsufficientBalance {
            balance: 250_000_000_000_000_000,
            amount: 250_000_000_000_000_000 + 21_000 * 1_000_000_000,
        }
    );
    assert_eq!(sender.state(), SendState::Idle);
    assert!(!sender.visited().contains(&SendState::Signing));
    assert!(!rpc.methods().contains(&"eth_sendRawTransaction".to_owned()));
}

#[tokio::test]
async fn test_ethereum_reverted_receipt() {
    let rpc = ScriptedRpc::new();
    ethereum_script(&rpc, "0xde0b6b3a7640000");
    rpc.ok("eth_getTransactionReceipt", json!({"status": "0x0"}));
    let provider = EthereumProvider::new(rpc.clone(), SEPOLIA).with_poll(fast_poll());
    let mut sender = Sender::new(&provider);

    let err = sender.send(&eth_record(), ETH_RECIPIENT, "0.25").await.unwrap_err();
    assert!(matches!(err, Error::BroadcastRejected(_)));
    assert_eq!(sender.state(), SendState::Rejected);
}

#[tokio::test]
async fn test_ethereum_bad_recipient() {
    let rpc = ScriptedRpc::new();
    let provider = EthereumProvider::new(rpc.clone(), SEPOLIA);
    let mut sender = Sender::new(&provider);

    let err = sender.send(&eth_record(), RECIPIENT, "0.25").await.unwrap_err();
    assert!(matches!(err, Error::InvalidAddress { .. }));
    assert!(rpc.calls().is_empty());
}
