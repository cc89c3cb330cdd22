#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use wlink_core::KeyPair;
use wlink_transfer::{Error, PollConfig, Result, RpcClient};
use wlink_vault::WalletRecord;
use zeroize::Zeroizing;

/// Answers each method from a queue; the last answer repeats.
#[derive(Default)]
pub struct ScriptedRpc {
    script: Mutex<HashMap<String, VecDeque<Result<Value>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedRpc {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: &str, response: Result<Value>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .entry(method.to_owned())
            .or_default()
            .push_back(response);
        self
    }

    pub fn ok(&self, method: &str, value: Value) -> &Self {
        self.on(method, Ok(value))
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(method, _)| method).collect()
    }

    pub fn params(&self, method: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params)
            .collect()
    }
}

#[async_trait]
impl RpcClient for ScriptedRpc {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_owned(), params));
        let mut script = self.script.lock().unwrap();
        let queue = script
            .get_mut(method)
            .ok_or_else(|| Error::Network(format!("unscripted {method}")))?;
        match queue.len() {
            0 => Err(Error::Network(format!("unscripted {method}"))),
            1 => queue[0].clone(),
            _ => queue.pop_front().unwrap(),
        }
    }
}

pub fn fast_poll() -> PollConfig {
    PollConfig {
        timeout: Duration::from_millis(60),
        interval: Duration::from_millis(5),
    }
}

pub fn sol_record(seed: u8) -> WalletRecord {
    let keypair = wlink_sol::Keypair::from_seed(&[seed; 32]);
    let pair = KeyPair {
        chain: wlink_core::Chain::Solana,
        public_key: keypair.address(),
        secret_key: keypair.keypair_hex(),
    };
    WalletRecord::new("sol", "", pair).unwrap()
}

pub const ETH_SECRET: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ETH_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub fn eth_record() -> WalletRecord {
    let pair = KeyPair {
        chain: wlink_core::Chain::Ethereum,
        public_key: ETH_ADDRESS.to_owned(),
        secret_key: Zeroizing::new(ETH_SECRET.to_owned()),
    };
    WalletRecord::new("eth", "", pair).unwrap()
}
