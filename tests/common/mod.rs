//! Shared utilities for integration tests.

#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vault_redeemer::blockchain::{BlockchainError, BlockchainResult, Receipt, ReceiptStatus};
use vault_redeemer::session::{Connection, Connector, SessionConfig};
use vault_redeemer::vault::VaultAccessor;

pub const VAULT: &str = "0x1111111111111111111111111111111111111111";
pub const RECEIVER: &str = "0x2222222222222222222222222222222222222222";
pub const TX_HASH: TxHash = TxHash::repeat_byte(0xab);
pub const BLOCK_NUMBER: u64 = 4242;

pub fn operator() -> Address {
    Address::repeat_byte(0x33)
}

pub fn vault() -> Address {
    VAULT.parse().unwrap()
}

pub fn receiver() -> Address {
    RECEIVER.parse().unwrap()
}

pub fn session_config() -> SessionConfig {
    SessionConfig::new("0x01", "http://127.0.0.1:8545", VAULT, RECEIVER).unwrap()
}

/// Queue of scripted results, falling back to a fixed one when empty.
struct Script<T> {
    queue: VecDeque<Result<T, String>>,
    fallback: Result<T, String>,
}

impl<T: Clone> Script<T> {
    fn new(fallback: T) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback: Ok(fallback),
        }
    }

    fn next(&mut self) -> Result<T, String> {
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// A recorded `redeem` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub vault: Address,
    pub shares: U256,
    pub receiver: Address,
    pub owner: Address,
}

/// Scripted vault accessor.
pub struct MockVault {
    balance: Mutex<Script<U256>>,
    max_redeem: Mutex<Script<U256>>,
    submit: Mutex<Script<TxHash>>,
    receipt: Mutex<Script<ReceiptStatus>>,
    read_delay: Duration,
    pub balance_calls: AtomicUsize,
    pub max_redeem_calls: AtomicUsize,
    pub submissions: Mutex<Vec<Submission>>,
}

impl MockVault {
    /// Every read returns this position unless something is queued.
    pub fn new(balance: u64, max_redeemable: u64) -> Self {
        Self {
            balance: Mutex::new(Script::new(U256::from(balance))),
            max_redeem: Mutex::new(Script::new(U256::from(max_redeemable))),
            submit: Mutex::new(Script::new(TX_HASH)),
            receipt: Mutex::new(Script::new(ReceiptStatus::Success)),
            read_delay: Duration::ZERO,
            balance_calls: AtomicUsize::new(0),
            max_redeem_calls: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Queue one position ahead of the fallback.
    pub fn queue_position(self, balance: u64, max_redeemable: u64) -> Self {
        self.balance.lock().unwrap().queue.push_back(Ok(U256::from(balance)));
        self.max_redeem
            .lock()
            .unwrap()
            .queue
            .push_back(Ok(U256::from(max_redeemable)));
        self
    }

    pub fn fail_balance_once(self, message: &str) -> Self {
        self.balance
            .lock()
            .unwrap()
            .queue
            .push_back(Err(message.to_string()));
        self
    }

    pub fn fail_submit_once(self, message: &str) -> Self {
        self.submit
            .lock()
            .unwrap()
            .queue
            .push_back(Err(message.to_string()));
        self
    }

    pub fn queue_receipt(self, status: ReceiptStatus) -> Self {
        self.receipt.lock().unwrap().queue.push_back(Ok(status));
        self
    }

    pub fn with_receipt(self, status: ReceiptStatus) -> Self {
        self.receipt.lock().unwrap().fallback = Ok(status);
        self
    }

    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    pub fn reads(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if !self.read_delay.is_zero() {
            tokio::time::sleep(self.read_delay).await;
        }
    }
}

#[async_trait]
impl VaultAccessor for MockVault {
    async fn balance_of(&self, _vault: Address, _holder: Address) -> BlockchainResult<U256> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.balance.lock().unwrap().next();
        self.pause().await;
        result.map_err(BlockchainError::Query)
    }

    async fn max_redeem(&self, _vault: Address, _holder: Address) -> BlockchainResult<U256> {
        self.max_redeem_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.max_redeem.lock().unwrap().next();
        self.pause().await;
        result.map_err(BlockchainError::Query)
    }

    async fn submit_redeem(
        &self,
        vault: Address,
        shares: U256,
        receiver: Address,
        owner: Address,
    ) -> BlockchainResult<TxHash> {
        self.submissions.lock().unwrap().push(Submission {
            vault,
            shares,
            receiver,
            owner,
        });
        let result = self.submit.lock().unwrap().next();
        result.map_err(BlockchainError::Submission)
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<Receipt> {
        let status = self
            .receipt
            .lock()
            .unwrap()
            .next()
            .map_err(BlockchainError::Rpc)?;
        Ok(Receipt {
            tx_hash,
            status,
            block_number: BLOCK_NUMBER,
        })
    }
}

/// Connector handing out a shared `MockVault`.
pub struct MockConnector {
    pub vault: Arc<MockVault>,
    pub failure: Option<String>,
}

impl MockConnector {
    pub fn new(vault: Arc<MockVault>) -> Self {
        Self {
            vault,
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            vault: Arc::new(MockVault::new(0, 0)),
            failure: Some(message.to_string()),
        }
    }
}

impl Connector for MockConnector {
    fn connect(&self, _config: &SessionConfig) -> BlockchainResult<Connection> {
        if let Some(message) = &self.failure {
            return Err(BlockchainError::Configuration(message.clone()));
        }
        Ok(Connection {
            operator: operator(),
            accessor: self.vault.clone(),
        })
    }
}
