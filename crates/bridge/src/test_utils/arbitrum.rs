use crate::{ArbitrumBridge, BridgeError};

use alloy_primitives::{TxHash, B256};
use router_primitives::ArbitrumMessage;
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

/// The behavior of [`MockArbitrumBridge::execute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecuteBehavior {
    /// The execution succeeds and marks the message spent.
    #[default]
    Succeed,
    /// The execution reverts because another party executed the message first.
    AlreadySpent,
    /// The execution reverts and the message remains unspent.
    Revert,
    /// The execution reverts and the parent chain becomes unreachable for later spent checks.
    RevertThenUnreachable,
}

/// A scripted [`ArbitrumBridge`].
///
/// Each query of the confirmed send count consumes the next value of the script, the last value
/// repeating once the script is exhausted.
#[derive(Debug)]
pub struct MockArbitrumBridge {
    send_counts: Vec<Option<u64>>,
    send_count_queries: AtomicUsize,
    behavior: ExecuteBehavior,
    unreachable: AtomicBool,
    spent: Mutex<HashSet<u64>>,
    executions: Mutex<Vec<u64>>,
}

impl MockArbitrumBridge {
    /// Returns a new [`MockArbitrumBridge`] reporting the provided send counts.
    pub fn new(send_counts: Vec<Option<u64>>) -> Self {
        Self {
            send_counts,
            send_count_queries: AtomicUsize::new(0),
            behavior: ExecuteBehavior::default(),
            unreachable: AtomicBool::new(false),
            spent: Mutex::new(HashSet::new()),
            executions: Mutex::new(Vec::new()),
        }
    }

    /// Sets the behavior of the execution.
    pub const fn with_execute_behavior(mut self, behavior: ExecuteBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Returns the number of successful executions.
    pub fn executions(&self) -> usize {
        self.executions.lock().expect("lock poisoned").len()
    }

    /// Returns the send count used by the last successful execution.
    pub fn executed_with(&self) -> Option<u64> {
        self.executions.lock().expect("lock poisoned").last().copied()
    }

    /// Returns the number of send count queries.
    pub fn send_count_queries(&self) -> usize {
        self.send_count_queries.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl ArbitrumBridge for MockArbitrumBridge {
    async fn is_spent(&self, position: u64) -> Result<bool, BridgeError> {
        if self.unreachable.load(Ordering::Relaxed) {
            return Err(BridgeError::MissingBlock("latest".to_owned()));
        }
        Ok(self.spent.lock().expect("lock poisoned").contains(&position))
    }

    async fn confirmed_send_count(&self) -> Result<Option<u64>, BridgeError> {
        let query = self.send_count_queries.fetch_add(1, Ordering::Relaxed);
        let index = query.min(self.send_counts.len().saturating_sub(1));
        Ok(self.send_counts.get(index).copied().flatten())
    }

    async fn execute(
        &self,
        message: &ArbitrumMessage,
        send_count: u64,
    ) -> Result<TxHash, BridgeError> {
        let position = message.position.to::<u64>();
        match self.behavior {
            ExecuteBehavior::Succeed => {
                self.spent.lock().expect("lock poisoned").insert(position);
                self.executions.lock().expect("lock poisoned").push(send_count);
                Ok(B256::with_last_byte(position as u8))
            }
            ExecuteBehavior::AlreadySpent => {
                self.spent.lock().expect("lock poisoned").insert(position);
                Err(BridgeError::TransactionReverted(B256::ZERO))
            }
            ExecuteBehavior::Revert => Err(BridgeError::TransactionReverted(B256::ZERO)),
            ExecuteBehavior::RevertThenUnreachable => {
                self.unreachable.store(true, Ordering::Relaxed);
                Err(BridgeError::TransactionReverted(B256::ZERO))
            }
        }
    }
}
