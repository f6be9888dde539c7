use crate::{
    op_stack::{DisputeGame, PortalRevert},
    BridgeError, OpStackBridge,
};

use alloy_primitives::{TxHash, B256, U256};
use router_primitives::Withdrawal;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

/// Returns a dispute game claiming an output root for the provided child chain block.
pub fn game_at(l2_block: u64) -> DisputeGame {
    DisputeGame { index: U256::from(l2_block), l2_block, root_claim: B256::with_last_byte(0xcc) }
}

/// A scripted [`OpStackBridge`].
///
/// Each withdrawal check consumes the next result of the script, the last result repeating once
/// the script is exhausted.
#[derive(Debug)]
pub struct MockOpStackBridge {
    checks: Vec<Result<(), PortalRevert>>,
    check_count: AtomicUsize,
    latest_game: Option<DisputeGame>,
    finalize_already_done: bool,
    finalized: AtomicBool,
    proofs: Mutex<Vec<DisputeGame>>,
    finalizations: AtomicUsize,
}

impl MockOpStackBridge {
    /// Returns a new [`MockOpStackBridge`] answering the withdrawal checks with the script.
    pub fn new(checks: Vec<Result<(), PortalRevert>>) -> Self {
        Self {
            checks,
            check_count: AtomicUsize::new(0),
            latest_game: None,
            finalize_already_done: false,
            finalized: AtomicBool::new(false),
            proofs: Mutex::new(Vec::new()),
            finalizations: AtomicUsize::new(0),
        }
    }

    /// Sets the latest dispute game.
    pub const fn with_latest_game(mut self, game: DisputeGame) -> Self {
        self.latest_game = Some(game);
        self
    }

    /// Makes the finalization revert because another party finalized the withdrawal first.
    pub const fn with_finalize_already_done(mut self) -> Self {
        self.finalize_already_done = true;
        self
    }

    /// Returns the number of submitted proofs.
    pub fn proofs(&self) -> usize {
        self.proofs.lock().expect("lock poisoned").len()
    }

    /// Returns the number of successful finalizations.
    pub fn finalizations(&self) -> usize {
        self.finalizations.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl OpStackBridge for MockOpStackBridge {
    async fn is_finalized(&self, _withdrawal_hash: B256) -> Result<bool, BridgeError> {
        Ok(self.finalized.load(Ordering::Relaxed))
    }

    async fn check_withdrawal(&self, _withdrawal_hash: B256) -> Result<(), BridgeError> {
        let count = self.check_count.fetch_add(1, Ordering::Relaxed);
        let index = count.min(self.checks.len().saturating_sub(1));
        match self.checks.get(index).cloned() {
            Some(Err(revert)) => Err(BridgeError::PortalReverted(revert)),
            _ => Ok(()),
        }
    }

    async fn latest_game(&self) -> Result<Option<DisputeGame>, BridgeError> {
        Ok(self.latest_game)
    }

    async fn prove(
        &self,
        withdrawal: &Withdrawal,
        game: &DisputeGame,
    ) -> Result<TxHash, BridgeError> {
        self.proofs.lock().expect("lock poisoned").push(*game);
        Ok(withdrawal.hash)
    }

    async fn finalize(&self, withdrawal: &Withdrawal) -> Result<TxHash, BridgeError> {
        self.finalized.store(true, Ordering::Relaxed);
        if self.finalize_already_done {
            return Err(BridgeError::PortalReverted(PortalRevert::AlreadyFinalized));
        }
        self.finalizations.fetch_add(1, Ordering::Relaxed);
        Ok(withdrawal.hash)
    }
}
