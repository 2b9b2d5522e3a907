//! Three-way ledger aggregation
//!
//! Each [`LedgerAggregator::refresh`] fetches the summary, the bank accounts
//! and the history concurrently and swaps in a new snapshot only when all
//! three arrive and agree. Cycles are numbered; a cycle that finishes after a
//! newer one was applied (or after [`LedgerAggregator::cancel_pending`]) is
//! dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::snapshot::LedgerSnapshot;
use super::FailurePolicy;
use crate::api::LedgerApi;
use crate::error::{FinGridError, FinGridResult};
use crate::models::AccountId;

/// What happened to a completed refresh cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The cycle's snapshot is now the current view
    Applied(Arc<LedgerSnapshot>),
    /// A newer cycle had already been applied or the cycle was cancelled
    Stale { generation: u64, newest: u64 },
}

impl RefreshOutcome {
    pub fn snapshot(&self) -> Option<&Arc<LedgerSnapshot>> {
        match self {
            Self::Applied(snapshot) => Some(snapshot),
            Self::Stale { .. } => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

#[derive(Debug, Default)]
struct Generations {
    /// Last generation handed out
    issued: u64,
    /// Generation of the snapshot currently shown
    applied: u64,
    /// Every generation up to this one has been cancelled
    cancelled: u64,
}

impl Generations {
    fn newest(&self) -> u64 {
        self.applied.max(self.cancelled)
    }
}

pub type SnapshotReceiver = watch::Receiver<Option<Arc<LedgerSnapshot>>>;

pub struct LedgerAggregator<A: LedgerApi + ?Sized = dyn LedgerApi> {
    api: Arc<A>,
    policy: FailurePolicy,
    generations: Mutex<Generations>,
    snapshot: watch::Sender<Option<Arc<LedgerSnapshot>>>,
}

impl<A: LedgerApi + ?Sized> LedgerAggregator<A> {
    pub fn new(api: Arc<A>, policy: FailurePolicy) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            api,
            policy,
            generations: Mutex::new(Generations::default()),
            snapshot,
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// The current view, if a cycle has succeeded since the last clear
    pub fn snapshot(&self) -> Option<Arc<LedgerSnapshot>> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshot.subscribe()
    }

    /// Run one aggregation cycle
    ///
    /// Any fetch failure or cross-source disagreement fails the whole cycle
    /// with one [`FinGridError::Aggregation`]; the current view is then kept or
    /// cleared according to the failure policy. Failures of stale cycles are
    /// discarded like their successes.
    pub async fn refresh(&self) -> FinGridResult<RefreshOutcome> {
        let generation = self.begin();
        debug!(generation, "ledger refresh started");

        let fetched = tokio::try_join!(
            self.api.fetch_summary(),
            self.api.fetch_accounts(),
            self.api.fetch_history(),
        );
        let assembled = fetched.and_then(|(summary, accounts, transactions)| {
            LedgerSnapshot::assemble(generation, summary, accounts, transactions)
        });

        self.finish(generation, assembled)
    }

    /// Flip an account's inclusion flag, then re-aggregate everything
    pub async fn toggle_inclusion(&self, account_id: &AccountId) -> FinGridResult<RefreshOutcome> {
        if let Some(snapshot) = self.snapshot() {
            if snapshot.account(account_id).is_none() {
                return Err(FinGridError::account_not_found(account_id.as_str()));
            }
        }

        let account = self.api.toggle_inclusion(account_id).await?;
        info!(
            account = %account.id,
            included = account.is_included_in_total,
            "account inclusion toggled"
        );

        self.refresh().await
    }

    /// Make every in-flight cycle stale
    pub fn cancel_pending(&self) {
        let mut generations = self.generations();
        generations.cancelled = generations.issued;
        debug!(through = generations.cancelled, "pending ledger refreshes cancelled");
    }

    /// Drop the current view and cancel in-flight cycles
    pub fn clear(&self) {
        self.cancel_pending();
        self.snapshot.send_replace(None);
    }

    fn begin(&self) -> u64 {
        let mut generations = self.generations();
        generations.issued += 1;
        generations.issued
    }

    fn finish(
        &self,
        generation: u64,
        assembled: FinGridResult<LedgerSnapshot>,
    ) -> FinGridResult<RefreshOutcome> {
        let mut generations = self.generations();

        let newest = generations.newest();
        if generation <= newest {
            match &assembled {
                Ok(_) => debug!(generation, newest, "discarding stale ledger snapshot"),
                Err(e) => debug!(generation, newest, error = %e, "discarding stale ledger failure"),
            }
            return Ok(RefreshOutcome::Stale { generation, newest });
        }

        match assembled {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                generations.applied = generation;
                self.snapshot.send_replace(Some(snapshot.clone()));
                info!(
                    generation,
                    accounts = snapshot.accounts.len(),
                    transactions = snapshot.transactions.len(),
                    "ledger snapshot applied"
                );
                Ok(RefreshOutcome::Applied(snapshot))
            }
            Err(e) => {
                warn!(generation, error = %e, policy = ?self.policy, "ledger refresh failed");
                if self.policy == FailurePolicy::Clear {
                    self.snapshot.send_replace(None);
                }
                Err(FinGridError::aggregation(e))
            }
        }
    }

    fn generations(&self) -> MutexGuard<'_, Generations> {
        // Plain counters stay valid even if a holder panicked
        self.generations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
