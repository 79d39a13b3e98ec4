//! The session controller.
//!
//! Runs the async steps of a session (wallet connection, contract binding,
//! reads, vote submission and confirmation) and applies the matching
//! [`SessionState`] transition after each one. The current state lives in a
//! `tokio::sync::watch` channel: UIs call [`SessionController::subscribe`] and
//! re-render on every change.

use nexus_contract::{ContractBinding, Receipt};
use nexus_history::{HistoryService, HistorySource};
use nexus_provider::{Eip1193, LedgerClient};
use nexus_types::{Address, Candidate, CandidateId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

use crate::backoff::Backoff;
use crate::config::SessionSettings;
use crate::error::SessionError;
use crate::state::{BindingState, Phase, SessionState};

/// Upper bound on the delay between post-vote refresh attempts.
const MAX_REFRESH_BACKOFF: Duration = Duration::from_secs(5);

pub struct SessionController<P, H> {
    ledger: LedgerClient<P>,
    history: HistoryService<H>,
    settings: SessionSettings,
    binding: RwLock<Option<Arc<ContractBinding<P>>>>,
    state: watch::Sender<SessionState>,
}

impl<P: Eip1193, H: HistorySource> SessionController<P, H> {
    pub fn new(ledger: LedgerClient<P>, history: H, settings: SessionSettings) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            ledger,
            history: HistoryService::new(history),
            settings,
            binding: RwLock::new(None),
            state,
        }
    }

    /// A receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Apply an unconditional transition.
    fn update(&self, f: impl FnOnce(&SessionState) -> SessionState) {
        self.state.send_if_modified(|state| {
            let next = f(state);
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
    }

    /// Apply a guarded transition; on rejection the state is left as is.
    fn advance(
        &self,
        f: impl FnOnce(&SessionState) -> Result<SessionState, SessionError>,
    ) -> Result<SessionState, SessionError> {
        let mut outcome = Err(SessionError::Superseded);
        self.state.send_if_modified(|state| match f(state) {
            Ok(next) => {
                let changed = *state != next;
                *state = next.clone();
                outcome = Ok(next);
                changed
            }
            Err(e) => {
                outcome = Err(e);
                false
            }
        });
        outcome
    }

    // ── connection ─────────────────────────────────────────────────────

    /// Connect the wallet, bind the contract and load the initial data.
    ///
    /// Already bound: returns the current account without asking the wallet
    /// again. Connected but unbound (an earlier bind failed): retries the bind.
    pub async fn connect(&self) -> Result<Address, SessionError> {
        let unbound = {
            let current = self.state.borrow();
            match (&current.phase, current.account) {
                (phase, Some(account)) if phase.is_bound() => return Ok(account),
                (Phase::Connected(BindingState::Unbound), Some(account)) => Some(account),
                _ => None,
            }
        };
        if let Some(account) = unbound {
            self.bind().await?;
            return Ok(account);
        }

        let generation = self.advance(|s| s.begin_connect())?.generation;

        let account = match self.ledger.connect().await {
            Ok(account) => account,
            Err(e) => {
                let err = SessionError::from(e);
                let notice = match &err {
                    SessionError::UserRejected => {
                        tracing::info!("wallet connection declined by user");
                        None
                    }
                    other => {
                        tracing::warn!(error = %other, "wallet connection failed");
                        Some(other.to_string())
                    }
                };
                self.update(|s| s.connect_failed(generation, notice));
                return Err(err);
            }
        };

        self.update(|s| s.connected(generation, account));
        self.bind().await?;
        Ok(account)
    }

    /// Bind the contract for the connected account, then load candidates and
    /// history side by side. A history failure never affects candidates.
    pub async fn bind(&self) -> Result<(), SessionError> {
        let (generation, account) = {
            let current = self.state.borrow();
            match (&current.phase, current.account) {
                (Phase::Connected(BindingState::Unbound), Some(account)) => {
                    (current.generation, account)
                }
                (phase, _) if phase.is_bound() => return Ok(()),
                _ => return Err(SessionError::NotBound),
            }
        };

        let signer = self.ledger.get_signer().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to obtain signer");
            SessionError::from(e)
        })?;
        if signer.address() != account {
            let err = SessionError::AccountMismatch {
                expected: account,
                actual: signer.address(),
            };
            tracing::warn!(error = %err, "signer does not match session account");
            return Err(err);
        }
        if signer.chain_id() != self.settings.network.chain_id() {
            tracing::warn!(
                wallet_chain = signer.chain_id(),
                expected = self.settings.network.chain_id(),
                "wallet is on a different network than configured"
            );
        }

        let binding = ContractBinding::bind(signer, self.settings.contract_address)
            .with_poll_interval(self.settings.poll_interval);
        *self.binding.write().await = Some(Arc::new(binding));
        self.advance(|s| s.bound(generation))?;
        tracing::info!(account = %account, contract = %self.settings.contract_address, "session bound");

        let (candidates, ()) = tokio::join!(self.refresh_candidates(), self.refresh_history());
        if let Err(e) = candidates {
            tracing::warn!(error = %e, "initial candidate load failed");
        }
        Ok(())
    }

    /// Forget the session entirely.
    pub async fn disconnect(&self) {
        *self.binding.write().await = None;
        self.update(|s| s.reset());
        tracing::info!("session disconnected");
    }

    /// React to the wallet reporting a new account list.
    ///
    /// Empty list: disconnect. Different first account: start a fresh session
    /// for it and rebind. Same account: rebind if an earlier bind failed,
    /// otherwise nothing to do.
    pub async fn accounts_changed(&self, accounts: &[Address]) -> Result<(), SessionError> {
        let Some(&next) = accounts.first() else {
            self.disconnect().await;
            return Ok(());
        };
        let (same, bound) = {
            let current = self.state.borrow();
            (current.account == Some(next), current.phase.is_bound())
        };
        if same && bound {
            return Ok(());
        }
        if !same {
            tracing::info!(account = %next, "wallet account changed");
            *self.binding.write().await = None;
            self.update(|s| s.switch_account(next));
        }
        self.bind().await
    }

    // ── reads ──────────────────────────────────────────────────────────

    /// Re-read the candidate list from the contract.
    ///
    /// A read that overlaps a vote is discarded: the vote installs its own
    /// post-confirmation snapshot.
    pub async fn refresh_candidates(&self) -> Result<(), SessionError> {
        let Some(binding) = self.binding.read().await.clone() else {
            return Err(SessionError::NotBound);
        };
        let (generation, snapshot_seq) = {
            let current = self.state.borrow();
            if !current.phase.is_bound() {
                return Err(SessionError::NotBound);
            }
            (current.generation, current.snapshot_seq)
        };
        let candidates = binding.list_candidates().await?;
        tracing::debug!(count = candidates.len(), "candidates loaded");
        self.update(|s| s.candidates_loaded(generation, snapshot_seq, candidates));
        Ok(())
    }

    /// Re-query the activity feed. Never fails; see [`HistoryService`].
    pub async fn refresh_history(&self) {
        let (account, generation) = {
            let current = self.state.borrow();
            match current.account {
                Some(account) => (account, current.generation),
                None => return,
            }
        };
        let records = self
            .history
            .fetch_recent(account, self.settings.history_limit)
            .await;
        self.update(|s| s.history_loaded(generation, account, records));
    }

    // ── voting ─────────────────────────────────────────────────────────

    /// Submit a vote, wait for confirmation and re-read the candidates.
    ///
    /// Rejected without touching the ledger while unbound
    /// ([`SessionError::NotBound`]) or while another vote is in flight
    /// ([`SessionError::VoteInFlight`]).
    pub async fn vote(&self, candidate: CandidateId) -> Result<Receipt, SessionError> {
        let binding = self.binding.read().await.clone();
        let generation = self.advance(|s| s.begin_vote(candidate))?.generation;

        let Some(binding) = binding else {
            self.update(|s| s.vote_rejected(generation, Some(SessionError::NotBound.to_string())));
            return Err(SessionError::NotBound);
        };

        tracing::info!(candidate = %candidate, "submitting vote");
        let pending = match binding.vote(candidate).await {
            Ok(pending) => pending,
            Err(e) => {
                let err = SessionError::from(e);
                let notice = match &err {
                    SessionError::UserRejected => {
                        tracing::info!(candidate = %candidate, "vote signature declined");
                        None
                    }
                    other => {
                        tracing::warn!(candidate = %candidate, error = %other, "vote rejected");
                        Some(other.to_string())
                    }
                };
                self.update(|s| s.vote_rejected(generation, notice));
                return Err(err);
            }
        };

        let tx = pending.hash();
        self.update(|s| s.vote_submitted(generation, tx));

        let receipt = match pending.await_confirmation().await {
            Ok(receipt) => receipt,
            Err(e) => {
                let err = SessionError::from(e);
                tracing::warn!(tx = %tx, error = %err, "vote not confirmed");
                self.update(|s| s.vote_failed(generation, err.to_string()));
                return Err(err);
            }
        };
        tracing::info!(tx = %tx, block = receipt.block_number, "vote confirmed");

        match self.refresh_after_vote(&binding).await {
            Ok(candidates) => self.update(|s| s.vote_confirmed(generation, candidates)),
            Err(e) => {
                tracing::warn!(tx = %tx, error = %e, "candidate refresh after vote failed");
                self.update(|s| s.vote_confirmed_stale(generation, e.to_string()));
            }
        }
        Ok(receipt)
    }

    /// Read the candidates, retrying with backoff; the vote lock is still held.
    async fn refresh_after_vote(
        &self,
        binding: &ContractBinding<P>,
    ) -> Result<Vec<Candidate>, SessionError> {
        let mut backoff = Backoff::new(self.settings.refresh_backoff, MAX_REFRESH_BACKOFF);
        let attempts = self.settings.refresh_attempts.max(1);
        let mut attempt = 1;
        loop {
            match binding.list_candidates().await {
                Ok(candidates) => return Ok(candidates),
                Err(e) if attempt < attempts => {
                    tracing::debug!(attempt, error = %e, "candidate refresh failed, retrying");
                    tokio::time::sleep(backoff.next_delay()).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Hold a "confirmed" status for the configured time, then clear it.
    pub async fn settle_status(&self) {
        tokio::time::sleep(self.settings.confirmed_status_hold).await;
        self.update(|s| s.settle_status());
    }

    /// The user acknowledged the current notice.
    pub fn dismiss_notice(&self) {
        self.update(|s| s.dismiss_notice());
    }
}
