//! Session state and its transitions.
//!
//! Every transition takes the current [`SessionState`] by reference and
//! returns the next one; nothing here performs I/O. Transitions that complete
//! an async step carry the `generation` the step started under and leave the
//! state untouched when the session has since been reset or switched.

use nexus_types::{Address, Candidate, CandidateId, TransactionRecord, TxHash};
use std::fmt;

use crate::error::SessionError;

/// Whether the connected session has a contract binding yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BindingState {
    #[default]
    Unbound,
    Bound,
}

/// The candidate a submission is for. Lives only while a vote is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteIntent {
    pub candidate: CandidateId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Disconnected,
    Connecting,
    Connected(BindingState),
    /// Submission issued, not yet accepted by the network.
    Voting(VoteIntent),
    /// Accepted by the network, waiting for confirmation.
    Broadcasting(VoteIntent, TxHash),
}

impl Phase {
    /// True in any phase where the contract binding exists.
    pub fn is_bound(&self) -> bool {
        matches!(
            self,
            Self::Connected(BindingState::Bound) | Self::Voting(_) | Self::Broadcasting(..)
        )
    }

    pub fn is_voting(&self) -> bool {
        matches!(self, Self::Voting(_) | Self::Broadcasting(..))
    }
}

/// Progress marker shown to the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UiStatus {
    #[default]
    Idle,
    Submitting,
    Broadcasting,
    Confirmed,
    Failed(String),
}

impl fmt::Display for UiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Submitting => f.write_str("initializing vote..."),
            Self::Broadcasting => f.write_str("broadcasting to blockchain..."),
            Self::Confirmed => f.write_str("vote confirmed on-chain!"),
            Self::Failed(reason) => write!(f, "vote failed: {reason}"),
        }
    }
}

/// Everything the UI renders, as one owned value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub account: Option<Address>,
    /// Last snapshot read from the contract, in contract order.
    pub candidates: Vec<Candidate>,
    pub history: Vec<TransactionRecord>,
    pub status: UiStatus,
    /// Set while a vote is in flight; doubles as the vote lock.
    pub loading: bool,
    /// Blocking message the user must acknowledge.
    pub notice: Option<String>,
    /// Bumped on every (re)connect, account switch and reset.
    pub generation: u64,
    /// Bumped when a vote starts and when it installs its snapshot. A
    /// candidate read only lands if this is unchanged since it was issued.
    pub snapshot_seq: u64,
}

impl SessionState {
    // ── connection ─────────────────────────────────────────────────────

    /// `Disconnected → Connecting`.
    pub fn begin_connect(&self) -> Result<Self, SessionError> {
        match self.phase {
            Phase::Disconnected => Ok(Self {
                phase: Phase::Connecting,
                notice: None,
                generation: self.generation + 1,
                ..Self::default()
            }),
            Phase::Connecting => Err(SessionError::ConnectInFlight),
            _ => Ok(self.clone()),
        }
    }

    /// `Connecting → Connected(Unbound)`.
    pub fn connected(&self, generation: u64, account: Address) -> Self {
        if self.generation != generation || self.phase != Phase::Connecting {
            return self.clone();
        }
        Self {
            phase: Phase::Connected(BindingState::Unbound),
            account: Some(account),
            ..self.clone()
        }
    }

    /// `Connecting → Disconnected`, optionally telling the user why.
    pub fn connect_failed(&self, generation: u64, notice: Option<String>) -> Self {
        if self.generation != generation || self.phase != Phase::Connecting {
            return self.clone();
        }
        Self {
            phase: Phase::Disconnected,
            account: None,
            notice,
            ..self.clone()
        }
    }

    /// `Connected(Unbound) → Connected(Bound)`.
    pub fn bound(&self, generation: u64) -> Result<Self, SessionError> {
        if self.generation != generation {
            return Err(SessionError::Superseded);
        }
        match self.phase {
            Phase::Connected(BindingState::Unbound) => Ok(Self {
                phase: Phase::Connected(BindingState::Bound),
                ..self.clone()
            }),
            _ => Err(SessionError::Superseded),
        }
    }

    /// Back to `Disconnected`, dropping everything tied to the old session.
    pub fn reset(&self) -> Self {
        Self {
            generation: self.generation + 1,
            ..Self::default()
        }
    }

    /// The wallet now exposes `account`: start a fresh, unbound session for it.
    pub fn switch_account(&self, account: Address) -> Self {
        Self {
            phase: Phase::Connected(BindingState::Unbound),
            account: Some(account),
            generation: self.generation + 1,
            ..Self::default()
        }
    }

    // ── data ───────────────────────────────────────────────────────────

    /// Replace the candidate snapshot with a read issued at `(generation,
    /// snapshot_seq)`. Dropped if a vote started or finished since, or is in
    /// flight now.
    pub fn candidates_loaded(
        &self,
        generation: u64,
        snapshot_seq: u64,
        candidates: Vec<Candidate>,
    ) -> Self {
        if self.generation != generation
            || self.snapshot_seq != snapshot_seq
            || self.phase.is_voting()
        {
            return self.clone();
        }
        Self {
            candidates,
            ..self.clone()
        }
    }

    /// Replace the activity feed, if it still belongs to this session.
    pub fn history_loaded(
        &self,
        generation: u64,
        address: Address,
        records: Vec<TransactionRecord>,
    ) -> Self {
        if self.generation != generation || self.account != Some(address) {
            return self.clone();
        }
        Self {
            history: records,
            ..self.clone()
        }
    }

    // ── voting ─────────────────────────────────────────────────────────

    /// `Connected(Bound) → Voting`. Rejected while unbound or while another
    /// vote is in flight.
    pub fn begin_vote(&self, candidate: CandidateId) -> Result<Self, SessionError> {
        if self.loading || self.phase.is_voting() {
            return Err(SessionError::VoteInFlight);
        }
        if self.phase != Phase::Connected(BindingState::Bound) {
            return Err(SessionError::NotBound);
        }
        Ok(Self {
            phase: Phase::Voting(VoteIntent { candidate }),
            status: UiStatus::Submitting,
            loading: true,
            notice: None,
            snapshot_seq: self.snapshot_seq + 1,
            ..self.clone()
        })
    }

    /// `Voting → Broadcasting`.
    pub fn vote_submitted(&self, generation: u64, tx: TxHash) -> Self {
        match self.phase {
            Phase::Voting(intent) if self.generation == generation => Self {
                phase: Phase::Broadcasting(intent, tx),
                status: UiStatus::Broadcasting,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// Submission failed: back to `Connected(Bound)` with the status cleared.
    pub fn vote_rejected(&self, generation: u64, notice: Option<String>) -> Self {
        if self.generation != generation || !self.phase.is_voting() {
            return self.clone();
        }
        Self {
            phase: Phase::Connected(BindingState::Bound),
            status: UiStatus::Idle,
            loading: false,
            notice,
            ..self.clone()
        }
    }

    /// Broadcast but never confirmed (dropped or reverted on chain).
    pub fn vote_failed(&self, generation: u64, reason: String) -> Self {
        if self.generation != generation || !self.phase.is_voting() {
            return self.clone();
        }
        Self {
            phase: Phase::Connected(BindingState::Bound),
            status: UiStatus::Failed(reason.clone()),
            loading: false,
            notice: Some(reason),
            ..self.clone()
        }
    }

    /// Confirmed and re-read: install the fresh snapshot and release the lock.
    pub fn vote_confirmed(&self, generation: u64, candidates: Vec<Candidate>) -> Self {
        if self.generation != generation || !self.phase.is_voting() {
            return self.clone();
        }
        Self {
            phase: Phase::Connected(BindingState::Bound),
            candidates,
            status: UiStatus::Confirmed,
            loading: false,
            snapshot_seq: self.snapshot_seq + 1,
            ..self.clone()
        }
    }

    /// Confirmed, but the follow-up read never succeeded. Counts stay as they
    /// were; the status says they are stale.
    pub fn vote_confirmed_stale(&self, generation: u64, reason: String) -> Self {
        if self.generation != generation || !self.phase.is_voting() {
            return self.clone();
        }
        Self {
            phase: Phase::Connected(BindingState::Bound),
            status: UiStatus::Failed(format!("vote confirmed, refresh failed: {reason}")),
            loading: false,
            snapshot_seq: self.snapshot_seq + 1,
            ..self.clone()
        }
    }

    /// `Confirmed → Idle`; any other status is left alone.
    pub fn settle_status(&self) -> Self {
        if self.status != UiStatus::Confirmed {
            return self.clone();
        }
        Self {
            status: UiStatus::Idle,
            ..self.clone()
        }
    }

    pub fn dismiss_notice(&self) -> Self {
        Self {
            notice: None,
            ..self.clone()
        }
    }
}
