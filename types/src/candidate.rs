//! Candidates as reported by the voting contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Ledger-assigned candidate identifier. Always `>= 1` and stable for the
/// lifetime of the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(u64);

impl CandidateId {
    /// Build an id, rejecting zero.
    pub fn new(id: u64) -> Result<Self, TypesError> {
        if id == 0 {
            return Err(TypesError::InvalidCandidateId("0".into()));
        }
        Ok(Self(id))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl FromStr for CandidateId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|_| TypesError::InvalidCandidateId(s.to_string()))?;
        Self::new(id)
    }
}

/// A read-only snapshot of one candidate.
///
/// The client never edits `vote_count`; a fresh snapshot replaces the old one
/// after every confirmed vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub vote_count: u64,
}
