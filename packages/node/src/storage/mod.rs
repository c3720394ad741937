//! Contest data behind the demo API functions.
//!
//! The [`ContestStorage`] trait is the contract between the API handlers and
//! persistence. Role checks happen in the dispatch core before a handler
//! runs; storage never sees who is asking.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryStorage`] | Tests, the conformance suite, demo nodes |
//!
//! [`MemoryStorage`]: memory::MemoryStorage

pub mod memory;

use judgeapi::ApiError;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors that storage operations can return.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested item does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// An unexpected error in the underlying storage backend.
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(_) => ApiError::BadRequest(e.to_string()),
            StorageError::Internal(_) => ApiError::Internal(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    pub id: u32,
    pub shortname: String,
    pub name: String,
    /// Minutes added per rejected submission.
    pub penalty_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: u32,
    pub cid: u32,
    pub shortname: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub category: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clarification {
    pub id: u32,
    pub team: u32,
    /// `None` for general questions not tied to a problem.
    pub problem: Option<u32>,
    pub text: String,
}

/// Filters for [`ContestStorage::teams`]. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamFilter {
    pub category: Option<u32>,
    pub team_id: Option<u32>,
}

// ---------------------------------------------------------------------------
// ContestStorage trait
// ---------------------------------------------------------------------------

/// The persistence contract for contest data.
///
/// Implementations must be `Send + Sync + 'static` so they can be captured
/// by handlers shared across request tasks.
pub trait ContestStorage: Send + Sync + 'static {
    /// The contest currently running.
    fn active_contest(&self) -> Result<Contest, StorageError>;

    /// Problems of contest `cid`, ordered by short name.
    fn problems(&self, cid: u32) -> Result<Vec<Problem>, StorageError>;

    /// Teams matching `filter`, ordered by id.
    fn teams(&self, filter: TeamFilter) -> Result<Vec<Team>, StorageError>;

    /// Rename team `id`. Returns the updated team.
    fn rename_team(&self, id: u32, name: &str) -> Result<Team, StorageError>;

    /// Store a new clarification request and return it with its assigned id.
    fn add_clarification(
        &self,
        team: u32,
        problem: Option<u32>,
        text: &str,
    ) -> Result<Clarification, StorageError>;

    /// All clarification requests, oldest first.
    fn clarifications(&self) -> Result<Vec<Clarification>, StorageError>;
}
