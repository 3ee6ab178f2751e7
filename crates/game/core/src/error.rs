//! Error infrastructure for arena-core.
//!
//! Every fallible engine operation returns [`EngineError`]. Expected business
//! conditions (insufficient funds, missing records, exhausted limits) are
//! ordinary variants; states that can only come from corrupted storage are
//! classified as [`ErrorSeverity::Fatal`] so the caller aborts the enclosing
//! transaction instead of retrying.

use crate::economy::{Currency, Resource};
use crate::ids::{AccountId, CardId, TransactionId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: may succeed when retried (e.g. lost a commit race)
/// - **Validation**: invalid request, must not be retried unchanged
/// - **Internal**: unexpected inconsistency that needs investigation
/// - **Fatal**: stored data is corrupted, the enclosing transaction must abort
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or corruption.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for arena-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable identifier for this error kind.
    ///
    /// Codes never change between releases; collaborators map them to
    /// user-facing messages and HTTP statuses.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A record the engine looked for and could not use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Missing {
    Account(AccountId),
    Card(CardId),
    /// No active marketplace listing for the card (never listed, cancelled,
    /// or already sold).
    Listing(CardId),
    Transaction(TransactionId),
}

impl core::fmt::Display for Missing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Missing::Account(id) => write!(f, "{id}"),
            Missing::Card(id) => write!(f, "{id}"),
            Missing::Listing(id) => write!(f, "listing for {id}"),
            Missing::Transaction(id) => write!(f, "{id}"),
        }
    }
}

/// Which daily or global limit refused the operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Limit {
    DailyPurchases,
    PackSupply,
    DailyReward,
    CardLevel,
}

impl Limit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Limit::DailyPurchases => "daily purchase cap",
            Limit::PackSupply => "pack supply cap",
            Limit::DailyReward => "daily reward already claimed",
            Limit::CardLevel => "card level cap",
        }
    }
}

/// Failure reported by an [`EconomyStore`](crate::economy::EconomyStore) backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A record read by the unit of work changed before commit.
    #[error("version conflict on {0}")]
    Conflict(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Errors surfaced by battle, reward and economy operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("{account} has {available} {currency}, needs {required}")]
    InsufficientFunds {
        account: AccountId,
        currency: Currency,
        required: u64,
        available: u64,
    },

    #[error("{account} has {available} {resource}, needs {required}")]
    InsufficientResource {
        account: AccountId,
        resource: Resource,
        required: u32,
        available: u32,
    },

    #[error("not found: {0}")]
    NotFound(Missing),

    #[error("{account} is not allowed to act on {card}")]
    Unauthorized { account: AccountId, card: CardId },

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("limit exceeded: {}", .0.as_str())]
    LimitExceeded(Limit),

    /// Every commit attempt lost a race against a concurrent writer.
    #[error("gave up after {attempts} conflicting commit attempts")]
    Contended { attempts: u32 },

    /// Stored data violates an engine invariant.
    #[error("corrupted record: {0}")]
    Corrupted(String),

    #[error(transparent)]
    Store(StoreError),
}

impl EngineError {
    pub fn invalid(reason: &'static str) -> Self {
        Self::InvalidState(reason)
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Contended { .. } => ErrorSeverity::Recoverable,
            Self::Store(StoreError::Conflict(_)) => ErrorSeverity::Recoverable,
            Self::InsufficientFunds { .. }
            | Self::InsufficientResource { .. }
            | Self::NotFound(_)
            | Self::Unauthorized { .. }
            | Self::InvalidState(_)
            | Self::LimitExceeded(_) => ErrorSeverity::Validation,
            Self::Corrupted(_) | Self::Store(StoreError::Backend(_)) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InsufficientResource { .. } => "INSUFFICIENT_RESOURCE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::LimitExceeded(_) => "LIMIT_EXCEEDED",
            Self::Contended { .. } => "CONTENDED",
            Self::Corrupted(_) => "CORRUPTED",
            Self::Store(StoreError::Conflict(_)) => "CONFLICT",
            Self::Store(StoreError::Backend(_)) => "STORE_FAILURE",
        }
    }
}

pub type Result<T, E = EngineError> = core::result::Result<T, E>;
