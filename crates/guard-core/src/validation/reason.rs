//! Validation outcomes

use thiserror::Error;

/// Why a query (or identifier) was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("Query too long ({length} characters, max {max})")]
    TooLong { length: usize, max: usize },

    #[error("Only {} operations are allowed", .allowed.join(", "))]
    OperationNotAllowed { allowed: Vec<String> },

    #[error("Dangerous keyword detected: {keyword}")]
    DangerousKeyword { keyword: String },

    #[error("DDL statements are not allowed: {phrase}")]
    DdlBlocked { phrase: String },

    #[error("COPY ... FROM PROGRAM is not allowed")]
    CopyProgramBlocked,

    #[error("SELECT queries must include a LIMIT clause")]
    MissingLimit,

    #[error("LIMIT {limit} exceeds the maximum of {ceiling}")]
    LimitExceeded { limit: String, ceiling: u64 },

    #[error("Invalid identifier: {identifier}")]
    InvalidIdentifier { identifier: String },
}

impl ValidationReason {
    /// Stable code for API responses and audit output
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooLong { .. } => "TOO_LONG",
            Self::OperationNotAllowed { .. } => "OPERATION_NOT_ALLOWED",
            Self::DangerousKeyword { .. } => "DANGEROUS_KEYWORD",
            Self::DdlBlocked { .. } => "DDL_BLOCKED",
            Self::CopyProgramBlocked => "COPY_PROGRAM_BLOCKED",
            Self::MissingLimit => "MISSING_LIMIT",
            Self::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
        }
    }
}

/// Result of running the validator: `reason` is present iff the query is invalid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    valid: bool,
    reason: Option<ValidationReason>,
}

impl ValidationResult {
    /// A passing result
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// A failing result with its reason
    pub fn rejected(reason: ValidationReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn reason(&self) -> Option<&ValidationReason> {
        self.reason.as_ref()
    }

    /// Convert into a `Result`, yielding the rejection reason as the error
    pub fn into_result(self) -> Result<(), ValidationReason> {
        match self.reason {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

impl From<Result<(), ValidationReason>> for ValidationResult {
    fn from(result: Result<(), ValidationReason>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(reason) => Self::rejected(reason),
        }
    }
}
