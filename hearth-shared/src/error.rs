/// Household domain error taxonomy
///
/// Every mutation in the household core returns one of these variants rather
/// than an opaque message string, so callers can tell a business-rule
/// rejection apart from an infrastructure failure.
///
/// # Example
///
/// ```
/// use hearth_shared::error::HouseholdError;
///
/// let err = HouseholdError::NotYourTurn;
/// assert_eq!(err.to_string(), "It is not your turn for this task");
/// ```

use thiserror::Error;

/// Result type alias for household operations
pub type HouseholdResult<T> = Result<T, HouseholdError>;

/// Error type covering every business-rule rejection in the household core
#[derive(Debug, Error)]
pub enum HouseholdError {
    /// A required field was missing or empty
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced task/purchase/user does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Authenticated user acted on another user's owned resource
    #[error("{0}")]
    Forbidden(String),

    /// Completion attempted by a user who is not the current turn-holder
    #[error("It is not your turn for this task")]
    NotYourTurn,

    /// Completion re-attempted within the debounce window
    #[error("Task was already completed moments ago")]
    DuplicateCompletion,

    /// A task cannot be created while the roster is empty
    #[error("No users found to assign the task to")]
    NoUsers,

    /// The last remaining user cannot leave the household
    #[error("Cannot delete the last user in the household")]
    LastUser,

    /// Unexpected storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl HouseholdError {
    /// Returns true for business-rule rejections (as opposed to
    /// infrastructure failures) that are safe to show to the caller.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, HouseholdError::Database(_))
    }
}
