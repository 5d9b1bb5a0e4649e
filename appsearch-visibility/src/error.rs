//! Error types for visibility evaluation.

use thiserror::Error;

/// Errors that fail a visibility check outright.
///
/// Granting unintended access is worse than failing the call, so evaluation
/// fails closed instead of skipping criteria it cannot interpret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisibilityError {
    /// A stored policy names a permission id this build cannot evaluate.
    #[error("unsupported permission id in visibility policy: {0}")]
    UnsupportedPermission(i64),
}
