//! Opt-in structural checks.
//!
//! Checks are on in debug builds and in release builds with either the
//! `check-invariants` or `strict-invariants` feature.

use crate::tri_error::TriangleError;

/// Whether [`DebugInvariants::check_invariants`] does anything in this build.
pub const fn invariant_checks_enabled() -> bool {
    cfg!(any(
        debug_assertions,
        feature = "strict-invariants",
        feature = "check-invariants"
    ))
}

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation found.
    fn validate_invariants(&self) -> Result<(), TriangleError>;

    /// Validate when checks are enabled; free otherwise. Never panics.
    fn check_invariants(&self) -> Result<(), TriangleError> {
        if invariant_checks_enabled() {
            self.validate_invariants().inspect_err(|e| {
                log::error!("[invariants] {}: {e}", std::any::type_name::<Self>());
            })
        } else {
            Ok(())
        }
    }
}
