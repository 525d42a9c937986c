use thiserror::Error;

use crate::api::types::TweenKind;

/// Why a custom ease curve could not be normalized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("ease curve needs at least two keys, got {count}")]
    TooFewKeys { count: usize },

    #[error("ease curve cannot start and end on the same value")]
    FlatRange,

    #[error("ease curve cannot start and end at the same time")]
    FlatDomain,
}

/// Recoverable tween configuration failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TweenError {
    #[error("update callback expects a {found:?} value, but the tween yields {expected:?}")]
    KindMismatch { expected: TweenKind, found: TweenKind },

    #[error("tween target was dropped before the tween was created")]
    DeadTarget,
}
