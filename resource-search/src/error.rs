use thiserror::Error;

/// Failures surfaced by the engine.
///
/// Malformed queries never produce an error; every variant here is an
/// internal invariant failure that callers log and render as an empty list.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("index generation is unavailable: lock poisoned by a panicked writer")]
    IndexUnavailable,

    #[error("hit references resource #{position} outside generation {generation}")]
    DanglingHit { position: usize, generation: u64 },
}

pub type Result<T> = std::result::Result<T, SearchError>;
