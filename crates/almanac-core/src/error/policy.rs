//! Fatal/non-fatal error policy.
//!
//! The process-wide switch decides what happens to kinds left in the
//! `Default` state. Per-kind overrides are thread local so that one thread
//! relaxing a kind cannot change another thread's behavior.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

use super::ErrorKind;

static ERRORS_ARE_FATAL: AtomicBool = AtomicBool::new(false);

thread_local! {
    static STATES: Cell<[ErrorState; ErrorKind::ALL.len()]> =
        const { Cell::new([ErrorState::Default; ErrorKind::ALL.len()]) };
}

/// How a reported error of a given kind is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorState {
    /// Reporting panics with a diagnostic.
    Fatal,
    /// Reporting only records the kind.
    NonFatal,
    /// Follows the process-wide switch.
    #[default]
    Default,
}

/// ## Summary
/// Sets the process-wide "errors are fatal" switch.
pub fn set_errors_are_fatal(fatal: bool) {
    ERRORS_ARE_FATAL.store(fatal, Ordering::Relaxed);
}

#[must_use]
pub fn errors_are_fatal() -> bool {
    ERRORS_ARE_FATAL.load(Ordering::Relaxed)
}

/// ## Summary
/// Overrides the state of `kind` on the calling thread, returning the
/// previous state.
pub fn set_error_state(kind: ErrorKind, state: ErrorState) -> ErrorState {
    STATES.with(|cell| {
        let mut states = cell.get();
        let previous = states[kind.index()];
        states[kind.index()] = state;
        cell.set(states);
        previous
    })
}

#[must_use]
pub fn error_state(kind: ErrorKind) -> ErrorState {
    STATES.with(|cell| cell.get()[kind.index()])
}

/// ## Summary
/// Returns whether reporting `kind` on this thread would be fatal.
#[must_use]
pub fn is_fatal(kind: ErrorKind) -> bool {
    match error_state(kind) {
        ErrorState::Fatal => true,
        ErrorState::NonFatal => false,
        ErrorState::Default => errors_are_fatal(),
    }
}

/// ## Summary
/// Makes `kind` non-fatal on this thread until the returned guard drops.
///
/// Used around speculative parses whose failure is an expected outcome.
pub fn suppress(kind: ErrorKind) -> SuppressGuard {
    let previous = set_error_state(kind, ErrorState::NonFatal);
    SuppressGuard { kind, previous }
}

/// Restores the suppressed kind's previous state on drop.
#[derive(Debug)]
#[must_use = "the error state is restored as soon as the guard is dropped"]
pub struct SuppressGuard {
    kind: ErrorKind,
    previous: ErrorState,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        set_error_state(self.kind, self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_kind_override_wins() {
        let previous = set_error_state(ErrorKind::Internal, ErrorState::Fatal);
        assert!(is_fatal(ErrorKind::Internal));
        set_error_state(ErrorKind::Internal, ErrorState::NonFatal);
        assert!(!is_fatal(ErrorKind::Internal));
        set_error_state(ErrorKind::Internal, previous);
    }

    #[test]
    fn suppress_restores_on_drop() {
        set_error_state(ErrorKind::MalformedData, ErrorState::Fatal);
        {
            let _guard = suppress(ErrorKind::MalformedData);
            assert_eq!(error_state(ErrorKind::MalformedData), ErrorState::NonFatal);
            assert!(!is_fatal(ErrorKind::MalformedData));
        }
        assert_eq!(error_state(ErrorKind::MalformedData), ErrorState::Fatal);
        set_error_state(ErrorKind::MalformedData, ErrorState::Default);
    }

    #[test]
    fn overrides_are_thread_local() {
        set_error_state(ErrorKind::Usage, ErrorState::Fatal);
        let other = std::thread::spawn(|| error_state(ErrorKind::Usage))
            .join()
            .expect("thread panicked");
        assert_eq!(other, ErrorState::Default);
        set_error_state(ErrorKind::Usage, ErrorState::Default);
    }
}
