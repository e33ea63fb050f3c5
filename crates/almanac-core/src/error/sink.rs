//! Per-thread diagnostic sink.
//!
//! Results carry errors to callers; the sink only mirrors the most recent
//! reported kind for hosts that poll an error code.

use std::cell::Cell;

use super::{ErrorKind, is_fatal};

thread_local! {
    static LAST_ERROR: Cell<Option<ErrorKind>> = const { Cell::new(None) };
}

/// ## Summary
/// Records `kind` as the calling thread's last error and logs `detail`.
///
/// ## Panics
/// Panics with the diagnostic when `kind` is fatal under the current
/// policy.
pub fn report(kind: ErrorKind, detail: &str) {
    LAST_ERROR.with(|slot| slot.set(Some(kind)));

    if is_fatal(kind) {
        tracing::error!(kind = %kind, detail, "Fatal error reported");
        panic!("{kind}: {detail}");
    }

    tracing::debug!(kind = %kind, detail, "Error reported");
}

#[must_use]
pub fn last_error() -> Option<ErrorKind> {
    LAST_ERROR.with(Cell::get)
}

pub fn clear_error() {
    LAST_ERROR.with(|slot| slot.set(None));
}

/// ## Summary
/// Puts back a slot value saved with [`last_error`], without logging or
/// consulting the policy.
pub fn restore_error(saved: Option<ErrorKind>) {
    LAST_ERROR.with(|slot| slot.set(saved));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorState, set_error_state};

    #[test_log::test]
    fn non_fatal_report_sets_slot() {
        clear_error();
        report(ErrorKind::BadArg, "missing start");
        assert_eq!(last_error(), Some(ErrorKind::BadArg));
        clear_error();
    }

    #[test_log::test]
    #[should_panic(expected = "MALFORMEDDATA: bad duration")]
    fn fatal_report_panics() {
        set_error_state(ErrorKind::MalformedData, ErrorState::Fatal);
        report(ErrorKind::MalformedData, "bad duration");
    }

    #[test_log::test]
    fn restore_puts_back_the_saved_kind() {
        clear_error();
        report(ErrorKind::Usage, "first");
        let saved = last_error();
        report(ErrorKind::BadArg, "second");
        restore_error(saved);
        assert_eq!(last_error(), Some(ErrorKind::Usage));
        restore_error(None);
        assert_eq!(last_error(), None);
    }

    #[test]
    fn slots_are_per_thread() {
        clear_error();
        report(ErrorKind::Unimplemented, "rscale");
        let other = std::thread::spawn(last_error).join().expect("thread panicked");
        assert_eq!(other, None);
        assert_eq!(last_error(), Some(ErrorKind::Unimplemented));
        clear_error();
    }
}
