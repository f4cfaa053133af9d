//! Layout and cascade warnings with colored terminal output.
//!
//! The engine never fails on bad input; it degrades to defaults instead.
//! Each degradation is reported here, once per unique message, so a page
//! with a thousand `1.5em` margins produces a single line of output.
//!
//! The seen-set is thread-local. Render passes running on separate threads
//! therefore never contend on (or share) diagnostic state.

use std::cell::RefCell;
use std::collections::HashSet;

use owo_colors::OwoColorize;

thread_local! {
    /// Warnings already printed on this thread.
    static WARNED: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Warn about degraded input (prints once per unique message per thread).
///
/// # Example
/// ```
/// use boxwood_common::warning::warn_once;
///
/// warn_once("CSS", "unsupported unit 'em' in margin-left: 1.5em");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED.with(|warned| warned.borrow_mut().insert(key));

    if should_print {
        eprintln!("{}", format!("[boxwood {component}] ⚠ {message}").yellow());
    }
}

/// Returns true if this exact warning has already been emitted on this thread.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED.with(|warned| warned.borrow().contains(&key))
}

/// Clear all recorded warnings (call between unrelated documents).
pub fn clear_warnings() {
    WARNED.with(|warned| warned.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        clear_warnings();
        assert!(!was_warned("CSS", "bad value"));
        warn_once("CSS", "bad value");
        assert!(was_warned("CSS", "bad value"));
        // Same text under another component is a distinct warning.
        assert!(!was_warned("Layout", "bad value"));
    }

    #[test]
    fn test_clear_warnings_forgets_everything() {
        warn_once("Layout", "colspan clamped");
        clear_warnings();
        assert!(!was_warned("Layout", "colspan clamped"));
    }

    #[test]
    fn test_warnings_are_per_thread() {
        clear_warnings();
        warn_once("CSS", "thread-local");
        let seen_elsewhere = std::thread::spawn(|| was_warned("CSS", "thread-local"))
            .join()
            .unwrap_or(true);
        assert!(!seen_elsewhere);
    }
}
