use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

static SEEN_CLASSES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

/// Return `true` the first time `class` is reported in this process.
///
/// Soft failures (font discovery steps, native text fallbacks) are logged loudly once per class
/// and at `debug` afterwards.
pub(crate) fn first_occurrence(class: &'static str) -> bool {
    let seen = SEEN_CLASSES.get_or_init(|| Mutex::new(HashSet::new()));
    match seen.lock() {
        Ok(mut guard) => guard.insert(class),
        Err(_) => false,
    }
}

/// Log a recovered failure at `warn` the first time its class is seen, `debug` afterwards.
macro_rules! soft_failure {
    ($class:expr, $($arg:tt)+) => {
        if $crate::foundation::diag::first_occurrence($class) {
            tracing::warn!(class = $class, $($arg)+);
        } else {
            tracing::debug!(class = $class, $($arg)+);
        }
    };
}

pub(crate) use soft_failure;
