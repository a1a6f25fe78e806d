//! taskbridge-workloads - Example native workloads
//!
//! Each workload is an ordinary Tokio task wrapped in a
//! [`PendingTask`](taskbridge_runtime::PendingTask) that a host starts on a
//! [`Bridge`](taskbridge_runtime::Bridge):
//! - [`simple`]: sleeping, returning values, raising each failure kind
//! - [`scrape`]: fetch a page, extract its URLs, write them to a file
//! - [`queue`]: a bounded string queue and a background consumer

pub mod queue;
pub mod scrape;
pub mod simple;

pub use queue::{PushStatus, StrQueue, do_work};
pub use scrape::{ScrapeConfig, TASK_EXCEPTION, complex_work};
pub use simple::{MY_EXCEPTION, return_int, return_string, sleep, throw_exception};

use taskbridge_runtime::ErrorTranslator;

/// Register the custom failure kinds raised by these workloads
///
/// Without this their failures reach the host as the generic `Exception`.
pub fn register_errors(translator: &ErrorTranslator) {
    translator.register(MY_EXCEPTION, MY_EXCEPTION);
    translator.register(TASK_EXCEPTION, TASK_EXCEPTION);
}

#[cfg(test)]
mod lib_tests;
