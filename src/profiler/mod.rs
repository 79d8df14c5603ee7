//! Call profiling
//!
//! A `Profiler` wraps components that implement `ProfiledTarget` into a
//! `Profiled<T>` decorator. Calls made through the decorator to one of the
//! target's designated operations are timed and counted per calling thread;
//! every other call passes straight through. `Profiler::report` renders the
//! accumulated numbers as text.
//!
//! # Example
//!
//! ```
//! use web_tally::profiler::{Profiler, ProfiledTarget};
//!
//! struct Squarer;
//!
//! impl ProfiledTarget for Squarer {
//!     const PROFILED_OPERATIONS: &'static [&'static str] = &["square"];
//! }
//!
//! let profiler = Profiler::new();
//! let squarer = profiler.wrap(Squarer).unwrap();
//! assert_eq!(squarer.call("square", |_| 7 * 7), 49);
//! assert!(profiler.report().contains("Squarer#square"));
//! ```

mod state;
mod wrap;

pub use state::{CallSummary, ProfilingState};
pub use wrap::{Profiled, ProfiledTarget};

use crate::ProfilerError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::thread::ThreadId;

/// Entry point for wrapping components and reading back their timings
#[derive(Debug, Clone)]
pub struct Profiler {
    state: Arc<ProfilingState>,
    started_at: DateTime<Utc>,
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ProfilingState::new()),
            started_at: Utc::now(),
        }
    }

    /// Wraps a target so its designated operations are recorded
    ///
    /// # Returns
    ///
    /// * `Ok(Profiled<T>)` - The decorator, sharing this profiler's state
    /// * `Err(ProfilerError::NoProfiledOperations)` - `T` designates no operations
    pub fn wrap<T: ProfiledTarget>(&self, target: T) -> Result<Profiled<T>, ProfilerError> {
        if T::PROFILED_OPERATIONS.is_empty() {
            return Err(ProfilerError::NoProfiledOperations {
                type_name: T::type_name(),
            });
        }

        Ok(Profiled::new(target, Arc::clone(&self.state)))
    }

    /// Records one call directly, bypassing any decorator
    ///
    /// `elapsed` is signed so that a reversed measurement can be rejected
    /// instead of silently wrapping.
    pub fn record(
        &self,
        type_name: &str,
        operation: &str,
        elapsed: chrono::Duration,
        thread: ThreadId,
    ) -> Result<(), ProfilerError> {
        self.state.record(type_name, operation, elapsed, thread)
    }

    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    /// Renders every recorded operation, preceded by the profiler's start time
    pub fn report(&self) -> String {
        format!(
            "Run at {}\n{}\n",
            self.started_at.format("%a, %-d %b %Y %H:%M:%S GMT"),
            self.state.render()
        )
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Designated;

    impl ProfiledTarget for Designated {
        const PROFILED_OPERATIONS: &'static [&'static str] = &["work"];
    }

    struct Undesignated;

    impl ProfiledTarget for Undesignated {
        const PROFILED_OPERATIONS: &'static [&'static str] = &[];
    }

    #[test]
    fn test_wrap_without_profiled_operations_fails() {
        let profiler = Profiler::new();
        let result = profiler.wrap(Undesignated);

        assert!(matches!(
            result,
            Err(ProfilerError::NoProfiledOperations { type_name }) if type_name.ends_with("Undesignated")
        ));
        assert!(profiler.state().is_empty());
    }

    #[test]
    fn test_wrap_with_profiled_operations_succeeds() {
        let profiler = Profiler::new();
        assert!(profiler.wrap(Designated).is_ok());
    }

    #[test]
    fn test_wrapped_calls_share_profiler_state() {
        let profiler = Profiler::new();
        let first = profiler.wrap(Designated).unwrap();
        let second = profiler.wrap(Designated).unwrap();

        first.call("work", |_| ());
        second.call("work", |_| ());

        let summary = profiler
            .state()
            .summary(Designated::type_name(), "work")
            .unwrap();
        assert_eq!(summary.total_calls(), 2);
    }

    #[test]
    fn test_record_three_one_second_calls() {
        let profiler = Profiler::new();
        let thread = std::thread::current().id();

        for _ in 0..3 {
            profiler
                .record("Fetcher", "fetch", chrono::Duration::seconds(1), thread)
                .unwrap();
        }

        let summary = profiler.state().summary("Fetcher", "fetch").unwrap();
        assert_eq!(summary.total, Duration::from_secs(3));
        assert_eq!(summary.total_calls(), 3);
        assert!(profiler
            .report()
            .contains("Fetcher#fetch took 0m 3s 0ms (called 3 times)"));
    }

    #[test]
    fn test_record_negative_elapsed_fails() {
        let profiler = Profiler::new();
        let result = profiler.record(
            "Fetcher",
            "fetch",
            chrono::Duration::milliseconds(-1),
            std::thread::current().id(),
        );

        assert!(matches!(result, Err(ProfilerError::NegativeElapsed { .. })));
        assert!(profiler.state().is_empty());
    }

    #[test]
    fn test_report_header() {
        let profiler = Profiler::new();
        let report = profiler.report();
        assert!(report.starts_with("Run at "));
        assert!(report.contains("GMT"));
    }
}
