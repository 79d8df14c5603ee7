//! Accumulated call timings

use crate::ProfilerError;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::ThreadId;
use std::time::Duration;

/// Totals for one (type, operation) key
#[derive(Debug)]
struct CallRecord {
    /// Position of the key in first-recorded order
    order: u64,
    total: Duration,
    /// Calls per thread, in the order threads first called
    calls_by_thread: Vec<(ThreadId, u64)>,
}

/// Snapshot of one (type, operation) key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSummary {
    pub key: String,
    pub total: Duration,
    pub calls_by_thread: Vec<(ThreadId, u64)>,
}

impl CallSummary {
    pub fn total_calls(&self) -> u64 {
        self.calls_by_thread.iter().map(|(_, calls)| calls).sum()
    }
}

/// Thread-safe store of call durations and per-thread call counts
///
/// Updates lock only the map shard of the key being recorded.
#[derive(Debug, Default)]
pub struct ProfilingState {
    records: DashMap<String, CallRecord>,
    next_order: AtomicU64,
}

impl ProfilingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one call with a signed elapsed time
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The call was added to its key's totals
    /// * `Err(ProfilerError::NegativeElapsed)` - `elapsed` was negative; nothing is recorded
    pub fn record(
        &self,
        type_name: &str,
        operation: &str,
        elapsed: chrono::Duration,
        thread: ThreadId,
    ) -> Result<(), ProfilerError> {
        let key = format_key(type_name, operation);
        let elapsed = elapsed
            .to_std()
            .map_err(|_| ProfilerError::NegativeElapsed { key: key.clone() })?;

        self.add(key, elapsed, thread);
        Ok(())
    }

    /// Adds an already non-negative elapsed time to a key
    pub(crate) fn add(&self, key: String, elapsed: Duration, thread: ThreadId) {
        let mut record = self.records.entry(key).or_insert_with(|| CallRecord {
            order: self.next_order.fetch_add(1, Ordering::Relaxed),
            total: Duration::ZERO,
            calls_by_thread: Vec::new(),
        });

        record.total += elapsed;
        let seen = record
            .calls_by_thread
            .iter()
            .position(|(id, _)| *id == thread);
        match seen {
            Some(index) => record.calls_by_thread[index].1 += 1,
            None => record.calls_by_thread.push((thread, 1)),
        }
    }

    /// Snapshot of a single key
    pub fn summary(&self, type_name: &str, operation: &str) -> Option<CallSummary> {
        let key = format_key(type_name, operation);
        self.records.get(&key).map(|record| CallSummary {
            key: key.clone(),
            total: record.total,
            calls_by_thread: record.calls_by_thread.clone(),
        })
    }

    /// Snapshots of every key, in first-recorded order
    pub fn summaries(&self) -> Vec<CallSummary> {
        let mut ordered: Vec<(u64, CallSummary)> = self
            .records
            .iter()
            .map(|entry| {
                (
                    entry.order,
                    CallSummary {
                        key: entry.key().clone(),
                        total: entry.total,
                        calls_by_thread: entry.calls_by_thread.clone(),
                    },
                )
            })
            .collect();
        ordered.sort_by_key(|(order, _)| *order);
        ordered.into_iter().map(|(_, summary)| summary).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Renders every key as text
    ///
    /// Each key gets its cumulative duration and call count, then one line per
    /// calling thread whose average is the key's cumulative duration divided by
    /// that thread's call count.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for summary in self.summaries() {
            let _ = writeln!(
                out,
                "{} took {} (called {} times)",
                summary.key,
                format_duration(summary.total),
                summary.total_calls()
            );

            for (thread, calls) in &summary.calls_by_thread {
                let divisor = u32::try_from((*calls).max(1)).unwrap_or(u32::MAX);
                let _ = writeln!(
                    out,
                    "[Thread ID: {} (called {} times)] - Average duration: {}",
                    thread_label(*thread),
                    calls,
                    format_duration(summary.total / divisor)
                );
            }

            out.push('\n');
        }

        out
    }

    /// Per-thread call counts keyed by thread, for a single key
    pub fn calls_by_thread(&self, type_name: &str, operation: &str) -> HashMap<ThreadId, u64> {
        self.summary(type_name, operation)
            .map(|summary| summary.calls_by_thread.into_iter().collect())
            .unwrap_or_default()
    }
}

/// The numeric part of a thread id, e.g. `7` for `ThreadId(7)`
fn thread_label(thread: ThreadId) -> String {
    let debug = format!("{:?}", thread);
    debug
        .strip_prefix("ThreadId(")
        .and_then(|rest| rest.strip_suffix(')'))
        .map(str::to_string)
        .unwrap_or(debug)
}

fn format_key(type_name: &str, operation: &str) -> String {
    format!("{}#{}", type_name, operation)
}

/// Formats a duration as whole minutes, seconds and milliseconds
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{}m {}s {}ms",
        secs / 60,
        secs % 60,
        duration.subsec_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn this_thread() -> ThreadId {
        std::thread::current().id()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0m 0s 0ms");
        assert_eq!(format_duration(Duration::from_millis(61_250)), "1m 1s 250ms");
        assert_eq!(format_duration(Duration::from_secs(3600)), "60m 0s 0ms");
    }

    #[test]
    fn test_thread_label_is_numeric() {
        let label = thread_label(this_thread());
        assert!(!label.is_empty());
        assert!(label.chars().all(|c| c.is_ascii_digit()), "{}", label);

        let state = ProfilingState::new();
        state.add("T#op".to_string(), Duration::from_millis(1), this_thread());
        assert!(!state.render().contains("ThreadId("));
    }

    #[test]
    fn test_record_accumulates() {
        let state = ProfilingState::new();
        state
            .record("T", "op", chrono::Duration::milliseconds(300), this_thread())
            .unwrap();
        state
            .record("T", "op", chrono::Duration::milliseconds(200), this_thread())
            .unwrap();

        let summary = state.summary("T", "op").unwrap();
        assert_eq!(summary.key, "T#op");
        assert_eq!(summary.total, Duration::from_millis(500));
        assert_eq!(summary.total_calls(), 2);
    }

    #[test]
    fn test_zero_elapsed_is_allowed() {
        let state = ProfilingState::new();
        assert!(state
            .record("T", "op", chrono::Duration::zero(), this_thread())
            .is_ok());
        assert_eq!(state.summary("T", "op").unwrap().total_calls(), 1);
    }

    #[test]
    fn test_negative_elapsed_rejected() {
        let state = ProfilingState::new();
        let result = state.record("T", "op", chrono::Duration::seconds(-2), this_thread());
        assert_eq!(
            result,
            Err(ProfilerError::NegativeElapsed {
                key: "T#op".to_string()
            })
        );
        assert!(state.summary("T", "op").is_none());
    }

    #[test]
    fn test_render_uses_global_total_over_thread_calls() {
        let state = ProfilingState::new();
        let main = this_thread();
        let other = std::thread::spawn(|| std::thread::current().id())
            .join()
            .unwrap();

        state.add("T#op".to_string(), Duration::from_secs(1), main);
        state.add("T#op".to_string(), Duration::from_secs(1), main);
        state.add("T#op".to_string(), Duration::from_secs(4), other);

        let report = state.render();
        assert!(report.contains("T#op took 0m 6s 0ms (called 3 times)"));
        // 6s total over 2 calls on the main thread
        assert!(report.contains(&format!(
            "[Thread ID: {} (called 2 times)] - Average duration: 0m 3s 0ms",
            thread_label(main)
        )));
        // 6s total over 1 call on the other thread
        assert!(report.contains(&format!(
            "[Thread ID: {} (called 1 times)] - Average duration: 0m 6s 0ms",
            thread_label(other)
        )));
    }

    #[test]
    fn test_render_in_first_recorded_order() {
        let state = ProfilingState::new();
        for name in ["zeta", "alpha", "mid"] {
            state.add(format_key("T", name), Duration::from_millis(1), this_thread());
        }

        let report = state.render();
        let zeta = report.find("T#zeta").unwrap();
        let alpha = report.find("T#alpha").unwrap();
        let mid = report.find("T#mid").unwrap();
        assert!(zeta < alpha && alpha < mid);

        let keys: Vec<String> = state.summaries().into_iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["T#zeta", "T#alpha", "T#mid"]);
    }

    #[test]
    fn test_concurrent_records_lose_nothing() {
        let state = Arc::new(ProfilingState::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        state
                            .record(
                                "T",
                                "op",
                                chrono::Duration::milliseconds(1),
                                std::thread::current().id(),
                            )
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let summary = state.summary("T", "op").unwrap();
        assert_eq!(summary.total, Duration::from_millis(800));
        assert_eq!(summary.total_calls(), 800);
        assert_eq!(summary.calls_by_thread.len(), 8);
        assert!(state
            .calls_by_thread("T", "op")
            .values()
            .all(|calls| *calls == 100));
    }
}
