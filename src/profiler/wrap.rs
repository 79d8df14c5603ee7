//! The profiling decorator

use crate::crawler::{Crawl, PageContents, PageFetcher};
use crate::output::CrawlResult;
use crate::profiler::ProfilingState;
use crate::FetchError;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::Instant;

/// A component whose operations can be profiled
///
/// `PROFILED_OPERATIONS` names the designated operations. Wrapping a type that
/// designates none is refused by `Profiler::wrap`.
pub trait ProfiledTarget {
    const PROFILED_OPERATIONS: &'static [&'static str];

    /// Name used as the type half of report keys
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A target wrapped by a `Profiler`
///
/// Calls go through [`Profiled::call`] or [`Profiled::call_async`] naming the
/// operation being invoked. Designated operations are timed from just before
/// the delegate runs until it returns, panics, or (for futures) is dropped, so
/// failed calls are accounted like successful ones. The delegate's result is
/// returned untouched.
#[derive(Debug)]
pub struct Profiled<T> {
    inner: T,
    state: Arc<ProfilingState>,
}

impl<T: ProfiledTarget> Profiled<T> {
    pub(crate) fn new(inner: T, state: Arc<ProfilingState>) -> Self {
        Self { inner, state }
    }

    /// The wrapped target, for calls that should never be recorded
    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Invokes a synchronous operation on the target
    pub fn call<R>(&self, operation: &'static str, f: impl FnOnce(&T) -> R) -> R {
        let _timer = self.start(operation);
        f(&self.inner)
    }

    /// Invokes an asynchronous operation on the target
    pub async fn call_async<'a, R, Fut>(
        &'a self,
        operation: &'static str,
        f: impl FnOnce(&'a T) -> Fut,
    ) -> R
    where
        Fut: Future<Output = R> + 'a,
    {
        let _timer = self.start(operation);
        f(&self.inner).await
    }

    fn start(&self, operation: &'static str) -> Option<CallTimer<'_>> {
        if !T::PROFILED_OPERATIONS.contains(&operation) {
            return None;
        }

        Some(CallTimer {
            state: &self.state,
            type_name: T::type_name(),
            operation,
            thread: std::thread::current().id(),
            started: Instant::now(),
        })
    }
}

/// Records one call into the profiling state when dropped
struct CallTimer<'a> {
    state: &'a ProfilingState,
    type_name: &'static str,
    operation: &'static str,
    thread: ThreadId,
    started: Instant,
}

impl Drop for CallTimer<'_> {
    fn drop(&mut self) {
        self.state.add(
            format!("{}#{}", self.type_name, self.operation),
            self.started.elapsed(),
            self.thread,
        );
    }
}

impl<F> PageFetcher for Profiled<F>
where
    F: PageFetcher + ProfiledTarget,
{
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<PageContents, FetchError>> {
        self.call_async("fetch", move |inner| inner.fetch(url)).boxed()
    }

    fn fetch_robots<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        self.call_async("fetch_robots", move |inner| inner.fetch_robots(domain))
            .boxed()
    }
}

impl<C> Crawl for Profiled<C>
where
    C: Crawl + ProfiledTarget,
{
    fn crawl<'a>(&'a self, seeds: &'a [String]) -> BoxFuture<'a, CrawlResult> {
        self.call_async("crawl", move |inner| inner.crawl(seeds)).boxed()
    }
}
