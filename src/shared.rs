use crate::config::MatcherConfig;
use crate::error::BuildError;
use crate::matcher::Matcher;
use crate::table::RouteTable;

use arc_swap::{ArcSwap, Guard};
use std::fmt;
use std::sync::Arc;

/// A matcher that can be replaced while requests are being matched.
///
/// Readers load the current matcher and keep using it for as long as they
/// hold the guard, a concurrent [`store`](SharedMatcher::store) never
/// changes a matcher that is already loaded.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkroute::{Matcher, RouteTable, SharedMatcher};
///
/// let mut table = RouteTable::new();
/// table.get("/v1", 1, ())?;
/// let shared = SharedMatcher::new(Matcher::new(table)?);
///
/// let mut table = RouteTable::new();
/// table.get("/v2", 2, ())?;
/// shared.rebuild(table)?;
///
/// assert!(shared.load().at("GET", "/v2")?.is_ok());
/// assert!(!shared.load().at("GET", "/v1")?.is_ok());
/// # Ok(())
/// # }
/// ```
pub struct SharedMatcher<P, E = ()> {
    current: ArcSwap<Matcher<P, E>>,
}

impl<P, E> SharedMatcher<P, E> {
    /// Wraps `matcher`.
    pub fn new(matcher: Matcher<P, E>) -> Self {
        SharedMatcher {
            current: ArcSwap::from_pointee(matcher),
        }
    }

    /// Returns the current matcher.
    pub fn load(&self) -> Guard<Arc<Matcher<P, E>>> {
        self.current.load()
    }

    /// Returns an owned handle to the current matcher.
    pub fn load_full(&self) -> Arc<Matcher<P, E>> {
        self.current.load_full()
    }

    /// Replaces the current matcher.
    pub fn store(&self, matcher: Matcher<P, E>) {
        self.current.store(Arc::new(matcher));
        tracing::debug!("replaced shared matcher");
    }

    /// Builds a matcher for `table` with the current configuration and
    /// replaces the current matcher with it.
    ///
    /// The current matcher stays in place if building fails.
    pub fn rebuild(&self, table: impl Into<Arc<RouteTable<P, E>>>) -> Result<(), BuildError> {
        let config = *self.current.load().config();
        self.rebuild_with(table, config)
    }

    /// Builds a matcher for `table` with `config` and replaces the current
    /// matcher with it.
    pub fn rebuild_with(
        &self,
        table: impl Into<Arc<RouteTable<P, E>>>,
        config: MatcherConfig,
    ) -> Result<(), BuildError> {
        let matcher = Matcher::with_config(table, config)?;
        self.store(matcher);
        Ok(())
    }
}

impl<P, E> From<Matcher<P, E>> for SharedMatcher<P, E> {
    fn from(matcher: Matcher<P, E>) -> Self {
        SharedMatcher::new(matcher)
    }
}

impl<P, E: fmt::Debug> fmt::Debug for SharedMatcher<P, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMatcher")
            .field("current", &**self.current.load())
            .finish()
    }
}
