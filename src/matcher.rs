use crate::chunk::Chunk;
use crate::config::MatcherConfig;
use crate::error::{BuildError, LookupError};
use crate::method::Method;
use crate::params::Params;
use crate::table::{Route, RouteTable};

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Resolves requests against a [`RouteTable`].
///
/// Static routes are compared by string equality first, in registration
/// order. Variable routes are grouped per method into chunks, and each chunk
/// is compiled into a single regular expression when the matcher is built.
///
/// A matcher never changes after it is built and can be shared between
/// threads. See [`SharedMatcher`](crate::SharedMatcher) for replacing the
/// routes of a running application.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkroute::{Matcher, MatchResult, Method, RouteTable};
///
/// let mut table = RouteTable::new();
/// table.get("/home", "Welcome!", ())?;
/// table.put("/users/{id:\\d+}", "A User", ())?;
///
/// let matcher = Matcher::new(table)?;
///
/// match matcher.at("PUT", "/users/978")? {
///     MatchResult::Ok(matched) => {
///         assert_eq!(matched.params.get("id"), Some("978"));
///         assert_eq!(*matched.payload, "A User");
///     }
///     other => panic!("unexpected result: {:?}", other),
/// }
///
/// assert_eq!(
///     matcher.at("GET", "/users/978")?,
///     MatchResult::MethodNotAllowed { allowed: vec![Method::PUT] }
/// );
/// assert_eq!(matcher.at("GET", "/about")?, MatchResult::NotFound);
/// # Ok(())
/// # }
/// ```
pub struct Matcher<P, E = ()> {
    table: Arc<RouteTable<P, E>>,
    // compiled chunks, in the order of `table.contents().variables()`
    chunks: Vec<Vec<Chunk>>,
    config: MatcherConfig,
}

/// A successful match, borrowing from the matcher.
#[derive(Debug, PartialEq, Eq)]
pub struct Match<'m, P, E> {
    /// The payload of the matched route.
    pub payload: &'m P,
    /// The extra value of the matched route.
    pub extra: &'m E,
    /// The parameters extracted from the path.
    pub params: Params<'m>,
    /// The pattern of the matched route.
    pub pattern: &'m str,
}

/// The outcome of matching a request.
#[derive(Debug, PartialEq, Eq)]
pub enum MatchResult<'m, P, E> {
    /// A route matched both the method and the path.
    Ok(Match<'m, P, E>),
    /// Routes matched the path, but none under the requested method.
    ///
    /// Methods are listed in the order they were found and may repeat.
    MethodNotAllowed {
        /// The methods whose routes matched the path.
        allowed: Vec<Method>,
    },
    /// No route matched the path.
    NotFound,
}

impl<'m, P, E> MatchResult<'m, P, E> {
    /// Returns the match, if any.
    pub fn ok(self) -> Option<Match<'m, P, E>> {
        match self {
            MatchResult::Ok(matched) => Some(matched),
            _ => None,
        }
    }

    /// Returns `true` if a route matched.
    pub fn is_ok(&self) -> bool {
        matches!(self, MatchResult::Ok(_))
    }
}

impl<P, E> Matcher<P, E> {
    /// Builds a matcher with the default configuration.
    pub fn new(table: impl Into<Arc<RouteTable<P, E>>>) -> Result<Self, BuildError> {
        Matcher::with_config(table, MatcherConfig::default())
    }

    /// Builds a matcher, compiling every chunk of variable routes.
    pub fn with_config(
        table: impl Into<Arc<RouteTable<P, E>>>,
        config: MatcherConfig,
    ) -> Result<Self, BuildError> {
        let table = table.into();
        let size = config.effective_chunk_size();

        let mut chunks = Vec::with_capacity(table.contents().variables().len());
        for (method, routes) in table.contents().variables().iter() {
            let compiled = routes
                .chunks(size)
                .enumerate()
                .map(|(i, chunk)| Chunk::build(method.as_str(), chunk, i * size))
                .collect::<Result<Vec<_>, _>>()?;

            tracing::debug!(
                method = %method,
                routes = routes.len(),
                chunks = compiled.len(),
                "compiled variable routes"
            );

            chunks.push(compiled);
        }

        Ok(Matcher {
            table,
            chunks,
            config,
        })
    }

    /// Resolves a request method and path.
    ///
    /// The path is percent-decoded first. An unmatched path is not an error,
    /// it resolves to [`MatchResult::MethodNotAllowed`] or
    /// [`MatchResult::NotFound`]. Only a route whose payload is missing from
    /// the table fails.
    pub fn at(&self, method: &str, path: &str) -> Result<MatchResult<'_, P, E>, LookupError> {
        let path = decode(path);
        let contents = self.table.contents();
        let mut allowed = Vec::new();

        for (route_method, routes) in contents.statics().iter() {
            for route in routes.iter().filter(|route| route.pattern() == path) {
                if route_method.matches(method) {
                    tracing::trace!(method, path = %path, pattern = route.pattern(), "static match");
                    return self.found(route, Params::new()).map(MatchResult::Ok);
                }

                allowed.push(route_method.clone());
            }
        }

        for ((route_method, routes), chunks) in contents.variables().iter().zip(&self.chunks) {
            for chunk in chunks {
                let Some(hit) = chunk.at(&path) else {
                    continue;
                };

                if route_method.matches(method) {
                    let route = &routes[hit.route];

                    let mut params = Params::new();
                    for (name, value) in route.params().iter().zip(hit.values()) {
                        params.push(name, value);
                    }

                    tracing::trace!(method, path = %path, pattern = route.pattern(), "variable match");
                    return self.found(route, params).map(MatchResult::Ok);
                }

                allowed.push(route_method.clone());
            }
        }

        if allowed.is_empty() {
            tracing::trace!(method, path = %path, "no route found");
            Ok(MatchResult::NotFound)
        } else {
            tracing::trace!(method, path = %path, allowed = ?allowed, "method not allowed");
            Ok(MatchResult::MethodNotAllowed { allowed })
        }
    }

    /// The route table this matcher resolves against.
    pub fn table(&self) -> &RouteTable<P, E> {
        &self.table
    }

    /// The configuration this matcher was built with.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    fn found<'m>(
        &'m self,
        route: &'m Route<E>,
        params: Params<'m>,
    ) -> Result<Match<'m, P, E>, LookupError> {
        let payload = self.table.payload(route.payload_id()).map_err(|err| {
            tracing::warn!(pattern = route.pattern(), id = err.id, "route has no payload");
            err
        })?;

        Ok(Match {
            payload,
            extra: route.extra(),
            params,
            pattern: route.pattern(),
        })
    }
}

impl<P, E: fmt::Debug> fmt::Debug for Matcher<P, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("table", &self.table)
            .field("chunks", &self.chunks.iter().map(Vec::len).sum::<usize>())
            .field("config", &self.config)
            .finish()
    }
}

// Decodes a request path the way form-encoded urls are decoded: `+` is a
// space, `%XX` is a byte, and malformed escapes are kept as they are.
fn decode(path: &str) -> Cow<'_, str> {
    if !path.bytes().any(|b| b == b'%' || b == b'+') {
        return Cow::Borrowed(path);
    }

    let path = path.replace('+', " ");
    Cow::Owned(percent_decode_str(&path).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_paths() {
        assert_eq!(decode("/foo/bar"), "/foo/bar");
        assert_eq!(decode("/foo%2Fbar"), "/foo/bar");
        assert_eq!(decode("/a+b"), "/a b");
        assert_eq!(decode("/a%2Bb"), "/a+b");
        assert_eq!(decode("/100%"), "/100%");
        assert_eq!(decode("/%zz"), "/%zz");
        assert_eq!(decode("/caf%C3%A9"), "/café");
    }

    #[test]
    fn static_lookup_ignores_method_case() {
        let mut table = RouteTable::new();
        table.add(["get"], "/foo", "unserializable", "serializable").unwrap();
        let matcher = Matcher::new(table).unwrap();

        for method in ["GET", "get", "Get"] {
            let matched = matcher.at(method, "/foo").unwrap().ok().unwrap();
            assert_eq!(matched.payload, &"unserializable");
            assert_eq!(matched.extra, &"serializable");
            assert!(matched.params.is_empty());
        }
    }

    #[test]
    fn missing_payload() {
        let mut table = RouteTable::<&str, ()>::new();
        table.get("/foo", "a", ()).unwrap();
        table.get("/foo/{id}", "b", ()).unwrap();

        let restored = RouteTable::<&str, ()>::from_contents(table.contents().clone());
        let matcher = Matcher::new(restored).unwrap();

        assert_eq!(matcher.at("GET", "/foo"), Err(LookupError { id: 0 }));
        assert_eq!(matcher.at("GET", "/foo/1"), Err(LookupError { id: 1 }));
        // unmatched paths never touch the payloads
        assert_eq!(matcher.at("GET", "/bar"), Ok(MatchResult::NotFound));
    }

    #[test]
    fn zero_chunk_size() {
        let mut table = RouteTable::<_, ()>::new();
        table.get("/a/{x}", 1, ()).unwrap();
        table.get("/b/{x}", 2, ()).unwrap();

        let matcher = Matcher::with_config(table, MatcherConfig { chunk_size: 0 }).unwrap();
        let matched = matcher.at("GET", "/b/y").unwrap().ok().unwrap();
        assert_eq!(matched.payload, &2);
        assert_eq!(matched.params.get("x"), Some("y"));
    }

    #[test]
    fn rejects_corrupt_contents() {
        let json = r#"{"statics":{},"variables":{"GET":[
            {"pattern":"/{id","payload_id":0,"extra":null,"params":["id"]}
        ]}}"#;
        let contents = serde_json::from_str(json).unwrap();
        let table = RouteTable::<(), ()>::from_contents(contents);

        assert!(matches!(
            Matcher::new(table),
            Err(BuildError::Pattern { .. })
        ));
    }
}
