//! A URL router that resolves `(method, path)` pairs against registered
//! routes, using chunked combined regular expressions for routes with
//! parameters.
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use chunkroute::{Matcher, MatchResult, Method, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table.get("/home", "Welcome!", ())?;
//! table.add(["get", "put"], "/users/{id:\\d+}", "A User", ())?;
//!
//! let matcher = Matcher::new(table)?;
//!
//! let matched = matcher.at("GET", "/users/978")?.ok().unwrap();
//! assert_eq!(matched.params.get("id"), Some("978"));
//! assert_eq!(*matched.payload, "A User");
//!
//! assert_eq!(
//!     matcher.at("POST", "/home")?,
//!     MatchResult::MethodNotAllowed { allowed: vec![Method::GET] }
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Routes
//!
//! Routes without parameters are *static* and are matched by string
//! equality. Routes with parameters are *variable*:
//!
//! ```text
//! Syntax            Matches
//! {name}            one or more characters other than '/'
//! {name:regex}      the given expression, e.g. {id:\d+} or {year:\d{4}}
//! ```
//!
//! Expressions may use any syntax of the [`regex`] crate except capturing
//! groups, use `(?:...)` for grouping. Character classes such as `\d`, `\w`
//! and `\s` match ASCII only, so `{id:\d+}` never captures non-ASCII digits.
//! Expressions that could match arbitrary bytes without Unicode support,
//! such as `.` or `[^/]`, keep matching any character. Literal text around
//! parameters is matched literally.
//!
//! ```text
//! Route: /blog/{category}/{post:\d+}
//!
//! /blog/rust/42            match: category="rust", post="42"
//! /blog/rust/request       no match
//! /blog/rust/42/comments   no match
//! ```
//!
//! # Matching
//!
//! The request path is percent-decoded before it is compared. Static routes
//! are tried before variable routes, and within each kind, routes are tried
//! in registration order, the first match wins. Methods are compared
//! case-insensitively.
//!
//! If routes match the path but none under the requested method, the result
//! lists the methods of every matching route:
//! [`MatchResult::MethodNotAllowed`]. Otherwise, an unmatched path resolves
//! to [`MatchResult::NotFound`].
//!
//! Variable routes of a method are merged into chunks of
//! [`MatcherConfig::chunk_size`] routes, and each chunk is compiled into a
//! single regular expression. A request scans one expression per chunk
//! instead of one per route.
//!
//! # Payloads and snapshots
//!
//! Payloads (handlers, closures, anything) are stored next to the routes and
//! referenced by id, so the route data can be persisted on its own with
//! [`snapshot::save_snapshot`] and restored with [`snapshot::load_snapshot`]
//! or [`RouteTable::with_snapshot`].

#![deny(rust_2018_idioms, clippy::all)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod chunk;
mod config;
mod error;
mod matcher;
mod method;
mod params;
mod pattern;
mod shared;
mod table;

pub mod snapshot;

pub use config::{MatcherConfig, DEFAULT_CHUNK_SIZE};
pub use error::{BuildError, InsertError, LookupError, SnapshotError};
pub use matcher::{Match, MatchResult, Matcher};
pub use method::Method;
pub use params::{Params, ParamsIter};
pub use shared::SharedMatcher;
pub use table::{Contents, Methods, Route, RouteTable};
