use std::path::PathBuf;

/// Represents errors that can occur when registering a route.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InsertError {
    /// A route must be registered under at least one method.
    #[error("routes must be registered under at least one method")]
    NoMethods,
    /// A `{` was never closed.
    #[error("unclosed parameter placeholder in route: {pattern}")]
    UnclosedPlaceholder {
        /// The rejected pattern.
        pattern: String,
    },
    /// Parameters must be registered with a name.
    #[error("parameters must be registered with a name: {pattern}")]
    UnnamedParam {
        /// The rejected pattern.
        pattern: String,
    },
    /// The regular expression of a parameter does not compile.
    #[error("invalid regular expression for parameter `{name}`: {reason}")]
    InvalidFragment {
        /// The parameter name.
        name: String,
        /// The message reported by the regex engine.
        reason: String,
    },
    /// The regular expression of a parameter contains capturing groups.
    ///
    /// Capturing groups would shift the numbering of the combined expression,
    /// use non-capturing groups (`(?:...)`) instead.
    #[error("the regular expression for parameter `{name}` must not contain capturing groups")]
    CapturingFragment {
        /// The parameter name.
        name: String,
    },
}

/// An error building a [`Matcher`](crate::Matcher) from a route table.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A route pattern no longer parses, usually a hand-edited snapshot.
    #[error("invalid route pattern {pattern}: {source}")]
    Pattern {
        /// The rejected pattern.
        pattern: String,
        /// Why the pattern was rejected.
        #[source]
        source: InsertError,
    },
    /// The parameter names of a route disagree with its pattern.
    #[error("parameter names of route {pattern} do not match its pattern")]
    ParamMismatch {
        /// The offending pattern.
        pattern: String,
    },
    /// The regex engine rejected the combined expression of a chunk.
    #[error("failed to compile routes for {method}: {source}")]
    Regex {
        /// The method the chunk belongs to.
        method: String,
        /// The error reported by the regex engine.
        #[source]
        source: regex::Error,
    },
}

/// A route references a payload id that the table does not hold.
///
/// This only happens for tables restored from a snapshot whose payloads were
/// not registered again before matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no payload registered for id {id}")]
pub struct LookupError {
    /// The missing payload id.
    pub id: usize,
}

/// Errors reading or writing a route table snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot location is absent, unreadable or unwritable.
    #[error("snapshot io error: {}: {source}", .path.display())]
    Io {
        /// The snapshot file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot content is not a valid serialized route table.
    #[error("invalid snapshot {}: {message}", .path.display())]
    Format {
        /// The snapshot file.
        path: PathBuf,
        /// What is wrong with the content.
        message: String,
    },
}
