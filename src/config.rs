use serde::{Deserialize, Serialize};

/// The number of variable routes merged into one expression by default.
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Tuning options for a [`Matcher`](crate::Matcher).
///
/// None of these change which route a request resolves to.
///
/// ```
/// use chunkroute::MatcherConfig;
///
/// let config: MatcherConfig = serde_json::from_str(r#"{ "chunk_size": 32 }"#).unwrap();
/// assert_eq!(config.chunk_size, 32);
///
/// let config: MatcherConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config, MatcherConfig::default());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Variable routes of one method are split into chunks of this size,
    /// each chunk is tested with a single regex scan. Zero is treated as one.
    pub chunk_size: usize,
}

impl MatcherConfig {
    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
