use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

/// An HTTP method token, normalized to uppercase.
///
/// Methods are not restricted to the well-known set, any token is accepted
/// and stored in its uppercase form. Comparison against incoming request
/// methods is case-insensitive.
///
/// ```
/// use chunkroute::Method;
///
/// let method = Method::new("get");
/// assert_eq!(method, Method::GET);
/// assert!(method.matches("Get"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Method(Cow<'static, str>);

macro_rules! well_known {
    ($($name:ident),* $(,)?) => {
        impl Method {
            $(
                #[doc = concat!("The `", stringify!($name), "` method.")]
                pub const $name: Method = Method(Cow::Borrowed(stringify!($name)));
            )*
        }
    };
}

well_known!(GET, HEAD, POST, PUT, PATCH, DELETE, OPTIONS, CONNECT, TRACE);

impl Method {
    /// Creates a method from any casing of its token.
    pub fn new(token: impl AsRef<str>) -> Self {
        let token = token.as_ref();

        // avoid the allocation for tokens that are already normalized
        if !token.bytes().any(|b| b.is_ascii_lowercase()) {
            if let Some(known) = Method::known(token) {
                return known;
            }
        }

        Method(Cow::Owned(token.to_ascii_uppercase()))
    }

    fn known(token: &str) -> Option<Method> {
        [
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
            Method::CONNECT,
            Method::TRACE,
        ]
        .into_iter()
        .find(|method| method.as_str() == token)
    }

    /// Returns the normalized token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `other` names this method, ignoring case.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl From<String> for Method {
    fn from(token: String) -> Self {
        Method::new(token)
    }
}

impl From<&str> for Method {
    fn from(token: &str) -> Self {
        Method::new(token)
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.0.into_owned()
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Method {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Method {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case() {
        assert_eq!(Method::new("delete"), Method::DELETE);
        assert_eq!(Method::new("pUt").as_str(), "PUT");
        assert_eq!(Method::new("purge").as_str(), "PURGE");
    }

    #[test]
    fn matches_ignores_case() {
        assert!(Method::GET.matches("get"));
        assert!(Method::GET.matches("GET"));
        assert!(!Method::GET.matches("GETS"));
        assert!(Method::new("Purge").matches("pURGE"));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Method::new("patch")).unwrap();
        assert_eq!(json, "\"PATCH\"");

        let method: Method = serde_json::from_str("\"options\"").unwrap();
        assert_eq!(method, Method::OPTIONS);
    }
}
