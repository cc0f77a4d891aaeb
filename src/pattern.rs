use crate::error::InsertError;

use regex::Regex;
use std::borrow::Cow;

/// The expression used for parameters registered without one.
pub(crate) const DEFAULT_FRAGMENT: &str = "[^/]+";

/// A route pattern split into its parameter names and the regular
/// expression that matches it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Parsed {
    /// Parameter names in order of appearance.
    pub params: Vec<String>,
    /// The unanchored expression, one capturing group per parameter.
    ///
    /// Literal text is escaped. Only meaningful if `params` is non-empty.
    pub regex: String,
}

/// Scans a route pattern for `{name}` and `{name:regex}` placeholders.
///
/// Braces inside a placeholder nest, so quantifiers such as `{id:\d{2,4}}`
/// are part of the expression. A `}` outside of any placeholder is literal.
pub(crate) fn parse(pattern: &str) -> Result<Parsed, InsertError> {
    let bytes = pattern.as_bytes();
    let mut params = Vec::new();
    let mut regex = String::with_capacity(pattern.len() + 8);
    let mut literal = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }

        regex.push_str(&regex::escape(&pattern[literal..i]));

        let end = closing_brace(bytes, i + 1).ok_or_else(|| InsertError::UnclosedPlaceholder {
            pattern: pattern.to_owned(),
        })?;

        let inner = &pattern[i + 1..end];
        let (name, fragment) = match inner.split_once(':') {
            Some((name, fragment)) => (name, fragment),
            None => (inner, ""),
        };

        if name.is_empty() {
            return Err(InsertError::UnnamedParam {
                pattern: pattern.to_owned(),
            });
        }

        let fragment = if fragment.is_empty() {
            Cow::Borrowed(DEFAULT_FRAGMENT)
        } else {
            validate(name, fragment)?;
            ascii_classes(fragment)
        };

        regex.push('(');
        regex.push_str(&fragment);
        regex.push(')');
        params.push(name.to_owned());

        i = end + 1;
        literal = i;
    }

    regex.push_str(&regex::escape(&pattern[literal..]));

    Ok(Parsed { params, regex })
}

// Returns the index of the `}` closing a placeholder whose body starts at `start`.
fn closing_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            // an escaped brace never opens or closes anything
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }

        i += 1;
    }

    None
}

fn validate(name: &str, fragment: &str) -> Result<(), InsertError> {
    let compiled = Regex::new(fragment).map_err(|err| InsertError::InvalidFragment {
        name: name.to_owned(),
        reason: err.to_string(),
    })?;

    // group 0 is the implicit whole-match group
    if compiled.captures_len() > 1 {
        return Err(InsertError::CapturingFragment {
            name: name.to_owned(),
        });
    }

    Ok(())
}

// Runs a fragment with Unicode mode off so `\d`, `\w` and `\s` only match
// ASCII. Fragments that could then match invalid UTF-8, such as `[^/]` or
// `.`, are not allowed in that mode and keep their Unicode meaning.
fn ascii_classes(fragment: &str) -> Cow<'_, str> {
    let ascii = format!("(?-u:{fragment})");
    match Regex::new(&ascii) {
        Ok(_) => Cow::Owned(ascii),
        Err(_) => Cow::Borrowed(fragment),
    }
}
