use std::{fmt, iter, mem, slice};

/// A single URL parameter, consisting of a key and a value.
#[derive(PartialEq, Eq, Ord, PartialOrd, Default, Clone)]
struct Param<'k> {
    // Keys borrow from the route table, values are owned because the
    // request path is percent-decoded before matching.
    key: &'k str,
    value: String,
}

/// A list of parameters returned by a route match.
///
/// Parameters are kept in the order they appear in the route pattern.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkroute::{Matcher, MatchResult, RouteTable};
///
/// let mut table = RouteTable::new();
/// table.get("/users/{id}/{tab}", true, ())?;
/// let matcher = Matcher::new(table)?;
///
/// if let MatchResult::Ok(matched) = matcher.at("GET", "/users/1/posts")? {
///     // Iterate through the keys and values.
///     for (key, value) in matched.params.iter() {
///         println!("key: {}, value: {}", key, value);
///     }
///
///     // Get a specific value by name.
///     assert_eq!(matched.params.get("id"), Some("1"));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Clone)]
pub struct Params<'k> {
    kind: ParamsKind<'k>,
}

// Most routes have a small number of dynamic parameters, so we can avoid
// heap allocations in the common case.
const SMALL: usize = 3;

// A list of parameters, optimized to avoid allocations when possible.
#[derive(PartialEq, Eq, Ord, PartialOrd, Clone)]
enum ParamsKind<'k> {
    Small([Param<'k>; SMALL], usize),
    Large(Vec<Param<'k>>),
}

impl<'k> Params<'k> {
    pub(crate) fn new() -> Self {
        Self {
            kind: ParamsKind::Small(Default::default(), 0),
        }
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        match self.kind {
            ParamsKind::Small(_, len) => len,
            ParamsKind::Large(ref vec) => vec.len(),
        }
    }

    /// Returns the value of the first parameter registered under the given key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();

        match &self.kind {
            ParamsKind::Small(arr, len) => arr
                .iter()
                .take(*len)
                .find(|param| param.key == key)
                .map(|param| param.value.as_str()),
            ParamsKind::Large(vec) => vec
                .iter()
                .find(|param| param.key == key)
                .map(|param| param.value.as_str()),
        }
    }

    /// Returns an iterator over the parameters in the list.
    pub fn iter(&self) -> ParamsIter<'_, 'k> {
        ParamsIter::new(self)
    }

    /// Returns `true` if there are no parameters in the list.
    pub fn is_empty(&self) -> bool {
        match self.kind {
            ParamsKind::Small(_, len) => len == 0,
            ParamsKind::Large(ref vec) => vec.is_empty(),
        }
    }

    /// Inserts a key value parameter pair into the list.
    pub(crate) fn push(&mut self, key: &'k str, value: impl Into<String>) {
        #[cold]
        fn drain_to_vec<T: Default>(len: usize, elem: T, arr: &mut [T; SMALL]) -> Vec<T> {
            let mut vec = Vec::with_capacity(len + 1);
            vec.extend(arr.iter_mut().map(mem::take));
            vec.push(elem);
            vec
        }

        let param = Param {
            key,
            value: value.into(),
        };

        match &mut self.kind {
            ParamsKind::Small(arr, len) => {
                if *len == SMALL {
                    self.kind = ParamsKind::Large(drain_to_vec(*len, param, arr));
                    return;
                }

                arr[*len] = param;
                *len += 1;
            }
            ParamsKind::Large(vec) => vec.push(param),
        }
    }
}

impl fmt::Debug for Params<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// An iterator over the keys and values of a route's [parameters](crate::Params).
pub struct ParamsIter<'ps, 'k> {
    kind: ParamsIterKind<'ps, 'k>,
}

impl<'ps, 'k> ParamsIter<'ps, 'k> {
    fn new(params: &'ps Params<'k>) -> Self {
        let kind = match &params.kind {
            ParamsKind::Small(arr, len) => ParamsIterKind::Small(arr.iter().take(*len)),
            ParamsKind::Large(vec) => ParamsIterKind::Large(vec.iter()),
        };
        Self { kind }
    }
}

enum ParamsIterKind<'ps, 'k> {
    Small(iter::Take<slice::Iter<'ps, Param<'k>>>),
    Large(slice::Iter<'ps, Param<'k>>),
}

impl<'ps, 'k> Iterator for ParamsIter<'ps, 'k> {
    type Item = (&'k str, &'ps str);

    fn next(&mut self) -> Option<Self::Item> {
        match self.kind {
            ParamsIterKind::Small(ref mut iter) => iter.next().map(|p| (p.key, p.value.as_str())),
            ParamsIterKind::Large(ref mut iter) => iter.next().map(|p| (p.key, p.value.as_str())),
        }
    }
}

impl ExactSizeIterator for ParamsIter<'_, '_> {
    fn len(&self) -> usize {
        match self.kind {
            ParamsIterKind::Small(ref iter) => iter.len(),
            ParamsIterKind::Large(ref iter) => iter.len(),
        }
    }
}
