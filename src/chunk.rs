//! Combined expressions for groups of variable routes.
//!
//! Every chunk of routes is merged into a single anchored alternation so one
//! regex scan tests the whole chunk. Each alternative owns a block of capture
//! groups: its own parameters followed by empty padding groups, sized so that
//! the number of groups taking part in a successful match is unique to the
//! alternative that matched:
//!
//! ```text
//! /user/{id}            -> /user/([^/]+)            1 group
//! /user/{id}/{name}     -> /user/([^/]+)/([^/]+)    2 groups
//! /post/{slug}          -> /post/([^/]+)()()        3 groups
//! ```
//!
//! Only the groups of the alternative that matched participate, so counting
//! them and looking the count up in the chunk's map recovers the route.

use crate::error::BuildError;
use crate::pattern;
use crate::table::Route;

use regex::{Captures, Regex};
use std::collections::HashMap;

/// A compiled chunk of variable routes.
#[derive(Clone, Debug)]
pub(crate) struct Chunk {
    regex: Regex,
    // participating groups + 1 -> index into `alternatives`
    map: HashMap<usize, usize>,
    alternatives: Vec<Alternative>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Alternative {
    // index of the route in the method's route list
    route: usize,
    // index of the first capture group of this alternative
    offset: usize,
    // number of parameters, the remaining groups of the block are padding
    params: usize,
}

/// A successful match of a chunk.
pub(crate) struct Hit<'h> {
    /// Index of the route in the method's route list.
    pub route: usize,
    captures: Captures<'h>,
    offset: usize,
    params: usize,
}

impl<'h> Hit<'h> {
    /// The values captured by the route's parameters, in order.
    pub fn values(&self) -> impl Iterator<Item = &'h str> + '_ {
        (self.offset..self.offset + self.params)
            .map(move |i| self.captures.get(i).map_or("", |m| m.as_str()))
    }
}

impl Chunk {
    /// Merges `routes` into one expression. `base` is the index of the first
    /// route of the chunk in the method's route list.
    pub fn build<E>(method: &str, routes: &[Route<E>], base: usize) -> Result<Chunk, BuildError> {
        let mut sources = Vec::with_capacity(routes.len());
        let mut map = HashMap::with_capacity(routes.len());
        let mut alternatives = Vec::with_capacity(routes.len());

        let mut num_groups = 0;
        let mut offset = 1;

        for (i, route) in routes.iter().enumerate() {
            let parsed = pattern::parse(route.pattern()).map_err(|source| BuildError::Pattern {
                pattern: route.pattern().to_owned(),
                source,
            })?;

            if parsed.params != route.params() {
                return Err(BuildError::ParamMismatch {
                    pattern: route.pattern().to_owned(),
                });
            }

            let params = parsed.params.len();
            num_groups = num_groups.max(params);

            let mut source = parsed.regex;
            for _ in params..num_groups {
                source.push_str("()");
            }
            sources.push(source);

            alternatives.push(Alternative {
                route: base + i,
                offset,
                params,
            });
            map.insert(num_groups + 1, alternatives.len() - 1);

            offset += num_groups;
            num_groups += 1;
        }

        let combined = format!("^(?:{})$", sources.join("|"));
        let regex = Regex::new(&combined).map_err(|source| BuildError::Regex {
            method: method.to_owned(),
            source,
        })?;

        Ok(Chunk {
            regex,
            map,
            alternatives,
        })
    }

    /// Matches `path` against every route of the chunk, the first route
    /// registered wins.
    pub fn at<'h>(&self, path: &'h str) -> Option<Hit<'h>> {
        let captures = self.regex.captures(path)?;

        let count = captures.iter().skip(1).filter(Option::is_some).count() + 1;
        let alternative = self.map.get(&count).map(|&i| self.alternatives[i])?;

        Some(Hit {
            route: alternative.route,
            captures,
            offset: alternative.offset,
            params: alternative.params,
        })
    }

    #[cfg(test)]
    fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteTable;

    fn chunk(patterns: &[&str]) -> Chunk {
        let mut table = RouteTable::<(), ()>::new();
        for pattern in patterns {
            table.get(*pattern, (), ()).unwrap();
        }

        let routes = table.contents().variables().get("GET").unwrap();
        Chunk::build("GET", routes, 0).unwrap()
    }

    fn resolve(chunk: &Chunk, path: &str) -> Option<(usize, Vec<String>)> {
        chunk
            .at(path)
            .map(|hit| (hit.route, hit.values().map(str::to_owned).collect()))
    }

    #[test]
    fn pads_groups() {
        let chunk = chunk(&["/user/{id}", "/user/{id}/{name}", "/post/{slug}"]);
        assert_eq!(
            chunk.as_str(),
            "^(?:/user/([^/]+)|/user/([^/]+)/([^/]+)|/post/([^/]+)()())$"
        );
    }

    #[test]
    fn padding_after_wide_route() {
        // the widest route comes first, every later one pads up past it
        let chunk = chunk(&["/{a}/{b}/{c}", "/x/{a}", "/y/{a}/{b}/z"]);
        assert_eq!(
            chunk.as_str(),
            "^(?:/([^/]+)/([^/]+)/([^/]+)|/x/([^/]+)()()()|/y/([^/]+)/([^/]+)/z()()())$"
        );

        assert_eq!(
            resolve(&chunk, "/1/2/3"),
            Some((0, vec!["1".into(), "2".into(), "3".into()]))
        );
        assert_eq!(resolve(&chunk, "/x/1"), Some((1, vec!["1".into()])));
        assert_eq!(
            resolve(&chunk, "/y/1/2/z"),
            Some((2, vec!["1".into(), "2".into()]))
        );

        // the first route also matches three segments under `/y`
        assert_eq!(
            resolve(&chunk, "/y/1/2"),
            Some((0, vec!["y".into(), "1".into(), "2".into()]))
        );
    }

    #[test]
    fn resolves_each_alternative() {
        let chunk = chunk(&["/user/{id:\\d+}", "/user/{id}/{name}", "/post/{slug}"]);

        assert_eq!(resolve(&chunk, "/user/42"), Some((0, vec!["42".into()])));
        assert_eq!(
            resolve(&chunk, "/user/42/ann"),
            Some((1, vec!["42".into(), "ann".into()]))
        );
        assert_eq!(
            resolve(&chunk, "/post/hello"),
            Some((2, vec!["hello".into()]))
        );
        assert_eq!(resolve(&chunk, "/user/x"), None);
        assert_eq!(resolve(&chunk, "/user/42/ann/x"), None);
    }

    #[test]
    fn first_registered_wins() {
        let chunk = chunk(&["/{a}", "/{b:\\d+}"]);
        assert_eq!(resolve(&chunk, "/1"), Some((0, vec!["1".into()])));
    }

    #[test]
    fn anchored() {
        let chunk = chunk(&["/user/{id:\\d+}"]);
        assert_eq!(resolve(&chunk, "/user/1x"), None);
        assert_eq!(resolve(&chunk, "x/user/1"), None);
    }

    #[test]
    fn offset_by_base() {
        let mut table = RouteTable::<(), ()>::new();
        table.get("/a/{x}", (), ()).unwrap();
        table.get("/b/{x}", (), ()).unwrap();

        let routes = table.contents().variables().get("GET").unwrap();
        let chunk = Chunk::build("GET", &routes[1..], 1).unwrap();
        assert_eq!(resolve(&chunk, "/b/1"), Some((1, vec!["1".into()])));
        assert_eq!(resolve(&chunk, "/a/1"), None);
    }
}
