use crate::error::{InsertError, LookupError, SnapshotError};
use crate::method::Method;
use crate::pattern;
use crate::snapshot;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A single registered route.
///
/// Routes hold only plain data: the pattern, the id of the payload in the
/// owning [`RouteTable`], the extra value attached at registration, and the
/// parameter names found in the pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route<E> {
    pattern: String,
    payload_id: usize,
    extra: E,
    params: Vec<String>,
}

impl<E> Route<E> {
    /// The pattern this route was registered with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The id of this route's payload.
    pub fn payload_id(&self) -> usize {
        self.payload_id
    }

    /// The extra value attached at registration.
    pub fn extra(&self) -> &E {
        &self.extra
    }

    /// Parameter names in order of appearance in the pattern.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Returns `true` if the pattern has no parameters.
    pub fn is_static(&self) -> bool {
        self.params.is_empty()
    }
}

/// An insertion-ordered map from [`Method`] to the routes registered under it.
///
/// Methods iterate in the order they were first registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Methods<T> {
    entries: Vec<(Method, Vec<T>)>,
}

impl<T> Methods<T> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Methods {
            entries: Vec::new(),
        }
    }

    /// Returns the values registered under `method`, matched case-insensitively.
    pub fn get(&self, method: &str) -> Option<&[T]> {
        self.entries
            .iter()
            .find(|(key, _)| key.matches(method))
            .map(|(_, values)| values.as_slice())
    }

    /// Iterates over methods and their values in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Method, &[T])> {
        self.entries
            .iter()
            .map(|(method, values)| (method, values.as_slice()))
    }

    /// The number of methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no method has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, method: Method, value: T) {
        match self.entries.iter_mut().find(|(key, _)| *key == method) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((method, vec![value])),
        }
    }
}

impl<T> Default for Methods<T> {
    fn default() -> Self {
        Methods::new()
    }
}

impl<T: Serialize> Serialize for Methods<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (method, values) in &self.entries {
            map.serialize_entry(method.as_str(), values)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Methods<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MethodsVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for MethodsVisitor<T> {
            type Value = Methods<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from methods to routes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut methods = Methods::new();
                while let Some((method, values)) = access.next_entry::<Method, Vec<T>>()? {
                    for value in values {
                        methods.push(method.clone(), value);
                    }
                }
                Ok(methods)
            }
        }

        deserializer.deserialize_map(MethodsVisitor(PhantomData))
    }
}

/// The structural part of a route table: static and variable routes per method.
///
/// This is the unit that is persisted in a snapshot. Payloads are not part of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contents<E> {
    statics: Methods<Route<E>>,
    variables: Methods<Route<E>>,
}

impl<E> Contents<E> {
    /// Routes without parameters, matched by string equality.
    pub fn statics(&self) -> &Methods<Route<E>> {
        &self.statics
    }

    /// Routes with at least one parameter, matched by regular expression.
    pub fn variables(&self) -> &Methods<Route<E>> {
        &self.variables
    }
}

impl<E> Default for Contents<E> {
    fn default() -> Self {
        Contents {
            statics: Methods::new(),
            variables: Methods::new(),
        }
    }
}

/// A collection of routes and the payloads they resolve to.
///
/// Payloads are opaque values, commonly request handlers, that are kept apart
/// from the route data so the routes can be persisted and restored with
/// [`save_snapshot`](RouteTable::save_snapshot) and
/// [`load_snapshot`](RouteTable::load_snapshot).
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkroute::RouteTable;
///
/// let mut table = RouteTable::new();
/// table.add(["get", "head"], "/", "index", ())?;
/// table.add(["post"], "/user/{id:\\d+}", "update user", ())?;
///
/// let statics = table.contents().statics();
/// assert_eq!(statics.get("GET").map(|routes| routes.len()), Some(1));
/// assert_eq!(table.payload(1)?, &"update user");
/// # Ok(())
/// # }
/// ```
pub struct RouteTable<P, E = ()> {
    contents: Contents<E>,
    payloads: Vec<P>,
    snapshot: Option<PathBuf>,
    // set once routes were restored from a snapshot, `add` then only binds payloads
    restored: bool,
}

impl<P, E> RouteTable<P, E> {
    /// Creates an empty table.
    pub fn new() -> Self {
        RouteTable {
            contents: Contents::default(),
            payloads: Vec::new(),
            snapshot: None,
            restored: false,
        }
    }

    /// Creates an empty table backed by a snapshot file.
    ///
    /// The file is not touched until [`load_snapshot`](RouteTable::load_snapshot)
    /// or [`save_snapshot`](RouteTable::save_snapshot) is called.
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Self {
        RouteTable {
            snapshot: Some(path.into()),
            ..RouteTable::new()
        }
    }

    /// Creates a table from previously saved contents.
    ///
    /// The table holds no payloads. Registering the same routes again, in the
    /// same order, binds each payload to the id its routes already reference
    /// without duplicating the routes.
    pub fn from_contents(contents: Contents<E>) -> Self {
        RouteTable {
            contents,
            payloads: Vec::new(),
            snapshot: None,
            restored: true,
        }
    }

    /// Registers a route under each of `methods`.
    ///
    /// Methods are normalized to uppercase. Duplicate routes are allowed, the
    /// first one registered takes priority when matching.
    pub fn add<I>(
        &mut self,
        methods: I,
        pattern: impl Into<String>,
        payload: P,
        extra: E,
    ) -> Result<(), InsertError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: Clone,
    {
        let pattern = pattern.into();
        let methods = methods.into_iter().map(Method::new).collect::<Vec<_>>();

        if methods.is_empty() {
            return Err(InsertError::NoMethods);
        }

        let params = pattern::parse(&pattern)?.params;
        let payload_id = self.register_payload(payload);

        tracing::debug!(
            pattern = %pattern,
            methods = ?methods,
            payload_id,
            params = params.len(),
            restored = self.restored,
            "registered route"
        );

        if self.restored {
            return Ok(());
        }

        let route = Route {
            pattern,
            payload_id,
            extra,
            params,
        };

        let target = if route.is_static() {
            &mut self.contents.statics
        } else {
            &mut self.contents.variables
        };

        for method in methods {
            target.push(method, route.clone());
        }

        Ok(())
    }

    /// Returns the route data of this table.
    pub fn contents(&self) -> &Contents<E> {
        &self.contents
    }

    /// Returns the payload registered under `id`.
    pub fn payload(&self, id: usize) -> Result<&P, LookupError> {
        self.payloads.get(id).ok_or(LookupError { id })
    }

    /// The number of payloads registered so far.
    pub fn payload_count(&self) -> usize {
        self.payloads.len()
    }

    /// Returns `true` if the routes of this table were restored from a snapshot.
    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// The snapshot file backing this table, if any.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    /// Replaces the routes of this table with the attached snapshot, if it exists.
    ///
    /// Returns `Ok(false)` if no snapshot file is attached or the file does not
    /// exist yet. Payloads registered before loading are kept.
    pub fn load_snapshot(&mut self) -> Result<bool, SnapshotError>
    where
        E: DeserializeOwned,
    {
        let Some(path) = self.snapshot.as_deref() else {
            return Ok(false);
        };

        if !path.exists() {
            return Ok(false);
        }

        self.contents = snapshot::load_snapshot(path)?;
        self.restored = true;
        Ok(true)
    }

    /// Writes the routes of this table to the attached snapshot file.
    ///
    /// Returns `Ok(false)` if no snapshot file is attached.
    pub fn save_snapshot(&self) -> Result<bool, SnapshotError>
    where
        E: Serialize,
    {
        match self.snapshot.as_deref() {
            Some(path) => snapshot::save_snapshot(path, &self.contents).map(|_| true),
            None => Ok(false),
        }
    }

    fn register_payload(&mut self, payload: P) -> usize {
        self.payloads.push(payload);
        self.payloads.len() - 1
    }
}

macro_rules! shortcuts {
    ($($(#[$doc:meta])* $name:ident => $method:ident),* $(,)?) => {
        impl<P, E: Clone> RouteTable<P, E> {
            $(
                $(#[$doc])*
                pub fn $name(
                    &mut self,
                    pattern: impl Into<String>,
                    payload: P,
                    extra: E,
                ) -> Result<(), InsertError> {
                    self.add([Method::$method], pattern, payload, extra)
                }
            )*
        }
    };
}

shortcuts! {
    /// Registers a route for `GET` requests.
    get => GET,
    /// Registers a route for `HEAD` requests.
    head => HEAD,
    /// Registers a route for `POST` requests.
    post => POST,
    /// Registers a route for `PUT` requests.
    put => PUT,
    /// Registers a route for `PATCH` requests.
    patch => PATCH,
    /// Registers a route for `DELETE` requests.
    delete => DELETE,
    /// Registers a route for `OPTIONS` requests.
    options => OPTIONS,
}

impl<P, E> Default for RouteTable<P, E> {
    fn default() -> Self {
        RouteTable::new()
    }
}

impl<P, E: fmt::Debug> fmt::Debug for RouteTable<P, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("contents", &self.contents)
            .field("payloads", &self.payloads.len())
            .field("snapshot", &self.snapshot)
            .field("restored", &self.restored)
            .finish()
    }
}
