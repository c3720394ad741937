//! Endpoint definitions: the handler contract, its validated arguments, and
//! the metadata shown on the documentation page.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

/// The argument mapping a handler receives after whitelist validation.
///
/// Contains only keys the endpoint declared as optional arguments, plus the
/// reserved [`Args::PRIMARY_KEY`] entry for PUT requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Args(BTreeMap<String, String>);

impl Args {
    /// Reserved key carrying the path segment after the endpoint name of a
    /// PUT request (`PUT /team/7` → `"7"`).
    pub const PRIMARY_KEY: &'static str = "__primary_key";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The primary key of a PUT request, if any.
    pub fn primary_key(&self) -> Option<&str> {
        self.get(Self::PRIMARY_KEY)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Args(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// The uniform contract every registered endpoint implements.
///
/// A handler receives the validated arguments and returns either the JSON
/// value to send back or an [`ApiError`] to emit as an error envelope.
pub trait Handler: Send + Sync {
    fn call(&self, args: &Args) -> Result<Value, ApiError>;
}

impl<F> Handler for F
where
    F: Fn(&Args) -> Result<Value, ApiError> + Send + Sync,
{
    fn call(&self, args: &Args) -> Result<Value, ApiError> {
        self(args)
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// A function exposed by the API, built fluently and then handed to
/// [`RegistryBuilder::register`](crate::RegistryBuilder::register) together
/// with its HTTP method.
///
/// ```rust,ignore
/// let ep = Endpoint::new("problems", |_args| Ok(json!([])))
///     .docs("Get a list of problems in a contest.")
///     .optional_arg("cid", "ID of the contest to get the problems for")
///     .example([("cid", "2")]);
/// ```
#[derive(Clone)]
pub struct Endpoint {
    name: String,
    handler: Arc<dyn Handler>,
    docs: String,
    optional_args: Vec<(String, String)>,
    example_args: Vec<Vec<(String, String)>>,
    required_roles: BTreeSet<String>,
}

impl Endpoint {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Args) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        Self::with_handler(name, Arc::new(handler))
    }

    /// Build an endpoint around an existing handler object.
    pub fn with_handler(name: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        Self {
            name: name.into(),
            handler,
            docs: String::new(),
            optional_args: Vec::new(),
            example_args: Vec::new(),
            required_roles: BTreeSet::new(),
        }
    }

    /// Free-text description shown on the documentation page.
    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }

    /// Declare an accepted argument. Declaring the same name twice replaces
    /// the description and keeps the original position.
    pub fn optional_arg(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        let description = description.into();
        match self.optional_args.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = description,
            None => self.optional_args.push((name, description)),
        }
        self
    }

    /// Add one example argument map, rendered as a query string on the
    /// documentation page.
    pub fn example<K, V>(mut self, args: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.example_args
            .push(args.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Restrict access to callers holding at least one of `roles`.
    pub fn require_roles<R: Into<String>>(mut self, roles: impl IntoIterator<Item = R>) -> Self {
        self.required_roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc_text(&self) -> &str {
        &self.docs
    }

    /// Declared arguments in declaration order.
    pub fn optional_args(&self) -> &[(String, String)] {
        &self.optional_args
    }

    pub fn example_args(&self) -> &[Vec<(String, String)>] {
        &self.example_args
    }

    /// Empty means anyone may call the endpoint.
    pub fn required_roles(&self) -> &BTreeSet<String> {
        &self.required_roles
    }

    pub fn accepts_arg(&self, key: &str) -> bool {
        self.optional_args.iter().any(|(n, _)| n == key)
    }

    pub fn invoke(&self, args: &Args) -> Result<Value, ApiError> {
        self.handler.call(args)
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("docs", &self.docs)
            .field("optional_args", &self.optional_args)
            .field("example_args", &self.example_args)
            .field("required_roles", &self.required_roles)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_keeps_declaration_order() {
        let ep = Endpoint::new("teams", |_| Ok(json!([])))
            .optional_arg("category", "ID of a single category")
            .optional_arg("teamid", "ID of a single team")
            .optional_arg("category", "ID of a single category to search for");
        let names: Vec<&str> = ep.optional_args().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["category", "teamid"]);
        assert_eq!(ep.optional_args()[0].1, "ID of a single category to search for");
        assert!(ep.accepts_arg("teamid"));
        assert!(!ep.accepts_arg("cid"));
    }

    #[test]
    fn closure_handler_is_invoked_with_args() {
        let ep = Endpoint::new("echo", |args| Ok(serde_json::to_value(args)?));
        let args: Args = [("a", "1")].into_iter().collect();
        assert_eq!(ep.invoke(&args).unwrap(), json!({"a": "1"}));
    }

    #[test]
    fn primary_key_is_read_from_reserved_slot() {
        let mut args = Args::new();
        assert_eq!(args.primary_key(), None);
        args.insert(Args::PRIMARY_KEY, "7");
        assert_eq!(args.primary_key(), Some("7"));
    }
}
