//! The function registry: every endpoint keyed by `(name, method)`.
//!
//! Registration happens on a [`RegistryBuilder`]. Calling
//! [`RegistryBuilder::seal`] yields an immutable [`Registry`] that can be
//! shared across concurrent request handlers (typically behind an `Arc`)
//! without locking, since nothing can write to it any more.

use std::collections::BTreeMap;

use crate::endpoint::Endpoint;
use crate::error::ConfigurationError;
use crate::method::Method;

type Key = (String, Method);

/// Mutable registration phase of a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    endpoints: BTreeMap<Key, Endpoint>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `endpoint` for the HTTP verb `method`.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::UnsupportedMethod`] if `method` is not one of
    ///   `GET`, `POST`, `PUT`.
    /// - [`ConfigurationError::DuplicateEndpoint`] if the `(name, method)`
    ///   pair is already registered.
    /// - [`ConfigurationError::EmptyName`] for an empty endpoint name, which
    ///   would collide with the documentation route.
    pub fn register(&mut self, method: &str, endpoint: Endpoint) -> Result<&mut Self, ConfigurationError> {
        let method: Method = method.parse()?;
        self.register_method(method, endpoint)
    }

    /// Typed variant of [`register`](Self::register).
    pub fn register_method(
        &mut self,
        method: Method,
        endpoint: Endpoint,
    ) -> Result<&mut Self, ConfigurationError> {
        if endpoint.name().is_empty() {
            return Err(ConfigurationError::EmptyName);
        }
        let key = (endpoint.name().to_string(), method);
        if self.endpoints.contains_key(&key) {
            return Err(ConfigurationError::DuplicateEndpoint { name: key.0, method });
        }
        tracing::debug!(name = %key.0, %method, "registered endpoint");
        self.endpoints.insert(key, endpoint);
        Ok(self)
    }

    /// Finish registration. No further insertions are possible.
    pub fn seal(self) -> Registry {
        Registry {
            endpoints: self.endpoints,
        }
    }
}

/// Sealed, read-only set of endpoints.
#[derive(Debug)]
pub struct Registry {
    endpoints: BTreeMap<Key, Endpoint>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Find the endpoint registered for `(name, method)`.
    pub fn lookup(&self, name: &str, method: Method) -> Option<&Endpoint> {
        // BTreeMap<(String, _)> cannot be queried with (&str, _); the
        // allocation is one short string per request.
        self.endpoints.get(&(name.to_string(), method))
    }

    /// All endpoints, sorted by name and then method.
    pub fn iter(&self) -> impl Iterator<Item = (Method, &Endpoint)> {
        self.endpoints.iter().map(|((_, method), ep)| (*method, ep))
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop(name: &str) -> Endpoint {
        Endpoint::new(name, |_| Ok(json!(null)))
    }

    #[test]
    fn duplicate_name_and_method_is_rejected() {
        let mut b = Registry::builder();
        b.register("GET", noop("problems")).unwrap();
        let err = b.register("GET", noop("problems")).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateEndpoint {
                name: "problems".into(),
                method: Method::Get
            }
        );
    }

    #[test]
    fn same_name_with_other_method_is_allowed() {
        let mut b = Registry::builder();
        b.register("GET", noop("team"))
            .unwrap()
            .register("PUT", noop("team"))
            .unwrap();
        let reg = b.seal();
        assert_eq!(reg.len(), 2);
        assert!(reg.lookup("team", Method::Get).is_some());
        assert!(reg.lookup("team", Method::Put).is_some());
        assert!(reg.lookup("team", Method::Post).is_none());
    }

    #[test]
    fn unsupported_method_is_rejected() {
        let mut b = Registry::builder();
        let err = b.register("DELETE", noop("team")).unwrap_err();
        assert_eq!(err, ConfigurationError::UnsupportedMethod("DELETE".into()));
        assert!(b.seal().is_empty());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut b = Registry::builder();
        assert_eq!(b.register("GET", noop("")).unwrap_err(), ConfigurationError::EmptyName);
    }

    #[test]
    fn iteration_is_sorted_by_name_then_method() {
        let mut b = Registry::builder();
        for (m, n) in [("PUT", "team"), ("GET", "teams"), ("GET", "team"), ("POST", "clarification"), ("GET", "clarification")] {
            b.register(m, noop(n)).unwrap();
        }
        let reg = b.seal();
        let order: Vec<(String, Method)> = reg.iter().map(|(m, e)| (e.name().to_string(), m)).collect();
        assert_eq!(
            order,
            vec![
                ("clarification".to_string(), Method::Get),
                ("clarification".to_string(), Method::Post),
                ("team".to_string(), Method::Get),
                ("team".to_string(), Method::Put),
                ("teams".to_string(), Method::Get),
            ]
        );
    }
}
