//! The HTTP verbs an endpoint can be registered for.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// An HTTP method supported by the API.
///
/// Variant order is `GET < POST < PUT`, the same as the lexicographic order
/// of the verb names, so sorting by `(name, Method)` matches sorting by the
/// textual composite key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Arguments come from the query string.
    Get,
    /// Arguments come from the form-encoded request body.
    Post,
    /// Arguments come from the form-encoded request body; the path carries a
    /// primary key after the endpoint name.
    Put,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Get, Method::Post, Method::Put];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the upper-case verb. HTTP methods are case-sensitive, so `"get"`
/// is rejected like any other unsupported verb.
impl std::str::FromStr for Method {
    type Err = ConfigurationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            other => Err(ConfigurationError::UnsupportedMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_verbs() {
        for m in Method::ALL {
            assert_eq!(m.as_str().parse::<Method>().unwrap(), m);
        }
    }

    #[test]
    fn rejects_other_verbs() {
        for verb in ["DELETE", "PATCH", "HEAD", "get", ""] {
            assert_eq!(
                verb.parse::<Method>(),
                Err(ConfigurationError::UnsupportedMethod(verb.to_string()))
            );
        }
    }

    #[test]
    fn ordering_matches_verb_names() {
        let mut by_enum = Method::ALL.to_vec();
        by_enum.sort();
        let mut by_name = Method::ALL.to_vec();
        by_name.sort_by_key(|m| m.as_str());
        assert_eq!(by_enum, by_name);
    }
}
