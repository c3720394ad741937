//! Role-based authorization of a caller against an endpoint.
//!
//! The core never decides who a caller is. The transport resolves the
//! session and hands over a [`Caller`] (the role predicate) and, for the
//! documentation page only, an [`Identity`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;

/// The superset role that bypasses every per-endpoint role requirement.
pub const ADMIN_ROLE: &str = "admin";

/// Role-membership predicate consulted by [`authorize`].
pub trait RoleCheck {
    fn has_role(&self, role: &str) -> bool;
    fn is_admin(&self) -> bool;
}

/// The roles granted to the caller of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub roles: BTreeSet<String>,
    pub is_admin: bool,
}

impl Caller {
    /// A caller with no roles.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A caller holding `roles`; holding [`ADMIN_ROLE`] makes it an admin.
    pub fn with_roles<R: Into<String>>(roles: impl IntoIterator<Item = R>) -> Self {
        let roles: BTreeSet<String> = roles.into_iter().map(Into::into).collect();
        let is_admin = roles.contains(ADMIN_ROLE);
        Self { roles, is_admin }
    }

    pub fn from_identity(identity: Option<&Identity>) -> Self {
        match identity {
            Some(id) => Self::with_roles(id.roles.iter().cloned()),
            None => Self::anonymous(),
        }
    }
}

impl RoleCheck for Caller {
    fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Who the caller is, as reported by the identity provider. Only displayed;
/// never used for authorization decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Decide whether `caller` may invoke `endpoint`.
///
/// Passes when the endpoint requires no roles, when the caller is an admin,
/// or when the caller holds at least one of the required roles.
pub fn authorize(endpoint: &Endpoint, caller: &impl RoleCheck) -> bool {
    let required = endpoint.required_roles();
    required.is_empty() || caller.is_admin() || required.iter().any(|r| caller.has_role(r))
}
