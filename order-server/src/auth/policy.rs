//! Authorization policy
//!
//! Role based grants evaluated per request. The grant table lives inside the
//! [`Policy`] value held by `ServerState`; [`Policy::replace_grants`] is the
//! only way to change it, so there is no cache to invalidate elsewhere.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Customers,
    Orders,
    Reports,
    Users,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Customers,
        Resource::Orders,
        Resource::Reports,
        Resource::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Customers => "customers",
            Resource::Orders => "orders",
            Resource::Reports => "reports",
            Resource::Users => "users",
        }
    }
}

/// Capability name in `action resource` form, e.g. `view customers`
pub fn capability(action: Action, resource: Resource) -> String {
    format!("{} {}", action.as_str(), resource.as_str())
}

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: i64,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

pub type Grant = (Action, Resource);

/// Role to grant table
#[derive(Debug)]
pub struct Policy {
    grants: RwLock<HashMap<Role, HashSet<Grant>>>,
}

impl Policy {
    /// Policy with no grants at all (every request denied)
    pub fn empty() -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
        }
    }

    /// Evaluate a single capability for `subject`
    pub fn authorize(&self, subject: &Subject, action: Action, resource: Resource) -> Decision {
        let grants = self.grants.read();
        let allowed = grants
            .get(&subject.role)
            .is_some_and(|set| set.contains(&(action, resource)));
        if allowed { Decision::Allow } else { Decision::Deny }
    }

    /// Replace every grant of `role`
    pub fn replace_grants(&self, role: Role, grants: impl IntoIterator<Item = Grant>) {
        let grants: HashSet<Grant> = grants.into_iter().collect();
        tracing::info!(role = %role, grants = grants.len(), "Replacing role grants");
        self.grants.write().insert(role, grants);
    }

    /// Grants currently held by `role`, sorted by capability name
    pub fn grants_for(&self, role: Role) -> Vec<String> {
        let mut names: Vec<String> = self
            .grants
            .read()
            .get(&role)
            .map(|set| set.iter().map(|(a, r)| capability(*a, *r)).collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl Default for Policy {
    /// Admin holds every capability; user may view customers and view,
    /// create or edit orders
    fn default() -> Self {
        let policy = Self::empty();
        let all = Resource::ALL
            .into_iter()
            .flat_map(|r| Action::ALL.into_iter().map(move |a| (a, r)));
        policy.replace_grants(Role::Admin, all);
        policy.replace_grants(
            Role::User,
            [
                (Action::View, Resource::Customers),
                (Action::View, Resource::Orders),
                (Action::Create, Resource::Orders),
                (Action::Edit, Resource::Orders),
            ],
        );
        policy
    }
}
