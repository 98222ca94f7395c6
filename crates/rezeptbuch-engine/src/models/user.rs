use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A registered cookbook user.
///
/// The `name` is the identity key; the photo is an optional reference into
/// the published asset tree and is omitted from serialized output when
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl User {
    /// A user known only by name, with no registry record behind it.
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            photo: None,
        }
    }
}

/// Creator or comment authorship: either a bare name string (legacy data)
/// or a full user record (current data).
///
/// Serialized untagged so both historic and current collection files load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Full(User),
    Name(String),
}

impl UserRef {
    /// The display name, regardless of which form the reference takes.
    pub fn name(&self) -> &str {
        match self {
            UserRef::Full(user) => &user.name,
            UserRef::Name(name) => name,
        }
    }
}

impl From<&str> for UserRef {
    fn from(name: &str) -> Self {
        UserRef::Name(name.to_string())
    }
}

/// Flat name → user lookup table, loaded once per run and read-only during
/// recipe processing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    users: BTreeMap<String, User>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.name.clone(), user))
            .collect();
        Self { users }
    }

    pub fn get(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Resolve a reference to a full user record.
    ///
    /// This is the single place that handles the legacy bare-name form: a
    /// full record passes through unchanged, a name is looked up by exact
    /// match, and a miss synthesizes a name-only record so resolution can
    /// never fail.
    pub fn resolve(&self, reference: &UserRef) -> User {
        match reference {
            UserRef::Full(user) => user.clone(),
            UserRef::Name(name) => self
                .users
                .get(name)
                .cloned()
                .unwrap_or_else(|| User::name_only(name.clone())),
        }
    }
}
