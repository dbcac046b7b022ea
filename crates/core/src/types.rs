use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role attached to a dashboard account
///
/// Decoding is case-insensitive, the same as [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Role {
    Admin,
    Manager,
    Editor,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Editor, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Identity record returned by the backend for the current account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UserRecord")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Wire shape of [`User`]; Mongo-style backends send `_id`, `id`, or both
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: Option<String>,
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
    first_name: String,
    last_name: String,
    email: String,
    role: Role,
    #[serde(default)]
    profile_picture: Option<String>,
}

impl TryFrom<UserRecord> for User {
    type Error = &'static str;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .or(record.mongo_id)
            .ok_or("missing field `id` or `_id`")?;
        Ok(Self {
            id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            role: record.role,
            profile_picture: record.profile_picture,
        })
    }
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
