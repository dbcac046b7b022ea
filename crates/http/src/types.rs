//! Wire types shared by every API client

use banquet_core::{Role, User};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Envelope wrapping every backend response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

/// One page of a paginated list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
}

/// Login request
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account registration request
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Login and registration response data: the account plus its new token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

/// Body of a non-2xx response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_field_errors")]
    pub errors: Vec<FieldError>,
}

/// Accept the validation shapes backends actually send: a list of
/// `{field, message}` objects, a list of bare strings, or a map keyed by
/// field name. Anything else decodes as no field errors.
fn lenient_field_errors<'de, D>(deserializer: D) -> Result<Vec<FieldError>, D::Error>
where
    D: Deserializer<'de>,
{
    let errors = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(message) => Some(FieldError {
                    field: String::new(),
                    message,
                }),
                other => serde_json::from_value(other).ok(),
            })
            .collect(),
        Some(Value::Object(fields)) => fields
            .into_iter()
            .filter_map(|(field, detail)| {
                let message = match detail {
                    Value::String(message) => message,
                    Value::Object(detail) => detail
                        .get("message")
                        .or_else(|| detail.get("msg"))
                        .and_then(Value::as_str)?
                        .to_string(),
                    _ => return None,
                };
                Some(FieldError { field, message })
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(errors)
}

/// Validation failure for one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(alias = "path", alias = "param")]
    pub field: String,
    #[serde(alias = "msg")]
    pub message: String,
}

/// Filters for list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}
