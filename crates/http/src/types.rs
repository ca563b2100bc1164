//! Request, response and wire types shared by the client modules

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::client::error::RequestError;

/// HTTP methods the CRM backend accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RequestMethod {
    /// Whether a payload is serialized into the request body for this method
    pub const fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RequestMethod> for reqwest::Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Get => Self::GET,
            RequestMethod::Post => Self::POST,
            RequestMethod::Put => Self::PUT,
            RequestMethod::Patch => Self::PATCH,
            RequestMethod::Delete => Self::DELETE,
        }
    }
}

/// Description of a single API call
///
/// The same descriptor is replayed verbatim when a request is retried after
/// a token refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Path relative to the API prefix, e.g. `leads/` or `deals/7/`
    pub endpoint: String,
    pub method: RequestMethod,
    /// JSON payload; ignored for GET and DELETE
    pub payload: Option<JsonValue>,
}

impl ApiRequest {
    pub fn new(endpoint: impl Into<String>, method: RequestMethod) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            payload: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, RequestMethod::Get)
    }

    /// Attach a payload
    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Serialize and attach a payload
    ///
    /// # Errors
    ///
    /// Returns an error if `payload` cannot be represented as JSON
    pub fn with_json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, RequestError> {
        Ok(self.with_payload(serde_json::to_value(payload)?))
    }

    /// The exact request body, if this method carries one
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded
    pub fn body(&self) -> Result<Option<String>, RequestError> {
        match &self.payload {
            Some(payload) if self.method.carries_body() => {
                Ok(Some(serde_json::to_string(payload)?))
            }
            _ => Ok(None),
        }
    }
}

/// Successfully decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Body served as `application/json`
    Json(JsonValue),
    /// Any other body, returned verbatim
    Text(String),
}

impl ApiResponse {
    pub const fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Decode the body into a typed value
    ///
    /// Text bodies are parsed as JSON as a fallback.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Serialization`] if the body does not match `T`
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, RequestError> {
        let value = match self {
            Self::Json(value) => serde_json::from_value(value)?,
            Self::Text(text) => serde_json::from_str(&text)?,
        };
        Ok(value)
    }
}

/// Body posted to the token refresh endpoint
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Token refresh response
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    /// Kept raw so the cached copy retains fields this crate does not model
    pub user: JsonValue,
}

/// User cached in the session after login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub manager_username: Option<String>,
}

/// Profile of the signed-in user as served by `profile/`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub manager_username: Option<String>,
}
