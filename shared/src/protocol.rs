use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// Response Envelope
// =========================================================

/// Uniform response wrapper returned by every backend call.
///
/// `code == 0` means success by convention; nothing else about `code` is
/// interpreted on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub const SUCCESS: i64 = 0;

    pub fn success(data: T) -> Self {
        Self {
            code: Self::SUCCESS,
            msg: "Success".to_string(),
            data: Some(data),
        }
    }

    /// Envelope with a non-zero code and no data.
    pub fn failure(code: i64, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS
    }

    /// Data of a successful envelope, or the server message otherwise.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(self.msg)
        }
    }
}

/// Paged list returned by `GET /users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    #[serde(alias = "list", default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> PageResponse<T> {
    /// Number of pages implied by `total` and `size` (at least one).
    pub fn page_count(&self) -> u64 {
        if self.size == 0 {
            return 1;
        }
        self.total.div_ceil(self.size as u64).max(1)
    }
}

// =========================================================
// Endpoint Paths
// =========================================================

pub const PATH_LOGIN: &str = "/login";
pub const PATH_LOGOUT: &str = "/logout";
pub const PATH_USERS: &str = "/users";
pub const PATH_USER: &str = "/user";

/// `/user/{id}`
pub fn user_path(id: i64) -> String {
    format!("{}/{}", PATH_USER, id)
}
