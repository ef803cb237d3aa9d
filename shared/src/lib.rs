use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod protocol;

pub use protocol::{Envelope, HttpMethod, PageResponse};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化存储中 Session Token 的键名
pub const TOKEN_STORAGE_KEY: &str = "token";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户记录（读模型，由服务端持有）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// true 表示启用
    pub status: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub is_superuser: bool,
    pub created_time: String,
    pub updated_time: String,
}

/// 用户创建/更新表单（写模型，密码只在写入时出现）
///
/// 空密码不会被序列化：更新时留空表示保持原密码。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub name: String,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub type UserCreate = UserForm;
pub type UserUpdate = UserForm;

impl From<&UserRecord> for UserForm {
    /// 编辑页用已有记录预填表单，密码留空
    fn from(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            password: String::new(),
            name: user.name.clone(),
            status: user.status,
            description: user.description.clone(),
        }
    }
}

/// 用户列表查询参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserQuery {
    /// 只输出已设置的字段，顺序固定
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        if let Some(username) = &self.username {
            pairs.push(("username".to_string(), username.clone()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name".to_string(), name.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录成功后的 data 字段，未知字段原样保留
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 从 token 载荷解析出的当前用户
///
/// 载荷格式由服务端决定：只要是合法 JSON 就原样保存，字段通过访问器宽松读取。
/// 例如 `id` 可以是数字或数字字符串，`status` 可以是布尔值或 0/1，`sub` 可以是数字。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentUser {
    pub payload: Value,
}

impl From<Value> for CurrentUser {
    fn from(payload: Value) -> Self {
        Self { payload }
    }
}

impl CurrentUser {
    /// 读取任意 claim，载荷不是对象时总是 None
    pub fn claim(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    pub fn id(&self) -> Option<i64> {
        self.claim("id").and_then(lenient_i64)
    }

    pub fn username(&self) -> Option<String> {
        self.claim("username").and_then(lenient_text)
    }

    pub fn name(&self) -> Option<String> {
        self.claim("name").and_then(lenient_text)
    }

    pub fn status(&self) -> Option<bool> {
        self.claim("status").and_then(lenient_bool)
    }

    pub fn is_superuser(&self) -> Option<bool> {
        self.claim("is_superuser").and_then(lenient_bool)
    }

    pub fn sub(&self) -> Option<String> {
        self.claim("sub").and_then(lenient_text)
    }

    pub fn exp(&self) -> Option<i64> {
        self.claim("exp").and_then(lenient_i64)
    }

    /// 用于界面显示的名称
    pub fn display_name(&self) -> Option<String> {
        self.name().or_else(|| self.username()).or_else(|| self.sub())
    }
}

fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(_) => lenient_i64(value).map(|n| n != 0),
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_skip_missing_fields() {
        let query = UserQuery {
            page: Some(2),
            name: Some("Ann".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("name".to_string(), "Ann".to_string()),
            ]
        );
        assert!(UserQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn user_form_omits_empty_description() {
        let form = UserForm {
            username: "ann".to_string(),
            password: "secret".to_string(),
            name: "Ann".to_string(),
            status: true,
            description: None,
        };
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["password"], "secret");
    }

    #[test]
    fn user_record_accepts_null_description() {
        let user: UserRecord = serde_json::from_str(
            r#"{"id":3,"username":"ann","name":"Ann","status":false,"description":null,
                "is_superuser":true,"created_time":"2024-01-01 10:00:00",
                "updated_time":"2024-01-02 10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(user.description, None);
        assert!(user.is_superuser);

        let form = UserForm::from(&user);
        assert_eq!(form.username, "ann");
        assert!(form.password.is_empty());

        // 编辑表单未填写密码时，请求体里不能出现空密码
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["status"], false);
    }

    #[test]
    fn current_user_keeps_unknown_claims() {
        let user: CurrentUser =
            serde_json::from_str(r#"{"sub":"ann","exp":1700000000,"role":"admin"}"#).unwrap();
        assert_eq!(user.id(), None);
        assert_eq!(user.exp(), Some(1_700_000_000));
        assert_eq!(user.display_name().as_deref(), Some("ann"));
        assert_eq!(user.claim("role"), Some(&Value::from("admin")));
    }

    #[test]
    fn current_user_reads_loosely_typed_claims() {
        let user = CurrentUser::from(serde_json::json!({
            "id": "17",
            "sub": 42,
            "status": 1,
            "is_superuser": "false"
        }));
        assert_eq!(user.id(), Some(17));
        assert_eq!(user.sub().as_deref(), Some("42"));
        assert_eq!(user.status(), Some(true));
        assert_eq!(user.is_superuser(), Some(false));
        assert_eq!(user.display_name().as_deref(), Some("42"));

        let odd = CurrentUser::from(serde_json::json!({"id": {"nested": 1}, "status": "maybe"}));
        assert_eq!(odd.id(), None);
        assert_eq!(odd.status(), None);
    }

    #[test]
    fn current_user_serializes_as_the_raw_payload() {
        let user = CurrentUser::from(serde_json::json!([1, 2]));
        assert_eq!(user.id(), None);
        assert_eq!(user.claim("id"), None);
        assert_eq!(serde_json::to_string(&user).unwrap(), "[1,2]");
    }
}
