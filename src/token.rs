//! Session Token 载荷解析
//!
//! 不访问后端，仅解码 token 中间段得到当前用户信息。
//! 这里不做签名校验和过期检查，真正的鉴权在服务端完成。

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use user_admin_shared::{CurrentUser, Envelope};

use crate::session::SessionStore;

pub const MSG_NO_TOKEN: &str = "No token found";
pub const MSG_PARSE_FAILED: &str = "Parse token failed";
const FAILURE_CODE: i64 = 1;

/// 标准字母表，填充可有可无（JWT 段通常省略 `=`），末尾多余的位忽略
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// 载荷解析失败的原因（仅用于日志）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),
    #[error("payload segment is empty")]
    EmptyPayload,
    #[error("invalid base64: {0}")]
    Base64(String),
    #[error("payload is not valid UTF-8")]
    Utf8,
    #[error("invalid JSON payload: {0}")]
    Json(String),
}

/// 解码 `header.payload.signature` 的载荷段
///
/// URL 安全字符先替换回标准字母表（`-` -> `+`，`_` -> `/`）再解码。
pub fn decode_payload<T: DeserializeOwned>(token: &str) -> Result<T, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::SegmentCount(segments.len()));
    }
    let payload = segments[1];
    if payload.is_empty() {
        return Err(TokenError::EmptyPayload);
    }

    let standard = payload.replace('-', "+").replace('_', "/");
    let bytes = LENIENT_STANDARD
        .decode(standard.as_bytes())
        .map_err(|e| TokenError::Base64(e.to_string()))?;
    let json = String::from_utf8(bytes).map_err(|_| TokenError::Utf8)?;

    serde_json::from_str(&json).map_err(|e| TokenError::Json(e.to_string()))
}

/// 从存储的 token 中解析当前用户
///
/// 匿名访问是预期状态而不是异常，因此两种失败都以 `code = 1` 的 Envelope 返回。
pub fn current_user<S: SessionStore + ?Sized>(store: &S) -> Envelope<CurrentUser> {
    let Some(token) = store.get() else {
        return Envelope::failure(FAILURE_CODE, MSG_NO_TOKEN);
    };

    // 只有格式错误（段数、base64、UTF-8、JSON 语法）才算解析失败，字段类型由访问器宽松处理
    match decode_payload::<Value>(&token) {
        Ok(payload) => Envelope::success(CurrentUser::from(payload)),
        Err(e) => {
            warn!(error = %e, "Parse token failed");
            Envelope::failure(FAILURE_CODE, MSG_PARSE_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token_with_payload(json: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", URL_SAFE_NO_PAD.encode(json))
    }

    #[test]
    fn decodes_minimal_payload() {
        let store = MemorySessionStore::with_token(token_with_payload(r#"{"id":1}"#));
        let env = current_user(&store);

        assert_eq!(env.code, 0);
        assert_eq!(env.msg, "Success");
        let user = env.data.unwrap();
        assert_eq!(user.id(), Some(1));
        assert_eq!(user.payload, serde_json::json!({"id": 1}));
    }

    #[test]
    fn decodes_url_safe_characters_and_unicode() {
        // "ü?>" 的编码会产生 `-` 与 `_`
        let json = r#"{"id":7,"name":"Jürgen ü?>","username":"jb"}"#;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        assert!(encoded.contains('-') || encoded.contains('_'));

        let user: CurrentUser = decode_payload(&format!("h.{encoded}.s")).unwrap();
        assert_eq!(user.name().as_deref(), Some("Jürgen ü?>"));
        assert_eq!(user.username().as_deref(), Some("jb"));
    }

    #[test]
    fn accepts_padded_payload() {
        let padded = base64::engine::general_purpose::STANDARD.encode(r#"{"id":12}"#);
        let user: CurrentUser = decode_payload(&format!("h.{padded}.s")).unwrap();
        assert_eq!(user.id(), Some(12));
    }

    #[test]
    fn any_well_formed_json_payload_is_a_current_user() {
        let cases = [
            (r#"{"id":"1"}"#, Some(1)),
            (r#"{"id":1,"status":1}"#, Some(1)),
            (r#"{"sub":42}"#, None),
            ("[1,2]", None),
        ];
        for (json, id) in cases {
            let env = current_user(&MemorySessionStore::with_token(token_with_payload(json)));
            assert_eq!(env.code, 0, "payload {json}");
            let user = env.data.unwrap();
            assert_eq!(user.id(), id, "payload {json}");
            assert_eq!(user.payload, serde_json::from_str::<Value>(json).unwrap());
        }

        let env = current_user(&MemorySessionStore::with_token(token_with_payload(
            r#"{"id":1,"status":1}"#,
        )));
        assert_eq!(env.data.unwrap().status(), Some(true));

        let env = current_user(&MemorySessionStore::with_token(token_with_payload(r#"{"sub":42}"#)));
        assert_eq!(env.data.unwrap().sub().as_deref(), Some("42"));
    }

    #[test]
    fn two_segment_token_fails_to_parse() {
        let store = MemorySessionStore::with_token("header.payload");
        let env = current_user(&store);
        assert_eq!(env, Envelope::failure(1, MSG_PARSE_FAILED));
        assert_eq!(
            decode_payload::<CurrentUser>("header.payload"),
            Err(TokenError::SegmentCount(2))
        );
    }

    #[test]
    fn rejects_bad_base64_and_bad_json() {
        assert!(matches!(
            decode_payload::<CurrentUser>("a.!!!.c"),
            Err(TokenError::Base64(_))
        ));
        let not_json = URL_SAFE_NO_PAD.encode("not json");
        assert!(matches!(
            decode_payload::<CurrentUser>(&format!("a.{not_json}.c")),
            Err(TokenError::Json(_))
        ));
        assert_eq!(
            decode_payload::<CurrentUser>("a..c"),
            Err(TokenError::EmptyPayload)
        );

        let store = MemorySessionStore::with_token("a.!!!.c");
        assert_eq!(current_user(&store).msg, MSG_PARSE_FAILED);
    }

    #[test]
    fn rejects_non_utf8_payload() {
        let encoded = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
        assert_eq!(
            decode_payload::<CurrentUser>(&format!("a.{encoded}.c")),
            Err(TokenError::Utf8)
        );
    }

    #[test]
    fn missing_token_reports_no_token() {
        let env = current_user(&MemorySessionStore::new());
        assert_eq!(env.code, 1);
        assert_eq!(env.msg, MSG_NO_TOKEN);
        assert_eq!(env.data, None);
    }
}
