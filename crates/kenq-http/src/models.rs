//! Backend authentication payloads

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Credentials posted to `/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub company_user_name: String,
    pub password: String,
}

/// User returned by a successful `/auth/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendUser {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub company_id: Option<String>,
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    optional_id_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing user id"))
}

fn optional_id_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!("unexpected id value {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_user_numeric_ids() {
        let user: BackendUser =
            serde_json::from_value(json!({"id": 12, "name": "佐藤", "company_id": 3})).unwrap();
        assert_eq!(user.id, "12");
        assert_eq!(user.company_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_backend_user_requires_id() {
        assert!(serde_json::from_value::<BackendUser>(json!({"id": null, "name": "x"})).is_err());
        let user: BackendUser = serde_json::from_value(json!({"id": "u1"})).unwrap();
        assert_eq!(user.company_id, None);
    }
}
