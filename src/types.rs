use serde::{Deserialize, Serialize};

/// Body of `/user/login` and `/user/request_token`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `/user/delete`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(rename = "Token")]
    pub token: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Credentials, UserId};

    #[test]
    fn bodies_use_pascal_case_keys() {
        let credentials = Credentials {
            username: "kit".to_owned(),
            password: "hunter2".to_owned(),
        };
        assert_eq!(
            serde_json::to_value(&credentials).unwrap(),
            json!({"Username": "kit", "Password": "hunter2"})
        );
        assert!(!format!("{credentials:?}").contains("hunter2"));

        let id = UserId { id: "42".to_owned() };
        assert_eq!(serde_json::to_value(&id).unwrap(), json!({"Id": "42"}));
    }
}
