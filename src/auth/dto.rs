use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// User shape returned to clients. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

/// Response body for signup, matching the `{ "user": ... }` wire shape.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_omits_password() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            name: Some("Tester".into()),
            email: "test@example.com".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn signup_request_accepts_missing_fields() {
        let req: SignupRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.c"));
        assert!(req.password.is_none());
        assert!(req.name.is_none());
    }
}
