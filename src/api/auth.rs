use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::client::{ApiClient, RequestOptions};
use super::types::{LoginResponseDto, LoginResult, RegisterData};
use crate::constants::UNKNOWN_USER_ID;
use crate::utils::ApiError;

/// Claims tried in order when the login response carries no user id
const USER_ID_CLAIMS: [&str; 3] = ["UserId", "nameid", "sub"];

/// Decode the user id from a JWT payload without verifying the signature.
///
/// Any malformed token yields `unknown-user`.
pub fn extract_user_id(token: &str) -> String {
    let token = token.strip_prefix("Bearer ").unwrap_or(token);
    let claims = token
        .split('.')
        .nth(1)
        .and_then(|payload| URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok())
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok());

    let Some(claims) = claims else {
        warn!("Could not decode user id from token payload");
        return UNKNOWN_USER_ID.to_string();
    };

    USER_ID_CLAIMS
        .iter()
        .filter_map(|claim| match claims.get(*claim) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .next()
        .unwrap_or_else(|| UNKNOWN_USER_ID.to_string())
}

/// Substitute a readable message for an empty error body
fn describe_failure(err: ApiError, what: &str) -> ApiError {
    match err {
        ApiError::Status { status, body } if body.trim().is_empty() => ApiError::Status {
            status,
            body: format!("{} failed with status: {}", what, status),
        },
        other => other,
    }
}

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, ApiError> {
        info!("Attempting login for {}", email);

        let options =
            RequestOptions::json(Method::POST, &json!({ "email": email, "password": password }))?;
        let response: LoginResponseDto = self
            .request_or_default("/auth/login", options, None)
            .await
            .map_err(|e| describe_failure(e, "Login"))
            .inspect_err(|e| warn!("Login failed: {}", e))?;

        let token = response
            .jw_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Decode("login response carries no token".to_string()))?;
        let user_id = match response.user_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => extract_user_id(&token),
        };
        debug!("Login response received for user {}", user_id);

        Ok(LoginResult {
            token,
            user_id,
            user: response.user_dto,
        })
    }

    /// `POST /auth/register`
    pub async fn register(&self, data: &RegisterData) -> Result<Option<Value>, ApiError> {
        info!("Attempting registration for {}", data.email);

        let options = RequestOptions::json(Method::POST, data)?;
        self.request("/auth/register", options, None)
            .await
            .map_err(|e| describe_failure(e, "Registration"))
            .inspect_err(|e| warn!("Registration failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn jwt(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_extract_user_id_claim_order() {
        assert_eq!(extract_user_id(&jwt(json!({"UserId": "a", "sub": "c"}))), "a");
        assert_eq!(extract_user_id(&jwt(json!({"nameid": "b", "sub": "c"}))), "b");
        assert_eq!(extract_user_id(&jwt(json!({"sub": 42}))), "42");
        assert_eq!(extract_user_id(&jwt(json!({"role": "donor"}))), "unknown-user");
        assert_eq!(extract_user_id("not-a-jwt"), "unknown-user");
        assert_eq!(extract_user_id("a.!!!.c"), "unknown-user");
    }

    #[tokio::test]
    async fn test_login_reads_backend_field_names() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(json!({"email": "a@b.dz", "password": "pw"})))
            .with_status(200)
            .with_body(r#"{"jwToken":"tok","userId":"u1","userDTO":{"donorName":"Amina"}}"#)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let result = client.login("a@b.dz", "pw").await.unwrap();

        assert_eq!(result.token, "tok");
        assert_eq!(result.user_id, "u1");
        assert_eq!(
            result.user.and_then(|u| u.donor_name).as_deref(),
            Some("Amina")
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_falls_back_to_token_claims() {
        let mut server = Server::new_async().await;
        let token = jwt(json!({"nameid": "from-claims"}));
        server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_body(json!({ "jwToken": token }).to_string())
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let result = client.login("a@b.dz", "pw").await.unwrap();
        assert_eq!(result.user_id, "from-claims");
        assert_eq!(result.user, None);
    }

    #[tokio::test]
    async fn test_login_failure_with_empty_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .with_status(401)
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let err = client.login("a@b.dz", "bad").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 401,
                body: "Login failed with status: 401".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_register_keeps_server_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/auth/register")
            .with_status(400)
            .with_body("email already used")
            .create_async()
            .await;

        let client = ApiClient::with_base_url(&server.url()).unwrap();
        let data = RegisterData {
            name: "Amina".to_string(),
            email: "a@b.dz".to_string(),
            password: "pw".to_string(),
            blood_type: "O+".to_string(),
            wilaya: "Alger".to_string(),
            last_donation: None,
        };
        let err = client.register(&data).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("email already used"));
    }
}
