use super::TEST_JWT_SECRET;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

/// A signed-in user as seen by the API
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

fn mint(role: Option<&str>, exp_offset: i64) -> TestUser {
    let user_id = Uuid::new_v4();
    let now = chrono::Utc::now().timestamp();
    let mut claims = json!({
        "sub": user_id,
        "aud": "authenticated",
        "role": "authenticated",
        "iat": now,
        "exp": now + exp_offset,
        "app_metadata": {}
    });
    if let Some(role) = role {
        claims["app_metadata"]["role"] = json!(role);
    }

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("encode session token");

    TestUser { user_id, token }
}

pub fn student() -> TestUser {
    mint(None, 3600)
}

pub fn admin() -> TestUser {
    mint(Some("admin"), 3600)
}

pub fn expired_student() -> TestUser {
    mint(None, -3600)
}
