//! HS256 session token verification

use crate::auth::models::SessionClaims;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use mainsdesk_core::AppError;

/// Verifies session tokens signed with the auth provider's shared JWT secret
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;
        // The provider sets aud="authenticated" on every session; nothing to pin.
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    ErrorKind::ImmatureSignature => {
                        AppError::Unauthorized("Token is not yet valid (nbf)".to_string())
                    }
                    ErrorKind::InvalidSignature => {
                        AppError::Unauthorized("Invalid token signature".to_string())
                    }
                    _ => AppError::Unauthorized("Invalid or expired token".to_string()),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::AppMetadata;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test-jwt-secret-with-at-least-32-chars";

    fn token(secret: &str, exp_offset: i64) -> (Uuid, String) {
        let now = chrono::Utc::now().timestamp();
        let sub = Uuid::new_v4();
        let claims = SessionClaims {
            sub,
            exp: now + exp_offset,
            iat: now,
            role: Some("authenticated".to_string()),
            email: Some("aspirant@example.com".to_string()),
            app_metadata: AppMetadata::default(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        (sub, token)
    }

    #[test]
    fn test_valid_token() {
        let (sub, token) = token(SECRET, 3600);
        let claims = SessionVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(claims.sub, sub);
    }

    #[test]
    fn test_expired_token_rejected() {
        let (_, token) = token(SECRET, -3600);
        let err = SessionVerifier::new(SECRET).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref msg) if msg.contains("expired")));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let (_, token) = token("another-secret-that-is-also-32-chars!!", 3600);
        assert!(SessionVerifier::new(SECRET).verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(SessionVerifier::new(SECRET).verify("not.a.jwt").is_err());
    }
}
