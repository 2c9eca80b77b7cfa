use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decoded, verified payload of a bearer token. Derived per request, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject identity of the caller.
    pub id: String,
    /// Free-form role string; only the literal `"admin"` is ever checked.
    pub role: String,
    /// Expiry is optional in the payload but enforced when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl AuthClaims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No Authorization header, or no token segment in it. Maps to 403.
    #[error("no token provided")]
    MissingToken,

    /// Token present but unverifiable: bad signature, malformed structure,
    /// expired, or a payload without a usable subject/role. Maps to 401.
    #[error("invalid token")]
    InvalidToken,

    /// Verified token whose role is not allowed for the operation. Maps to 403.
    #[error("admin role required")]
    AdminRequired,
}

/// Verifies bearer credentials against a shared HS256 secret. Constructed once
/// with the injected secret; verification is a pure synchronous computation.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens are not required to carry `exp`; when they do, the expiry
        // check still applies.
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify the raw `Authorization` header value. The token is the second
    /// whitespace-separated segment (`Bearer <token>`).
    pub fn verify_header(&self, header: Option<&str>) -> Result<AuthClaims, AuthError> {
        let token = header
            .and_then(|value| value.split_whitespace().nth(1))
            .ok_or(AuthError::MissingToken)?;
        self.verify(token)
    }

    /// Verify a bare token string and extract its claims, failing closed when
    /// the payload lacks a usable subject id or role.
    pub fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
        let data = decode::<AuthClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;

        let claims = data.claims;
        if claims.id.is_empty() || claims.role.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}
