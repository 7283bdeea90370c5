//! Session token signing and validation (HS256 JWT).

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{info, warn};

use super::AuthError;
use super::claims::SessionClaims;
use super::clock::Clock;

/// Signs and verifies stateless session tokens.
#[derive(Clone)]
pub struct SessionTokenCodec {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenCodec")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl SessionTokenCodec {
    pub fn new(issuer: impl Into<String>, secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        // Signature and structure only; expiry and issuer are checked
        // against the injected clock after the signature holds.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            issuer: issuer.into(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Mint a token that expires `lifetime_secs` from now.
    pub fn issue(&self, lifetime_secs: u64) -> Result<String, AuthError> {
        let lifetime = i64::try_from(lifetime_secs)
            .map_err(|_| AuthError::Internal(format!("token lifetime too large: {lifetime_secs}")))?;
        let exp = self
            .clock
            .now()
            .timestamp()
            .checked_add(lifetime)
            .ok_or_else(|| AuthError::Internal("token expiry overflows".to_string()))?;

        let claims = SessionClaims::new(self.issuer.clone(), exp);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Check a presented token.
    ///
    /// * absent -> `Ok(false)`
    /// * bad signature / malformed -> `Err(MalformedToken)`
    /// * expired -> `Ok(false)`
    /// * foreign issuer -> `Ok(false)`
    /// * otherwise -> `Ok(true)`
    pub fn validate(&self, token: Option<&str>) -> Result<bool, AuthError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(false);
        };

        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                warn!(jwt = %masked_token(token), "session token rejected: {:?}", e.kind());
                AuthError::MalformedToken(format!("{:?}", e.kind()))
            },
        )?;
        let claims = data.claims;

        if claims.is_expired_at(self.clock.now().timestamp()) {
            info!(jwt = %masked_token(token), exp = claims.exp, "token expired");
            return Ok(false);
        }

        if !claims.issued_by(&self.issuer) {
            info!(jwt = %masked_token(token), iss = ?claims.iss, "issuer mismatched");
            return Ok(false);
        }

        Ok(true)
    }
}

/// Hide the signature segment of a compact JWS for log output.
fn masked_token(token: &str) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        [header, payload, _signature] => format!("{header}.{payload}.***"),
        _ => "***".to_string(),
    }
}
