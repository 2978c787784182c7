//! Token issuance and verification (HMAC-SHA-512 signed JWTs).

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{TokenClaims, TokenError, validate_claims};

/// Default validity window of an issued token.
pub const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 24;

const ALGORITHM: Algorithm = Algorithm::HS512;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

impl IssuedToken {
    pub fn expires_in_secs(&self) -> i64 {
        (self.claims.expires_at - self.claims.issued_at).num_seconds()
    }
}

/// Stateless token service holding the symmetric signing secret.
///
/// Cheap to share behind an `Arc`; nothing is mutated after construction.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_validity(secret, Duration::hours(DEFAULT_TOKEN_VALIDITY_HOURS))
    }

    /// `validity` must be positive; a non-positive window produces tokens that
    /// never verify.
    pub fn with_validity(secret: &[u8], validity: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            validity,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign a token for `subject`, valid from `now` for the configured window.
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(self.validity)
            .ok_or_else(|| TokenError::Signing("expiry is out of range".to_string()))?;
        let claims = TokenClaims {
            sub: subject.to_string(),
            issued_at,
            expires_at,
        };

        let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Check signature, then expiry, and return the verified claims.
    ///
    /// The signature is checked before the payload is parsed, so a tampered
    /// payload always reports `BadSignature`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(classify)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        _ => TokenError::Malformed,
    }
}
