use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::database::{DatabaseError, Store};

/// Claim set carried by a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token expired")]
    TokenExpired,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Mints and validates HS256 session tokens with a server-side secret.
/// Tokens are stateless: validity is decided by signature and `exp` alone.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(&security.jwt_secret, Duration::hours(security.jwt_expiry_hours as i64))
    }

    pub fn mint(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            id: user.id,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Fails on malformed tokens, any algorithm other than HS256, a bad
    /// signature, or an `exp` at or before the current instant.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::Unauthorized(e.to_string()),
        })?;

        // jsonwebtoken only rejects exp strictly in the past
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims)
    }
}

/// Runs bcrypt verification off the async workers. Lookups for unknown
/// users are checked against a placeholder hash of the same cost, so both
/// failure paths pay for one full verification.
pub struct PasswordVerifier {
    placeholder_hash: String,
}

impl PasswordVerifier {
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        let placeholder_hash =
            bcrypt::hash(Uuid::new_v4().to_string(), cost).map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self { placeholder_hash })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(security.bcrypt_cost)
    }

    /// `None` stands for an unknown user and always yields `false`.
    pub async fn verify(&self, password: &str, user: Option<&User>) -> Result<bool, AuthError> {
        let known = user.is_some();
        let hash = user
            .map(|u| u.encrypted_password.clone())
            .unwrap_or_else(|| self.placeholder_hash.clone());
        let password = password.to_string();

        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(known && matched)
    }
}

/// Look up `email` and check `password`. Unknown email and wrong password
/// both surface as [`AuthError::InvalidCredentials`] after the same amount
/// of hashing work.
pub async fn authenticate(
    store: &Store,
    tokens: &TokenService,
    passwords: &PasswordVerifier,
    email: &str,
    password: &str,
) -> Result<(User, String), AuthError> {
    let user = store.users.select_by_email(email).await?;
    let matched = passwords.verify(password, user.as_ref()).await?;

    let user = match user {
        Some(user) if matched => user,
        Some(user) => {
            tracing::debug!("authentication failed: password mismatch for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }
        None => {
            tracing::debug!("authentication failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let token = tokens.mint(&user)?;
    tracing::debug!("authenticated user {}", user.id);
    Ok((user, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CreateUserParams;

    fn user() -> User {
        User::from_params(
            CreateUserParams {
                first_name: "James".to_string(),
                last_name: "Foo".to_string(),
                email: "james@foo.com".to_string(),
                password: "james_foo".to_string(),
            },
            crate::config::MIN_BCRYPT_COST,
        )
        .unwrap()
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(TokenService::new("", Duration::hours(1)), Err(AuthError::InvalidSecret)));
    }

    #[test]
    fn minted_token_validates_to_same_user() {
        let tokens = TokenService::new("secret", Duration::hours(4)).unwrap();
        let user = user();
        let token = tokens.mint(&user).unwrap();

        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.exp - claims.iat, 4 * 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new("secret", Duration::seconds(-30)).unwrap();
        let token = tokens.mint(&user()).unwrap();
        assert!(matches!(tokens.validate(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn token_at_expiry_instant_is_rejected() {
        let tokens = TokenService::new("secret", Duration::zero()).unwrap();
        let token = tokens.mint(&user()).unwrap();
        assert!(matches!(tokens.validate(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let minting = TokenService::new("secret", Duration::hours(1)).unwrap();
        let checking = TokenService::new("other-secret", Duration::hours(1)).unwrap();
        let token = minting.mint(&user()).unwrap();
        assert!(matches!(checking.validate(&token), Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn unexpected_algorithm_is_rejected() {
        let tokens = TokenService::new("secret", Duration::hours(1)).unwrap();
        let now = Utc::now();
        let claims = Claims {
            id: Uuid::new_v4(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(matches!(tokens.validate(&token), Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let tokens = TokenService::new("secret", Duration::hours(1)).unwrap();
        assert!(matches!(tokens.validate("not.a.token"), Err(AuthError::Unauthorized(_))));
        assert!(matches!(tokens.validate(""), Err(AuthError::Unauthorized(_))));
    }

    fn verifier() -> PasswordVerifier {
        PasswordVerifier::new(crate::config::MIN_BCRYPT_COST).unwrap()
    }

    #[tokio::test]
    async fn authenticate_does_not_distinguish_failure_causes() {
        let store = Store::memory();
        let tokens = TokenService::new("secret", Duration::hours(1)).unwrap();
        let passwords = verifier();
        store.users.insert(user()).await.unwrap();

        let wrong_password = authenticate(&store, &tokens, &passwords, "james@foo.com", "incorrect").await;
        let unknown_email = authenticate(&store, &tokens, &passwords, "nobody@foo.com", "james_foo").await;
        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
        assert_eq!(
            wrong_password.unwrap_err().to_string(),
            unknown_email.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn authenticate_returns_user_and_token() {
        let store = Store::memory();
        let tokens = TokenService::new("secret", Duration::hours(1)).unwrap();
        let stored = store.users.insert(user()).await.unwrap();

        let (user, token) = authenticate(&store, &tokens, &verifier(), "James@Foo.com", "james_foo")
            .await
            .unwrap();
        assert_eq!(user, stored);
        assert_eq!(tokens.validate(&token).unwrap().id, stored.id);
    }

    #[tokio::test]
    async fn unknown_user_never_verifies() {
        let passwords = verifier();
        assert!(!passwords.verify("anything", None).await.unwrap());

        let user = user();
        assert!(passwords.verify("james_foo", Some(&user)).await.unwrap());
        assert!(!passwords.verify("incorrect", Some(&user)).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_email_costs_as_much_as_wrong_password() {
        let cost = 10;
        let store = Store::memory();
        let tokens = TokenService::new("secret", Duration::hours(1)).unwrap();
        let passwords = PasswordVerifier::new(cost).unwrap();

        let mut james = user();
        james.encrypted_password = bcrypt::hash("james_foo", cost).unwrap();
        store.users.insert(james).await.unwrap();

        let started = std::time::Instant::now();
        let wrong = authenticate(&store, &tokens, &passwords, "james@foo.com", "incorrect").await;
        let wrong_elapsed = started.elapsed();

        let started = std::time::Instant::now();
        let unknown = authenticate(&store, &tokens, &passwords, "nobody@foo.com", "incorrect").await;
        let unknown_elapsed = started.elapsed();

        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        assert!(
            unknown_elapsed * 4 >= wrong_elapsed,
            "unknown email took {:?}, wrong password took {:?}",
            unknown_elapsed,
            wrong_elapsed
        );
    }
}
