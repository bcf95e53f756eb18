use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carry the principal id plus its role flags so handlers can gate
/// actions without a user lookup per request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub is_student: bool,
    pub is_admin: bool,
    pub is_interviewer: bool,
    pub exp: i64,
}

pub fn create_jwt(
    user_id: i32,
    is_student: bool,
    is_admin: bool,
    is_interviewer: bool,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        is_student,
        is_admin,
        is_interviewer,
        exp: (Utc::now() + Duration::hours(24)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_claims() {
        let token = create_jwt(42, true, false, true, "test-secret").unwrap();
        let claims = verify_jwt(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, 42);
        assert!(claims.is_student);
        assert!(!claims.is_admin);
        assert!(claims.is_interviewer);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_jwt(1, true, false, false, "secret-a").unwrap();
        assert!(verify_jwt(&token, "secret-b").is_err());
    }
}
