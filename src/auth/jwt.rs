use crate::{
    model::role::Role,
    models::Claims,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

pub fn generate_access_token(
    employee_id: u64,
    email: String,
    role: Role,
    secret: &str,
    ttl: usize,
) -> Result<String, Error> {
    let claims = Claims {
        employee_id,
        sub: email,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_carries_employee_and_role() {
        let token =
            generate_access_token(42, "budi@company.com".into(), Role::User, "s3cret", 900)
                .unwrap();
        let claims = verify_token(&token, "s3cret").unwrap();

        assert_eq!(claims.employee_id, 42);
        assert_eq!(claims.sub, "budi@company.com");
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > now());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token =
            generate_access_token(1, "admin@admin.com".into(), Role::Admin, "right", 900).unwrap();
        assert!(verify_token(&token, "wrong").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            employee_id: 1,
            sub: "admin@admin.com".into(),
            role: Role::Admin,
            exp: now() - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"key"),
        )
        .unwrap();

        assert!(verify_token(&token, "key").is_err());
    }
}
