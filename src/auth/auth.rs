use crate::config::Config;
use crate::{model::role::Role, models::Claims};
use actix_web::{
    FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data,
};
use futures::future::{Ready, ready};
use jsonwebtoken::decode;
use jsonwebtoken::{DecodingKey, Validation};

/// Authenticated caller. Every account is an employee row.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub employee_id: u64,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            employee_id: claims.employee_id,
            email: claims.sub,
            role: claims.role,
        }
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // auth_middleware already validated the token on protected scopes
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => ready(Ok(data.claims.into())),
            Err(_) => ready(Err(ErrorUnauthorized("Invalid token"))),
        }
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Admin only"))
        }
    }

    /// Admins may touch any employee, everyone else only themselves.
    pub fn require_self_or_admin(&self, employee_id: u64) -> actix_web::Result<()> {
        if self.role.is_admin() || self.employee_id == employee_id {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Not allowed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(employee_id: u64, role: Role) -> AuthUser {
        AuthUser {
            employee_id,
            email: "someone@company.com".into(),
            role,
        }
    }

    #[test]
    fn only_admin_passes_admin_gate() {
        assert!(user(1, Role::Admin).require_admin().is_ok());
        assert!(user(2, Role::User).require_admin().is_err());
    }

    #[test]
    fn users_may_only_access_themselves() {
        let u = user(2, Role::User);
        assert!(u.require_self_or_admin(2).is_ok());
        assert!(u.require_self_or_admin(3).is_err());
        assert!(user(1, Role::Admin).require_self_or_admin(3).is_ok());
    }
}
