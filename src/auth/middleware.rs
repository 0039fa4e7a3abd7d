use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => h.to_str().map_err(|_| {
            actix_web::error::ErrorUnauthorized(
                json!({"error": "Invalid Authorization header encoding"}),
            )
        })?,
        None => {
            let resp =
                HttpResponse::Unauthorized().json(json!({"error": "Missing Authorization header"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Authorization header must start with Bearer"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Invalid or expired token", "details": e}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    req.extensions_mut().insert(AuthUser::from(claims));

    next.call(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::kpi_evaluation::achievement_levels;
    use crate::auth::jwt::generate_access_token;
    use crate::model::role::Role;
    use actix_web::{App, http::StatusCode, middleware::from_fn, test, web};

    fn test_config() -> Config {
        Config {
            database_url: "mysql://localhost/unused".into(),
            jwt_secret: "middleware-secret".into(),
            server_addr: "127.0.0.1:0".into(),
            access_token_ttl: 900,
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api".into(),
            log_dir: "logs".into(),
        }
    }

    macro_rules! protected_app {
        () => {
            test::init_service(
                App::new().app_data(Data::new(test_config())).service(
                    web::scope("/api")
                        .wrap(from_fn(auth_middleware))
                        .route("/achievements", web::get().to(achievement_levels)),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let app = protected_app!();
        let req = test::TestRequest::get().uri("/api/achievements").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn non_bearer_header_is_unauthorized() {
        let app = protected_app!();
        let req = test::TestRequest::get()
            .uri("/api/achievements")
            .insert_header(("Authorization", "Basic YWRtaW46YWRtaW4="))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn token_signed_with_other_secret_is_unauthorized() {
        let app = protected_app!();
        let token =
            generate_access_token(2, "budi@company.com".into(), Role::User, "other", 900).unwrap();
        let req = test::TestRequest::get()
            .uri("/api/achievements")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn valid_token_reaches_handler() {
        let app = protected_app!();
        let config = test_config();
        let token = generate_access_token(
            2,
            "budi@company.com".into(),
            Role::User,
            &config.jwt_secret,
            config.access_token_ttl,
        )
        .unwrap();
        let req = test::TestRequest::get()
            .uri("/api/achievements")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"][2], "good 3");
        assert_eq!(body["data"].as_array().map(Vec::len), Some(5));
    }
}
