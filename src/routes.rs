use crate::{
    api::{bonus_report, employee, kondite, kpi, kpi_category, kpi_evaluation},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

/// Milliseconds between replenished requests for a per-minute budget.
fn replenish_interval_ms(requests_per_min: u32) -> u64 {
    if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    }
}

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(replenish_interval_ms(requests_per_min))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("rate limiter period and burst size are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public route, registered before the protected scope that shares its prefix
    cfg.service(
        web::resource(format!("{}/login", config.api_prefix))
            .wrap(login_limiter)
            .route(web::post().to(handlers::login)),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            // /bonus-report, /kalibrasi
            .service(web::resource("/bonus-report").route(web::get().to(bonus_report::bonus_report)))
            .service(web::resource("/kalibrasi").route(web::get().to(bonus_report::bonus_report)))
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/kpis")
                    .service(
                        web::resource("")
                            .route(web::get().to(kpi::list_kpis))
                            .route(web::post().to(kpi::create_kpi)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(kpi::get_kpi))
                            .route(web::put().to(kpi::update_kpi))
                            .route(web::delete().to(kpi::delete_kpi)),
                    ),
            )
            .service(
                web::scope("/kpi-categories")
                    .service(
                        web::resource("")
                            .route(web::get().to(kpi_category::list_kpi_categories))
                            .route(web::post().to(kpi_category::create_kpi_category)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(kpi_category::update_kpi_category))
                            .route(web::delete().to(kpi_category::delete_kpi_category)),
                    ),
            )
            .service(
                web::scope("/kpi_evaluations")
                    .service(
                        web::resource("")
                            .route(web::get().to(kpi_evaluation::list_kpi_evaluations))
                            .route(web::post().to(kpi_evaluation::create_kpi_evaluation)),
                    )
                    .service(
                        web::resource("/achievements")
                            .route(web::get().to(kpi_evaluation::achievement_levels)),
                    ),
            )
            .service(
                web::scope("/kondites")
                    .service(
                        web::resource("")
                            .route(web::get().to(kondite::list_kondites))
                            .route(web::post().to(kondite::create_kondite)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(kondite::update_kondite))
                            .route(web::delete().to(kondite::delete_kondite)),
                    ),
            ),
    );
}
