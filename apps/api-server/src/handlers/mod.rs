//! HTTP handlers and route configuration.

mod analytics;
mod dispatch;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Post lifecycle
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create))
                    .route("", web::get().to(posts::list))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/cancel", web::post().to(posts::cancel)),
            )
            // Aggregation views
            .service(
                web::scope("/analytics")
                    .route("/overview", web::get().to(analytics::overview))
                    .route("/trends", web::get().to(analytics::trends))
                    .route("/top-posts", web::get().to(analytics::top_posts))
                    .route("/schedule", web::get().to(analytics::schedule)),
            )
            // Operator-facing dispatch trigger
            .service(web::scope("/dispatch").route("/tick", web::post().to(dispatch::tick))),
    );
}
