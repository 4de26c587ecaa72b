//! HTTP handlers and route configuration.

mod ai;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // Post collection
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/featured", web::get().to(posts::featured_posts))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            // Generative services
            .service(
                web::scope("/ai")
                    .route("/article", web::post().to(ai::generate_article))
                    .route("/cover", web::post().to(ai::generate_cover))
                    .route("/speech", web::post().to(ai::synthesize_speech)),
            ),
    );
}
