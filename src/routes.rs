//! Route configuration
//!
//! Centralized route setup; each domain (auth, posts, comments, users)
//! manages its own routes.

use crate::handlers;
use crate::middleware::JwtAuthMiddleware;
use actix_web::web;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health_check))
            .configure(routes::auth::configure)
            .configure(routes::posts::configure)
            .configure(routes::comments::configure)
            .configure(routes::users::configure),
    );
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod auth {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login)),
            );
        }
    }

    // Reads are public; writes authenticate through the AuthenticatedUser
    // extractor so both can share one scope.
    pub mod posts {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/posts")
                    .route("", web::get().to(handlers::list_posts))
                    .route("", web::post().to(handlers::create_post))
                    .route("/{id}", web::get().to(handlers::get_post))
                    .route("/{id}", web::put().to(handlers::update_post))
                    .route("/{id}", web::delete().to(handlers::delete_post))
                    .route("/{id}/like", web::put().to(handlers::toggle_like)),
            );
        }
    }

    pub mod comments {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/comments")
                    .route("/{post_id}", web::get().to(handlers::list_comments))
                    .route("/{post_id}", web::post().to(handlers::add_comment))
                    .route("/{comment_id}", web::delete().to(handlers::delete_comment)),
            );
        }
    }

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/users")
                    .wrap(JwtAuthMiddleware)
                    .route("/profile", web::put().to(handlers::update_profile)),
            );
        }
    }
}
