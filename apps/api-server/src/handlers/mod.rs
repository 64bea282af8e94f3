//! HTTP handlers and route configuration.

mod auth;
mod bookings;
mod health;
mod reviews;
mod users;
mod vehicles;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/verify-otp", web::post().to(auth::verify_otp))
                    .route("/toggle-role", web::post().to(auth::toggle_role)),
            )
            .service(
                web::scope("/vehicles")
                    .route("", web::get().to(vehicles::list))
                    .route("", web::post().to(vehicles::create))
                    .route("/{id}", web::get().to(vehicles::get))
                    .route("/{id}", web::put().to(vehicles::update))
                    .route("/{id}", web::delete().to(vehicles::delete)),
            )
            .service(
                web::scope("/bookings")
                    .route("", web::get().to(bookings::list_mine))
                    .route("", web::post().to(bookings::create))
                    .route("/all", web::get().to(bookings::list_all))
                    .route("/{id}", web::get().to(bookings::get))
                    .route("/{id}", web::put().to(bookings::update))
                    .route("/{id}", web::delete().to(bookings::delete)),
            )
            .service(
                web::scope("/reviews")
                    .route("", web::post().to(reviews::create))
                    .route("/vehicle/{vehicle_id}", web::get().to(reviews::list_for_vehicle))
                    .route("/{id}", web::put().to(reviews::update))
                    .route("/{id}", web::delete().to(reviews::delete)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list))
                    .route("/{id}", web::get().to(users::get)),
            ),
    );
}
