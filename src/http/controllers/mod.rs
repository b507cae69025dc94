use actix_web::web;

pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(users::register::post))
            .route("/login", web::post().to(users::login::post))
            .route("/me", web::get().to(users::me::get))
            .route("/users", web::get().to(users::list::get))
            .service(
                web::resource("/users/{id}")
                    .route(web::patch().to(users::update::patch))
                    .route(web::delete().to(users::delete::delete)),
            ),
    );
}
