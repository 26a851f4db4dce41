pub mod financial;
pub mod health;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(financial::index)).service(
        web::scope("/api")
            .configure(health::config)
            .configure(financial::config),
    );
}
