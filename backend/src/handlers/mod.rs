use actix_web::web;

pub mod achievements;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").configure(achievements::configure));
}
