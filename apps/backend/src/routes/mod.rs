use actix_web::web;

pub mod game;
pub mod health;
pub mod moves;
pub mod realtime;

/// Register every HTTP route. `main.rs` and the route tests share this.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(game::configure_routes)
        .configure(moves::configure_routes)
        .configure(health::configure_routes)
        .configure(realtime::configure_routes);
}
