pub mod auth_handler;
pub mod session_handler;
pub mod user_handler;

use actix_web::web;

use crate::auth::AuthMiddleware;

pub use auth_handler::{login, register};
pub use session_handler::{create_session, get_problem, submit_answer};
pub use user_handler::{health_check, health_check_live, health_check_ready, mypage};

/// Registers every route. Everything outside health and auth needs a bearer token.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(register)
        .service(login)
        .service(
            web::scope("")
                .wrap(AuthMiddleware)
                .service(create_session)
                .service(get_problem)
                .service(submit_answer)
                .service(mypage),
        );
}
