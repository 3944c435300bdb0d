//! HTTP inbound adapter: the registration page, the JSON registration API and
//! health probes.

pub mod error;
pub mod health;
pub mod page;
pub mod registration;
pub mod state;

use actix_web::web;

pub use error::ApiResult;

use self::error::json_error_handler;
use self::registration::{create_registration, registration_page, submit_registration_form};

/// Register the registration routes and the JSON body decoding rule.
///
/// Health probes are mounted separately because they depend on
/// [`health::HealthState`] rather than [`state::HttpState`].
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use signup::inbound::http::{configure, state::HttpState};
///
/// let state = HttpState::with_in_memory_store(Default::default());
/// let app = App::new()
///     .app_data(web::Data::new(state))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(registration_page)
        .service(submit_registration_form)
        .service(web::scope("/api/v1").service(create_registration));
}
