//! Registration handlers.
//!
//! ```text
//! GET  /                         empty form
//! GET  /register                 empty form
//! POST /register                 url-encoded form, re-rendered page
//! POST /api/v1/registrations     {"name","email","password","confirmPassword"}
//! ```
//!
//! The pipeline blocks on file I/O and password hashing, so it runs on the
//! Actix blocking pool with the request's trace id re-entered there.

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, post, routes, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

use super::ApiResult;
use super::page::RegistrationPage;
use super::state::HttpState;
use crate::domain::{Error, FieldErrors, RegistrationForm, RegistrationOutcome, TraceId};

/// Url-encoded body of the HTML form. Absent fields read as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationFormBody {
    name: String,
    email: String,
    password: String,
    confirm_password: String,
}

impl From<RegistrationFormBody> for RegistrationForm {
    fn from(body: RegistrationFormBody) -> Self {
        Self::new(body.name, body.email, body.password, body.confirm_password)
    }
}

/// JSON body for `POST /api/v1/registrations`.
///
/// Example JSON:
/// `{"name":"Ada","email":"ada@example.com","password":"Abcdef1!","confirmPassword":"Abcdef1!"}`
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Display name; trimmed before validation.
    pub name: String,
    /// Email address; trimmed before validation.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Must equal `password`.
    #[serde(alias = "confirm_password")]
    pub confirm_password: String,
}

impl From<RegistrationRequest> for RegistrationForm {
    fn from(body: RegistrationRequest) -> Self {
        Self::new(body.name, body.email, body.password, body.confirm_password)
    }
}

/// Successful registration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    /// Success banner text.
    pub message: String,
}

/// Rejected registration with the submitted values to repopulate a form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationErrorResponse {
    /// Field name (`name`, `email`, `password`, `confirm_password`,
    /// `general`) to message.
    pub errors: BTreeMap<String, String>,
    /// Trimmed name as submitted.
    pub name: String,
    /// Trimmed email as submitted.
    pub email: String,
}

impl RegistrationErrorResponse {
    fn new(errors: &FieldErrors, form: &Echo) -> Self {
        Self {
            errors: errors
                .iter()
                .map(|(field, message)| (field.as_str().to_owned(), message.to_owned()))
                .collect(),
            name: form.name.clone(),
            email: form.email.clone(),
        }
    }
}

/// Submitted values that may be shown back to the user.
struct Echo {
    name: String,
    email: String,
}

fn status_for(outcome: &RegistrationOutcome, success: StatusCode) -> StatusCode {
    match outcome {
        RegistrationOutcome::Registered { .. } => success,
        rejected if rejected.is_general_failure() => StatusCode::INTERNAL_SERVER_ERROR,
        RegistrationOutcome::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn run_registration(
    state: &HttpState,
    form: RegistrationForm,
) -> ApiResult<(Echo, RegistrationOutcome)> {
    let echo = Echo {
        name: form.name().to_owned(),
        email: form.email().to_owned(),
    };
    let service = state.registration.clone();
    let trace_id = TraceId::current();
    let outcome = web::block(move || match trace_id {
        Some(id) => id.in_span(|| service.register(&form)),
        None => service.register(&form),
    })
    .await
    .map_err(|err| {
        error!(error = %err, "registration worker failed");
        Error::internal(format!("registration worker failed: {err}"))
    })?;
    Ok((echo, outcome))
}

fn html_page(status: StatusCode, page: &RegistrationPage<'_>) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(page.render())
}

/// Render the empty registration form.
#[routes]
#[get("/")]
#[get("/register")]
pub async fn registration_page() -> HttpResponse {
    html_page(StatusCode::OK, &RegistrationPage::blank())
}

/// Process an HTML form submission and re-render the page.
///
/// Responds 200 with a success banner, 422 with inline field errors, or 500
/// with a general error banner. A missing or non url-encoded body is
/// treated as a submission with every field empty.
#[post("/register")]
pub async fn submit_registration_form(
    state: web::Data<HttpState>,
    body: Option<web::Form<RegistrationFormBody>>,
) -> ApiResult<HttpResponse> {
    let body = body.map_or_else(
        || {
            debug!("form body missing or undecodable; fields read as empty");
            RegistrationFormBody::default()
        },
        web::Form::into_inner,
    );
    let (echo, outcome) = run_registration(&state, body.into()).await?;
    let page = RegistrationPage::for_outcome(&echo.name, &echo.email, &outcome);
    Ok(html_page(status_for(&outcome, StatusCode::OK), &page))
}

/// Register a user from a JSON body.
#[utoipa::path(
    post,
    path = "/api/v1/registrations",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "User registered", body = RegistrationResponse),
        (status = 400, description = "Body is not valid JSON", body = Error),
        (status = 422, description = "Field validation failed", body = RegistrationErrorResponse),
        (status = 500, description = "User document unavailable", body = RegistrationErrorResponse)
    ),
    tags = ["registrations"],
    operation_id = "register"
)]
#[post("/registrations")]
pub async fn create_registration(
    state: web::Data<HttpState>,
    payload: web::Json<RegistrationRequest>,
) -> ApiResult<HttpResponse> {
    let (echo, outcome) = run_registration(&state, payload.into_inner().into()).await?;
    let status = status_for(&outcome, StatusCode::CREATED);
    let response = match &outcome {
        RegistrationOutcome::Registered { message } => {
            HttpResponse::build(status).json(RegistrationResponse {
                message: message.clone(),
            })
        }
        RegistrationOutcome::Rejected(errors) => {
            HttpResponse::build(status).json(RegistrationErrorResponse::new(errors, &echo))
        }
    };
    Ok(response)
}
