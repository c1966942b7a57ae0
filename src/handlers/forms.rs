//! Request bodies shared by the user routes, with their field checks.
//!
//! Bodies are read as JSON or as `application/x-www-form-urlencoded`. A body
//! that cannot be read is answered like a failed field check (422) on the user
//! routes and like a failed login (400) on `/login`.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
    Form, Json,
};
use chrono::{DateTime, NaiveDate};
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{ApiError, FieldError};

/// Field order used when reporting validation failures.
const FIELD_ORDER: &[&str] = &["Username", "Password", "Email", "Birthday"];

/// Profile submitted on registration and on update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct UserForm {
    #[serde(default)]
    #[validate(
        length(min = 5, message = "Username is required"),
        custom(function = "alphanumeric")
    )]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(default)]
    #[validate(email(message = "Email does not appear to be valid"))]
    pub email: String,

    #[serde(default, deserialize_with = "birthday")]
    pub birthday: Option<NaiveDate>,
}

/// Credentials submitted to `/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp such as `1990-05-17T00:00:00.000Z`.
pub fn parse_birthday(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|at| at.date_naive()))
}

fn birthday<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_birthday(text)
            .map(Some)
            .ok_or_else(|| de::Error::custom("Birthday is not a valid date")),
    }
}

fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Ok(());
    }
    let mut error = ValidationError::new("alphanumeric");
    error.message = Some("Username contains non alphanumeric characters - not allowed.".into());
    Err(error)
}

impl UserForm {
    /// Runs every field check, failing with 422 and one entry per failed check.
    pub fn check(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| ApiError::UnprocessableEntity(field_errors(&errors)))
    }
}

#[async_trait]
impl<S> FromRequest<S> for UserForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = read_body(req, state)
            .await
            .map_err(|msg| ApiError::UnprocessableEntity(vec![body_error(msg)]))?;
        parse_fields(body).map_err(ApiError::UnprocessableEntity)
    }
}

#[async_trait]
impl<S> FromRequest<S> for LoginForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = read_body(req, state).await.map_err(|msg| {
            tracing::info!("Login failed: unreadable body: {}", msg);
            ApiError::LoginFailed
        })?;
        parse_fields(body).map_err(|errors| {
            tracing::info!("Login failed: {} malformed field(s)", errors.len());
            ApiError::LoginFailed
        })
    }
}

fn is_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Reads the body as a JSON value, returning the rejection text on failure.
async fn read_body<S>(req: Request, state: &S) -> Result<Value, String>
where
    S: Send + Sync,
{
    if is_urlencoded(req.headers()) {
        let Form(value) = Form::<Value>::from_request(req, state).await.map_err(|e| e.body_text())?;
        Ok(value)
    } else {
        let Json(value) = Json::<Value>::from_request(req, state).await.map_err(|e| e.body_text())?;
        Ok(value)
    }
}

fn body_error(msg: String) -> FieldError {
    FieldError { location: "body", param: "body".to_string(), msg }
}

/// Deserializes a form whose fields all have defaults, naming each field that
/// fails on its own.
fn parse_fields<T: DeserializeOwned>(body: Value) -> Result<T, Vec<FieldError>> {
    let object = match body {
        Value::Object(object) => object,
        _ => return Err(vec![body_error("Request body must be an object".to_string())]),
    };

    let mut errors = Vec::new();
    for (key, value) in &object {
        let mut single = Map::new();
        single.insert(key.clone(), value.clone());
        if let Err(e) = serde_json::from_value::<T>(Value::Object(single)) {
            errors.push(FieldError { location: "body", param: key.clone(), msg: e.to_string() });
        }
    }
    if !errors.is_empty() {
        sort_fields(&mut errors);
        return Err(errors);
    }

    serde_json::from_value(Value::Object(object)).map_err(|e| vec![body_error(e.to_string())])
}

fn sort_fields(errors: &mut [FieldError]) {
    errors.sort_by_key(|e| FIELD_ORDER.iter().position(|f| *f == e.param).unwrap_or(FIELD_ORDER.len()));
}

fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, failures) in errors.field_errors() {
        let param = wire_name(&field);
        for failure in failures.iter() {
            let msg = match &failure.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value ({})", failure.code),
            };
            out.push(FieldError { location: "body", param: param.clone(), msg });
        }
    }
    sort_fields(&mut out);
    out
}

/// Maps a struct field name to its JSON name, e.g. `username` to `Username`.
fn wire_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
