//! Request body extractors.
//!
//! [`ExpenseBody`] accepts the three encodings an expense form can arrive
//! in and hands the validators an untyped JSON object plus the uploaded
//! receipt, if any. [`ValidatedJson`] is the typed counterpart used by the
//! category and budget endpoints. [`Path`] and [`Query`] wrap axum's
//! extractors so their rejections share the JSON error envelope.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::{Form, Json};
use expense_core::expense::IMAGE;
use expense_core::media::UploadedFile;
use expense_core::validation::body::FromBody;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::AppError;

/// An expense payload in any supported encoding.
///
/// - `application/json`: the parsed body. An empty body is `{}`.
/// - `multipart/form-data`: text parts become string values, the
///   `expense_image` file part becomes [`ExpenseBody::upload`].
/// - `application/x-www-form-urlencoded`: every pair becomes a string value.
#[derive(Debug)]
pub struct ExpenseBody {
    pub data: Value,
    pub upload: Option<UploadedFile>,
}

impl<S> FromRequest<S> for ExpenseBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "multipart/form-data" => from_multipart(req, state).await,
            "application/x-www-form-urlencoded" => from_form(req, state).await,
            "" | "application/json" => from_json(req, state).await,
            m if m.ends_with("+json") => from_json(req, state).await,
            _ => Err(AppError::UnsupportedMediaType(format!(
                "Unsupported media type \"{content_type}\" in request."
            ))),
        }
    }
}

async fn from_json<S: Send + Sync>(req: Request, state: &S) -> Result<ExpenseBody, AppError> {
    let bytes = Bytes::from_request(req, state)
        .await
        .map_err(|e| rejection(e.status(), e.body_text()))?;

    let data = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(&bytes)
            .map_err(|e| AppError::BadRequest(format!("JSON parse error - {e}")))?
    };

    Ok(ExpenseBody { data, upload: None })
}

async fn from_form<S: Send + Sync>(req: Request, state: &S) -> Result<ExpenseBody, AppError> {
    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
        .await
        .map_err(|e| rejection(e.status(), e.body_text()))?;

    let data: Map<String, Value> = pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    Ok(ExpenseBody {
        data: Value::Object(data),
        upload: None,
    })
}

async fn from_multipart<S: Send + Sync>(req: Request, state: &S) -> Result<ExpenseBody, AppError> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| rejection(e.status(), e.body_text()))?;

    let mut data = Map::new();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejection(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match file_name {
            Some(file_name) => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| rejection(e.status(), e.body_text()))?;
                // Browsers send an empty, unnamed part for an untouched file input.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                if name == IMAGE {
                    upload = Some(UploadedFile {
                        file_name: Some(file_name),
                        bytes: bytes.to_vec(),
                    });
                }
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| rejection(e.status(), e.body_text()))?;
                data.insert(name, Value::String(text));
            }
        }
    }

    Ok(ExpenseBody {
        data: Value::Object(data),
        upload,
    })
}

fn rejection(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(message),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedMediaType(message),
        s if s.is_server_error() => AppError::InternalError(message),
        _ => AppError::BadRequest(message),
    }
}

/// JSON body read into `T` field by field, then checked with `validator`.
///
/// Missing, mistyped and out-of-range fields are all reported per field.
/// A body that is not JSON at all is a plain bad request.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: FromBody + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;
        let value = T::from_body(&body)?;
        value.validate().map_err(expense_core::validation::FieldErrors::from)?;
        Ok(ValidatedJson(value))
    }
}

/// [`axum::extract::Path`] with [`AppError`] as its rejection.
#[derive(Debug)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Path(value)| Path(value))
            .map_err(|e| rejection(e.status(), e.body_text()))
    }
}

/// [`axum::extract::Query`] with [`AppError`] as its rejection.
#[derive(Debug)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Query(value)| Query(value))
            .map_err(|e| rejection(e.status(), e.body_text()))
    }
}
