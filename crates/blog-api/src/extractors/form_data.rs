//! Form data with optional file uploads
//!
//! Accepts `multipart/form-data` (the post and profile forms) as well as
//! plain urlencoded bodies. Text fields are kept as strings and deserialized
//! on demand; file parts become [`NewAsset`]s.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRef, FromRequest, Multipart, Request},
    http::{header, StatusCode},
    Form,
};
use blog_common::AppError;
use blog_core::NewAsset;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, NewAsset>,
}

impl FormData {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A ticked checkbox
    pub fn checked(&self, name: &str) -> bool {
        matches!(self.field(name), Some("on" | "true" | "1" | "yes"))
    }

    /// Remove and return a non-empty upload
    pub fn take_file(&mut self, name: &str) -> Option<NewAsset> {
        self.files.remove(name).filter(|asset| !asset.is_empty())
    }

    /// Deserialize the text fields into `T` without validating
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let object = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| ApiError::invalid_body(e.to_string()))
    }

    /// Deserialize the text fields into `T` and validate them
    pub fn parse_valid<T: DeserializeOwned + Validate>(&self) -> Result<T, ApiError> {
        let value: T = self.parse()?;
        value.validate()?;
        Ok(value)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::invalid_body(e.body_text()))?;
            return Ok(Self {
                fields,
                files: HashMap::new(),
            });
        }

        let max_mb = AppState::from_ref(state).config().storage.max_file_size_mb;
        let upload_error = |err: MultipartError| {
            if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::App(AppError::PayloadTooLarge { max_mb })
            } else {
                ApiError::invalid_body(err.body_text())
            }
        };

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        let mut data = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            match field.file_name().map(ToString::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(ToString::to_string);
                    let bytes = field.bytes().await.map_err(upload_error)?;
                    // Browsers send an empty part for an untouched file input
                    if bytes.is_empty() {
                        continue;
                    }
                    let mut asset = NewAsset::new(bytes.to_vec()).with_filename(file_name);
                    if let Some(content_type) = content_type {
                        asset = asset.with_content_type(content_type);
                    }
                    data.files.insert(name, asset);
                }
                None => {
                    let value = field.text().await.map_err(upload_error)?;
                    data.fields.insert(name, value);
                }
            }
        }

        Ok(data)
    }
}
