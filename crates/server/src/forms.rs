//! Request bodies that arrive either as `multipart/form-data` (browser form
//! with an optional image) or as JSON (API clients without an image).

use std::collections::HashMap;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde_json::Value;
use tracing::debug;

use crate::errors::ApiError;

pub const IMAGE_FIELD: &str = "image";

/// A file part taken from a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Text fields plus the optional `image` part.
#[derive(Debug, Default)]
pub struct FormPayload {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl FormPayload {
    /// Trimmed value of a field, `None` when missing or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    pub fn require(&self, name: &str) -> Result<&str, ApiError> {
        self.text(name).ok_or_else(|| {
            debug!(field = name, "missing form field");
            ApiError::invalid_inputs()
        })
    }

    /// Raw value (untrimmed); passwords are taken verbatim.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Parse an optional numeric field; present but unparsable is an error.
    pub fn number(&self, name: &str) -> Result<Option<f64>, ApiError> {
        match self.text(name) {
            None => Ok(None),
            Some(v) => v.parse::<f64>().map(Some).map_err(|_| ApiError::invalid_inputs()),
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut payload = FormPayload::default();
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!(error = %e, "malformed multipart body");
            ApiError::invalid_inputs()
        })? {
            let Some(name) = field.name().map(str::to_string) else { continue };
            if name == IMAGE_FIELD {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    debug!(error = %e, "image part unreadable");
                    ApiError::invalid_inputs()
                })?;
                if !bytes.is_empty() {
                    payload.image = Some(UploadedImage { content_type, bytes });
                }
            } else {
                let value = field.text().await.map_err(|_| ApiError::invalid_inputs())?;
                payload.fields.insert(name, value);
            }
        }
        Ok(payload)
    }

    fn from_json(map: serde_json::Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                Value::Number(n) => Some((k, n.to_string())),
                Value::Bool(b) => Some((k, b.to_string())),
                _ => None,
            })
            .collect();
        FormPayload { fields, image: None }
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|_| ApiError::invalid_inputs())?;
            return Self::from_multipart(multipart).await;
        }

        let Json(map) = Json::<serde_json::Map<String, Value>>::from_request(req, state)
            .await
            .map_err(|e| {
                debug!(error = %e, "rejected json body");
                ApiError::invalid_inputs()
            })?;
        Ok(Self::from_json(map))
    }
}
