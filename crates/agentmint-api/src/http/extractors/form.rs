//! Multipart form extractor for the agent and NFT creation endpoints.

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::http::error::AppError;

/// An uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// File contents as text. Invalid UTF-8 is replaced, not rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// `data:<mime>;base64,<payload>` URL for inline image storage.
    pub fn data_url(&self) -> String {
        let mime = self
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");
        format!("data:{mime};base64,{}", STANDARD.encode(&self.bytes))
    }
}

/// All text fields and file parts of a multipart body, keyed by field name.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(invalid_body)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(invalid_body)?;
                    // Browsers send an empty, unnamed part when no file was picked.
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field.text().await.map_err(invalid_body)?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text field, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// First non-blank field among `names`.
    pub fn first_text(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.text(name))
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    /// `true` only for the literal string "true".
    pub fn flag(&self, name: &str) -> bool {
        self.text(name) == Some("true")
    }
}

fn invalid_body(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart body: {}", err.body_text()))
}

impl<S: Send + Sync> FromRequest<S> for FormData {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        Self::read(multipart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        let file = UploadedFile {
            file_name: "a.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: b"hi".to_vec(),
        };
        assert_eq!(file.data_url(), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_text_lookup_trims_and_skips_blank() {
        let mut form = FormData::default();
        form.fields.insert("name".to_string(), "   ".to_string());
        form.fields.insert("agentName".to_string(), " Atlas ".to_string());
        form.fields.insert("walletConnected".to_string(), "true".to_string());

        assert_eq!(form.text("name"), None);
        assert_eq!(form.first_text(&["name", "agentName"]), Some("Atlas"));
        assert!(form.flag("walletConnected"));
        assert!(!form.flag("missing"));
    }
}
