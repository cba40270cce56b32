use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{CivicError, Result};
use crate::responses::{CsrfResponse, RefreshResponse};
use crate::session::Session;

pub struct CivicClient {
    http: Client,
    base: Url,
    session: Option<Session>,
    session_path: Option<PathBuf>,
    // None = not fetched yet; Some(None) = fetch failed, proceed without.
    csrf: Option<Option<String>>,
}

/// A rebuildable request body. Multipart forms cannot be cloned once built,
/// so the payload keeps owned parts and rebuilds the form for each attempt
/// (the original attempt plus at most one replay after a token refresh).
enum Body<'a> {
    Empty,
    Json(&'a Value),
    Multipart(&'a MultipartPayload),
}

#[derive(Default)]
pub struct MultipartPayload {
    parts: Vec<(String, PartData)>,
}

enum PartData {
    Text(String),
    File {
        bytes: Vec<u8>,
        filename: String,
        mime: String,
    },
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push((name.to_string(), PartData::Text(value.into())));
        self
    }

    pub fn file(mut self, name: &str, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CivicError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path).map_err(|e| CivicError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        let mime = guess_content_type(&filename);
        self.parts.push((
            name.to_string(),
            PartData::File {
                bytes,
                filename,
                mime,
            },
        ));
        Ok(self)
    }

    fn to_form(&self) -> Result<Form> {
        let mut form = Form::new();
        for (name, data) in &self.parts {
            form = match data {
                PartData::Text(value) => form.text(name.clone(), value.clone()),
                PartData::File {
                    bytes,
                    filename,
                    mime,
                } => {
                    let part = Part::bytes(bytes.clone())
                        .file_name(filename.clone())
                        .mime_str(mime)?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

impl CivicClient {
    pub fn new(base_url: &str, session: Option<Session>) -> Result<Self> {
        let base =
            Url::parse(base_url).map_err(|_| CivicError::InvalidUrl(base_url.to_string()))?;

        Ok(Self {
            http: Client::new(),
            base,
            session,
            session_path: None,
            csrf: None,
        })
    }

    /// Persist session changes (login, refresh, logout) to this path.
    pub fn with_session_path(mut self, path: PathBuf) -> Self {
        self.session_path = Some(path);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: Session) -> Result<()> {
        if let Some(path) = &self.session_path {
            session.save(path)?;
        }
        self.session = Some(session);
        Ok(())
    }

    pub fn clear_session(&mut self) {
        if let Some(path) = &self.session_path {
            Session::clear(path);
        }
        self.session = None;
    }

    pub async fn get<T: DeserializeOwned>(&mut self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, Body::Empty).await?;
        Ok(response.json().await?)
    }

    pub async fn post<T: DeserializeOwned>(&mut self, path: &str, body: Value) -> Result<T> {
        let response = self.send(Method::POST, path, Body::Json(&body)).await?;
        Ok(response.json().await?)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &mut self,
        path: &str,
        payload: &MultipartPayload,
    ) -> Result<T> {
        let response = self.send(Method::POST, path, Body::Multipart(payload)).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&mut self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, Body::Empty).await?;
        Ok(())
    }

    /// Send a request with bearer auth and the CSRF header on mutations.
    /// A 401 triggers one token refresh followed by one replay; a second
    /// 401 invalidates the stored session.
    async fn send(&mut self, method: Method, path: &str, body: Body<'_>) -> Result<Response> {
        let url = self
            .base
            .join(path)
            .map_err(|_| CivicError::InvalidUrl(path.to_string()))?;

        let mutating = method != Method::GET;
        if mutating {
            self.ensure_csrf().await;
        }

        let mut refreshed = false;
        loop {
            let mut request = self.http.request(method.clone(), url.clone());

            if let Some(session) = &self.session {
                request = request.bearer_auth(&session.access);
            }
            if mutating {
                if let Some(Some(token)) = &self.csrf {
                    request = request.header("X-CSRFToken", token);
                }
            }
            request = match &body {
                Body::Empty => request,
                Body::Json(value) => request.json(value),
                Body::Multipart(payload) => request.multipart(payload.to_form()?),
            };

            let response = request.send().await?;
            debug!(%url, status = response.status().as_u16(), "api response");

            if response.status() == StatusCode::UNAUTHORIZED && self.session.is_some() {
                if refreshed {
                    self.clear_session();
                    return Err(CivicError::Unauthorized);
                }
                refreshed = true;
                self.refresh_access().await?;
                continue;
            }

            return self.check(response).await;
        }
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body, status);

        Err(match status {
            StatusCode::FORBIDDEN => CivicError::Forbidden(message),
            StatusCode::NOT_FOUND => CivicError::NotFound(message),
            _ => CivicError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Exchange the refresh token for a new access token. On any failure the
    /// stored session is purged; the caller must log in again.
    async fn refresh_access(&mut self) -> Result<()> {
        let refresh_token = match &self.session {
            Some(session) => session.refresh.clone(),
            None => return Err(CivicError::Unauthorized),
        };

        debug!("access token rejected; attempting refresh");

        let url = self
            .base
            .join("/api/auth/refresh/")
            .map_err(|_| CivicError::Unauthorized)?;

        let outcome = self
            .http
            .post(url)
            .json(&serde_json::json!({ "refresh": refresh_token }))
            .send()
            .await;

        let tokens = match outcome {
            Ok(response) if response.status().is_success() => {
                response.json::<RefreshResponse>().await.ok()
            }
            _ => None,
        };

        match tokens {
            Some(tokens) => {
                if let Some(session) = self.session.as_mut() {
                    session.access = tokens.access;
                }
                if let (Some(path), Some(session)) = (&self.session_path, &self.session) {
                    if let Err(e) = session.save(path) {
                        warn!("failed to persist refreshed token: {e}");
                    }
                }
                Ok(())
            }
            None => {
                self.clear_session();
                Err(CivicError::Unauthorized)
            }
        }
    }

    /// The CSRF token is fetched once per process and is optional: the
    /// mutating endpoints are csrf-exempt server-side, so a failed fetch
    /// only drops the header.
    async fn ensure_csrf(&mut self) {
        if self.csrf.is_some() {
            return;
        }
        let fetched = self.fetch_csrf().await;
        if fetched.is_none() {
            debug!("CSRF token not retrieved, proceeding without it");
        }
        self.csrf = Some(fetched);
    }

    async fn fetch_csrf(&self) -> Option<String> {
        let url = self.base.join("/api/auth/get-csrf/").ok()?;
        let response = self.http.get(url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        response
            .json::<CsrfResponse>()
            .await
            .ok()
            .map(|c| c.csrf_token)
    }
}

/// Pick the most specific human-readable message out of an error body:
/// a structured `error`/`detail` string, then field errors, then the raw
/// body, then the HTTP status reason.
fn extract_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }

        if let Some(object) = value.as_object() {
            let mut parts = Vec::new();
            for (field, errors) in object {
                match errors {
                    Value::String(s) => parts.push(format!("{field}: {s}")),
                    Value::Array(items) => {
                        if let Some(first) = items.iter().find_map(Value::as_str) {
                            parts.push(format!("{field}: {first}"));
                        }
                    }
                    _ => {}
                }
            }
            if !parts.is_empty() {
                return parts.join("; ");
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

fn guess_content_type(filename: &str) -> String {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_structured_error_first() {
        let message = extract_message(
            r#"{"error": "You have already voted on this issue"}"#,
            StatusCode::BAD_REQUEST,
        );
        assert_eq!(message, "You have already voted on this issue");
    }

    #[test]
    fn extract_field_errors() {
        let message = extract_message(
            r#"{"title": ["This field is required."]}"#,
            StatusCode::BAD_REQUEST,
        );
        assert_eq!(message, "title: This field is required.");
    }

    #[test]
    fn extract_falls_back_to_status_reason() {
        let message = extract_message("", StatusCode::BAD_GATEWAY);
        assert_eq!(message, "Bad Gateway");
    }

    #[test]
    fn extract_raw_body_when_not_json() {
        let message = extract_message("server exploded", StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "server exploded");
    }
}
