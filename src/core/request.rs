use crate::utils::error::Result;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Everything needed to (re)send one backend call.
///
/// Kept as plain data rather than a `reqwest::Request` so the same call can
/// be rebuilt for the retry after a session refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Sets or overwrites `Authorization: Bearer <token>`.
    pub fn set_bearer(&mut self, token: &str) {
        // A token that is not a valid header value can never authenticate;
        // leaving the header unset lets the server answer 401.
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("Stored access token is not a valid header value, sending without it");
                self.headers.remove(AUTHORIZATION);
            }
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
    }

    pub(crate) fn url(&self, base: &Url) -> Result<Url> {
        let base = base.as_str().trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    pub(crate) fn build(
        &self,
        client: &Client,
        base: &Url,
        timeout: Option<Duration>,
    ) -> Result<RequestBuilder> {
        let mut request = client
            .request(self.method.clone(), self.url(base)?)
            .headers(self.headers.clone());

        if !self.query.is_empty() {
            request = request.query(&self.query);
        }

        if let Some(body) = &self.body {
            request = request.json(body);
        }

        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_bearer_overwrites_previous_value() {
        let mut request = ApiRequest::get("/account/getbasissum");
        request.set_bearer("old");
        request.set_bearer("new");

        assert_eq!(request.bearer_token(), Some("new"));
        assert_eq!(request.headers.get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn test_invalid_token_leaves_header_unset() {
        let mut request = ApiRequest::get("/account/getbasissum");
        request.set_bearer("line\nbreak");

        assert_eq!(request.bearer_token(), None);
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let base = Url::parse("http://localhost:8018/").unwrap();
        let request = ApiRequest::delete("/accountentry/delete").query("accountEntryId", "e1");

        assert_eq!(
            request.url(&base).unwrap().as_str(),
            "http://localhost:8018/accountentry/delete"
        );
        assert_eq!(request.query, vec![("accountEntryId".to_string(), "e1".to_string())]);
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let base = Url::parse("http://localhost:8018/api").unwrap();
        let request = ApiRequest::get("category/getincome");

        assert_eq!(
            request.url(&base).unwrap().as_str(),
            "http://localhost:8018/api/category/getincome"
        );
    }
}
