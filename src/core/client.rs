use crate::core::request::ApiRequest;
use crate::core::session::TokenStore;
use crate::domain::model::{RefreshRequest, TokenPair, TokenResponse};
use crate::domain::ports::{ConfigProvider, SessionStore};
use crate::utils::error::{ApiError, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

pub const REFRESH_PATH: &str = "/refresh";

/// HTTP client for the BabloBudget backend.
///
/// Every call goes through [`AuthenticatedClient::dispatch`], which attaches
/// the stored access token and, when the server answers 401, refreshes the
/// session once and re-sends the call once. Refreshes are single-flight: while
/// one is in progress, other requests that hit a 401 wait for it and retry with
/// its result instead of calling `/refresh` themselves.
///
/// Cloning is cheap and clones share the session and the refresh guard.
#[derive(Clone)]
pub struct AuthenticatedClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    base_url: Url,
    timeout: Option<Duration>,
    tokens: TokenStore,
    refresh_guard: Mutex<()>,
}

impl AuthenticatedClient {
    pub fn new(base_url: &str, store: Arc<dyn SessionStore>) -> Result<Self> {
        Self::with_timeout(base_url, None, store)
    }

    pub fn with_timeout(
        base_url: &str,
        timeout: Option<Duration>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;

        Ok(Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                base_url,
                timeout,
                tokens: TokenStore::new(store),
                refresh_guard: Mutex::new(()),
            }),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C, store: Arc<dyn SessionStore>) -> Result<Self> {
        Self::with_timeout(config.base_url(), config.request_timeout(), store)
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Sets `Authorization: Bearer <token>` when an access token is stored and
    /// leaves the request untouched otherwise.
    pub async fn attach_credentials(&self, request: ApiRequest) -> Result<ApiRequest> {
        let (request, _) = self.attach(request).await?;
        Ok(request)
    }

    /// Attaches the stored token and returns it alongside the request, even
    /// when it could not be encoded as a header.
    async fn attach(&self, mut request: ApiRequest) -> Result<(ApiRequest, Option<String>)> {
        let token = self.inner.tokens.access_token().await?;
        if let Some(token) = &token {
            request.set_bearer(token);
        }
        Ok((request, token))
    }

    /// Sends the request with the stored credentials.
    ///
    /// A 401 triggers one refresh and one retry; the retry's outcome is
    /// returned as-is. Any other failure is returned unchanged. When no refresh
    /// token is stored the session is cleared and the original 401 is
    /// returned; when the refresh fails the session is cleared and the refresh
    /// failure is returned as [`ApiError::RefreshError`].
    pub async fn dispatch(&self, request: ApiRequest) -> Result<Response> {
        let (request, sent_with) = self.attach(request).await?;

        match self.send(&request).await {
            Ok(response) => Ok(response),
            Err(err) if err.is_auth_failure() => {
                self.refresh_and_retry(request, sent_with, err).await
            }
            Err(err) => Err(err),
        }
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.dispatch(request).await?;
        read_json(response).await
    }

    /// Dispatches and discards the response body.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.dispatch(request).await?;
        Ok(())
    }

    /// Replaces the stored session, e.g. after a login.
    pub async fn store_session(&self, tokens: &TokenPair) -> Result<()> {
        let _guard = self.inner.refresh_guard.lock().await;
        self.inner.tokens.save(tokens).await
    }

    pub async fn clear_session(&self) -> Result<()> {
        let _guard = self.inner.refresh_guard.lock().await;
        self.inner.tokens.clear().await
    }

    pub async fn has_session(&self) -> Result<bool> {
        Ok(self.inner.tokens.access_token().await?.is_some())
    }

    async fn send(&self, request: &ApiRequest) -> Result<Response> {
        let response = request
            .build(&self.inner.http, &self.inner.base_url, self.inner.timeout)?
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("{} {} -> {}", request.method, request.path, status);

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::http(status, body))
        }
    }

    /// `sent_with` is the stored access token the failed attempt was built
    /// from, not the header value that went out.
    async fn refresh_and_retry(
        &self,
        mut request: ApiRequest,
        sent_with: Option<String>,
        original: ApiError,
    ) -> Result<Response> {
        let access_token = {
            let _guard = self.inner.refresh_guard.lock().await;

            match self.inner.tokens.access_token().await? {
                // Someone refreshed while this request was in flight or waiting.
                Some(current) if sent_with.as_deref() != Some(current.as_str()) => {
                    tracing::debug!(
                        "Session already refreshed, retrying {} {}",
                        request.method,
                        request.path
                    );
                    current
                }
                _ => match self.inner.tokens.refresh_token().await? {
                    None => {
                        tracing::warn!("Got 401 without a refresh token, clearing session");
                        self.clear_after_failure().await;
                        return Err(original);
                    }
                    Some(refresh_token) => match self.refresh(&refresh_token).await {
                        Ok(tokens) => {
                            self.inner.tokens.save(&tokens).await?;
                            tracing::info!("Session refreshed");
                            tokens.access_token
                        }
                        Err(err) => {
                            tracing::warn!("Session refresh failed: {}", err);
                            self.clear_after_failure().await;
                            return Err(ApiError::refresh(err));
                        }
                    },
                },
            }
        };

        request.set_bearer(&access_token);
        self.send(&request).await
    }

    /// Exchanges the refresh token for a new pair. Never goes through the
    /// refresh path itself.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest { refresh_token })?;
        let response = self.send(&request).await?;
        let tokens: TokenResponse = read_json(response).await?;
        Ok(tokens.into())
    }

    async fn clear_after_failure(&self) {
        if let Err(e) = self.inner.tokens.clear().await {
            tracing::error!("Failed to clear session: {}", e);
        }
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::session::MemorySessionStore;

    fn client_with(store: &MemorySessionStore) -> AuthenticatedClient {
        AuthenticatedClient::new("http://localhost:8018", Arc::new(store.clone())).unwrap()
    }

    #[tokio::test]
    async fn test_attach_credentials_sets_bearer() {
        let store = MemorySessionStore::new();
        store.set("accessToken", "a1").await.unwrap();
        let client = client_with(&store);

        let request = client
            .attach_credentials(ApiRequest::get("/account/getbasissum"))
            .await
            .unwrap();

        assert_eq!(request.bearer_token(), Some("a1"));
    }

    #[tokio::test]
    async fn test_attach_credentials_without_token() {
        let store = MemorySessionStore::new();
        let client = client_with(&store);

        let request = client
            .attach_credentials(ApiRequest::get("/account/getbasissum"))
            .await
            .unwrap();

        assert!(request.headers.get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_attach_credentials_is_idempotent() {
        let store = MemorySessionStore::new();
        store.set("accessToken", "a1").await.unwrap();
        let client = client_with(&store);

        let once = client
            .attach_credentials(ApiRequest::get("/moneyflow/getall"))
            .await
            .unwrap();
        let twice = client.attach_credentials(once.clone()).await.unwrap();

        assert_eq!(
            once.headers.get(reqwest::header::AUTHORIZATION),
            twice.headers.get(reqwest::header::AUTHORIZATION)
        );
        assert_eq!(twice.headers.len(), 1);
    }

    #[tokio::test]
    async fn test_store_and_clear_session() {
        let store = MemorySessionStore::new();
        let client = client_with(&store);
        assert!(!client.has_session().await.unwrap());

        client
            .store_session(&TokenPair {
                access_token: "a1".to_string(),
                refresh_token: "r1".to_string(),
            })
            .await
            .unwrap();
        assert!(client.has_session().await.unwrap());
        assert_eq!(store.get("refreshToken").await.unwrap().as_deref(), Some("r1"));

        client.clear_session().await.unwrap();
        assert!(!client.has_session().await.unwrap());
        assert_eq!(store.get("refreshToken").await.unwrap(), None);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let store = MemorySessionStore::new();
        assert!(AuthenticatedClient::new("not a url", Arc::new(store)).is_err());
    }
}
