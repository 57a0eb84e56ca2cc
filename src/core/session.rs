use crate::domain::model::TokenPair;
use crate::domain::ports::SessionStore;
use crate::utils::error::Result;
use std::sync::Arc;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Typed view over the two session keys of a [`SessionStore`].
#[derive(Clone)]
pub(crate) struct TokenStore {
    store: Arc<dyn SessionStore>,
}

impl TokenStore {
    pub(crate) fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub(crate) async fn access_token(&self) -> Result<Option<String>> {
        self.store.get(ACCESS_TOKEN_KEY).await
    }

    pub(crate) async fn refresh_token(&self) -> Result<Option<String>> {
        self.store.get(REFRESH_TOKEN_KEY).await
    }

    pub(crate) async fn save(&self, tokens: &TokenPair) -> Result<()> {
        self.store
            .set_many(&[
                (ACCESS_TOKEN_KEY, tokens.access_token.as_str()),
                (REFRESH_TOKEN_KEY, tokens.refresh_token.as_str()),
            ])
            .await
    }

    pub(crate) async fn clear(&self) -> Result<()> {
        self.store
            .remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
            .await
    }
}
