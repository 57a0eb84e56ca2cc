pub mod api;
pub mod client;
pub mod request;
pub mod session;

pub use crate::domain::model::TokenPair;
pub use crate::domain::ports::SessionStore;
pub use crate::utils::error::Result;
pub use session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
