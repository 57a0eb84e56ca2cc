pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::session::{FileSessionStore, MemorySessionStore};
pub use config::ClientSettings;
pub use crate::core::{api::BabloApi, client::AuthenticatedClient, request::ApiRequest};
pub use domain::ports::{ConfigProvider, SessionStore};
pub use utils::error::{ApiError, Result};
