pub mod app_config;
pub mod channel;
pub mod config;
pub mod products;
pub mod storefront;

pub use app_config::{AppConfig, Environment};
pub use channel::{sanitize_channel_name, ChannelInfo, SpecialProductIds};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{NormalizedProduct, ProductTag};
pub use storefront::{StorefrontError, StorefrontName};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
