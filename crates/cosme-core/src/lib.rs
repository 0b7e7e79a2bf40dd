//! Shared domain types and configuration for the @cosme review pipeline.

pub mod app_config;
pub mod config;
pub mod error;
pub mod layout;
pub mod review;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use layout::{
    builtin_layouts, load_layouts, resolve_layouts, Layout, LayoutSelectors, LayoutsFile,
    ProfileFormat, RatingRule, Separator,
};
pub use review::{Dataset, NormalizedProfile, ReviewEntry, ReviewRow, UNKNOWN};
