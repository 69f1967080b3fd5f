//! Configuration loading
//!
//! Settings come from environment variables or a JSON/TOML file and are
//! turned into a [`TransportConfig`](crate::http::TransportConfig) with
//! [`ClientSettings::into_transport_config`].

pub mod loader;
pub mod settings;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
pub use settings::{ClientSettings, TokenSettings};
