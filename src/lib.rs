// Library exports for integration tests
pub mod album_keys;
pub mod app_state;
pub mod catalog;
pub mod config;
pub mod handlers;
pub mod server;
pub mod types;
pub mod upstream;

// Re-export commonly used types
pub use album_keys::{AlbumKeys, CredentialCache, RefreshReport};
pub use app_state::AppState;
pub use catalog::{CatalogClient, ImmichCatalogClient, InMemoryCatalog};
pub use config::{Config, RefreshSchedule};
pub use types::{Credential, ProxyError, UpstreamError};
pub use upstream::ImmichClient;

// Re-export server creation function
pub use server::create_app;
