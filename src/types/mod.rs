pub mod credential;
pub mod error;
pub mod models;

pub use credential::Credential;
pub use error::{ProxyError, UpstreamError};
pub use models::{AlbumInfo, AlbumSummary, AssetInfo, ExifInfo, SharedLinkInfo};
