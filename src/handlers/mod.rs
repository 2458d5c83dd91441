mod albums;
mod assets;
mod params;
mod proxy;
mod shared_links;

pub use albums::get_album;
pub use assets::{get_asset, get_asset_original, get_asset_thumbnail};
pub use proxy::proxy_passthrough;
pub use shared_links::get_shared_link;
