mod backend;
mod http;
mod in_memory;

pub use backend::CatalogClient;
pub use http::ImmichCatalogClient;
pub use in_memory::InMemoryCatalog;
