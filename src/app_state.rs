use crate::upstream::ImmichClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub immich: ImmichClient,
}

impl AppState {
    pub fn new(immich: ImmichClient) -> Self {
        Self { immich }
    }
}
