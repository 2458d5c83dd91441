use serde::{Deserialize, Serialize};

/// One entry of the `GET /api/albums` listing; only the id is needed
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
}

/// Album as returned to proxy clients
///
/// Upstream responses are decoded into these structs and re-encoded, so any
/// field Immich adds later is dropped rather than passed through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlbumInfo {
    pub album_name: String,
    pub album_thumbnail_asset_id: Option<String>,
    pub asset_count: i64,
    pub assets: Vec<AssetInfo>,
    pub created_at: String,
    pub description: String,
    pub end_date: Option<String>,
    pub has_shared_link: bool,
    pub id: String,
    pub is_activity_enabled: bool,
    pub last_modified_asset_timestamp: Option<String>,
    pub order: Option<String>,
    pub owner_id: String,
    pub shared: bool,
    pub start_date: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetInfo {
    pub id: String,
    pub device_asset_id: String,
    pub owner_id: String,
    pub device_id: String,
    pub library_id: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub original_path: String,
    pub original_file_name: String,
    pub original_mime_type: Option<String>,
    pub thumbhash: Option<String>,
    pub file_created_at: String,
    pub file_modified_at: String,
    pub local_date_time: String,
    pub updated_at: String,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub is_trashed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif_info: Option<ExifInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_photo_video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_offline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_metadata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_id: Option<String>,
    pub resized: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<serde_json::Value>,
}

/// EXIF block; every field is optional upstream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExifInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif_image_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif_image_height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_in_byte: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time_original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modify_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
}

/// Shared link resolved from a share key (`/api/shared-links/me`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SharedLinkInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<AlbumInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_download: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_upload: Option<bool>,
}
