use axum::http::{HeaderName, HeaderValue, Method};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::types::Credential;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse YAML config: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub immich: ImmichConfig,
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmichConfig {
    pub url: String,
    #[serde(rename = "api_keys")]
    pub api_keys: Vec<String>,
    #[serde(default)]
    pub albums_sync_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums_refresh_interval: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    pub allow_credentials: bool,
}

/// When and where the album catalog is synchronized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub enabled: bool,
    pub interval: Option<Duration>,
    pub base_url: String,
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

impl Config {
    /// Load a config file: JSON when the extension is `.json`, YAML otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: Config = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.immich.api_keys.is_empty() {
            return Err(ConfigError::Invalid(
                "immich.api_keys must list at least one key".to_string(),
            ));
        }
        if self.immich.api_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "immich.api_keys must not contain empty keys".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.immich.url)
            .map_err(|e| ConfigError::Invalid(format!("immich.url: {}", e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid(format!(
                "immich.url must be http or https, got {}",
                url.scheme()
            )));
        }

        self.refresh_schedule()?;

        if let Some(cors) = &self.cors {
            cors.layer()?;
        }
        Ok(())
    }

    pub fn credentials(&self) -> Vec<Credential> {
        self.immich
            .api_keys
            .iter()
            .map(|k| Credential::new(k.trim()))
            .collect()
    }

    /// The interval is only required (and only parsed) when sync is enabled
    pub fn refresh_schedule(&self) -> Result<RefreshSchedule, ConfigError> {
        let interval = if self.immich.albums_sync_enabled {
            let raw = self.immich.albums_refresh_interval.as_deref().ok_or_else(|| {
                ConfigError::Invalid(
                    "immich.albumsRefreshInterval is required when albumsSyncEnabled is true"
                        .to_string(),
                )
            })?;
            let interval = parse_duration(raw).map_err(|e| {
                ConfigError::Invalid(format!("immich.albumsRefreshInterval: {}", e))
            })?;
            if interval.is_zero() {
                return Err(ConfigError::Invalid(
                    "immich.albumsRefreshInterval must be positive".to_string(),
                ));
            }
            Some(interval)
        } else {
            None
        };

        Ok(RefreshSchedule {
            enabled: self.immich.albums_sync_enabled,
            interval,
            base_url: self.immich.url.trim_end_matches('/').to_string(),
        })
    }

    /// Default tracing filter directive for the configured level
    ///
    /// Accepts logrus level names as well (`warning`, `fatal`, `panic`).
    pub fn log_filter(&self) -> String {
        match self
            .log_level
            .as_deref()
            .map(|l| l.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") => "info".to_string(),
            Some("warning") => "warn".to_string(),
            Some("fatal") | Some("panic") => "error".to_string(),
            Some(level) => level.to_string(),
        }
    }
}

impl CorsConfig {
    /// Build the CORS layer; comma-separated lists, `*` meaning any
    pub fn layer(&self) -> Result<CorsLayer, ConfigError> {
        let mut layer = CorsLayer::new();

        let origin = self.allow_origin.trim();
        if origin == "*" {
            if self.allow_credentials {
                return Err(ConfigError::Invalid(
                    "cors.allowCredentials cannot be combined with allowOrigin \"*\"".to_string(),
                ));
            }
            layer = layer.allow_origin(AllowOrigin::any());
        } else if !origin.is_empty() {
            let origins = split_list(origin)
                .map(|o| {
                    HeaderValue::from_str(o)
                        .map_err(|e| ConfigError::Invalid(format!("cors.allowOrigin {}: {}", o, e)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            layer = layer.allow_origin(origins);
        }

        if !self.allow_methods.trim().is_empty() {
            let methods = split_list(&self.allow_methods)
                .map(|m| {
                    Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                        .map_err(|e| ConfigError::Invalid(format!("cors.allowMethods {}: {}", m, e)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            layer = layer.allow_methods(methods);
        }

        if !self.allow_headers.trim().is_empty() {
            let headers = split_list(&self.allow_headers)
                .map(|h| {
                    HeaderName::from_bytes(h.as_bytes())
                        .map_err(|e| ConfigError::Invalid(format!("cors.allowHeaders {}: {}", h, e)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            layer = layer.allow_headers(headers);
        }

        Ok(layer.allow_credentials(self.allow_credentials))
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a Go-style duration such as `300ms`, `30s`, `5m` or `1h30m`
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let out_of_range = || format!("duration {:?} out of range", input);
    let mut total_nanos: u128 = 0;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration {:?}", input))?;
        let number = &rest[..number_len];
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit_nanos: u128 = match &rest[..unit_len] {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            unit => return Err(format!("unknown unit {:?} in duration {:?}", unit, input)),
        };
        rest = &rest[unit_len..];

        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(format!("invalid duration {:?}", input));
        }
        let invalid = |_| format!("invalid number in duration {:?}", input);
        let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().map_err(invalid)? };
        let mut nanos = whole.checked_mul(unit_nanos).ok_or_else(out_of_range)?;

        if !frac.is_empty() {
            let digits = &frac[..frac.len().min(18)];
            let frac: u128 = digits.parse().map_err(invalid)?;
            nanos = nanos
                .checked_add(frac * unit_nanos / 10u128.pow(digits.len() as u32))
                .ok_or_else(out_of_range)?;
        }
        total_nanos = total_nanos.checked_add(nanos).ok_or_else(out_of_range)?;
    }

    let nanos = u64::try_from(total_nanos).map_err(|_| out_of_range())?;
    Ok(Duration::from_nanos(nanos))
}
