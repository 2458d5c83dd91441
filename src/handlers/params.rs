use crate::types::error::ProxyError;
use serde::Deserialize;

/// `?key=` share key supplied by the caller
#[derive(Debug, Deserialize)]
pub struct ShareKeyQuery {
    pub key: Option<String>,
}

impl ShareKeyQuery {
    pub fn require(self) -> Result<String, ProxyError> {
        match self.key {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ProxyError::BadRequest("Missing share key".to_string())),
        }
    }
}

/// `?key=&size=` for thumbnails
#[derive(Debug, Deserialize)]
pub struct ThumbnailQuery {
    pub key: Option<String>,
    pub size: Option<String>,
}

impl ThumbnailQuery {
    /// Share key and size; only `preview` and `thumbnail` sizes are served
    pub fn require(self) -> Result<(String, String), ProxyError> {
        let key = ShareKeyQuery { key: self.key }.require()?;
        let size = self.size.unwrap_or_default();
        if size == "preview" || size == "thumbnail" {
            Ok((key, size))
        } else {
            Err(ProxyError::BadRequest("Invalid asset size".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_key_required() {
        assert!(ShareKeyQuery { key: None }.require().is_err());
        assert!(ShareKeyQuery { key: Some(" ".into()) }.require().is_err());
        assert_eq!(ShareKeyQuery { key: Some("abc".into()) }.require().unwrap(), "abc");
    }

    #[test]
    fn test_thumbnail_size_validated() {
        let query = |size: Option<&str>| ThumbnailQuery {
            key: Some("abc".into()),
            size: size.map(String::from),
        };

        assert_eq!(
            query(Some("preview")).require().unwrap(),
            ("abc".to_string(), "preview".to_string())
        );
        assert!(query(Some("thumbnail")).require().is_ok());
        assert!(query(Some("fullsize")).require().is_err());
        assert!(query(None).require().is_err());
    }
}
