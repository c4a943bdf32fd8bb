//! Public URLs referenced from frame documents.

use url::Url;

use crate::{ProtocolError, ProtocolResult};

/// Builds the absolute URLs embedded in cards and launch metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLinks {
    base: Url,
}

impl FrameLinks {
    /// Creates links rooted at the server's public URL.
    ///
    /// A missing trailing slash is added so that a path prefix survives joins.
    pub fn new(public_url: &str) -> ProtocolResult<Self> {
        let mut base = Url::parse(public_url)?;
        if base.cannot_be_a_base() {
            return Err(ProtocolError::NotABase(public_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    /// URL of the card background image for `fid` with extra query flags.
    ///
    /// Flags keep their order in the query string.
    pub fn image_url(&self, fid: u64, flags: &[(&str, String)]) -> String {
        let mut url = self.join("api/images/frame");
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("fid", &fid.to_string());
            for (key, value) in flags {
                query.append_pair(key, value);
            }
        }
        url.into()
    }

    /// URL the feed client posts interactions to.
    pub fn post_url(&self) -> String {
        self.join("api/frame").into()
    }

    /// URL of the launch image.
    pub fn og_image_url(&self) -> String {
        self.join("api/og").into()
    }

    fn join(&self, path: &str) -> Url {
        // Relative joins against a base URL only fail for malformed input,
        // and every path passed here is a constant.
        self.base.join(path).unwrap_or_else(|_| self.base.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_keeps_flag_order() {
        let links = FrameLinks::new("https://todo.example").unwrap();
        let url = links.image_url(
            12,
            &[("completed", "true".to_string()), ("streak", "3".to_string())],
        );
        assert_eq!(
            url,
            "https://todo.example/api/images/frame?fid=12&completed=true&streak=3"
        );
    }

    #[test]
    fn test_path_prefix_is_preserved() {
        let links = FrameLinks::new("https://example.com/todocast").unwrap();
        assert_eq!(links.post_url(), "https://example.com/todocast/api/frame");
        assert_eq!(links.og_image_url(), "https://example.com/todocast/api/og");
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(FrameLinks::new("not a url").is_err());
        assert!(FrameLinks::new("mailto:someone@example.com").is_err());
    }
}
