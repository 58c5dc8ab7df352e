//! Playlist URL validation

use crate::error::UrlError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PLAYLIST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?youtube\.com/playlist\?list=([A-Za-z0-9_-]+)(?:&[A-Za-z0-9_=-]+)*$",
    )
    .expect("playlist URL pattern is valid")
});

/// A URL that passed playlist validation. Always carries a scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistUrl {
    url: String,
    list_id: String,
}

impl PlaylistUrl {
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let input = input.trim();
        let caps = PLAYLIST_URL
            .captures(input)
            .ok_or_else(|| UrlError::InvalidUrl(input.to_string()))?;

        let url = if input.starts_with("http://") || input.starts_with("https://") {
            input.to_string()
        } else {
            format!("https://{}", input)
        };

        Ok(Self {
            url,
            list_id: caps[1].to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// The `list` query parameter
    pub fn list_id(&self) -> &str {
        &self.list_id
    }
}

impl fmt::Display for PlaylistUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_playlist_urls() {
        let url = PlaylistUrl::parse("https://www.youtube.com/playlist?list=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf")
            .unwrap();
        assert_eq!(url.list_id(), "PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf");

        assert!(PlaylistUrl::parse("http://youtube.com/playlist?list=PL_a-b").is_ok());
        assert!(PlaylistUrl::parse("https://youtube.com/playlist?list=PL123&si=abc_DEF-1").is_ok());
        assert!(PlaylistUrl::parse("  https://www.youtube.com/playlist?list=PL123\n").is_ok());
    }

    #[test]
    fn test_scheme_is_normalised() {
        let url = PlaylistUrl::parse("www.youtube.com/playlist?list=PL123").unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/playlist?list=PL123");
        assert_eq!(url.to_string(), "https://www.youtube.com/playlist?list=PL123");
    }

    #[test]
    fn test_rejects_other_shapes() {
        for bad in [
            "",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/playlist",
            "https://www.youtube.com/playlist?list=",
            "https://example.com/playlist?list=PL123",
            "https://www.youtube.com/playlist?list=PL123&bad param",
            "ftp://www.youtube.com/playlist?list=PL123",
        ] {
            let err = PlaylistUrl::parse(bad).unwrap_err();
            assert!(matches!(err, UrlError::InvalidUrl(_)), "{bad:?} should be rejected");
        }
    }
}
