//! Store locations.

use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// Where documents live: a Firestore REST endpoint or a local directory.
///
/// `https://firestore.googleapis.com` (or `http://localhost:8080` for the
/// emulator) selects Firestore; `file:///srv/mergulho` selects a directory
/// of JSON files.
///
/// ```
/// use mergulho_core::StoreUrl;
///
/// let remote = StoreUrl::new("https://firestore.googleapis.com").unwrap();
/// assert_eq!(remote.api_url("v1/projects/demo"),
///            "https://firestore.googleapis.com/v1/projects/demo");
///
/// let local = StoreUrl::new("file:///tmp/mergulho").unwrap();
/// assert!(local.is_local());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreUrl(Url);

impl StoreUrl {
    /// Parse and check a store location.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::StoreUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// `path` joined below the endpoint with exactly one slash.
    pub fn api_url(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True for `file://` locations.
    pub fn is_local(&self) -> bool {
        self.0.scheme() == "file"
    }

    /// Directory of a `file://` store.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_local() {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let reject = |reason: &str| -> Result<(), Error> {
            Err(InvalidInputError::StoreUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into())
        };

        match url.scheme() {
            _ if url.cannot_be_a_base() => reject("must be an absolute URL"),
            "file" if matches!(url.path(), "" | "/") => {
                reject("file:// URL must name a directory")
            }
            "file" => Ok(()),
            "https" if url.host_str().is_some() => Ok(()),
            "http" if url
                .host_str()
                .is_some_and(|h| matches!(h, "localhost" | "127.0.0.1" | "[::1]")) =>
            {
                Ok(())
            }
            "https" => reject("must have a host"),
            _ => reject("must use https:// (http:// only for localhost) or file://"),
        }
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
