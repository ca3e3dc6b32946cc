//! Release types

use serde::{Deserialize, Serialize};

/// Body of a create-release request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRequest {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl ReleaseRequest {
    /// A release named after its tag
    pub fn new(tag: impl Into<String>, body: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            name: tag.clone(),
            tag_name: tag,
            body: body.into(),
            draft: false,
            prerelease: false,
        }
    }

    /// Set the draft flag
    pub fn draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    /// Set the prerelease flag
    pub fn prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }
}

/// A created release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub id: u64,
    pub html_url: String,
    pub upload_url: String,
    #[serde(default)]
    pub draft: bool,
}

impl ReleaseInfo {
    /// Upload endpoint without the `{?name,label}` URI template suffix
    pub fn upload_endpoint(&self) -> &str {
        match self.upload_url.find('{') {
            Some(idx) => &self.upload_url[..idx],
            None => &self.upload_url,
        }
    }
}

/// An uploaded asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub id: u64,
    pub name: String,
    pub browser_download_url: String,
}
