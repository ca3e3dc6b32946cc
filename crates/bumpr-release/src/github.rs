//! GitHub Releases
//!
//! Creates a release for a tag and uploads assets to it through the REST API.

use std::path::{Path, PathBuf};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use tracing::{debug, info, instrument};

use bumpr_core::config::GitHubReleaseConfig;

use crate::error::{ReleaseError, Result};
use crate::types::{AssetInfo, ReleaseInfo, ReleaseRequest};

const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

/// GitHub releases client for one repository
pub struct GitHubReleaser {
    client: Client,
    api_url: String,
    owner: String,
    repo: String,
}

impl GitHubReleaser {
    /// Create a client. `owner` and `repo` from the configuration each win
    /// over their half of the `fallback` detected from the origin remote.
    pub fn new(
        config: &GitHubReleaseConfig,
        fallback: Option<(String, String)>,
    ) -> Result<Self> {
        let token = config.token.trim();
        if token.is_empty() {
            return Err(ReleaseError::MissingToken);
        }

        let (fallback_owner, fallback_repo) = fallback.unwrap_or_default();
        let pick = |configured: &str, detected: String| {
            if configured.is_empty() {
                detected
            } else {
                configured.to_string()
            }
        };
        let owner = pick(&config.owner, fallback_owner);
        let repo = pick(&config.repo, fallback_repo);
        if owner.is_empty() || repo.is_empty() {
            return Err(ReleaseError::MissingRepository);
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ReleaseError::MissingToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(concat!("bumpr/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            owner,
            repo,
        })
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn releases_url(&self) -> String {
        format!("{}/repos/{}/{}/releases", self.api_url, self.owner, self.repo)
    }

    /// Create the release
    #[instrument(skip(self, request), fields(repo = %self.slug(), tag = %request.tag_name))]
    pub async fn create_release(&self, request: &ReleaseRequest) -> Result<ReleaseInfo> {
        let response = self
            .client
            .post(self.releases_url())
            .json(request)
            .send()
            .await?;

        let release: ReleaseInfo = check(response).await?.json().await?;
        info!(id = release.id, url = %release.html_url, "created release");
        Ok(release)
    }

    /// Upload one file as a release asset, named after the file
    #[instrument(skip(self, release), fields(release = release.id, path = %path.display()))]
    pub async fn upload_asset(&self, release: &ReleaseInfo, path: &Path) -> Result<AssetInfo> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ReleaseError::UploadFailed {
                path: path.to_path_buf(),
                message: "file name is not valid UTF-8".to_string(),
            })?
            .to_string();
        let data = tokio::fs::read(path).await?;
        debug!(bytes = data.len(), "uploading asset");

        let response = self
            .client
            .post(release.upload_endpoint())
            .query(&[("name", name.as_str())])
            .header(CONTENT_TYPE, content_type(path))
            .body(data)
            .send()
            .await?;

        let asset: AssetInfo = check(response)
            .await
            .map_err(|e| ReleaseError::UploadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .json()
            .await?;
        info!(name = %asset.name, "uploaded asset");
        Ok(asset)
    }
}

/// Content type announced for an uploaded asset, by file extension
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        "bz2" => "application/x-bzip2",
        "xz" => "application/x-xz",
        "7z" => "application/x-7z-compressed",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "deb" => "application/vnd.debian.binary-package",
        "rpm" => "application/x-rpm",
        "apk" => "application/vnd.android.package-archive",
        "dmg" => "application/x-apple-diskimage",
        "txt" | "sha256" | "sig" | "asc" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ReleaseError::ApiError {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

/// Files matched by `patterns`, relative to `root`, in pattern order without
/// duplicates. Directories are skipped.
pub fn collect_assets(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut assets = Vec::new();

    for pattern in patterns {
        let full = root.join(pattern);
        let full = full.to_string_lossy();
        let entries = glob::glob(&full).map_err(|e| ReleaseError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut matched = 0;
        for path in entries.flatten() {
            if path.is_file() && !assets.contains(&path) {
                assets.push(path);
                matched += 1;
            }
        }
        debug!(pattern = %pattern, matched, "resolved asset pattern");
    }

    Ok(assets)
}
