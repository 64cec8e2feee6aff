//! GitLab REST client: tree listing and raw file retrieval

use crate::config::{Pagination, RepositoryConfig};
use crate::error::{Error, Result};
use crate::types::RemoteEntry;
use crate::utils::encode_path_segment;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

/// Response header carrying the next listing page, empty on the last page
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Client bound to one project at one ref
///
/// Listing and fetching share the configured ref; there is no way to fetch a file
/// at a revision other than the one being walked.
pub struct RepositoryClient {
    http: reqwest::Client,
    config: RepositoryConfig,
    project_url: String,
}

impl RepositoryClient {
    /// Build a client for the given coordinates
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the coordinates are invalid and
    /// `Error::Network` if the HTTP client cannot be constructed.
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        let project_url = format!(
            "{}/projects/{}",
            config.api_base.trim_end_matches('/'),
            encode_path_segment(&config.project_id)
        );

        Ok(Self {
            http,
            config,
            project_url,
        })
    }

    /// Coordinates this client reads from
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// List the direct children of a remote directory
    ///
    /// With [`Pagination::FirstPage`] only the first `page_size` entries are
    /// returned; with [`Pagination::Follow`] every page is requested in turn.
    ///
    /// # Errors
    ///
    /// Returns `Error::Listing` on any non-success status, `Error::Decode` on a
    /// malformed body and `Error::Network` on transport failures.
    pub async fn list_tree(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let mut entries = Vec::new();
        let mut page = 1;

        loop {
            let (batch, next_page) = self.list_tree_page(path, page).await?;
            entries.extend(batch);

            let Some(next_page) = next_page else {
                break;
            };
            match self.config.pagination {
                Pagination::Follow => page = next_page,
                Pagination::FirstPage => {
                    tracing::warn!(
                        path = %path,
                        returned = entries.len(),
                        "remote directory has more entries than one page; listing truncated"
                    );
                    break;
                }
            }
        }

        Ok(entries)
    }

    async fn list_tree_page(&self, path: &str, page: u32) -> Result<(Vec<RemoteEntry>, Option<u32>)> {
        let url = format!("{}/repository/tree", self.project_url);
        tracing::debug!(path = %path, page, "listing remote directory");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("path", path),
                ("ref", self.config.git_ref.as_str()),
                ("per_page", self.config.page_size.to_string().as_str()),
                ("page", page.to_string().as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Listing {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        // A next page that does not move forward would loop forever
        let next_page = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|next| *next > page);

        let body = response.bytes().await?;
        let entries = serde_json::from_slice(&body).map_err(|source| Error::Decode {
            path: path.to_string(),
            source,
        })?;

        Ok((entries, next_page))
    }

    /// Retrieve the raw bytes of a remote file at the configured ref
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` on any non-success status and `Error::Network` on
    /// transport failures.
    pub async fn fetch_raw(&self, remote_path: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/repository/files/{}/raw",
            self.project_url,
            encode_path_segment(remote_path)
        );
        tracing::debug!(path = %remote_path, "fetching remote file");

        let response = self
            .http
            .get(&url)
            .query(&[("ref", self.config.git_ref.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                path: remote_path.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
