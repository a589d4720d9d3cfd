use crate::driver::VesselSource;
use crate::error::ScrapeError;
use crate::log_warn;
use crate::models::SortOrder;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// The listing shows a login prompt instead of vessel cards when the
// session cookies are missing or expired.
const LOGIN_MARKER: &str = "Log in";

/// Authenticated HTTP session. Cookies are exported from the browser into a
/// plain text file holding the `Cookie` header value for the site; the
/// session itself never logs in.
pub struct Session {
    client: reqwest::blocking::Client,
    base_url: String,
    cookies: Option<String>,
}

impl Session {
    pub fn new(base_url: &str, cookies_file: Option<&str>) -> Result<Self> {
        let cookies = match cookies_file {
            Some(path) if Path::new(path).exists() => {
                let contents = fs::read_to_string(path)
                    .context(format!("Failed to read cookies file: {}", path))?;
                Some(contents.trim().to_string())
            }
            Some(path) => {
                log_warn!("Cookies file not found: {} - requests will be unauthenticated", path);
                None
            }
            None => None,
        };

        Ok(Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cookies,
        })
    }

    fn get(&self, url: &str) -> Result<String, ScrapeError> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT);

        if let Some(cookies) = &self.cookies {
            request = request.header(reqwest::header::COOKIE, cookies.as_str());
        }

        let response = request.send().map_err(|source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        })?;

        response.text().map_err(|source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        })
    }

    fn listing_url(&self, page: usize, sort: SortOrder) -> String {
        format!(
            "{}/vessels/fishing?page={}{}",
            self.base_url,
            page,
            sort.query_suffix()
        )
    }
}

impl VesselSource for Session {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check_access(&self) -> Result<(), ScrapeError> {
        let body = self.get(&format!("{}/vessels/fishing", self.base_url))?;
        if body.contains(LOGIN_MARKER) {
            return Err(ScrapeError::AuthRequired);
        }
        Ok(())
    }

    fn listing_page(&self, page: usize, sort: SortOrder) -> Result<String, ScrapeError> {
        self.get(&self.listing_url(page, sort))
    }

    fn vessel_page(&self, url: &str) -> Result<String, ScrapeError> {
        self.get(url)
    }
}
