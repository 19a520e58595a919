//! Blocking HTTP GET for image bytes.
//!
//! Uses the curl crate (libcurl) with a fixed total timeout. A non-2xx status
//! is reported as an error the same way a transport failure is.

mod error;
mod parse;

pub use error::FetchError;

use std::str;
use std::time::Duration;

const MAX_REDIRECTS: u32 = 10;

/// A successful GET: status, the final `Content-Type` (if any) and the body.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u32,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Anything that can GET a URL. The pipeline only talks to this trait.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// libcurl-backed fetcher. Follows redirects. Runs in the current thread.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    timeout: Duration,
    user_agent: Option<String>,
}

impl CurlFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.connect_timeout(self.timeout)?;
        easy.timeout(self.timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Http(status));
        }

        Ok(FetchResponse {
            status,
            content_type: parse::content_type(&headers),
            body,
        })
    }
}
