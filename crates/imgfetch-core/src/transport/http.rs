//! Default transport: HTTP(S) GET via libcurl, decoded with the `image` crate.
//!
//! The transfer runs on tokio's blocking pool. libcurl's progress callback
//! polls the cancellation token and aborts the transfer when it is set.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::HttpConfig;
use crate::decoded::Image;

use super::{FetchError, FetchFuture, FetchResult, Transport};

/// libcurl-backed [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: HttpConfig,
}

impl CurlTransport {
    pub fn new(options: HttpConfig) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HttpConfig {
        &self.options
    }
}

impl Transport for CurlTransport {
    fn fetch(&self, url: String, cancel: CancellationToken) -> FetchFuture {
        let options = self.options.clone();
        Box::pin(async move {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            let token = cancel.clone();
            let result = tokio::task::spawn_blocking(move || fetch_blocking(&url, &options, &token))
                .await
                .map_err(|e| FetchError::Aborted(e.to_string()))?;
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            result
        })
    }
}

/// Download `url` into memory and decode it. Runs in the current thread.
fn fetch_blocking(url: &str, options: &HttpConfig, cancel: &CancellationToken) -> FetchResult {
    let limit = options.max_body_bytes;
    let mut body: Vec<u8> = Vec::new();
    let mut too_large = false;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(options.max_redirections)?;
    easy.connect_timeout(Duration::from_secs(options.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(options.timeout_secs))?;
    if let Some(ua) = &options.user_agent {
        easy.useragent(ua)?;
    }
    // Progress callbacks are off by default; they are our cancellation hook.
    easy.progress(true)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if body.len() as u64 + data.len() as u64 > limit {
                too_large = true;
                return Ok(0); // abort transfer
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        if too_large {
            return Err(FetchError::TooLarge { limit });
        }
        return Err(e.into());
    }

    // Non-HTTP schemes (file://) report code 0.
    let code = easy.response_code()?;
    if code != 0 && !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    tracing::debug!(url, bytes = body.len(), "fetched image body");
    Ok(Image::decode(&body)?)
}
