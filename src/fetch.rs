use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE, ETAG};
use reqwest::{Client, Method, StatusCode};
use thiserror::Error;



pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("{method} request failed: {source}")]
	Request {
		method: Method,
		#[source]
		source: reqwest::Error,
	},
	#[error("{method} returned {status}")]
	Status {
		method: Method,
		status: StatusCode,
	},
	#[error("failed to read body: {0}")]
	Body(#[source] reqwest::Error),
}

/// A freshly downloaded image, with the metadata of the GET that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
	pub bytes: Vec<u8>,
	pub content_type: String,
	pub etag: String,
	pub content_length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
	Unchanged,
	Changed(Fetched),
}

/// Runs the HEAD-then-GET revalidation against upstream image sources.
///
/// Holds no camera state: callers pass in what they snapshotted and commit the outcome
/// themselves.
#[derive(Debug, Clone)]
pub struct Fetcher {
	client: Client,
}

impl Fetcher {
	pub fn new(timeout: Duration) -> Result<Fetcher, reqwest::Error> {
		let client = Client::builder()
			.timeout(timeout)
			.build()?;
		Ok(Fetcher { client })
	}

	pub async fn refresh(&self, src: &str, cached_etag: &str) -> Result<FetchOutcome, FetchError> {
		let head = self.client.head(src)
			.send()
			.await
			.map_err(|source| FetchError::Request { method: Method::HEAD, source })?;
		if !head.status().is_success() {
			return Err(FetchError::Status { method: Method::HEAD, status: head.status() });
		}

		// An empty validator on either side means we can't tell, so assume it changed.
		let probed_etag = header_str(head.headers(), ETAG);
		if !cached_etag.is_empty() && !probed_etag.is_empty() && probed_etag == cached_etag {
			return Ok(FetchOutcome::Unchanged);
		}

		let response = self.client.get(src)
			.send()
			.await
			.map_err(|source| FetchError::Request { method: Method::GET, source })?;
		if response.status() != StatusCode::OK {
			return Err(FetchError::Status { method: Method::GET, status: response.status() });
		}

		let headers = response.headers().clone();
		let bytes = response.bytes().await.map_err(FetchError::Body)?.to_vec();
		let content_length = content_length(&headers, bytes.len());

		Ok(FetchOutcome::Changed(Fetched {
			content_type: header_str(&headers, CONTENT_TYPE),
			etag: header_str(&headers, ETAG),
			content_length,
			bytes,
		}))
	}
}

/// Declared length of the body, or its actual length when upstream didn't send one.
fn content_length(headers: &HeaderMap, body_len: usize) -> u64 {
	header_str(headers, CONTENT_LENGTH)
		.parse()
		.unwrap_or(body_len as u64)
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> String {
	headers.get(name)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default()
		.to_string()
}



#[cfg(test)]
mod tests {
	use reqwest::header::HeaderValue;

	use super::*;

	#[test]
	fn content_length_prefers_header() {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_LENGTH, HeaderValue::from_static("42"));
		assert_eq!(content_length(&headers, 7), 42);
	}

	#[test]
	fn content_length_falls_back_to_body() {
		assert_eq!(content_length(&HeaderMap::new(), 7), 7);

		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_LENGTH, HeaderValue::from_static("bogus"));
		assert_eq!(content_length(&headers, 7), 7);
	}
}
