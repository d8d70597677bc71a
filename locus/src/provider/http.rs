//! Blocking HTTP seam shared by the routing and elevation providers.

use std::time::Duration;

use tracing::debug;

use super::types::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches a URL and returns the body of a 2xx response.
///
/// Providers take an implementation of this trait so tests can substitute a
/// scripted client for the network.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// reqwest-backed client used outside tests.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new ReqwestClient with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("locus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        debug!(url = %redact(url), "HTTP GET");
        let response = self.client.get(url).send().map_err(|e| transport_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                url: redact(url),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to read body: {}", e.without_url()))
            })
    }
}

/// Maps a reqwest failure to a provider error whose message names the
/// redacted URL instead of the raw one.
fn transport_error(e: reqwest::Error, url: &str) -> ProviderError {
    let timeout = e.is_timeout();
    let message = format!("{} ({})", e.without_url(), redact(url));
    if timeout {
        ProviderError::Timeout(message)
    } else {
        ProviderError::HttpError(format!("Request failed: {}", message))
    }
}

/// Strips an `access_token` query value so URLs can be logged.
pub fn redact(url: &str) -> String {
    match url.find("access_token=") {
        Some(start) => {
            let value_start = start + "access_token=".len();
            let rest = &url[value_start..];
            let end = rest.find('&').map_or(url.len(), |i| value_start + i);
            format!("{}***{}", &url[..value_start], &url[end..])
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Scripted HTTP client for tests.
    ///
    /// Responses are served in order; the last one repeats once the script
    /// runs out. Every requested URL is recorded.
    pub struct MockHttpClient {
        responses: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
        last: Mutex<Option<Result<Vec<u8>, ProviderError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self::sequence(vec![response])
        }

        pub fn sequence(responses: Vec<Result<Vec<u8>, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                last: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().push(url.to_string());
            let mut last = self.last.lock();
            if let Some(next) = self.responses.lock().pop_front() {
                *last = Some(next);
            }
            last.clone()
                .unwrap_or_else(|| Err(ProviderError::HttpError("no scripted response".into())))
        }
    }

    #[test]
    fn test_mock_records_urls() {
        let mock = MockHttpClient::new(Ok(b"{}".to_vec()));
        assert_eq!(mock.get("https://api.test/iso").unwrap(), b"{}".to_vec());
        assert_eq!(mock.requests(), vec!["https://api.test/iso"]);
    }

    #[test]
    fn test_mock_client_sequence_repeats_last() {
        let mock = MockHttpClient::sequence(vec![
            Err(ProviderError::Timeout("slow".into())),
            Ok(vec![7]),
        ]);
        assert!(mock.get("a").is_err());
        assert_eq!(mock.get("b").unwrap(), vec![7]);
        assert_eq!(mock.get("c").unwrap(), vec![7]);
        assert_eq!(mock.requests().len(), 3);
    }

    #[test]
    fn test_transport_error_hides_token() {
        let client = ReqwestClient::with_timeout(Duration::from_secs(2)).unwrap();
        let url = concat!(
            "http://127.0.0.1:1/isochrone/walking/18,45",
            "?contours_minutes=10&access_token=pk.SECRET123"
        );

        let err = client.get(url).unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("pk.SECRET123"), "token in: {}", message);
        assert!(message.contains("access_token=***"));
    }

    #[test]
    fn test_redact_token() {
        assert_eq!(
            redact("https://x/y?contours_minutes=10&access_token=pk.secret&polygons=true"),
            "https://x/y?contours_minutes=10&access_token=***&polygons=true"
        );
        assert_eq!(redact("https://x/y?access_token=pk.secret"), "https://x/y?access_token=***");
        assert_eq!(redact("https://x/y?a=1"), "https://x/y?a=1");
    }
}
