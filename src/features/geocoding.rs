use crate::PhotoLocatorError;
use crate::features::coordinates::Coordinates;
use bon::bon;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "photo_locator/",
    env!("CARGO_PKG_VERSION"),
    " (Rust; reverse geocoding of photo GPS tags)"
);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Street-level detail.
pub const DEFAULT_ZOOM: u8 = 18;
/// Nominatim's usage policy allows at most one request per second.
pub const DEFAULT_COURTESY_DELAY: Duration = Duration::from_secs(1);

/// Address components of a reverse-geocoded position, e.g. `country`, `state`, `city`, `road`.
///
/// An empty address is a valid result meaning no details are known for the position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Address(BTreeMap<String, String>);

impl Address {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Address {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Turns coordinates into an address.
pub trait ReverseGeocoder {
    fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> impl Future<Output = Result<Address, PhotoLocatorError>> + Send;
}

#[derive(Serialize)]
struct ReverseQuery {
    format: &'static str,
    lat: f64,
    lon: f64,
    zoom: u8,
    addressdetails: u8,
}

/// Extracts the `address` object of a Nominatim `/reverse` response body.
///
/// A missing `address` (Nominatim answers `{"error": "Unable to geocode"}` over the ocean)
/// yields an empty address. Non-string values are dropped.
pub fn parse_response(body: &str) -> Result<Address, PhotoLocatorError> {
    let value: Value = serde_json::from_str(body).map_err(PhotoLocatorError::ResponseParseError)?;
    let Value::Object(root) = value else {
        return Err(PhotoLocatorError::ResponseParseError(
            <serde_json::Error as serde::de::Error>::custom("expected a JSON object"),
        ));
    };

    let address: Address = root
        .get("address")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(key, value)| value.as_str().map(|v| (key.as_str(), v)))
                .collect()
        })
        .unwrap_or_default();
    Ok(address)
}

/// Client for the public Nominatim reverse-geocoding API.
#[derive(Debug, Clone)]
pub struct Nominatim {
    client: Client,
    endpoint: String,
    zoom: u8,
    courtesy_delay: Duration,
}

#[bon]
impl Nominatim {
    /// # Builder Arguments
    ///
    /// * `endpoint` - (Default: [`DEFAULT_ENDPOINT`]) Full URL of the `/reverse` resource.
    /// * `user_agent` - (Default: [`DEFAULT_USER_AGENT`]) Sent with every request, required by the service.
    /// * `timeout` - (Default: 5 s) Upper bound for the whole request including the body.
    /// * `zoom` - (Default: `18`) Level of detail of the returned address.
    /// * `courtesy_delay` - (Default: 1 s) Pause after every request.
    ///
    /// # Errors
    ///
    /// [`PhotoLocatorError::HttpClient`] when the TLS backend cannot be initialised.
    #[builder]
    pub fn new(
        #[builder(into, default = DEFAULT_ENDPOINT.to_string())] endpoint: String,
        #[builder(into, default = DEFAULT_USER_AGENT.to_string())] user_agent: String,
        #[builder(default = DEFAULT_TIMEOUT)] timeout: Duration,
        #[builder(default = DEFAULT_ZOOM)] zoom: u8,
        #[builder(default = DEFAULT_COURTESY_DELAY)] courtesy_delay: Duration,
    ) -> Result<Self, PhotoLocatorError> {
        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(PhotoLocatorError::HttpClient)?;
        Ok(Self {
            client,
            endpoint,
            zoom,
            courtesy_delay,
        })
    }

    async fn request(&self, coordinates: Coordinates) -> Result<Address, PhotoLocatorError> {
        let query = ReverseQuery {
            format: "json",
            lat: coordinates.latitude(),
            lon: coordinates.longitude(),
            zoom: self.zoom,
            addressdetails: 1,
        };
        let body = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(PhotoLocatorError::NetworkError)?
            .text()
            .await
            .map_err(PhotoLocatorError::NetworkError)?;
        parse_response(&body)
    }
}

impl ReverseGeocoder for Nominatim {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn reverse(&self, coordinates: Coordinates) -> Result<Address, PhotoLocatorError> {
        let result = self.request(coordinates).await;
        debug!(ok = result.is_ok(), "reverse geocoding finished");
        if !self.courtesy_delay.is_zero() {
            tokio::time::sleep(self.courtesy_delay).await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned HTTP response and hands back the raw request it received.
    async fn serve_once(response: String, stall: Option<Duration>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/reverse", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            if let Some(stall) = stall {
                tokio::time::sleep(stall).await;
            }
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });
        (url, handle)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn nominatim(endpoint: &str, timeout: Duration) -> Nominatim {
        Nominatim::builder()
            .endpoint(endpoint)
            .user_agent("photo_locator-tests/1.0")
            .timeout(timeout)
            .courtesy_delay(Duration::ZERO)
            .build()
            .unwrap()
    }

    fn pittsburgh() -> Coordinates {
        Coordinates::new(40.446_111, -79.982_222).unwrap()
    }

    #[test]
    fn test_parse_response_keeps_string_fields() {
        let body = serde_json::json!({
            "place_id": 1234,
            "display_name": "Forbes Avenue, Pittsburgh, Pennsylvania, United States",
            "address": {
                "road": "Forbes Avenue",
                "city": "Pittsburgh",
                "state": "Pennsylvania",
                "country": "United States",
                "country_code": "us",
                "rank": 7
            }
        })
        .to_string();

        let address = parse_response(&body).unwrap();
        assert_eq!(address.len(), 5);
        assert_eq!(address.get("city"), Some("Pittsburgh"));
        assert_eq!(address.get("rank"), None);
    }

    #[test]
    fn test_parse_response_without_address_is_empty() {
        let address = parse_response(r#"{"error":"Unable to geocode"}"#).unwrap();
        assert!(address.is_empty());
    }

    #[test]
    fn test_parse_response_rejects_invalid_json() {
        assert!(matches!(
            parse_response("<html>Bad Gateway</html>"),
            Err(PhotoLocatorError::ResponseParseError(_))
        ));
        assert!(matches!(
            parse_response("[1, 2, 3]"),
            Err(PhotoLocatorError::ResponseParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_reverse_sends_query_and_user_agent() {
        let body = r#"{"address":{"city":"Pittsburgh","country":"United States"}}"#;
        let (url, server) = serve_once(http_response("200 OK", body), None).await;

        let address = nominatim(&url, Duration::from_secs(5))
            .reverse(pittsburgh())
            .await
            .unwrap();
        assert_eq!(address.get("city"), Some("Pittsburgh"));

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /reverse?"));
        assert!(request_line.contains("format=json"));
        assert!(request_line.contains("lat=40.446111"));
        assert!(request_line.contains("lon=-79.982222"));
        assert!(request_line.contains("zoom=18"));
        assert!(request_line.contains("addressdetails=1"));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("user-agent: photo_locator-tests/1.0")
        );
    }

    #[tokio::test]
    async fn test_error_status_is_network_error() {
        let (url, _server) =
            serve_once(http_response("503 Service Unavailable", "{}"), None).await;

        let result = nominatim(&url, Duration::from_secs(5))
            .reverse(pittsburgh())
            .await;
        assert!(matches!(result, Err(PhotoLocatorError::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let (url, _server) = serve_once(
            http_response("200 OK", "{}"),
            Some(Duration::from_secs(5)),
        )
        .await;

        let result = nominatim(&url, Duration::from_millis(200))
            .reverse(pittsburgh())
            .await;
        assert!(matches!(
            result,
            Err(PhotoLocatorError::NetworkError(ref e)) if e.is_timeout()
        ));
    }

    #[tokio::test]
    async fn test_non_json_body_is_response_parse_error() {
        let (url, _server) = serve_once(http_response("200 OK", "not json"), None).await;

        let result = nominatim(&url, Duration::from_secs(5))
            .reverse(pittsburgh())
            .await;
        assert!(matches!(
            result,
            Err(PhotoLocatorError::ResponseParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_courtesy_delay_applies_after_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/reverse", listener.local_addr().unwrap());
        drop(listener);

        let geocoder = Nominatim::builder()
            .endpoint(url)
            .courtesy_delay(Duration::from_millis(300))
            .build()
            .unwrap();

        let started = tokio::time::Instant::now();
        let result = geocoder.reverse(pittsburgh()).await;
        assert!(matches!(result, Err(PhotoLocatorError::NetworkError(_))));
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
