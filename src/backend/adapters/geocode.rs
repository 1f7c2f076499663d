//! Geocoding Lookup
//!
//! Forward-geocodes an event's free-text location to coordinates. Lookup
//! failures are soft: event creation proceeds without coordinates.

use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: f64,
    lon: f64,
}

/// Client for the geocoding API
#[derive(Clone)]
pub struct GeocodeClient {
    http: Client,
    api_url: Option<String>,
}

impl GeocodeClient {
    pub fn new(api_url: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_url,
        }
    }

    /// Look up coordinates for a location string
    ///
    /// Returns `None` when the service is unconfigured, unreachable, or has
    /// no match.
    pub async fn lookup(&self, location: &str) -> Option<(f64, f64)> {
        let api_url = self.api_url.as_ref()?;

        let response = self
            .http
            .get(api_url)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!("Geocode lookup returned {}", r.status());
                return None;
            }
            Err(e) => {
                tracing::warn!("Geocode lookup failed: {:?}", e);
                return None;
            }
        };

        match response.json::<Vec<GeocodeHit>>().await {
            Ok(hits) => hits.first().map(|h| (h.lat, h.lon)),
            Err(e) => {
                tracing::warn!("Invalid geocode response: {:?}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lookup_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": 52.37, "lon": 4.89 }
            ])))
            .mount(&server)
            .await;

        let client = GeocodeClient::new(Some(server.uri()));
        let hit = client.lookup("Amsterdam").await;
        assert_eq!(hit, Some((52.37, 4.89)));
    }

    #[tokio::test]
    async fn test_lookup_unconfigured() {
        let client = GeocodeClient::new(None);
        assert_eq!(client.lookup("Amsterdam").await, None);
    }

    #[tokio::test]
    async fn test_lookup_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = GeocodeClient::new(Some(server.uri()));
        assert_eq!(client.lookup("Nowhere").await, None);
    }
}
