//! Representative cafe photos from Unsplash.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const PLACEHOLDER_PHOTO: &str = "https://placehold.co/250x150/F3CC96/000000?text=No+Image";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<PhotoResult>,
}

#[derive(Debug, Deserialize)]
struct PhotoResult {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    small: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PhotoClient {
    client: Client,
    base_url: String,
    access_key: Option<String>,
}

impl PhotoClient {
    /// # Errors
    /// Fails only if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        access_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
        })
    }

    /// Small image URL of the first search hit, or `None`.
    pub async fn search(&self, cafe_name: &str) -> Option<String> {
        let Some(key) = self.access_key.as_deref() else {
            tracing::debug!("No Unsplash key; skipping photo search");
            return None;
        };

        let url = format!("{}/search/photos", self.base_url);
        let query = format!("{} cafe interior", cafe_name);

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("query", query.as_str()),
                ("client_id", key),
                ("orientation", "landscape"),
                ("per_page", "1"),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Photo search request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Photo search returned status {}", response.status());
            return None;
        }

        let body: SearchResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Photo search parse error: {}", e);
                return None;
            }
        };

        body.results.into_iter().next().and_then(|r| r.urls.small)
    }

    /// Photo URL for `cafe_name`, falling back to [`PLACEHOLDER_PHOTO`].
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn photo_for(&self, cafe_name: &str) -> String {
        self.search(cafe_name)
            .await
            .unwrap_or_else(|| PLACEHOLDER_PHOTO.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, key: Option<&str>) -> PhotoClient {
        PhotoClient::new(
            &server.uri(),
            key.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_result_small_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(query_param("query", "Third Wave cafe interior"))
            .and(query_param("client_id", "test-key"))
            .and(query_param("orientation", "landscape"))
            .and(query_param("per_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"urls": {"small": "https://images.example/first.jpg", "full": "x"}},
                    {"urls": {"small": "https://images.example/second.jpg"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let photo = client(&server, Some("test-key")).photo_for("Third Wave").await;
        assert_eq!(photo, "https://images.example/first.jpg");
    }

    #[tokio::test]
    async fn test_no_results_uses_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})),
            )
            .mount(&server)
            .await;

        let photo = client(&server, Some("k")).photo_for("Nowhere").await;
        assert_eq!(photo, PLACEHOLDER_PHOTO);
    }

    #[tokio::test]
    async fn test_unauthorized_uses_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let photo = client(&server, Some("bad")).photo_for("Cafe").await;
        assert_eq!(photo, PLACEHOLDER_PHOTO);
    }

    #[tokio::test]
    async fn test_malformed_json_uses_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let photo = client(&server, Some("k")).photo_for("Cafe").await;
        assert_eq!(photo, PLACEHOLDER_PHOTO);
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let photo = client(&server, None).photo_for("Cafe").await;
        assert_eq!(photo, PLACEHOLDER_PHOTO);
    }
}
