//! Media Hosting Client
//!
//! Uploads go straight through to the third-party media host; the platform
//! stores only the returned URL.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::backend::error::ApiError;
use crate::backend::server::config::MediaConfig;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Client for the media-hosting upload endpoint
#[derive(Clone)]
pub struct MediaClient {
    http: Client,
    config: Option<MediaConfig>,
}

impl MediaClient {
    pub fn new(config: Option<MediaConfig>) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Upload one file, returning its hosted URL
    pub async fn upload(
        &self,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let config = self
            .config
            .as_ref()
            .ok_or(ApiError::Unconfigured("media hosting"))?;

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&content_type)
            .map_err(|e| ApiError::validation(format!("invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&config.upload_url)
            .bearer_auth(&config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::upstream(format!("media upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::upstream(format!(
                "media host returned {}",
                response.status()
            )));
        }

        let parsed = response
            .json::<UploadResponse>()
            .await
            .map_err(|e| ApiError::upstream(format!("invalid media host response: {}", e)))?;

        Ok(parsed.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_upload_returns_hosted_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://cdn.example/abc.png"
            })))
            .mount(&server)
            .await;

        let client = MediaClient::new(Some(MediaConfig {
            upload_url: format!("{}/upload", server.uri()),
            api_key: "key".to_string(),
        }));

        let url = client
            .upload("a.png".to_string(), "image/png".to_string(), vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example/abc.png");
    }

    #[tokio::test]
    async fn test_unconfigured_upload() {
        let client = MediaClient::new(None);
        let result = client
            .upload("a.png".to_string(), "image/png".to_string(), vec![])
            .await;
        assert!(matches!(result, Err(ApiError::Unconfigured(_))));
    }
}
