use reqwest::header::CONTENT_TYPE;

use crate::settings::map_reqwest_error;
use crate::{ClientError, ClientSettings, FailureKind, PreviewDocument};

/// Stands in for the embedded preview surface: it loads the artifact and
/// reports once the whole document has arrived.
#[derive(Debug, Clone)]
pub struct PreviewLoader {
    settings: ClientSettings,
}

impl PreviewLoader {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    pub async fn load(&self, url: &str) -> Result<PreviewDocument, ClientError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.settings.build_client(true)?;
        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(PreviewDocument {
            final_url,
            content_type,
            byte_len: body.len() as u64,
        })
    }
}
