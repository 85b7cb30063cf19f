use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use suite_logging::suite_debug;

use crate::settings::map_reqwest_error;
use crate::{
    AttachmentSource, ClientError, ClientSettings, FailureKind, GenerationInput, GenerationOutput,
    SubmissionId,
};

#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        submission: SubmissionId,
        input: &GenerationInput,
    ) -> Result<GenerationOutput, ClientError>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(alias = "artifact_url")]
    url: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestGenerator {
    settings: ClientSettings,
}

impl ReqwestGenerator {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    async fn attachment_part(&self, attachment: &AttachmentSource) -> Result<Part, ClientError> {
        let unreadable =
            |err: std::io::Error| ClientError::new(FailureKind::AttachmentUnreadable, err.to_string());
        let meta = tokio::fs::metadata(&attachment.path)
            .await
            .map_err(unreadable)?;
        let max_bytes = self.settings.max_attachment_bytes;
        if meta.len() > max_bytes {
            return Err(ClientError::new(
                FailureKind::AttachmentTooLarge {
                    max_bytes,
                    actual: meta.len(),
                },
                attachment.name.clone(),
            ));
        }
        let bytes = tokio::fs::read(&attachment.path).await.map_err(unreadable)?;
        Ok(Part::bytes(bytes).file_name(attachment.name.clone()))
    }
}

#[async_trait::async_trait]
impl Generator for ReqwestGenerator {
    async fn generate(
        &self,
        submission: SubmissionId,
        input: &GenerationInput,
    ) -> Result<GenerationOutput, ClientError> {
        let url = self.settings.generate_url()?;
        let mut form = Form::new()
            .text("submission_id", submission.to_string())
            .text("content", input.text.clone());
        if let Some(attachment) = &input.attachment {
            form = form.part("file", self.attachment_part(attachment).await?);
        }

        let client = self.settings.build_client(true)?;
        let response = client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|err| ClientError::new(FailureKind::MalformedResponse, err.to_string()))?;
        // Relative artifact locations are served by the same host.
        let artifact_url = url
            .join(&parsed.url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        suite_debug!("Submission {} produced artifact {}", submission, artifact_url);

        Ok(GenerationOutput {
            artifact_url: artifact_url.to_string(),
        })
    }
}
