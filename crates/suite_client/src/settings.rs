use std::time::Duration;

use url::Url;

use crate::{ClientError, FailureKind, SubmissionId};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub generate_path: String,
    /// Prefix for the event stream; the submission id is appended.
    pub events_path: String,
    pub connect_timeout: Duration,
    /// Upper bound for the whole generation request. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// A stream that delivers nothing, keep-alives included, for this long is dead.
    pub stream_idle_timeout: Duration,
    pub max_attachment_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            generate_path: "/api/chat/".to_string(),
            events_path: "/api/events/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            stream_idle_timeout: Duration::from_secs(60),
            max_attachment_bytes: 20 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn generate_url(&self) -> Result<Url, ClientError> {
        self.join(&self.generate_path)
    }

    pub fn events_url(&self, submission: SubmissionId) -> Result<Url, ClientError> {
        self.join(&format!("{}{}", self.events_path, submission))
    }

    fn join(&self, path: &str) -> Result<Url, ClientError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    pub(crate) fn build_client(&self, bounded: bool) -> Result<reqwest::Client, ClientError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.connect_timeout);
        if bounded {
            if let Some(timeout) = self.request_timeout {
                builder = builder.timeout(timeout);
            }
        }
        builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(FailureKind::MalformedResponse, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::ClientSettings;
    use crate::FailureKind;

    #[test]
    fn endpoint_urls_are_joined_onto_base() {
        let settings = ClientSettings::with_base_url("http://localhost:8000");
        assert_eq!(
            settings.generate_url().unwrap().as_str(),
            "http://localhost:8000/api/chat/"
        );
        assert_eq!(
            settings.events_url(42).unwrap().as_str(),
            "http://localhost:8000/api/events/42"
        );
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let settings = ClientSettings::with_base_url("not a url");
        assert_eq!(settings.generate_url().unwrap_err().kind, FailureKind::InvalidUrl);
    }
}
