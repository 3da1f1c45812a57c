use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    domain::ModelId,
    protocol::{
        AnalysisResult, BatchPredictRequest, BatchPredictResponse, CompareRequest,
        CompareResponse, ComparisonResults, Envelope, HealthResponse, ModelsResponse,
        PredictRequest, PredictResponse, PredictionOutcome, BATCH_PREDICT_PATH, COMPARE_PATH,
        HEALTH_PATH, MODELS_PATH, PREDICT_PATH,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::{backend::DetectorBackend, config::Settings, error::ClientError};

/// Timeout and retry behavior applied to every backend call.
///
/// The default is one attempt with no client-side timeout. Retries only cover
/// transport failures; a `{success: false}` answer is never re-sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Option<Duration>,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: None,
            max_attempts: 1,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

pub struct HttpDetectorClient {
    http: Client,
    base_url: Url,
    policy: CallPolicy,
}

impl HttpDetectorClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_policy(base_url, CallPolicy::default())
    }

    pub fn with_policy(base_url: &str, policy: CallPolicy) -> Result<Self, ClientError> {
        let trimmed = base_url.trim();
        let base_url = Url::parse(trimmed).map_err(|source| ClientError::InvalidUrl {
            url: trimmed.to_string(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            base_url,
            policy,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        Self::with_policy(&settings.backend_url, settings.call_policy())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn policy(&self) -> CallPolicy {
        self.policy
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, ClientError> {
        self.call(Method::GET, path, None).await
    }

    async fn post<B, T>(&self, path: &'static str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.call(Method::POST, path, Some(&body)).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &'static str,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            debug!(endpoint = path, attempt, "calling detector backend");
            match self.attempt(method.clone(), path, body).await {
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        endpoint = path,
                        attempt,
                        max_attempts,
                        "backend call failed, retrying: {err}"
                    );
                    tokio::time::sleep(self.policy.retry_backoff).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &'static str,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        let mut request = self.http.request(method, self.endpoint(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(timeout) = self.policy.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| self.transport(err))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| self.transport(err))?;

        // Failure envelopes arrive with 4xx/5xx statuses, so the body is decoded first.
        match Envelope::<T>::from_slice(&bytes) {
            Ok(Envelope::Success(payload)) => Ok(payload),
            Ok(Envelope::Failure(api_error)) => {
                Err(ClientError::Rejected(api_error.message().to_string()))
            }
            Err(_) if !status.is_success() => Err(ClientError::Status {
                status: status.as_u16(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn transport(&self, err: reqwest::Error) -> ClientError {
        match self.policy.timeout {
            Some(after) if err.is_timeout() => ClientError::Timeout { after },
            _ => ClientError::Transport(err),
        }
    }
}

#[async_trait]
impl DetectorBackend for HttpDetectorClient {
    async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get(HEALTH_PATH).await
    }

    async fn list_models(&self) -> Result<Vec<ModelId>, ClientError> {
        let response: ModelsResponse = self.get(MODELS_PATH).await?;
        Ok(response.models)
    }

    async fn predict(&self, request: &PredictRequest) -> Result<AnalysisResult, ClientError> {
        let response: PredictResponse = self.post(PREDICT_PATH, request).await?;
        Ok(response.result)
    }

    async fn compare(&self, request: &CompareRequest) -> Result<ComparisonResults, ClientError> {
        let response: CompareResponse = self.post(COMPARE_PATH, request).await?;
        Ok(response.results)
    }

    async fn predict_batch(
        &self,
        request: &BatchPredictRequest,
    ) -> Result<Vec<PredictionOutcome>, ClientError> {
        let response: BatchPredictResponse = self.post(BATCH_PREDICT_PATH, request).await?;
        Ok(response.results)
    }
}
