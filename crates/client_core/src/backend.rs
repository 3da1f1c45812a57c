use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{ModelId, RequestId},
    protocol::{
        AnalysisResult, BatchPredictRequest, CompareRequest, ComparisonResults, HealthResponse,
        PredictRequest, PredictionOutcome,
    },
};
use tracing::{debug, warn};

use crate::{
    controller::{Outcome, UiEvent},
    error::ClientError,
};

/// The detector service as seen by the client.
#[async_trait]
pub trait DetectorBackend: Send + Sync {
    async fn health(&self) -> Result<HealthResponse, ClientError>;
    async fn list_models(&self) -> Result<Vec<ModelId>, ClientError>;
    async fn predict(&self, request: &PredictRequest) -> Result<AnalysisResult, ClientError>;
    async fn compare(&self, request: &CompareRequest) -> Result<ComparisonResults, ClientError>;
    async fn predict_batch(
        &self,
        request: &BatchPredictRequest,
    ) -> Result<Vec<PredictionOutcome>, ClientError>;
}

#[async_trait]
impl<T> DetectorBackend for Arc<T>
where
    T: DetectorBackend + ?Sized,
{
    async fn health(&self) -> Result<HealthResponse, ClientError> {
        (**self).health().await
    }

    async fn list_models(&self) -> Result<Vec<ModelId>, ClientError> {
        (**self).list_models().await
    }

    async fn predict(&self, request: &PredictRequest) -> Result<AnalysisResult, ClientError> {
        (**self).predict(request).await
    }

    async fn compare(&self, request: &CompareRequest) -> Result<ComparisonResults, ClientError> {
        (**self).compare(request).await
    }

    async fn predict_batch(
        &self,
        request: &BatchPredictRequest,
    ) -> Result<Vec<PredictionOutcome>, ClientError> {
        (**self).predict_batch(request).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    Health,
    ListModels,
    Predict(PredictRequest),
    Compare(CompareRequest),
    PredictBatch(BatchPredictRequest),
}

impl BackendRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::ListModels => "list_models",
            Self::Predict(_) => "predict",
            Self::Compare(_) => "compare",
            Self::PredictBatch(_) => "predict_batch",
        }
    }
}

/// A request the controller wants issued, tagged with the id its completion must carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub id: RequestId,
    pub request: BackendRequest,
}

/// Runs one command against `backend` and turns the outcome into a completion event.
/// Makes a single call; retries belong to the backend's own call policy.
pub async fn execute<B>(backend: &B, command: Command) -> UiEvent
where
    B: DetectorBackend + ?Sized,
{
    let Command { id, request } = command;
    let name = request.name();
    debug!(request_id = id.0, request = name, "dispatching backend request");

    let outcome = match request {
        BackendRequest::Health => Outcome::Health(backend.health().await),
        BackendRequest::ListModels => Outcome::Models(backend.list_models().await),
        BackendRequest::Predict(request) => {
            let result = backend.predict(&request).await;
            Outcome::Single {
                model: request.model,
                result,
            }
        }
        BackendRequest::Compare(request) => Outcome::Comparison(backend.compare(&request).await),
        BackendRequest::PredictBatch(request) => {
            let results = backend.predict_batch(&request).await;
            Outcome::Batch {
                texts: request.texts,
                results,
            }
        }
    };

    if let Some(err) = outcome.error() {
        warn!(request_id = id.0, request = name, "backend request failed: {err}");
    }

    UiEvent::Completed { id, outcome }
}

/// Completes `command` with `err` without touching any backend, so the
/// controller can settle a request that never left the front end.
pub fn abandon(command: Command, err: ClientError) -> UiEvent {
    let Command { id, request } = command;
    warn!(request_id = id.0, request = request.name(), "backend request abandoned: {err}");
    let outcome = match request {
        BackendRequest::Health => Outcome::Health(Err(err)),
        BackendRequest::ListModels => Outcome::Models(Err(err)),
        BackendRequest::Predict(request) => Outcome::Single {
            model: request.model,
            result: Err(err),
        },
        BackendRequest::Compare(_) => Outcome::Comparison(Err(err)),
        BackendRequest::PredictBatch(request) => Outcome::Batch {
            texts: request.texts,
            results: Err(err),
        },
    };
    UiEvent::Completed { id, outcome }
}
