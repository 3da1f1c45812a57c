//! UI state machine for the detector front ends.
//!
//! [`UiState`] is an immutable value: every [`UiEvent`] consumes the current
//! state and yields a [`Transition`] holding the next state and, at most, one
//! [`Command`] to hand to the backend executor. No I/O happens here, so every
//! front end (GUI, CLI, tests) drives the same rules.
//!
//! Analysis, comparison and batch responses share one results view. Each
//! request that may replace it takes a fresh [`RequestId`] and becomes the
//! results ticket; completions carrying any other id are stale and dropped.

use std::collections::BTreeSet;

use shared::{
    domain::{ModelId, RequestId},
    protocol::{
        AnalysisResult, BatchPredictRequest, CompareRequest, ComparisonResults, HealthResponse,
        PredictRequest, PredictionOutcome,
    },
};
use tracing::{debug, info, warn};

use crate::{
    backend::{BackendRequest, Command},
    error::ClientError,
    view::{render_batch, render_comparison, render_single, ResultView},
};

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text to analyze";
pub const NO_MODEL_MESSAGE: &str = "Please select a model first";
pub const EMPTY_BATCH_MESSAGE: &str = "Please enter texts for batch analysis";
pub const NO_BATCH_LINES_MESSAGE: &str = "Please enter valid texts (one per line)";
pub const BACKEND_UNREACHABLE_MESSAGE: &str =
    "Failed to connect to the backend. Please make sure the detector service is running.";

#[derive(Debug)]
pub enum UiEvent {
    SelectModel(ModelId),
    EditText(String),
    EditBatch(String),
    AnalyzeSingle,
    CompareModels,
    AnalyzeBatch,
    ClearAll,
    CheckHealth,
    ListModels,
    DismissNotification,
    Completed { id: RequestId, outcome: Outcome },
}

#[derive(Debug)]
pub enum Outcome {
    Health(Result<HealthResponse, ClientError>),
    Models(Result<Vec<ModelId>, ClientError>),
    Single {
        model: ModelId,
        result: Result<AnalysisResult, ClientError>,
    },
    Comparison(Result<ComparisonResults, ClientError>),
    Batch {
        texts: Vec<String>,
        results: Result<Vec<PredictionOutcome>, ClientError>,
    },
}

impl Outcome {
    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Health(Err(err))
            | Self::Models(Err(err))
            | Self::Single { result: Err(err), .. }
            | Self::Comparison(Err(err))
            | Self::Batch { results: Err(err), .. } => Some(err),
            _ => None,
        }
    }

    fn replaces_results(&self) -> bool {
        matches!(
            self,
            Self::Single { .. } | Self::Comparison(_) | Self::Batch { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Validation,
    Backend,
    Transport,
}

/// Blocking message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn validation(message: &str) -> Self {
        Self {
            kind: NotificationKind::Validation,
            message: message.to_string(),
        }
    }

    fn failure(prefix: &str, err: &ClientError) -> Self {
        Self {
            kind: if err.is_rejection() {
                NotificationKind::Backend
            } else {
                NotificationKind::Transport
            },
            message: format!("{prefix}: {err}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online {
        message: Option<String>,
    },
    Unreachable,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    selected_model: Option<ModelId>,
    text_input: String,
    batch_input: String,
    results: ResultView,
    notification: Option<Notification>,
    backend: BackendStatus,
    available_models: Vec<ModelId>,
    pending: BTreeSet<RequestId>,
    results_ticket: Option<RequestId>,
    next_id: RequestId,
}

#[derive(Debug)]
pub struct Transition {
    pub state: UiState,
    pub command: Option<Command>,
}

impl Transition {
    fn idle(state: UiState) -> Self {
        Self {
            state,
            command: None,
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_model(&self) -> Option<&ModelId> {
        self.selected_model.as_ref()
    }

    pub fn text_input(&self) -> &str {
        &self.text_input
    }

    pub fn batch_input(&self) -> &str {
        &self.batch_input
    }

    pub fn results(&self) -> &ResultView {
        &self.results
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn backend(&self) -> &BackendStatus {
        &self.backend
    }

    pub fn available_models(&self) -> &[ModelId] {
        &self.available_models
    }

    /// Single analysis needs a selected model.
    pub fn can_analyze_single(&self) -> bool {
        self.selected_model.is_some()
    }

    /// True while any issued request has not completed yet.
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    pub fn apply(self, event: UiEvent) -> Transition {
        match event {
            UiEvent::SelectModel(model) => Transition::idle(Self {
                selected_model: Some(model),
                ..self
            }),
            UiEvent::EditText(text_input) => Transition::idle(Self { text_input, ..self }),
            UiEvent::EditBatch(batch_input) => Transition::idle(Self {
                batch_input,
                ..self
            }),
            UiEvent::AnalyzeSingle => self.analyze_single(),
            UiEvent::CompareModels => self.compare_models(),
            UiEvent::AnalyzeBatch => self.analyze_batch(),
            UiEvent::ClearAll => Transition::idle(self.cleared()),
            UiEvent::CheckHealth => self.issue(BackendRequest::Health, false),
            UiEvent::ListModels => self.issue(BackendRequest::ListModels, false),
            UiEvent::DismissNotification => Transition::idle(Self {
                notification: None,
                ..self
            }),
            UiEvent::Completed { id, outcome } => Transition::idle(self.complete(id, outcome)),
        }
    }

    fn analyze_single(self) -> Transition {
        let text = self.text_input.trim().to_string();
        if text.is_empty() {
            return self.reject(EMPTY_TEXT_MESSAGE);
        }
        let Some(model) = self.selected_model.clone() else {
            return self.reject(NO_MODEL_MESSAGE);
        };
        self.issue(BackendRequest::Predict(PredictRequest { text, model }), true)
    }

    fn compare_models(self) -> Transition {
        let text = self.text_input.trim().to_string();
        if text.is_empty() {
            return self.reject(EMPTY_TEXT_MESSAGE);
        }
        self.issue(BackendRequest::Compare(CompareRequest { text }), true)
    }

    fn analyze_batch(self) -> Transition {
        if self.batch_input.trim().is_empty() {
            return self.reject(EMPTY_BATCH_MESSAGE);
        }
        let Some(model) = self.selected_model.clone() else {
            return self.reject(NO_MODEL_MESSAGE);
        };
        let texts = batch_lines(&self.batch_input);
        if texts.is_empty() {
            return self.reject(NO_BATCH_LINES_MESSAGE);
        }
        self.issue(
            BackendRequest::PredictBatch(BatchPredictRequest { texts, model }),
            true,
        )
    }

    fn reject(self, message: &str) -> Transition {
        debug!("rejected action before dispatch: {message}");
        Transition::idle(Self {
            notification: Some(Notification::validation(message)),
            ..self
        })
    }

    fn issue(mut self, request: BackendRequest, replaces_results: bool) -> Transition {
        let id = self.next_id;
        self.next_id = id.next();
        self.pending.insert(id);
        if replaces_results {
            self.results_ticket = Some(id);
        }
        Transition {
            state: self,
            command: Some(Command { id, request }),
        }
    }

    fn cleared(self) -> Self {
        Self {
            selected_model: None,
            text_input: String::new(),
            batch_input: String::new(),
            results: ResultView::Empty,
            results_ticket: None,
            ..self
        }
    }

    fn complete(mut self, id: RequestId, outcome: Outcome) -> Self {
        self.pending.remove(&id);

        if outcome.replaces_results() && self.results_ticket != Some(id) {
            debug!(request_id = id.0, "discarding stale backend response");
            return self;
        }

        match outcome {
            Outcome::Health(Ok(health)) => {
                info!(models = ?health.available_models, "detector backend is up");
                self.available_models = health.available_models;
                self.backend = BackendStatus::Online {
                    message: health.message,
                };
            }
            Outcome::Health(Err(err)) => {
                warn!("detector backend health check failed: {err}");
                self.backend = BackendStatus::Unreachable;
                self.notification = Some(Notification {
                    kind: NotificationKind::Transport,
                    message: BACKEND_UNREACHABLE_MESSAGE.to_string(),
                });
            }
            Outcome::Models(Ok(models)) => self.available_models = models,
            Outcome::Models(Err(err)) => {
                self.notification = Some(Notification::failure("Model listing failed", &err));
            }
            Outcome::Single { model, result } => match result {
                Ok(result) => self.results = render_single(&model, &result),
                Err(err) => {
                    self.notification = Some(Notification::failure("Analysis failed", &err));
                }
            },
            Outcome::Comparison(result) => match result {
                Ok(results) => self.results = render_comparison(&results),
                Err(err) => {
                    self.notification = Some(Notification::failure("Comparison failed", &err));
                }
            },
            Outcome::Batch { texts, results } => match results {
                Ok(results) if results.len() == texts.len() => {
                    self.results = render_batch(&texts, &results);
                }
                Ok(results) => {
                    let message = format!(
                        "Batch analysis failed: backend returned {} results for {} texts",
                        results.len(),
                        texts.len()
                    );
                    warn!("{message}");
                    self.notification = Some(Notification {
                        kind: NotificationKind::Backend,
                        message,
                    });
                }
                Err(err) => {
                    self.notification =
                        Some(Notification::failure("Batch analysis failed", &err));
                }
            },
        }

        self
    }
}

/// Non-empty lines of the batch box, trimmed, in their original order.
pub fn batch_lines(batch_input: &str) -> Vec<String> {
    batch_input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
