use std::fmt;

use serde::{
    de::{DeserializeOwned, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    domain::{ModelId, Verdict},
    error::{ApiError, EnvelopeError},
};

pub const HEALTH_PATH: &str = "/api/health";
pub const MODELS_PATH: &str = "/api/models";
pub const PREDICT_PATH: &str = "/api/predict";
pub const COMPARE_PATH: &str = "/api/compare";
pub const BATCH_PREDICT_PATH: &str = "/api/predict/batch";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub normal: f64,
    pub hate_speech: f64,
}

/// Classification outcome for one text, produced by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub prediction: u8,
    pub label: String,
    pub confidence: f64,
    pub probabilities: Probabilities,
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_prediction(self.prediction)
    }
}

/// Entry of a compare or batch response. The backend reports a per-entry
/// `{error}` object when one model or one line fails without failing the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Scored(AnalysisResult),
    Failed { error: String },
}

/// Model id to outcome mapping that keeps the order the backend sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonResults(Vec<(ModelId, PredictionOutcome)>);

impl ComparisonResults {
    pub fn new(entries: Vec<(ModelId, PredictionOutcome)>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, model: &ModelId) -> Option<&PredictionOutcome> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == model)
            .map(|(_, outcome)| outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModelId, &PredictionOutcome)> {
        self.0.iter().map(|(model, outcome)| (model, outcome))
    }
}

impl Serialize for ComparisonResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (model, outcome) in &self.0 {
            map.serialize_entry(model.as_str(), outcome)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ComparisonResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ComparisonResults;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of model id to prediction outcome")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((model, outcome)) =
                    access.next_entry::<ModelId, PredictionOutcome>()?
                {
                    entries.push((model, outcome));
                }
                Ok(ComparisonResults(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
    pub model: ModelId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictRequest {
    pub texts: Vec<String>,
    pub model: ModelId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub available_models: Vec<ModelId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResponse {
    pub results: ComparisonResults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictResponse {
    pub results: Vec<PredictionOutcome>,
}

/// Decoded `{success, ...}` response body.
#[derive(Debug, Clone)]
pub enum Envelope<T> {
    Success(T),
    Failure(ApiError),
}

#[derive(Deserialize)]
struct SuccessProbe {
    success: Option<bool>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decodes straight from the body bytes so map payloads keep their order.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let probe: SuccessProbe = serde_json::from_slice(bytes)?;
        match probe.success {
            Some(true) => Ok(Self::Success(serde_json::from_slice(bytes)?)),
            Some(false) => Ok(Self::Failure(serde_json::from_slice(bytes)?)),
            None => Err(EnvelopeError::MissingSuccessFlag),
        }
    }
}
