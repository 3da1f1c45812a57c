use std::{borrow::Cow, convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);
    };
}

id_newtype!(RequestId);

impl RequestId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Classification model identifier as exchanged with the detector backend.
///
/// Ids the client has no presentation metadata for are kept verbatim in
/// [`ModelId::Other`] so a growing backend enumeration never breaks rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelId {
    LogisticRegression,
    NaiveBayes,
    RandomForest,
    DistilBert,
    Other(String),
}

pub const KNOWN_MODELS: [ModelId; 4] = [
    ModelId::LogisticRegression,
    ModelId::NaiveBayes,
    ModelId::RandomForest,
    ModelId::DistilBert,
];

impl ModelId {
    pub fn as_str(&self) -> &str {
        match self {
            Self::LogisticRegression => "logistic_regression",
            Self::NaiveBayes => "naive_bayes",
            Self::RandomForest => "random_forest",
            Self::DistilBert => "distilbert",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Human-readable label shown on model cards and result headers.
    pub fn display_name(&self) -> Cow<'_, str> {
        match self {
            Self::LogisticRegression => Cow::Borrowed("Logistic Regression"),
            Self::NaiveBayes => Cow::Borrowed("Naive Bayes"),
            Self::RandomForest => Cow::Borrowed("Random Forest"),
            Self::DistilBert => Cow::Borrowed("DistilBERT"),
            Self::Other(raw) => Cow::Owned(title_case_id(raw)),
        }
    }

    /// Icon tag for the model; front ends map tags to their own glyphs.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::LogisticRegression => "chart-line",
            Self::NaiveBayes => "calculator",
            Self::RandomForest => "tree",
            Self::DistilBert => "robot",
            Self::Other(_) => "cube",
        }
    }
}

fn title_case_id(raw: &str) -> String {
    let words: Vec<String> = raw
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    if words.is_empty() {
        "Unknown model".to_string()
    } else {
        words.join(" ")
    }
}

impl From<String> for ModelId {
    fn from(value: String) -> Self {
        match value.as_str() {
            "logistic_regression" => Self::LogisticRegression,
            "naive_bayes" => Self::NaiveBayes,
            "random_forest" => Self::RandomForest,
            "distilbert" => Self::DistilBert,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ModelId {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ModelId> for String {
    fn from(value: ModelId) -> Self {
        match value {
            ModelId::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ModelId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.trim()))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Normal,
    HateSpeech,
}

impl Verdict {
    pub fn from_prediction(prediction: u8) -> Self {
        if prediction == 1 {
            Self::HateSpeech
        } else {
            Self::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_round_trip_through_strings() {
        for model in KNOWN_MODELS {
            let raw: String = model.clone().into();
            assert_eq!(ModelId::from(raw), model);
        }
    }

    #[test]
    fn unknown_ids_fall_back_to_generic_metadata() {
        let model = ModelId::from("support_vector_machine");
        assert!(!model.is_known());
        assert_eq!(model.display_name(), "Support Vector Machine");
        assert_eq!(model.icon(), "cube");
        assert_eq!(ModelId::from("").display_name(), "Unknown model");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&ModelId::DistilBert).expect("serialize");
        assert_eq!(json, "\"distilbert\"");
        let parsed: ModelId = serde_json::from_str("\"knn\"").expect("deserialize");
        assert_eq!(parsed, ModelId::Other("knn".to_string()));
    }
}
