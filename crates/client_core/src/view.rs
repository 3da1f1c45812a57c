//! View models for the results area. Front ends draw these; nothing here
//! produces markup, so user text stays plain data all the way to the widget.

use serde::Serialize;
use shared::{
    domain::{ModelId, Verdict},
    protocol::{AnalysisResult, ComparisonResults, PredictionOutcome},
};

pub const EMPTY_PLACEHOLDER: &str = "Enter text and select a model to see analysis results";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "layout", content = "entries", rename_all = "snake_case")]
pub enum ResultView {
    #[default]
    Empty,
    Single(ResultCard),
    Comparison(Vec<ComparisonEntry>),
    Batch(Vec<BatchRow>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelBadge {
    pub model: ModelId,
    pub label: String,
    pub icon: &'static str,
}

impl ModelBadge {
    pub fn for_model(model: &ModelId) -> Self {
        Self {
            model: model.clone(),
            label: model.display_name().into_owned(),
            icon: model.icon(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub model: ModelBadge,
    pub verdict: Verdict,
    pub label: String,
    /// Width of the confidence bar, clamped to `0.0..=1.0`.
    pub confidence_fill: f32,
    pub confidence_pct: String,
    pub normal_pct: String,
    pub hate_speech_pct: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonEntry {
    Scored(ResultCard),
    Failed { model: ModelBadge, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    /// 1-based position in the submitted batch.
    pub index: usize,
    pub text: String,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Scored {
        verdict: Verdict,
        label: String,
        confidence_pct: String,
    },
    Failed {
        error: String,
    },
}

/// Glyph for a model icon tag, for front ends without an icon font.
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "chart-line" => "📈",
        "calculator" => "🧮",
        "tree" => "🌲",
        "robot" => "🤖",
        _ => "📦",
    }
}

pub fn percent(fraction: f64) -> String {
    format!("{:.1}", fraction * 100.0)
}

pub fn result_card(model: &ModelId, result: &AnalysisResult) -> ResultCard {
    ResultCard {
        model: ModelBadge::for_model(model),
        verdict: result.verdict(),
        label: result.label.clone(),
        confidence_fill: result.confidence.clamp(0.0, 1.0) as f32,
        confidence_pct: percent(result.confidence),
        normal_pct: percent(result.probabilities.normal),
        hate_speech_pct: percent(result.probabilities.hate_speech),
    }
}

pub fn render_single(model: &ModelId, result: &AnalysisResult) -> ResultView {
    ResultView::Single(result_card(model, result))
}

pub fn render_comparison(results: &ComparisonResults) -> ResultView {
    let entries = results
        .iter()
        .map(|(model, outcome)| match outcome {
            PredictionOutcome::Scored(result) => ComparisonEntry::Scored(result_card(model, result)),
            PredictionOutcome::Failed { error } => ComparisonEntry::Failed {
                model: ModelBadge::for_model(model),
                error: error.clone(),
            },
        })
        .collect();
    ResultView::Comparison(entries)
}

/// Pairs line `i` with result `i`. The caller checks that both sides have the
/// same length; extra entries on either side are dropped.
pub fn render_batch(texts: &[String], results: &[PredictionOutcome]) -> ResultView {
    let rows = texts
        .iter()
        .zip(results)
        .enumerate()
        .map(|(position, (text, outcome))| BatchRow {
            index: position + 1,
            text: text.clone(),
            outcome: match outcome {
                PredictionOutcome::Scored(result) => BatchOutcome::Scored {
                    verdict: result.verdict(),
                    label: result.label.clone(),
                    confidence_pct: percent(result.confidence),
                },
                PredictionOutcome::Failed { error } => BatchOutcome::Failed {
                    error: error.clone(),
                },
            },
        })
        .collect();
    ResultView::Batch(rows)
}
