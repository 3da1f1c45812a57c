//! Terminal output: plain text for people, JSON for `--json`.

use std::fmt::Write;

use client_core::{
    view::{
        icon_glyph, BatchOutcome, ComparisonEntry, ResultCard, ResultView, EMPTY_PLACEHOLDER,
    },
    BackendStatus,
};
use serde_json::{json, Value};
use shared::domain::ModelId;

const BAR_WIDTH: usize = 20;

fn bar(fill: f32) -> String {
    let filled = (fill * BAR_WIDTH as f32).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn write_card(out: &mut String, card: &ResultCard) {
    let _ = writeln!(
        out,
        "{} {}: {}",
        icon_glyph(card.model.icon),
        card.model.label,
        card.label
    );
    let _ = writeln!(
        out,
        "  confidence {} {}%",
        bar(card.confidence_fill),
        card.confidence_pct
    );
    let _ = writeln!(
        out,
        "  normal {}%  hate speech {}%",
        card.normal_pct, card.hate_speech_pct
    );
}

pub fn result_view(view: &ResultView) -> String {
    let mut out = String::new();
    match view {
        ResultView::Empty => {
            let _ = writeln!(out, "{EMPTY_PLACEHOLDER}");
        }
        ResultView::Single(card) => write_card(&mut out, card),
        ResultView::Comparison(entries) => {
            for entry in entries {
                match entry {
                    ComparisonEntry::Scored(card) => write_card(&mut out, card),
                    ComparisonEntry::Failed { model, error } => {
                        let _ = writeln!(
                            out,
                            "{} {}: error: {error}",
                            icon_glyph(model.icon),
                            model.label
                        );
                    }
                }
            }
        }
        ResultView::Batch(rows) => {
            for row in rows {
                match &row.outcome {
                    BatchOutcome::Scored {
                        label,
                        confidence_pct,
                        ..
                    } => {
                        let _ = writeln!(
                            out,
                            "{:>3}. {label} ({confidence_pct}%)  {}",
                            row.index, row.text
                        );
                    }
                    BatchOutcome::Failed { error } => {
                        let _ = writeln!(out, "{:>3}. error: {error}  {}", row.index, row.text);
                    }
                }
            }
        }
    }
    out
}

pub fn model_list(models: &[ModelId]) -> String {
    let mut out = String::new();
    for model in models {
        let _ = writeln!(
            out,
            "{} {} ({model})",
            icon_glyph(model.icon()),
            model.display_name()
        );
    }
    out
}

pub fn health_json(status: &BackendStatus, models: &[ModelId]) -> Value {
    let (online, message) = match status {
        BackendStatus::Online { message } => (true, message.as_deref()),
        BackendStatus::Unknown | BackendStatus::Unreachable => (false, None),
    };
    json!({
        "online": online,
        "message": message,
        "available_models": models,
    })
}

pub fn models_json(models: &[ModelId]) -> Value {
    json!({ "models": models })
}

#[cfg(test)]
mod tests {
    use client_core::view::{BatchRow, ModelBadge};
    use shared::domain::Verdict;

    use super::*;

    fn card() -> ResultCard {
        ResultCard {
            model: ModelBadge::for_model(&ModelId::LogisticRegression),
            verdict: Verdict::HateSpeech,
            label: "Hate Speech".to_string(),
            confidence_fill: 0.5,
            confidence_pct: "50.0".to_string(),
            normal_pct: "50.0".to_string(),
            hate_speech_pct: "50.0".to_string(),
        }
    }

    #[test]
    fn empty_view_prints_placeholder() {
        assert_eq!(
            result_view(&ResultView::Empty),
            format!("{EMPTY_PLACEHOLDER}\n")
        );
    }

    #[test]
    fn single_card_has_half_filled_bar() {
        let text = result_view(&ResultView::Single(card()));
        assert!(text.starts_with("📈 Logistic Regression: Hate Speech\n"));
        assert!(text.contains("[##########..........] 50.0%"));
    }

    #[test]
    fn comparison_failures_print_inline() {
        let text = result_view(&ResultView::Comparison(vec![
            ComparisonEntry::Scored(card()),
            ComparisonEntry::Failed {
                model: ModelBadge::for_model(&ModelId::from("svm")),
                error: "Model 'svm' not available".to_string(),
            },
        ]));
        assert!(text.contains("📦 Svm: error: Model 'svm' not available"));
    }

    #[test]
    fn batch_rows_keep_user_text_verbatim() {
        let text = result_view(&ResultView::Batch(vec![BatchRow {
            index: 1,
            text: "<b>hi</b>".to_string(),
            outcome: BatchOutcome::Scored {
                verdict: Verdict::Normal,
                label: "Normal".to_string(),
                confidence_pct: "91.0".to_string(),
            },
        }]));
        assert_eq!(text, "  1. Normal (91.0%)  <b>hi</b>\n");
    }

    #[test]
    fn health_json_reports_status_and_models() {
        let value = health_json(
            &BackendStatus::Online {
                message: Some("Hate Speech Detector API is running".to_string()),
            },
            &[ModelId::LogisticRegression, ModelId::from("knn")],
        );
        assert_eq!(
            value,
            json!({
                "online": true,
                "message": "Hate Speech Detector API is running",
                "available_models": ["logistic_regression", "knn"],
            })
        );
    }

    #[test]
    fn models_json_lists_wire_ids() {
        assert_eq!(
            models_json(&[ModelId::NaiveBayes]),
            json!({ "models": ["naive_bayes"] })
        );
    }

    #[test]
    fn model_list_shows_display_names() {
        let text = model_list(&[ModelId::DistilBert]);
        assert!(text.contains("DistilBERT (distilbert)"), "got {text}");
    }
}
