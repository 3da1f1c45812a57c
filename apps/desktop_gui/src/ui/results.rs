//! Results area: one widget per result layout.

use client_core::view::{
    icon_glyph, BatchOutcome, BatchRow, ComparisonEntry, ModelBadge, ResultCard, ResultView,
    EMPTY_PLACEHOLDER,
};
use egui::{Color32, RichText};
use shared::domain::Verdict;

const NORMAL_COLOR: Color32 = Color32::from_rgb(46, 160, 67);
const HATE_COLOR: Color32 = Color32::from_rgb(218, 54, 51);

pub fn verdict_color(verdict: Verdict) -> Color32 {
    match verdict {
        Verdict::Normal => NORMAL_COLOR,
        Verdict::HateSpeech => HATE_COLOR,
    }
}

pub fn badge_text(badge: &ModelBadge) -> String {
    format!("{} {}", icon_glyph(badge.icon), badge.label)
}

pub fn show(ui: &mut egui::Ui, view: &ResultView) {
    match view {
        ResultView::Empty => {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(EMPTY_PLACEHOLDER).weak());
            });
        }
        ResultView::Single(card) => show_card(ui, card),
        ResultView::Comparison(entries) => {
            for entry in entries {
                match entry {
                    ComparisonEntry::Scored(card) => show_card(ui, card),
                    ComparisonEntry::Failed { model, error } => {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.label(RichText::new(badge_text(model)).strong());
                            ui.colored_label(HATE_COLOR, format!("Error: {error}"));
                        });
                    }
                }
                ui.add_space(6.0);
            }
        }
        ResultView::Batch(rows) => show_batch(ui, rows),
    }
}

fn show_card(ui: &mut egui::Ui, card: &ResultCard) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new(badge_text(&card.model)).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(&card.label)
                        .strong()
                        .color(verdict_color(card.verdict)),
                );
            });
        });
        ui.add(
            egui::ProgressBar::new(card.confidence_fill)
                .fill(verdict_color(card.verdict))
                .text(format!("Confidence {}%", card.confidence_pct)),
        );
        ui.horizontal(|ui| {
            ui.label(format!("Normal: {}%", card.normal_pct));
            ui.separator();
            ui.label(format!("Hate Speech: {}%", card.hate_speech_pct));
        });
    });
}

fn show_batch(ui: &mut egui::Ui, rows: &[BatchRow]) {
    egui::Grid::new("batch_results")
        .num_columns(3)
        .striped(true)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label(RichText::new("#").strong());
            ui.label(RichText::new("Text").strong());
            ui.label(RichText::new("Result").strong());
            ui.end_row();

            for row in rows {
                ui.label(row.index.to_string());
                ui.label(&row.text);
                match &row.outcome {
                    BatchOutcome::Scored {
                        verdict,
                        label,
                        confidence_pct,
                    } => {
                        ui.colored_label(
                            verdict_color(*verdict),
                            format!("{label} ({confidence_pct}%)"),
                        );
                    }
                    BatchOutcome::Failed { error } => {
                        ui.colored_label(HATE_COLOR, format!("Error: {error}"));
                    }
                }
                ui.end_row();
            }
        });
}
