use std::time::Duration;

use client_core::{NotificationKind, Transition, UiEvent, UiState};
use crossbeam_channel::{Receiver, Sender};
use egui::RichText;
use shared::domain::{ModelId, KNOWN_MODELS};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{backend_status_line, WorkerEvent},
    orchestration::{dispatch_command, dispatch_connect},
};
use crate::ui::results;

pub struct DetectorApp {
    state: UiState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<WorkerEvent>,
    status: String,
    backend_url: String,
    url_input: String,
}

impl DetectorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<WorkerEvent>,
        backend_url: String,
    ) -> Self {
        Self {
            state: UiState::new(),
            cmd_tx,
            ui_rx,
            status: "Backend worker starting...".to_string(),
            url_input: backend_url.clone(),
            backend_url,
        }
    }

    /// Feeds `event` to the state machine and queues whatever command it issues.
    fn apply(&mut self, event: UiEvent) {
        let mut next = Some(event);
        while let Some(event) = next.take() {
            let Transition { state, command } = std::mem::take(&mut self.state).apply(event);
            self.state = state;
            if let Some(command) = command {
                next = dispatch_command(&self.cmd_tx, command, &mut self.status);
            }
        }
    }

    fn process_worker_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                WorkerEvent::Connected { backend_url } => {
                    self.status = format!("Connected to {backend_url}");
                    self.url_input = backend_url.clone();
                    self.backend_url = backend_url;
                    self.apply(UiEvent::CheckHealth);
                }
                WorkerEvent::StartupFailed(reason) => {
                    tracing::warn!("backend worker reported failure: {reason}");
                    self.status = reason;
                    // Settled without a client, so the backend ends up marked unreachable.
                    self.apply(UiEvent::CheckHealth);
                }
                WorkerEvent::Ui(event) => self.apply(event),
            }
        }
    }

    /// Models offered as cards: what the backend reported, or the known set before it answers.
    fn model_choices(&self) -> Vec<ModelId> {
        if self.state.available_models().is_empty() {
            KNOWN_MODELS.to_vec()
        } else {
            self.state.available_models().to_vec()
        }
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Text to analyze").strong());
        let mut text = self.state.text_input().to_string();
        let response = ui.add(
            egui::TextEdit::multiline(&mut text)
                .hint_text("Type or paste text here (Ctrl+Enter to analyze)")
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.apply(UiEvent::EditText(text));
        }
        let submit = response.has_focus()
            && ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter));
        if submit {
            self.apply(UiEvent::AnalyzeSingle);
        }
    }

    fn show_model_cards(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Model").strong());
        let mut picked = None;
        ui.horizontal_wrapped(|ui| {
            for model in self.model_choices() {
                let selected = self.state.selected_model() == Some(&model);
                let text = format!(
                    "{} {}",
                    client_core::view::icon_glyph(model.icon()),
                    model.display_name()
                );
                if ui.selectable_label(selected, text).clicked() {
                    picked = Some(model);
                }
            }
        });
        if let Some(model) = picked {
            self.apply(UiEvent::SelectModel(model));
        }
    }

    fn show_actions(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let analyze = egui::Button::new("Analyze");
            if ui
                .add_enabled(self.state.can_analyze_single(), analyze)
                .on_disabled_hover_text("Select a model first")
                .clicked()
            {
                self.apply(UiEvent::AnalyzeSingle);
            }
            if ui.button("Compare all models").clicked() {
                self.apply(UiEvent::CompareModels);
            }
            if ui.button("Clear").clicked() {
                self.apply(UiEvent::ClearAll);
            }
            if self.state.is_loading() {
                ui.add(egui::Spinner::new());
                ui.label(RichText::new("Analyzing...").weak());
            }
        });
    }

    fn show_batch_input(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Batch analysis")
            .default_open(false)
            .show(ui, |ui| {
                let mut batch = self.state.batch_input().to_string();
                let response = ui.add(
                    egui::TextEdit::multiline(&mut batch)
                        .hint_text("One text per line")
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    self.apply(UiEvent::EditBatch(batch));
                }
                if ui.button("Batch Analyze").clicked() {
                    self.apply(UiEvent::AnalyzeBatch);
                }
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(backend_status_line(self.state.backend()));
                ui.separator();
                ui.label(RichText::new(&self.backend_url).monospace());
                ui.separator();
                ui.small(RichText::new(&self.status).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Connect").clicked() {
                        let url = self.url_input.trim().to_string();
                        dispatch_connect(&self.cmd_tx, url, &mut self.status);
                    }
                    ui.add(
                        egui::TextEdit::singleline(&mut self.url_input)
                            .desired_width(220.0)
                            .hint_text("Backend URL"),
                    );
                });
            });
        });
    }

    fn show_notification(&mut self, ctx: &egui::Context) {
        let Some(notification) = self.state.notification() else {
            return;
        };
        let title = match notification.kind {
            NotificationKind::Validation => "Check your input",
            NotificationKind::Backend | NotificationKind::Transport => "Error",
        };
        let message = notification.message.clone();
        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("Dismiss").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.apply(UiEvent::DismissNotification);
        }
    }
}

impl eframe::App for DetectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_worker_events();

        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Hate Speech Detector");
            ui.add_space(8.0);
            self.show_text_input(ui);
            ui.add_space(6.0);
            self.show_model_cards(ui);
            ui.add_space(6.0);
            self.show_actions(ui);
            self.show_batch_input(ui);
            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| results::show(ui, self.state.results()));
        });
        self.show_notification(ctx);

        if self.state.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{
        abandon,
        controller::{BACKEND_UNREACHABLE_MESSAGE, NO_MODEL_MESSAGE},
        BackendStatus, ClientError, Outcome, ResultView,
    };
    use crossbeam_channel::bounded;
    use shared::protocol::{AnalysisResult, HealthResponse, Probabilities};

    use super::*;

    fn app() -> (DetectorApp, Receiver<BackendCommand>, Sender<WorkerEvent>) {
        let (cmd_tx, cmd_rx) = bounded(16);
        let (ui_tx, ui_rx) = bounded(16);
        let app = DetectorApp::new(cmd_tx, ui_rx, "http://127.0.0.1:8500".to_string());
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn connected_worker_triggers_health_check() {
        let (mut app, cmd_rx, ui_tx) = app();
        ui_tx
            .send(WorkerEvent::Connected {
                backend_url: "http://127.0.0.1:9000/".to_string(),
            })
            .expect("send");
        app.process_worker_events();

        assert_eq!(app.backend_url, "http://127.0.0.1:9000/");
        assert!(app.state.is_loading());
        let Ok(BackendCommand::Execute(command)) = cmd_rx.try_recv() else {
            panic!("expected a queued health command");
        };
        assert_eq!(command.request.name(), "health");

        ui_tx
            .send(WorkerEvent::Ui(UiEvent::Completed {
                id: command.id,
                outcome: Outcome::Health(Ok(HealthResponse {
                    message: None,
                    available_models: vec![ModelId::NaiveBayes],
                })),
            }))
            .expect("send");
        app.process_worker_events();
        assert!(!app.state.is_loading());
        assert_eq!(app.model_choices(), [ModelId::NaiveBayes]);
    }

    #[test]
    fn model_cards_fall_back_to_known_models() {
        let (app, _cmd_rx, _ui_tx) = app();
        assert_eq!(app.model_choices(), KNOWN_MODELS.to_vec());
    }

    #[test]
    fn completion_from_worker_renders_results() {
        let (mut app, cmd_rx, ui_tx) = app();
        app.apply(UiEvent::EditText("I hate you".to_string()));
        app.apply(UiEvent::SelectModel(ModelId::LogisticRegression));
        app.apply(UiEvent::AnalyzeSingle);
        let Ok(BackendCommand::Execute(command)) = cmd_rx.try_recv() else {
            panic!("expected a queued predict command");
        };

        ui_tx
            .send(WorkerEvent::Ui(UiEvent::Completed {
                id: command.id,
                outcome: Outcome::Single {
                    model: ModelId::LogisticRegression,
                    result: Ok(AnalysisResult {
                        prediction: 1,
                        label: "Hate Speech".to_string(),
                        confidence: 0.87,
                        probabilities: Probabilities {
                            normal: 0.13,
                            hate_speech: 0.87,
                        },
                    }),
                },
            }))
            .expect("send");
        app.process_worker_events();
        assert!(matches!(app.state.results(), ResultView::Single(card) if card.label == "Hate Speech"));
    }

    #[test]
    fn startup_failure_with_stopped_worker_marks_backend_unreachable() {
        let (mut app, cmd_rx, ui_tx) = app();
        drop(cmd_rx);
        ui_tx
            .send(WorkerEvent::StartupFailed(
                "failed to build backend runtime: out of threads".to_string(),
            ))
            .expect("send");
        app.process_worker_events();

        assert_eq!(app.state.backend(), &BackendStatus::Unreachable);
        assert_eq!(
            app.state.notification().map(|n| n.message.as_str()),
            Some(BACKEND_UNREACHABLE_MESSAGE)
        );
        assert!(!app.state.is_loading());
    }

    #[test]
    fn startup_failure_without_client_runs_health_check() {
        let (mut app, cmd_rx, ui_tx) = app();
        ui_tx
            .send(WorkerEvent::StartupFailed(
                "invalid backend url `nope`: relative URL without a base".to_string(),
            ))
            .expect("send");
        app.process_worker_events();
        assert_eq!(
            app.status,
            "invalid backend url `nope`: relative URL without a base"
        );

        let Ok(BackendCommand::Execute(command)) = cmd_rx.try_recv() else {
            panic!("expected a queued health command");
        };
        assert_eq!(command.request.name(), "health");
        ui_tx
            .send(WorkerEvent::Ui(abandon(
                command,
                ClientError::Unavailable("no backend client is configured".to_string()),
            )))
            .expect("send");
        app.process_worker_events();

        assert_eq!(app.state.backend(), &BackendStatus::Unreachable);
        assert_eq!(
            app.state.notification().map(|n| n.kind),
            Some(NotificationKind::Transport)
        );
    }

    #[test]
    fn analyze_without_model_raises_validation_notice() {
        let (mut app, cmd_rx, _ui_tx) = app();
        app.apply(UiEvent::EditText("some text".to_string()));
        app.apply(UiEvent::AnalyzeSingle);
        assert_eq!(
            app.state.notification().map(|n| n.message.as_str()),
            Some(NO_MODEL_MESSAGE)
        );
        assert!(cmd_rx.try_recv().is_err());
    }
}
