use std::thread;

use client_core::{
    FirestoreStore, Interaction, OpStatus, Settings, TodoListController,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::{TodoId, TodoItem};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

pub const SETTINGS_STORAGE_KEY: &str = "cloud_todos_desktop_settings";

const DEFAULT_UI_SCALE: f32 = 1.0;
const MIN_UI_SCALE: f32 = 0.8;
const MAX_UI_SCALE: f32 = 1.6;

/// Interaction surface for the GUI backend worker: confirmations use a
/// native blocking dialog, notifications land in the status line. Text
/// prompts are not available here; the GUI edits through the staged-edit
/// path instead.
struct GuiInteraction {
    ui_tx: Sender<UiEvent>,
}

impl Interaction for GuiInteraction {
    fn prompt(&self, _message: &str, _default: &str) -> Option<String> {
        tracing::warn!("text prompt requested but the GUI has no prompt surface");
        None
    }

    fn confirm(&self, message: &str) -> bool {
        let result = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Cloud Todos")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        matches!(result, rfd::MessageDialogResult::Yes)
    }

    fn notify(&self, message: &str) {
        let _ = self.ui_tx.try_send(UiEvent::Info(message.to_string()));
    }
}

pub fn start_backend_bridge(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: Settings,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let store = match FirestoreStore::new(&settings) {
                Ok(store) => store,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err}"),
                    )));
                    tracing::error!("failed to configure remote store: {err}");
                    return;
                }
            };

            let interaction = GuiInteraction {
                ui_tx: ui_tx.clone(),
            };
            let mut controller = TodoListController::new(store, interaction);

            controller.load().await;
            push_snapshot(&ui_tx, &controller);
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Refresh => {
                        controller.load().await;
                    }
                    BackendCommand::Submit { text } => {
                        controller.set_draft(text);
                        let status = controller.submit().await;
                        // Any dispatched submit consumes the staged edit cursor.
                        if status != OpStatus::Ignored {
                            let _ = ui_tx.try_send(UiEvent::EditCleared);
                        }
                    }
                    BackendCommand::StageEdit { id } => {
                        if controller.stage_edit(&id) {
                            let _ = ui_tx.try_send(UiEvent::DraftStaged {
                                id,
                                text: controller.draft().to_string(),
                            });
                        }
                    }
                    BackendCommand::CancelEdit => {
                        controller.cancel_edit();
                        let _ = ui_tx.try_send(UiEvent::EditCleared);
                    }
                    BackendCommand::Remove { id } => {
                        controller.remove(&id).await;
                    }
                    BackendCommand::RemoveAll => {
                        controller.remove_all().await;
                    }
                }
                push_snapshot(&ui_tx, &controller);
            }
        });
    });
}

fn push_snapshot<S, I>(ui_tx: &Sender<UiEvent>, controller: &TodoListController<S, I>)
where
    S: client_core::RemoteStore,
    I: Interaction,
{
    let _ = ui_tx.try_send(UiEvent::ListUpdated(controller.items().to_vec()));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedDesktopSettings {
    ui_scale: f32,
}

impl Default for PersistedDesktopSettings {
    fn default() -> Self {
        Self {
            ui_scale: DEFAULT_UI_SCALE,
        }
    }
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    composer: String,
    editing: Option<TodoId>,
    items: Vec<TodoItem>,

    status: String,
    status_is_error: bool,

    ui_scale: f32,
    applied_ui_scale: Option<f32>,
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_settings: Option<PersistedDesktopSettings>,
    ) -> Self {
        let persisted = persisted_settings.unwrap_or_default();
        Self {
            cmd_tx,
            ui_rx,
            composer: String::new(),
            editing: None,
            items: Vec::new(),
            status: "Connecting to remote store...".to_string(),
            status_is_error: false,
            ui_scale: persisted.ui_scale.clamp(MIN_UI_SCALE, MAX_UI_SCALE),
            applied_ui_scale: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ListUpdated(items) => {
                    self.items = items;
                }
                UiEvent::DraftStaged { id, text } => {
                    self.composer = text;
                    self.editing = Some(id);
                }
                UiEvent::EditCleared => {
                    self.editing = None;
                }
                UiEvent::Info(message) => {
                    self.status = message;
                    self.status_is_error = false;
                }
                UiEvent::Error(err) => {
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    self.status_is_error = true;
                }
            }
        }
    }

    fn try_submit_composer(&mut self) {
        if self.composer.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.composer);
        self.editing = None;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Submit { text },
            &mut self.status,
        );
    }

    fn cancel_staged_edit(&mut self) {
        self.composer.clear();
        self.editing = None;
        dispatch_backend_command(&self.cmd_tx, BackendCommand::CancelEdit, &mut self.status);
    }

    fn apply_ui_scale_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_ui_scale == Some(self.ui_scale) {
            return;
        }
        ctx.set_zoom_factor(self.ui_scale);
        self.applied_ui_scale = Some(self.ui_scale);
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Cloud Todos");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Delete All").clicked() {
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::RemoveAll,
                            &mut self.status,
                        );
                    }
                    if ui.button("Refresh").clicked() {
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::Refresh,
                            &mut self.status,
                        );
                    }
                    ui.add(
                        egui::Slider::new(&mut self.ui_scale, MIN_UI_SCALE..=MAX_UI_SCALE)
                            .text("Scale")
                            .step_by(0.1),
                    );
                });
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                let status = egui::RichText::new(&self.status).small();
                if self.status_is_error {
                    ui.label(status.color(ui.visuals().error_fg_color));
                } else {
                    ui.label(status.weak());
                }
            });
        });
    }

    fn show_composer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let action_label = if self.editing.is_some() {
                "Update Todo"
            } else {
                "Add Todo"
            };
            let cancel_width = if self.editing.is_some() { 150.0 } else { 90.0 };
            let edit = egui::TextEdit::singleline(&mut self.composer)
                .hint_text("Add a new todo")
                .desired_width((ui.available_width() - cancel_width).max(120.0));
            let response = ui.add(edit);

            let enter_pressed = response.lost_focus()
                && ui.ctx().input(|input| input.key_pressed(egui::Key::Enter));
            let clicked = ui.button(action_label).clicked();
            if self.editing.is_some() && ui.button("Cancel").clicked() {
                self.cancel_staged_edit();
            } else if clicked || enter_pressed {
                self.try_submit_composer();
                response.request_focus();
            }
        });
    }

    fn show_todo_list(&mut self, ui: &mut egui::Ui) {
        if self.items.is_empty() {
            ui.add_space(12.0);
            ui.weak("No todos yet. Add one above.");
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                let items = self.items.clone();
                for item in &items {
                    let being_edited = self.editing.as_ref() == Some(&item.id);
                    ui.horizontal(|ui| {
                        let text = if being_edited {
                            egui::RichText::new(&item.text).strong()
                        } else {
                            egui::RichText::new(&item.text)
                        };
                        ui.label(text);
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui.button("Delete").clicked() {
                                    dispatch_backend_command(
                                        &self.cmd_tx,
                                        BackendCommand::Remove {
                                            id: item.id.clone(),
                                        },
                                        &mut self.status,
                                    );
                                }
                                if ui
                                    .add_enabled(!being_edited, egui::Button::new("Edit"))
                                    .clicked()
                                {
                                    dispatch_backend_command(
                                        &self.cmd_tx,
                                        BackendCommand::StageEdit {
                                            id: item.id.clone(),
                                        },
                                        &mut self.status,
                                    );
                                }
                            },
                        );
                    });
                    ui.separator();
                }
            });
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_ui_scale_if_needed(ctx);
        ctx.request_repaint_after(std::time::Duration::from_millis(100));

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_composer(ui);
            ui.add_space(6.0);
            ui.separator();
            self.show_todo_list(ui);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let persisted = PersistedDesktopSettings {
            ui_scale: self.ui_scale,
        };
        if let Ok(serialized) = serde_json::to_string(&persisted) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
