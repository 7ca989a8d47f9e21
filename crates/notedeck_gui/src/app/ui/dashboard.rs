//! Notes dashboard: toolbar, note form and card grid.

use super::super::style::{Palette, COLOR_ACCENT, COLOR_ERROR};
use super::super::{DashboardPhase, NoteDeckApp};
use eframe::egui::{self, RichText};
use notedeck_core::{Note, SaveTarget};

const CARD_WIDTH: f32 = 260.0;
const CARD_PREVIEW_CHARS: usize = 280;

/// Actions collected while rendering and applied after the panels close.
enum DashboardAction {
    Search(String),
    Logout,
    ToggleTheme,
    Submit,
    CancelEdit,
    PickAttachment,
    ClearAttachment,
    Retry,
    Edit(String),
    Delete(String),
    Summarize(String),
}

fn preview(content: &str) -> String {
    if content.chars().count() <= CARD_PREVIEW_CHARS {
        return content.to_string();
    }
    let mut out: String = content.chars().take(CARD_PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}

impl NoteDeckApp {
    pub(crate) fn render_dashboard(&mut self, ctx: &egui::Context) {
        let mut actions: Vec<DashboardAction> = Vec::new();
        let palette = self.palette();

        self.render_toolbar(ctx, palette, &mut actions);
        self.render_note_form(ctx, palette, &mut actions);
        self.render_note_grid(ctx, palette, &mut actions);

        for action in actions {
            match action {
                DashboardAction::Search(query) => self.set_search_query(query),
                DashboardAction::Logout => self.logout(),
                DashboardAction::ToggleTheme => self.toggle_dark_mode(),
                DashboardAction::Submit => self.submit_note(),
                DashboardAction::CancelEdit => self.cancel_edit(),
                DashboardAction::PickAttachment => {
                    if let Some(path) = rfd::FileDialog::new().pick_file() {
                        self.set_attachment(Some(path));
                    }
                }
                DashboardAction::ClearAttachment => self.set_attachment(None),
                DashboardAction::Retry => self.request_fetch(),
                DashboardAction::Edit(id) => self.begin_edit(&id),
                DashboardAction::Delete(id) => self.delete_note(&id),
                DashboardAction::Summarize(id) => self.summarize_note(&id),
            }
        }
    }

    fn render_toolbar(
        &mut self,
        ctx: &egui::Context,
        palette: Palette,
        actions: &mut Vec<DashboardAction>,
    ) {
        let tag_options = self.tag_options();
        egui::TopBottomPanel::top("dashboard_toolbar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("NoteDeck").color(COLOR_ACCENT));
                    ui.add_space(12.0);

                    let mut query = self.dashboard.search_query.clone();
                    let search = ui.add(
                        egui::TextEdit::singleline(&mut query)
                            .hint_text("Search notes...")
                            .desired_width(240.0),
                    );
                    if search.changed() {
                        actions.push(DashboardAction::Search(query));
                    }

                    let selected_label = if self.dashboard.selected_tag.is_empty() {
                        "All tags".to_string()
                    } else {
                        self.dashboard.selected_tag.clone()
                    };
                    egui::ComboBox::from_id_salt("tag_filter")
                        .selected_text(selected_label)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(
                                &mut self.dashboard.selected_tag,
                                String::new(),
                                "All tags",
                            );
                            for tag in &tag_options {
                                ui.selectable_value(
                                    &mut self.dashboard.selected_tag,
                                    tag.clone(),
                                    tag.as_str(),
                                );
                            }
                        });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Log out").clicked() {
                            actions.push(DashboardAction::Logout);
                        }
                        let theme_label = if self.dark_mode {
                            "Light mode"
                        } else {
                            "Dark mode"
                        };
                        if ui.button(theme_label).clicked() {
                            actions.push(DashboardAction::ToggleTheme);
                        }
                        ui.label(
                            RichText::new(format!("{} notes", self.dashboard.notes.len()))
                                .small()
                                .color(palette.text_muted),
                        );
                    });
                });
            });
    }

    fn render_note_form(
        &mut self,
        ctx: &egui::Context,
        palette: Palette,
        actions: &mut Vec<DashboardAction>,
    ) {
        let target = SaveTarget::from_editing_id(self.dashboard.editing_id.as_deref());
        egui::SidePanel::left("note_form")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                let heading = match target {
                    SaveTarget::Create => "New note",
                    SaveTarget::Update { .. } => "Edit note",
                };
                ui.heading(RichText::new(heading).color(palette.text_primary));
                ui.add_space(8.0);

                let draft = &mut self.dashboard.draft;
                ui.add(
                    egui::TextEdit::singleline(&mut draft.title)
                        .hint_text("Title")
                        .desired_width(f32::INFINITY),
                );
                ui.add(
                    egui::TextEdit::multiline(&mut draft.content)
                        .hint_text("Content")
                        .desired_rows(8)
                        .desired_width(f32::INFINITY),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut draft.tags)
                        .hint_text("Tags (comma separated)")
                        .desired_width(f32::INFINITY),
                );

                ui.horizontal(|ui| {
                    if ui.button("Attach file...").clicked() {
                        actions.push(DashboardAction::PickAttachment);
                    }
                    if let Some(path) = &draft.attachment {
                        let name = path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_else(|| path.display().to_string());
                        ui.add(
                            egui::Label::new(
                                RichText::new(name).small().color(palette.text_secondary),
                            )
                            .truncate(),
                        );
                        if ui.small_button("x").clicked() {
                            actions.push(DashboardAction::ClearAttachment);
                        }
                    }
                });
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let label = if self.dashboard.save_in_flight {
                        "Saving..."
                    } else {
                        target.verb()
                    };
                    if ui
                        .add_enabled(!self.dashboard.save_in_flight, egui::Button::new(label))
                        .clicked()
                    {
                        actions.push(DashboardAction::Submit);
                    }
                    if self.dashboard.editing_id.is_some() && ui.button("Cancel").clicked() {
                        actions.push(DashboardAction::CancelEdit);
                    }
                });
            });
    }

    fn render_note_grid(
        &self,
        ctx: &egui::Context,
        palette: Palette,
        actions: &mut Vec<DashboardAction>,
    ) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.dashboard.load_error {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(error).color(COLOR_ERROR));
                    if ui.button("Retry").clicked() {
                        actions.push(DashboardAction::Retry);
                    }
                });
                ui.add_space(8.0);
            }

            let notes = self.visible_notes();
            if notes.is_empty() {
                if self.dashboard.phase == DashboardPhase::Loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading notes...");
                    });
                } else {
                    ui.label(RichText::new("No notes to show").color(palette.text_muted));
                }
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for note in notes {
                            self.render_note_card(ui, note, palette, actions);
                        }
                    });
                });
        });
    }

    fn render_note_card(
        &self,
        ui: &mut egui::Ui,
        note: &Note,
        palette: Palette,
        actions: &mut Vec<DashboardAction>,
    ) {
        let editing = self.dashboard.editing_id.as_deref() == Some(note.id.as_str());
        let stroke_color = if editing { COLOR_ACCENT } else { palette.border };
        egui::Frame::group(ui.style())
            .fill(palette.bg_primary)
            .stroke(egui::Stroke::new(1.0, stroke_color))
            .show(ui, |ui| {
                ui.set_width(CARD_WIDTH);
                ui.vertical(|ui| {
                    ui.label(RichText::new(&note.title).strong().color(palette.text_primary));
                    ui.label(RichText::new(preview(&note.content)).color(palette.text_secondary));

                    let tags = note.tag_list();
                    if !tags.is_empty() {
                        ui.label(
                            RichText::new(format!("Tags: {}", tags.join(", ")))
                                .small()
                                .color(palette.text_muted),
                        );
                    }
                    if let Some(url) = note.attachment_url(&self.config.api_url) {
                        ui.hyperlink_to("View attachment", url);
                    }
                    if let Some(summary) = self.dashboard.summaries.get(&note.id) {
                        ui.separator();
                        ui.label(RichText::new("Summary").small().color(palette.text_muted));
                        ui.label(RichText::new(summary).italics());
                    }

                    ui.horizontal(|ui| {
                        if ui.small_button("Edit").clicked() {
                            actions.push(DashboardAction::Edit(note.id.clone()));
                        }
                        if ui.small_button("Delete").clicked() {
                            actions.push(DashboardAction::Delete(note.id.clone()));
                        }
                        if self.dashboard.summarizing.contains(&note.id) {
                            ui.spinner();
                        } else if ui.small_button("Summarize").clicked() {
                            actions.push(DashboardAction::Summarize(note.id.clone()));
                        }
                    });
                });
            });
    }
}
