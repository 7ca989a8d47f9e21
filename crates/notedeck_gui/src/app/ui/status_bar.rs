//! Bottom status bar rendering for feedback and connection metadata.

use super::super::NoteDeckApp;
use eframe::egui;

impl NoteDeckApp {
    /// Renders the bottom status bar with the latest status and API endpoint.
    pub(crate) fn render_status_bar(&mut self, ctx: &egui::Context) {
        let palette = self.palette();
        egui::TopBottomPanel::bottom("status")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if self.in_flight > 0 {
                        ui.spinner();
                    }
                    if let Some(status) = &self.status {
                        ui.label(egui::RichText::new(&status.text).color(egui::Color32::YELLOW));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(format!("API: {}", self.config.api_url))
                                    .small()
                                    .monospace()
                                    .color(palette.text_secondary),
                            )
                            .truncate(),
                        );
                        ui.separator();
                        let session_label = if self.session.is_some() {
                            "Signed in"
                        } else {
                            "Signed out"
                        };
                        ui.label(
                            egui::RichText::new(session_label)
                                .small()
                                .color(palette.text_muted),
                        );
                    });
                });
            });
    }
}
