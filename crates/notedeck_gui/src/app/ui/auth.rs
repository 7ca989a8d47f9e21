//! Login and signup screens.

use super::super::style::{Palette, COLOR_ACCENT, COLOR_ERROR};
use super::super::{AuthForm, NoteDeckApp, Route};
use eframe::egui::{self, RichText};

enum AuthAction {
    Submit,
    SwitchScreen,
}

/// Shared credential form; returns the action the user picked this frame.
fn auth_card(
    ui: &mut egui::Ui,
    form: &mut AuthForm,
    title: &str,
    submit_label: &str,
    switch_label: &str,
    palette: Palette,
) -> Option<AuthAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.15);
        ui.heading(RichText::new("NoteDeck").color(COLOR_ACCENT));
        ui.label(RichText::new(title).color(palette.text_secondary));
        ui.add_space(16.0);

        ui.add(
            egui::TextEdit::singleline(&mut form.email)
                .hint_text("Email")
                .desired_width(280.0),
        );
        let password = ui.add(
            egui::TextEdit::singleline(&mut form.password)
                .hint_text("Password")
                .password(true)
                .desired_width(280.0),
        );
        let enter_pressed =
            password.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

        if let Some(error) = &form.error {
            ui.add_space(4.0);
            ui.label(RichText::new(error).color(COLOR_ERROR));
        }
        ui.add_space(8.0);

        let label = if form.submitting {
            "Please wait..."
        } else {
            submit_label
        };
        let submit = ui.add_enabled(!form.submitting, egui::Button::new(label));
        if submit.clicked() || (enter_pressed && !form.submitting) {
            action = Some(AuthAction::Submit);
        }
        ui.add_space(12.0);
        if ui.link(switch_label).clicked() {
            action = Some(AuthAction::SwitchScreen);
        }
    });
    action
}

impl NoteDeckApp {
    pub(crate) fn render_login(&mut self, ctx: &egui::Context) {
        let palette = self.palette();
        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            action = auth_card(
                ui,
                &mut self.login_form,
                "Log in to your notes",
                "Log in",
                "Don't have an account? Sign up",
                palette,
            );
        });
        match action {
            Some(AuthAction::Submit) => self.submit_login(),
            Some(AuthAction::SwitchScreen) => self.navigate(Route::Signup),
            None => {}
        }
    }

    pub(crate) fn render_signup(&mut self, ctx: &egui::Context) {
        let palette = self.palette();
        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            action = auth_card(
                ui,
                &mut self.signup_form,
                "Create an account",
                "Sign up",
                "Already registered? Log in",
                palette,
            );
        });
        match action {
            Some(AuthAction::Submit) => self.submit_signup(),
            Some(AuthAction::SwitchScreen) => self.navigate(Route::Login),
            None => {}
        }
    }
}
