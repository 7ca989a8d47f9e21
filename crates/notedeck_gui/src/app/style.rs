//! Theme constants and style application for the egui app.

use super::NoteDeckApp;
use eframe::egui::{
    self, style::WidgetVisuals, Color32, CornerRadius, FontFamily, FontId, Margin, Stroke,
    TextStyle, Visuals,
};

pub(super) const COLOR_ACCENT: Color32 = Color32::from_rgb(0xE5, 0x70, 0x00);
pub(super) const COLOR_ACCENT_HOVER: Color32 = Color32::from_rgb(0xCE, 0x42, 0x2B);
pub(super) const COLOR_ERROR: Color32 = Color32::from_rgb(0xF8, 0x51, 0x49);
pub(super) const COLOR_SELECTION_STROKE: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);
const COLOR_SELECTION_FILL_RGBA: [u8; 4] = [0x3B, 0x82, 0xF6, 0x55];

/// Background, text and border colors for one theme.
#[derive(Debug, Clone, Copy)]
pub(super) struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub border: Color32,
}

pub(super) const DARK: Palette = Palette {
    bg_primary: Color32::from_rgb(0x0d, 0x11, 0x17),
    bg_secondary: Color32::from_rgb(0x16, 0x1b, 0x22),
    bg_tertiary: Color32::from_rgb(0x21, 0x26, 0x29),
    text_primary: Color32::from_rgb(0xc9, 0xd1, 0xd9),
    text_secondary: Color32::from_rgb(0x8b, 0x94, 0x9e),
    text_muted: Color32::from_rgb(0x6e, 0x76, 0x81),
    border: Color32::from_rgb(0x30, 0x36, 0x3d),
};

pub(super) const LIGHT: Palette = Palette {
    bg_primary: Color32::from_rgb(0xff, 0xff, 0xff),
    bg_secondary: Color32::from_rgb(0xf6, 0xf8, 0xfa),
    bg_tertiary: Color32::from_rgb(0xea, 0xee, 0xf2),
    text_primary: Color32::from_rgb(0x1f, 0x23, 0x28),
    text_secondary: Color32::from_rgb(0x59, 0x63, 0x6e),
    text_muted: Color32::from_rgb(0x81, 0x8b, 0x98),
    border: Color32::from_rgb(0xd0, 0xd7, 0xde),
};

fn selection_fill_color() -> Color32 {
    Color32::from_rgba_unmultiplied(
        COLOR_SELECTION_FILL_RGBA[0],
        COLOR_SELECTION_FILL_RGBA[1],
        COLOR_SELECTION_FILL_RGBA[2],
        COLOR_SELECTION_FILL_RGBA[3],
    )
}

fn widget(bg: Color32, stroke: Color32, fg: Color32, expansion: f32) -> WidgetVisuals {
    WidgetVisuals {
        bg_fill: bg,
        weak_bg_fill: bg,
        bg_stroke: Stroke::new(1.0, stroke),
        corner_radius: CornerRadius::same(6),
        fg_stroke: Stroke::new(1.0, fg),
        expansion,
    }
}

fn visuals_for(dark_mode: bool) -> Visuals {
    let palette = if dark_mode { DARK } else { LIGHT };
    let mut visuals = if dark_mode {
        Visuals::dark()
    } else {
        Visuals::light()
    };
    visuals.override_text_color = Some(palette.text_primary);
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_tertiary;
    visuals.window_stroke = Stroke::new(1.0, palette.border);
    visuals.hyperlink_color = COLOR_ACCENT;
    visuals.selection.bg_fill = selection_fill_color();
    visuals.selection.stroke = Stroke::new(1.0, COLOR_SELECTION_STROKE);
    visuals.text_edit_bg_color = Some(palette.bg_tertiary);

    visuals.widgets.noninteractive = widget(
        palette.bg_secondary,
        palette.border,
        palette.text_secondary,
        0.0,
    );
    visuals.widgets.inactive = widget(
        palette.bg_tertiary,
        palette.border,
        palette.text_primary,
        0.0,
    );
    visuals.widgets.hovered = widget(COLOR_ACCENT_HOVER, COLOR_ACCENT_HOVER, Color32::WHITE, 0.5);
    visuals.widgets.active = widget(COLOR_ACCENT, COLOR_ACCENT, Color32::WHITE, 0.5);
    visuals.widgets.open = widget(COLOR_ACCENT, COLOR_ACCENT, Color32::WHITE, 0.0);
    visuals
}

impl NoteDeckApp {
    pub(super) fn palette(&self) -> Palette {
        if self.dark_mode {
            DARK
        } else {
            LIGHT
        }
    }

    /// Apply spacing and fonts once, and visuals whenever the theme flips.
    pub(super) fn ensure_style(&mut self, ctx: &egui::Context) {
        if self.applied_dark_mode == Some(self.dark_mode) {
            return;
        }

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals_for(self.dark_mode);

        style.spacing.window_margin = Margin::same(12);
        style.spacing.button_padding = egui::vec2(14.0, 8.0);
        style.spacing.item_spacing = egui::vec2(12.0, 8.0);
        style.spacing.interact_size.y = 34.0;
        style.spacing.text_edit_width = 280.0;
        style.spacing.combo_width = 220.0;

        style.text_styles.insert(
            TextStyle::Heading,
            FontId::new(24.0, FontFamily::Proportional),
        );
        style
            .text_styles
            .insert(TextStyle::Body, FontId::new(16.0, FontFamily::Proportional));
        style.text_styles.insert(
            TextStyle::Button,
            FontId::new(15.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
        self.applied_dark_mode = Some(self.dark_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::visuals_for;

    #[test]
    fn theme_switch_flips_base_visuals() {
        assert!(visuals_for(true).dark_mode);
        assert!(!visuals_for(false).dark_mode);
    }
}
