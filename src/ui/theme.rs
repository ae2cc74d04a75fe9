use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::schedule::{PreviewKind, ShiftKind};

// Slate grays, blue channel slightly raised.
const INK: Color32 = Color32::from_rgb(10, 12, 16);
const SURFACE: Color32 = Color32::from_rgb(24, 27, 33);
const RAISED: Color32 = Color32::from_rgb(38, 42, 50);
const HOVER: Color32 = Color32::from_rgb(62, 68, 80);
const MUTED_TEXT: Color32 = Color32::from_rgb(168, 174, 186);
const TEXT: Color32 = Color32::from_rgb(214, 218, 226);

/// Font family for filled Phosphor icons
pub fn phosphor_fill_family() -> FontFamily {
    FontFamily::Name("phosphor-fill".into())
}

/// Font family for emphasized numbers (totals, times)
pub fn bold_family() -> FontFamily {
    FontFamily::Name("bold".into())
}

pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    let proportional = fonts
        .families
        .get(&FontFamily::Proportional)
        .cloned()
        .unwrap_or_default();

    // Only the default faces are bundled, so "bold" resolves to them too.
    fonts.families.insert(bold_family(), proportional.clone());

    fonts.font_data.insert(
        "phosphor-fill".into(),
        egui_phosphor::Variant::Fill.font_data(),
    );
    let fill = std::iter::once("phosphor-fill".to_owned())
        .chain(proportional)
        .collect();
    fonts.families.insert(phosphor_fill_family(), fill);

    ctx.set_fonts(fonts);
}

pub fn setup_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = INK;
    visuals.window_fill = INK;
    visuals.extreme_bg_color = INK;
    visuals.faint_bg_color = SURFACE;

    let widgets = &mut visuals.widgets;
    for (state, fill, text) in [
        (&mut widgets.noninteractive, SURFACE, MUTED_TEXT),
        (&mut widgets.inactive, RAISED, TEXT),
        (&mut widgets.hovered, HOVER, Color32::WHITE),
        (&mut widgets.active, accent(), Color32::WHITE),
    ] {
        state.bg_fill = fill;
        state.weak_bg_fill = fill;
        state.fg_stroke = Stroke::new(1.0, text);
        state.rounding = Rounding::same(6.0);
    }

    visuals.selection.bg_fill = accent();
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = accent();
    visuals.window_rounding = Rounding::same(8.0);

    let mut style = Style {
        visuals,
        ..Style::default()
    };
    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
    ]
    .into();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(20.0);

    ctx.set_style(style);
}

pub fn accent() -> Color32 {
    Color32::from_rgb(64, 140, 230)
}

pub fn error_color() -> Color32 {
    Color32::from_rgb(232, 98, 98)
}

pub fn success_color() -> Color32 {
    Color32::from_rgb(110, 196, 140)
}

/// (bg, text) for pill-shaped controls.
pub fn button_colors() -> (Color32, Color32) {
    (RAISED, TEXT)
}

/// (content bg, border, title text) for popups.
pub fn dialog_colors() -> (Color32, Color32, Color32) {
    (SURFACE, RAISED, MUTED_TEXT)
}

pub fn shift_color(kind: ShiftKind) -> Color32 {
    match kind {
        ShiftKind::Regular => accent(),
        ShiftKind::Overtime => Color32::from_rgb(226, 132, 52),
    }
}

/// Outline of blocks holding unsaved shifts.
pub fn draft_color() -> Color32 {
    Color32::from_rgb(232, 190, 72)
}

/// (column wash, label) for vacation days.
pub fn vacation_colors() -> (Color32, Color32) {
    (
        Color32::from_rgba_unmultiplied(110, 196, 140, 36),
        success_color(),
    )
}

pub fn preview_color(kind: PreviewKind) -> Color32 {
    let base = match kind {
        PreviewKind::Add => success_color(),
        PreviewKind::Delete => error_color(),
    };
    Color32::from_rgba_unmultiplied(base.r(), base.g(), base.b(), 140)
}
