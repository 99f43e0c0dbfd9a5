use egui::style::WidgetVisuals;
use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// Canvas and panels
pub const BG_DARK: Color32 = Color32::from_rgb(19, 22, 28);
pub const BG_PANEL: Color32 = Color32::from_rgb(26, 30, 38);
pub const BG_HEADER: Color32 = Color32::from_rgb(32, 37, 47);
pub const BG_STRIPE: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 4);
pub const ELAPSED_SHADE: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 70);
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(46, 52, 64);
pub const GRID_LINE: Color32 = Color32::from_rgb(40, 45, 56);

// Text
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 230, 236);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 158, 172);
pub const TEXT_DIM: Color32 = Color32::from_rgb(98, 106, 120);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;

pub const ACCENT: Color32 = Color32::from_rgb(56, 160, 170);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(240, 244, 248);

// Geometry
pub const ROW_HEIGHT: f32 = 30.0;
pub const ROW_GAP: f32 = 2.0;
pub const HEADER_HEIGHT: f32 = 26.0;
pub const HANDLE_WIDTH: f32 = 7.0;
pub const BAR_ROUNDING: f32 = 4.0;
/// Gap between a bar and the edges of its row.
pub const BAR_INSET: f32 = 3.0;
pub const SIDE_PANEL_WIDTH: f32 = 220.0;

pub fn font_header() -> FontId {
    FontId::proportional(11.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

/// Parse `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(s: &str) -> Result<Color32, String> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(format!("Invalid hex color '{}'", s));
    }
    let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string());
    match s.len() {
        6 => Ok(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Ok(Color32::from_rgba_unmultiplied(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => Err(format!("'{}' is not RRGGBB or RRGGBBAA", s)),
    }
}

/// Resolve the configured palette, skipping entries that fail to parse.
pub fn bar_palette(hex: &[String]) -> Vec<Color32> {
    let colors: Vec<Color32> = hex
        .iter()
        .filter_map(|c| match parse_hex_color(c) {
            Ok(color) => Some(color),
            Err(err) => {
                tracing::warn!(%err, "ignoring palette entry");
                None
            }
        })
        .collect();
    if colors.is_empty() {
        vec![ACCENT]
    } else {
        colors
    }
}

pub fn bar_color(palette: &[Color32], index: usize) -> Color32 {
    palette.get(index % palette.len().max(1)).copied().unwrap_or(ACCENT)
}

fn widget_state(bg: Color32, border: Color32, fg: Stroke, base: WidgetVisuals) -> WidgetVisuals {
    WidgetVisuals {
        bg_fill: bg,
        weak_bg_fill: bg,
        bg_stroke: Stroke::new(1.0, border),
        fg_stroke: fg,
        rounding: Rounding::same(BAR_ROUNDING),
        ..base
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_DARK;
    visuals.striped = false;

    let widgets = &mut visuals.widgets;
    widgets.noninteractive = widget_state(
        BG_PANEL,
        BORDER_SUBTLE,
        Stroke::new(1.0, TEXT_SECONDARY),
        widgets.noninteractive,
    );
    widgets.inactive = widget_state(
        BG_HEADER,
        BORDER_SUBTLE,
        Stroke::new(1.0, TEXT_PRIMARY),
        widgets.inactive,
    );
    widgets.hovered = widget_state(
        BG_HEADER.gamma_multiply(1.3),
        ACCENT,
        Stroke::new(1.0, TEXT_PRIMARY),
        widgets.hovered,
    );
    widgets.active = widget_state(
        BG_HEADER.gamma_multiply(1.5),
        ACCENT,
        Stroke::new(2.0, TEXT_ON_BAR),
        widgets.active,
    );

    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(6.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 3.0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_hex_forms() {
        assert_eq!(parse_hex_color("#FF8000").unwrap(), Color32::from_rgb(255, 128, 0));
        assert_eq!(
            parse_hex_color("#FF000066").unwrap(),
            Color32::from_rgba_unmultiplied(255, 0, 0, 0x66)
        );
        assert!(parse_hex_color("#F006").is_err());
    }

    #[test]
    fn palette_wraps_around() {
        let palette = bar_palette(&["#000000".into(), "#FFFFFF".into()]);
        assert_eq!(bar_color(&palette, 3), Color32::WHITE);
        assert_eq!(bar_palette(&["nope".into()]), vec![ACCENT]);
    }
}
