use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use time_schedule::schedule::RenderedBar;
use time_schedule::RowId;

/// Actions that the row list can request.
pub enum RowListAction {
    None,
    Add,
    Activate(RowId),
}

/// Render the left-side row titles, aligned with the chart rows.
pub fn show_row_list(bars: &[RenderedBar], palette: &[Color32], ui: &mut Ui) -> RowListAction {
    let mut action = RowListAction::None;

    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Rows")
                .strong()
                .size(13.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.label(
            RichText::new(format!("({})", bars.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let btn = egui::Button::new(
                RichText::new(egui_phosphor::regular::PLUS).color(Color32::WHITE),
            )
            .fill(theme::ACCENT)
            .rounding(egui::Rounding::same(4.0));
            if ui.add(btn).on_hover_text("Add row").clicked() {
                action = RowListAction::Add;
            }
        });
    });

    // Keep rows level with the chart body below its header.
    let used = ui.min_rect().height();
    ui.add_space((theme::HEADER_HEIGHT - used).max(0.0));
    ui.spacing_mut().item_spacing.y = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        let row_bg = if i % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), theme::ROW_HEIGHT + theme::ROW_GAP),
            egui::Sense::click(),
        );
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, row_bg);
        painter.circle_filled(
            egui::pos2(rect.left() + 10.0, rect.center().y),
            4.0,
            theme::bar_color(palette, bar.color_index),
        );

        let mut title = bar.title.clone();
        if bar.locked {
            title = format!("{} {}", egui_phosphor::regular::LOCK_SIMPLE, title);
        }
        painter.text(
            egui::pos2(rect.left() + 22.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            title,
            theme::font_bar(),
            theme::TEXT_PRIMARY,
        );
        if !bar.extra.is_empty() {
            painter.text(
                egui::pos2(rect.right() - 6.0, rect.center().y),
                egui::Align2::RIGHT_CENTER,
                &bar.extra,
                theme::font_small(),
                theme::TEXT_SECONDARY,
            );
        }

        if response.double_clicked() {
            action = RowListAction::Activate(bar.row);
        }
    }

    action
}
