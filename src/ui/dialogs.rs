use crate::app::ScheduleApp;
use crate::ui::theme;
use egui::{Context, RichText, Ui, Window};

/// Centered, fixed-size window. Returns true when it should close.
fn modal(ctx: &Context, title: &str, width: f32, body: impl FnOnce(&mut Ui) -> bool) -> bool {
    let close = Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .default_width(width)
        .show(ctx, body)
        .and_then(|response| response.inner)
        .unwrap_or(false);
    close || ctx.input(|i| i.key_pressed(egui::Key::Escape))
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(theme::TEXT_SECONDARY));
}

pub fn show_add_row_dialog(app: &mut ScheduleApp, ctx: &Context) {
    let closed = modal(ctx, "Add Row", 320.0, |ui| {
        egui::Grid::new("add_row_form")
            .num_columns(2)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                field_label(ui, "Title");
                ui.text_edit_singleline(&mut app.new_row.title);
                ui.end_row();

                field_label(ui, "Label");
                ui.add(egui::TextEdit::singleline(&mut app.new_row.extra).hint_text("optional"));
                ui.end_row();

                field_label(ui, "Start");
                ui.add(egui_extras::DatePickerButton::new(&mut app.new_row.start).id_salt("new_row_start"));
                ui.end_row();

                field_label(ui, "End");
                ui.add(egui_extras::DatePickerButton::new(&mut app.new_row.end).id_salt("new_row_end"));
                ui.end_row();
            });

        ui.separator();
        let mut close = false;
        ui.horizontal(|ui| {
            let create = egui::Button::new(RichText::new("Create").color(theme::TEXT_ON_BAR))
                .fill(theme::ACCENT);
            if ui.add(create).clicked() {
                app.add_row_from_dialog();
                close = true;
            }
            close |= ui.button("Cancel").clicked();
        });
        close
    });
    if closed {
        app.show_add_row = false;
    }
}

pub fn show_about_dialog(app: &mut ScheduleApp, ctx: &Context) {
    let closed = modal(ctx, "About", 280.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("Time Schedule");
            ui.label(
                RichText::new(concat!("Version ", env!("CARGO_PKG_VERSION")))
                    .color(theme::TEXT_SECONDARY),
            );
            ui.add_space(8.0);
            ui.label("Drag a bar to move it, drag its edges to resize.");
            ui.label(RichText::new("Esc cancels a drag in progress.").color(theme::TEXT_DIM));
            ui.add_space(8.0);
            ui.button("Close").clicked()
        })
        .inner
    });
    if closed {
        app.show_about = false;
    }
}
