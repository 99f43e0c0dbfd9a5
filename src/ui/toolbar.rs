use crate::app::ScheduleApp;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;
use time_schedule::Scale;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut ScheduleApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("  Rows  ", |ui| {
            if ui.button(format!("{} Add Row...", icons::PLUS)).clicked() {
                app.show_add_row = true;
                ui.close_menu();
            }
        });

        ui.menu_button("  Settings  ", |ui| {
            if ui.button(format!("{} Save Settings", icons::FLOPPY_DISK)).clicked() {
                app.save_settings();
                ui.close_menu();
            }
            if ui.button(format!("{} Open Settings Folder", icons::FOLDER_OPEN)).clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button("  Help  ", |ui| {
            if ui.button(format!("{} About", icons::INFO)).clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new(icons::CALENDAR_BLANK).weak());
        let current = app.schedule.scale();
        for scale in Scale::ALL {
            let label = match scale {
                Scale::Day => "Day",
                Scale::Month => "Month",
                Scale::Year => "Year",
            };
            if ui.selectable_label(current == scale, label).clicked() && current != scale {
                app.set_scale(scale);
            }
        }
    });
}
