#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

fn main() -> eframe::Result<()> {
    if !time_schedule::telemetry::init_default_tracing() {
        eprintln!("tracing subscriber already installed");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Time Schedule"),
        ..Default::default()
    };

    eframe::run_native(
        "Time Schedule",
        options,
        Box::new(|cc| Ok(Box::new(app::ScheduleApp::new(cc)?))),
    )
}
