use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, NaiveTime};
use egui::Color32;
use time_schedule::schedule::RenderFrame;
use time_schedule::{config, NewRow, Scale, Schedule, ScheduleOptions, ScheduleResult};

use crate::ui;
use crate::ui::schedule_view::ScrollState;

/// Fields of the "Add Row" dialog.
pub struct NewRowForm {
    pub title: String,
    pub extra: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl NewRowForm {
    fn reset() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            title: String::new(),
            extra: String::new(),
            start: today,
            end: today + Duration::days(7),
        }
    }
}

/// Host window: owns the schedule and the last rendered frame.
pub struct ScheduleApp {
    pub schedule: Schedule,
    pub frame: RenderFrame,
    pub palette: Vec<Color32>,
    pub settings_path: PathBuf,
    pub scroll: ScrollState,

    // Dialog state
    pub show_add_row: bool,
    pub show_about: bool,
    pub new_row: NewRowForm,

    /// Written by schedule callbacks, shown in the status bar.
    pub status_message: Rc<RefCell<String>>,
}

impl ScheduleApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> ScheduleResult<Self> {
        // Phosphor glyphs for the lock and toolbar icons
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let settings_path = config::default_path();
        let options = config::load_or_default(&settings_path).unwrap_or_else(|err| {
            tracing::warn!(%err, path = %settings_path.display(), "falling back to default settings");
            ScheduleOptions::default()
        });
        let palette = ui::theme::bar_palette(&options.palette);

        let status_message = Rc::new(RefCell::new("Ready".to_string()));
        let on_change = Rc::clone(&status_message);
        let on_activate = Rc::clone(&status_message);
        let mut schedule = Schedule::new(options)?
            .on_change(move |row| {
                *on_change.borrow_mut() = format!(
                    "Updated '{}' ({} → {})",
                    row.title,
                    row.start_label(),
                    row.end_label()
                );
            })
            .on_activate(move |row| {
                *on_activate.borrow_mut() = format!("Activated '{}'", row.title);
            });
        for row in sample_rows() {
            schedule.add_row(row);
        }

        let frame = schedule.render();
        let scroll = ScrollState::restoring(frame.layout.scroll_left);

        Ok(Self {
            schedule,
            frame,
            palette,
            settings_path,
            scroll,
            show_add_row: false,
            show_about: false,
            new_row: NewRowForm::reset(),
            status_message,
        })
    }

    fn set_status(&self, message: impl Into<String>) {
        *self.status_message.borrow_mut() = message.into();
    }

    /// Full rebuild of the drawn frame, restoring the viewed time.
    pub fn rerender(&mut self) {
        self.frame = self.schedule.render();
        self.scroll.pending = Some(self.frame.layout.scroll_left);
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.schedule.set_scale(scale);
        self.rerender();
        self.set_status(format!("Scale: {}", scale));
    }

    pub fn add_row_from_dialog(&mut self) {
        let title = if self.new_row.title.trim().is_empty() {
            "New Row".to_string()
        } else {
            self.new_row.title.trim().to_string()
        };
        let start = self.new_row.start;
        let end = if self.new_row.end > start {
            self.new_row.end
        } else {
            start + Duration::days(7)
        };
        let row = NewRow::new(
            title.clone(),
            start.and_time(NaiveTime::MIN),
            end.and_time(NaiveTime::MIN),
        )
        .with_extra(self.new_row.extra.trim());

        self.schedule.add_row(row);
        self.rerender();
        self.new_row = NewRowForm::reset();
        self.set_status(format!("Added '{}'", title));
    }

    pub fn save_settings(&mut self) {
        let mut options = self.schedule.options().clone();
        options.scale = self.schedule.scale();
        match config::save(&options, &self.settings_path) {
            Ok(()) => self.set_status("Settings saved"),
            Err(e) => self.set_status(format!("Error saving settings: {}", e)),
        }
    }

    pub fn open_settings_folder(&mut self) {
        let Some(dir) = self.settings_path.parent().map(|p| p.to_path_buf()) else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            self.set_status(format!("Could not open {}: {}", dir.display(), e));
        }
    }
}

/// Rows shown on first launch.
fn sample_rows() -> Vec<NewRow> {
    let today = chrono::Local::now().date_naive().and_time(NaiveTime::MIN);
    vec![
        NewRow::new("Requirements", today - Duration::days(20), today + Duration::days(5))
            .with_extra("Alice"),
        NewRow::new("design review", today - Duration::days(3), today + Duration::days(10)),
        NewRow::new("Backend", today + Duration::days(6), today + Duration::days(60))
            .with_extra("Bob"),
        NewRow::new("UI", today + Duration::days(14), today + Duration::days(45)),
        NewRow::new("Launch", today + Duration::days(75), today + Duration::days(80)),
    ]
}

impl eframe::App for ScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(self.status_message.borrow().as_str())
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Rows: {}  ·  Scale: {}",
                                self.schedule.len(),
                                self.frame.layout.scale
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let mut list_action = ui::row_list::RowListAction::None;
        egui::SidePanel::left("row_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                list_action = ui::row_list::show_row_list(&self.frame.bars, &self.palette, ui);
            });
        match list_action {
            ui::row_list::RowListAction::Add => self.show_add_row = true,
            ui::row_list::RowListAction::Activate(id) => {
                if let Err(e) = self.schedule.activate(id) {
                    self.set_status(e.to_string());
                }
            }
            ui::row_list::RowListAction::None => {}
        }

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let interaction = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| {
                ui::schedule_view::show_schedule(
                    &mut self.schedule,
                    &mut self.frame,
                    &self.palette,
                    &mut self.scroll,
                    ui,
                )
            })
            .inner;
        if interaction.committed.is_some() {
            self.rerender();
        }
        if interaction.cancelled.is_some() {
            self.set_status("Change cancelled");
        }

        if self.show_add_row {
            ui::dialogs::show_add_row_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
