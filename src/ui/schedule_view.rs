use crate::ui::theme;
use egui::{Color32, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use time_schedule::schedule::{GestureKind, RenderFrame, RenderedBar};
use time_schedule::{BarGeometry, RowId, Schedule};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Bar placement and pointer position captured when a gesture starts.
#[derive(Debug, Clone, Copy)]
struct GestureAnchor {
    geometry: BarGeometry,
    pointer_x: f32,
}

impl GestureAnchor {
    /// Grid-snapped pointer travel since the gesture began. `None` when the
    /// pointer position is unknown this frame.
    fn snapped_delta(&self, pointer: Option<Pos2>, pixel_per_unit: f32) -> Option<f32> {
        pointer.map(|pos| snap(pos.x - self.pointer_x, pixel_per_unit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Handle {
    Move,
    West,
    East,
}

impl Handle {
    fn kind(self) -> GestureKind {
        match self {
            Handle::Move => GestureKind::Drag,
            Handle::West | Handle::East => GestureKind::Resize,
        }
    }
}

/// Scroll bookkeeping shared between frames.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Offset to jump to on the next frame, set after a full render.
    pub pending: Option<f32>,
    last_recorded: Option<f32>,
}

impl ScrollState {
    /// Jump to `offset` on the next frame.
    pub fn restoring(offset: f32) -> Self {
        Self {
            pending: Some(offset),
            last_recorded: None,
        }
    }
}

/// What happened in the chart this frame.
#[derive(Debug, Clone, Default)]
pub struct ViewInteraction {
    /// A gesture completed and the row order/labels should be rebuilt.
    pub committed: Option<RowId>,
    pub cancelled: Option<RowId>,
}

/// Render the timeline area (right panel).
pub fn show_schedule(
    schedule: &mut Schedule,
    frame: &mut RenderFrame,
    palette: &[Color32],
    scroll: &mut ScrollState,
    ui: &mut Ui,
) -> ViewInteraction {
    let mut interaction = ViewInteraction::default();
    let available = ui.available_size();
    let chart_width = frame.layout.total_width.max(available.x);
    let chart_height = HEADER_HEIGHT + frame.bars.len() as f32 * (ROW_HEIGHT + ROW_PADDING) + 40.0;

    let mut area = egui::ScrollArea::both().auto_shrink([false, false]);
    if let Some(offset) = scroll.pending.take() {
        area = area.horizontal_scroll_offset(offset);
    }

    let output = area.show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(
            Vec2::new(chart_width, chart_height.max(available.y)),
            Sense::hover(),
        );
        let origin = response.rect.min;
        let clip = ui.clip_rect();

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
        draw_stripes(&painter, origin, frame, clip, response.rect.height());
        draw_elapsed(&painter, origin, frame, response.rect.height());
        draw_header(&painter, origin, frame, chart_width);

        let ppu = frame.layout.pixel_per_unit;
        let frame_width = frame.layout.total_width;
        let cancel = ui.input(|i| i.key_pressed(egui::Key::Escape));

        for (i, bar) in frame.bars.iter_mut().enumerate() {
            let y = origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING) + ROW_PADDING;
            painter.line_segment(
                [
                    Pos2::new(origin.x, y + ROW_HEIGHT),
                    Pos2::new(origin.x + chart_width, y + ROW_HEIGHT),
                ],
                Stroke::new(0.5, theme::BORDER_SUBTLE),
            );

            let bar_rect = draw_bar(&painter, origin, bar, palette, y);
            let row = bar.row;

            let bar_sense = if bar.draggable {
                Sense::click_and_drag()
            } else {
                Sense::click()
            };
            let bar_response = ui.interact(bar_rect, Id::new(("bar", row)), bar_sense);
            let east_response = ui.interact(
                handle_rect(bar_rect, bar_rect.right()).expand(4.0),
                Id::new(("bar-east", row)),
                Sense::drag(),
            );
            let west_response = bar.handles.west.then(|| {
                ui.interact(
                    handle_rect(bar_rect, bar_rect.left()).expand(4.0),
                    Id::new(("bar-west", row)),
                    Sense::drag(),
                )
            });

            if bar_response.double_clicked() {
                if let Err(err) = schedule.activate(row) {
                    tracing::warn!(%err, "bar activation failed");
                }
            }

            let handles = [
                (Handle::West, west_response.as_ref()),
                (Handle::East, Some(&east_response)),
                (Handle::Move, bar.draggable.then_some(&bar_response)),
            ];
            for (handle, response) in handles {
                let Some(response) = response else {
                    continue;
                };
                let id = gesture_id(row, handle);

                if response.drag_started() {
                    let Some(pointer) = response.interact_pointer_pos() else {
                        continue;
                    };
                    let pointer_x = pointer.x;
                    match schedule.begin_gesture(row, handle.kind()) {
                        Ok(()) => ui.ctx().data_mut(|data| {
                            data.insert_temp(
                                id,
                                GestureAnchor {
                                    geometry: bar.geometry,
                                    pointer_x,
                                },
                            )
                        }),
                        Err(err) => tracing::warn!(%err, "gesture refused"),
                    }
                }

                let anchor = ui.ctx().data_mut(|data| data.get_temp::<GestureAnchor>(id));
                let Some(anchor) = anchor else {
                    continue;
                };

                if cancel {
                    ui.ctx().data_mut(|data| data.remove::<GestureAnchor>(id));
                    if schedule.cancel_gesture(row).is_ok() {
                        refresh_bar(schedule, bar);
                        interaction.cancelled = Some(row);
                    }
                    continue;
                }

                let delta = response
                    .dragged()
                    .then(|| anchor.snapped_delta(response.interact_pointer_pos(), ppu))
                    .flatten();
                if let Some(delta) = delta {
                    let result = apply_frame(
                        schedule,
                        row,
                        handle,
                        anchor.geometry,
                        delta,
                        ppu,
                        frame_width,
                    );
                    match result {
                        Ok(_) => refresh_bar(schedule, bar),
                        Err(err) => tracing::warn!(%err, "gesture frame rejected"),
                    }
                    ui.ctx().set_cursor_icon(match handle {
                        Handle::Move => egui::CursorIcon::Grabbing,
                        _ => egui::CursorIcon::ResizeHorizontal,
                    });
                }

                if response.drag_stopped() {
                    ui.ctx().data_mut(|data| data.remove::<GestureAnchor>(id));
                    match schedule.finish_gesture(row) {
                        Ok(()) => interaction.committed = Some(row),
                        Err(err) => tracing::warn!(%err, "gesture completion failed"),
                    }
                }
            }

            let hovered_handle = east_response.hovered()
                || west_response.as_ref().is_some_and(|r| r.hovered());
            if hovered_handle {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
            } else if bar_response.hovered() && bar.draggable {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }
            if hovered_handle || bar_response.hovered() {
                draw_handles(&painter, bar_rect, bar.handles.west);
                egui::show_tooltip_at_pointer(
                    ui.ctx(),
                    ui.layer_id(),
                    Id::new(("bar-tip", row)),
                    |ui| {
                        ui.strong(&bar.title);
                        ui.label(format!("{} → {}", bar.start_label, bar.end_label));
                        if bar.locked {
                            ui.label(egui::RichText::new("Started: start date locked").color(theme::TEXT_DIM));
                        }
                    },
                );
            }
        }
    });

    let offset = output.state.offset.x;
    if scroll.last_recorded.map_or(true, |last| (last - offset).abs() >= 0.5) {
        schedule.record_scroll(offset);
        scroll.last_recorded = Some(offset);
    }

    interaction
}

/// Round a pointer delta to whole grid units.
fn snap(delta_x: f32, pixel_per_unit: f32) -> f32 {
    (delta_x / pixel_per_unit).round() * pixel_per_unit
}

/// Turn a snapped pointer delta into one engine frame, keeping the bar on
/// the canvas.
fn apply_frame(
    schedule: &mut Schedule,
    row: RowId,
    handle: Handle,
    start: BarGeometry,
    delta: f32,
    ppu: f32,
    canvas_width: f32,
) -> time_schedule::ScheduleResult<BarGeometry> {
    match handle {
        Handle::Move => {
            let max_left = (canvas_width - start.width).max(0.0);
            schedule.drag_to(row, (start.left + delta).clamp(0.0, max_left))
        }
        Handle::East => {
            let min_right = start.left + ppu;
            let right = (start.right() + delta).clamp(min_right, canvas_width.max(min_right));
            schedule.resize_to(row, start.left, right - start.left)
        }
        Handle::West => {
            let right = start.right();
            let left = (start.left + delta).min(right - ppu).max(0.0);
            schedule.resize_to(row, left, right - left)
        }
    }
}

/// Pull the row's live interval back into the drawn bar.
fn refresh_bar(schedule: &Schedule, bar: &mut RenderedBar) {
    if let Ok(geometry) = schedule.geometry(bar.row) {
        bar.geometry = geometry;
    }
    if let Some(row) = schedule.row(bar.row) {
        bar.start_label = row.start_label();
        bar.end_label = row.end_label();
    }
}

fn gesture_id(row: RowId, handle: Handle) -> Id {
    Id::new(("gesture", row, handle))
}

fn handle_rect(bar_rect: Rect, x: f32) -> Rect {
    Rect::from_min_max(
        Pos2::new(x - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(x + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    )
}

fn draw_header(painter: &egui::Painter, origin: Pos2, frame: &RenderFrame, width: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let mut x = origin.x;
    for cell in &frame.layout.header {
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + HEADER_HEIGHT)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        let clipped = painter.with_clip_rect(Rect::from_min_size(
            Pos2::new(x, origin.y),
            Vec2::new(cell.width, HEADER_HEIGHT),
        ));
        clipped.text(
            Pos2::new(x + 4.0, origin.y + HEADER_HEIGHT / 2.0),
            egui::Align2::LEFT_CENTER,
            &cell.label,
            theme::font_header(),
            theme::TEXT_SECONDARY,
        );
        x += cell.width;
    }
}

fn draw_stripes(painter: &egui::Painter, origin: Pos2, frame: &RenderFrame, clip: Rect, height: f32) {
    let period = frame.layout.grid_period;
    if period <= 0.0 {
        return;
    }
    let stripe = period / 2.0;
    let first = ((clip.left() - origin.x) / period).floor().max(0.0) as usize;
    let last = ((clip.right() - origin.x) / period).ceil().max(0.0) as usize;
    let end = origin.x + frame.layout.total_width;
    for i in first..=last {
        let x = origin.x + i as f32 * period;
        if x >= end {
            break;
        }
        painter.rect_filled(
            Rect::from_min_size(
                Pos2::new(x, origin.y + HEADER_HEIGHT),
                Vec2::new(stripe.min(end - x), height - HEADER_HEIGHT),
            ),
            0.0,
            theme::BG_STRIPE,
        );
    }
}

fn draw_elapsed(painter: &egui::Painter, origin: Pos2, frame: &RenderFrame, height: f32) {
    if frame.layout.elapsed_width <= 0.0 {
        return;
    }
    painter.rect_filled(
        Rect::from_min_size(
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Vec2::new(frame.layout.elapsed_width, height - HEADER_HEIGHT),
        ),
        0.0,
        theme::ELAPSED_SHADE,
    );
}

fn draw_bar(
    painter: &egui::Painter,
    origin: Pos2,
    bar: &RenderedBar,
    palette: &[Color32],
    y: f32,
) -> Rect {
    let inset = theme::BAR_INSET;
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + bar.geometry.left, y + inset),
        Vec2::new(bar.geometry.width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, theme::bar_color(palette, bar.color_index));
    if bar.locked {
        painter.rect_stroke(bar_rect, rounding, Stroke::new(1.0, theme::TEXT_DIM));
    }

    if bar.geometry.width > 30.0 {
        let galley = painter.layout_no_wrap(bar.title.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter.with_clip_rect(bar_rect).galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }

    bar_rect
}

fn draw_handles(painter: &egui::Painter, bar_rect: Rect, west: bool) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    let east = Rect::from_min_size(
        Pos2::new(bar_rect.right() - 2.5, handle_y),
        Vec2::new(4.0, handle_h),
    );
    painter.rect_filled(east, Rounding::same(2.0), theme::HANDLE_COLOR);
    if west {
        let west = Rect::from_min_size(
            Pos2::new(bar_rect.left() - 1.5, handle_y),
            Vec2::new(4.0, handle_h),
        );
        painter.rect_filled(west, Rounding::same(2.0), theme::HANDLE_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_grid() {
        assert_eq!(snap(23.0, 50.0), 0.0);
        assert_eq!(snap(26.0, 50.0), 50.0);
        assert_eq!(snap(-26.0, 50.0), -50.0);
        assert_eq!(snap(11.0, 8.0), 8.0);
    }

    #[test]
    fn missing_pointer_yields_no_frame() {
        let anchor = GestureAnchor {
            geometry: BarGeometry {
                left: 400.0,
                width: 80.0,
            },
            pointer_x: 420.0,
        };
        assert_eq!(anchor.snapped_delta(None, 8.0), None);
        assert_eq!(anchor.snapped_delta(Some(Pos2::new(437.0, 5.0)), 8.0), Some(16.0));
        assert_eq!(anchor.snapped_delta(Some(Pos2::new(4.0, 5.0)), 8.0), Some(-416.0));
    }

    #[test]
    fn restoring_scroll_is_pending() {
        let state = ScrollState::restoring(120.0);
        assert_eq!(state.pending, Some(120.0));
        assert_eq!(state.last_recorded, None);
    }
}
