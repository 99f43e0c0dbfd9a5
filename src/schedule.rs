//! The schedule instance: owns the rows and viewport, lays out the header,
//! and turns drag/resize pixel positions into new row intervals.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::{LockPolicy, ScheduleOptions};
use crate::error::{ScheduleError, ScheduleResult};
use crate::model::{
    calendar, BarGeometry, Clock, CoordinateMapper, NewRow, RowId, Scale, ScheduleRow,
    SystemClock, ViewportState,
};

pub type RowCallback = Box<dyn FnMut(&ScheduleRow)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
}

/// Interval captured when a gesture begins, restored if it is cancelled.
#[derive(Debug, Clone, Copy)]
struct GestureSnapshot {
    row: RowId,
    kind: GestureKind,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    pub label: String,
    pub days: u32,
    pub width: f32,
}

/// Header and canvas measurements produced by a scale application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub scale: Scale,
    pub origin: NaiveDateTime,
    pub pixel_per_unit: f32,
    pub header: Vec<HeaderCell>,
    pub total_days: u64,
    pub total_width: f32,
    /// Width of the shaded region covering days already elapsed.
    pub elapsed_width: f32,
    /// Period of the alternating background stripes.
    pub grid_period: f32,
    /// Scroll position that keeps the last viewed time in view.
    pub scroll_left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizeHandles {
    pub west: bool,
    pub east: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedBar {
    pub row: RowId,
    pub title: String,
    pub extra: String,
    pub geometry: BarGeometry,
    pub color_index: usize,
    pub locked: bool,
    pub draggable: bool,
    pub handles: ResizeHandles,
    pub start_label: String,
    pub end_label: String,
}

/// Everything the presentation layer needs to draw one full pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub layout: Layout,
    pub bars: Vec<RenderedBar>,
}

pub struct Schedule {
    options: ScheduleOptions,
    clock: Box<dyn Clock>,
    rows: IndexMap<RowId, ScheduleRow>,
    /// Earliest date seen so far; the window origin is aligned from it.
    earliest: NaiveDateTime,
    /// Scale requested by the host, applied on the next render.
    scale: Scale,
    viewport: ViewportState,
    layout: Option<Layout>,
    gesture: Option<GestureSnapshot>,
    on_change: Option<RowCallback>,
    on_activate: Option<RowCallback>,
}

impl Schedule {
    pub fn new(options: ScheduleOptions) -> ScheduleResult<Self> {
        Self::with_clock(options, SystemClock)
    }

    /// Build a schedule reading "now" from `clock`. Fails on settings that
    /// cannot be laid out.
    pub fn with_clock(options: ScheduleOptions, clock: impl Clock + 'static) -> ScheduleResult<Self> {
        options.validate()?;
        let earliest = options.start_date.unwrap_or_else(|| clock.now());
        let scale = options.scale;
        let settings = options.scale_settings(scale);
        let viewport = ViewportState {
            scale,
            origin: scale.align(earliest),
            pixel_per_unit: settings.pixel_per_unit,
            scroll_anchor: None,
        };
        Ok(Self {
            options,
            clock: Box::new(clock),
            rows: IndexMap::new(),
            earliest,
            scale,
            viewport,
            layout: None,
            gesture: None,
            on_change: None,
            on_activate: None,
        })
    }

    /// Called once per completed drag or resize.
    pub fn on_change(mut self, callback: impl FnMut(&ScheduleRow) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Called when a bar is activated (double-clicked).
    pub fn on_activate(mut self, callback: impl FnMut(&ScheduleRow) + 'static) -> Self {
        self.on_activate = Some(Box::new(callback));
        self
    }

    pub fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn earliest(&self) -> NaiveDateTime {
        self.earliest
    }

    pub fn mapper(&self) -> CoordinateMapper {
        self.viewport.mapper(self.options.time_unit_ms)
    }

    // --- Rows ---

    /// Register a row. Its lock state is decided here, once.
    pub fn add_row(&mut self, row: NewRow) -> RowId {
        let locked = row.start < self.clock.now();
        if row.start < self.earliest {
            self.earliest = row.start;
        }
        let row = ScheduleRow::from_new(row, locked);
        let id = row.id;
        debug!(%id, title = %row.title, locked, "row added");
        self.rows.insert(id, row);
        id
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.values()
    }

    pub fn row(&self, id: RowId) -> Option<&ScheduleRow> {
        self.rows.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row_mut(&mut self, id: RowId) -> ScheduleResult<&mut ScheduleRow> {
        self.rows.get_mut(&id).ok_or(ScheduleError::UnknownRow(id))
    }

    /// Current bar placement of one row.
    pub fn geometry(&self, id: RowId) -> ScheduleResult<BarGeometry> {
        let row = self.rows.get(&id).ok_or(ScheduleError::UnknownRow(id))?;
        Ok(self.mapper().geometry(row.start, row.end))
    }

    /// Replace a row's interval outside of any gesture.
    pub fn set_row_interval(
        &mut self,
        id: RowId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ScheduleResult<BarGeometry> {
        if end <= start {
            return Err(ScheduleError::InvalidInterval { start, end });
        }
        let row = self.row_mut(id)?;
        row.start = start;
        row.end = end;
        self.geometry(id)
    }

    // --- Scale and layout ---

    /// Choose the scale used by the next [`Self::render`].
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    pub fn set_scale_named(&mut self, name: &str) -> ScheduleResult<()> {
        self.scale = name.parse()?;
        Ok(())
    }

    /// Rebuild the header and measurements for `scale`.
    ///
    /// Row intervals are untouched; every bar geometry read afterwards uses
    /// the new mapper parameters.
    pub fn apply_scale(&mut self, scale: Scale) -> &Layout {
        let settings = self.options.scale_settings(scale);
        let origin = scale.align(self.earliest);
        self.viewport = ViewportState {
            scale,
            origin,
            pixel_per_unit: settings.pixel_per_unit,
            scroll_anchor: self.viewport.scroll_anchor,
        };
        let mapper = self.mapper();

        let buckets = calendar::generate(scale, origin, settings.bucket_count);
        let total_days = calendar::total_days(&buckets);
        let header = buckets
            .into_iter()
            .map(|bucket| HeaderCell {
                width: mapper.days_to_pixels(u64::from(bucket.duration_days)),
                days: bucket.duration_days,
                label: bucket.label,
            })
            .collect();

        let elapsed_width = mapper.time_to_pixel(self.clock.today()).max(0.0);
        let scroll_left = self
            .viewport
            .scroll_anchor
            .map(|anchor| mapper.time_to_pixel(anchor).floor().max(0.0))
            .unwrap_or(0.0);

        let layout = Layout {
            scale,
            origin,
            pixel_per_unit: settings.pixel_per_unit,
            header,
            total_days,
            total_width: mapper.days_to_pixels(total_days),
            elapsed_width,
            grid_period: settings.pixel_per_unit * 2.0,
            scroll_left,
        };
        debug!(
            %scale,
            %origin,
            buckets = layout.header.len(),
            total_width = layout.total_width,
            scroll_left,
            "scale applied"
        );
        self.layout.insert(layout)
    }

    /// Full rebuild: apply the pending scale and place every bar in
    /// case-insensitive title order.
    pub fn render(&mut self) -> RenderFrame {
        if self.options.lock_policy == LockPolicy::Live {
            let now = self.clock.now();
            for row in self.rows.values_mut() {
                row.locked = row.start < now;
            }
        }

        let layout = self.apply_scale(self.scale).clone();
        let mapper = self.mapper();

        let mut order: Vec<(String, RowId)> =
            self.rows.values().map(|r| (r.sort_key(), r.id)).collect();
        order.sort_by(|a, b| a.0.cmp(&b.0));

        let palette_len = self.options.palette.len().max(1);
        let mut rendered = 0usize;
        let mut bars = Vec::with_capacity(order.len());
        for (_, id) in order {
            let Some(row) = self.rows.get_mut(&id) else {
                continue;
            };
            let color_index = rendered % palette_len;
            rendered += 1;
            row.color_index = Some(color_index);
            bars.push(RenderedBar {
                row: id,
                title: row.title.clone(),
                extra: row.extra.clone(),
                geometry: mapper.geometry(row.start, row.end),
                color_index,
                locked: row.locked,
                draggable: !row.locked,
                handles: ResizeHandles {
                    west: !row.locked,
                    east: true,
                },
                start_label: row.start_label(),
                end_label: row.end_label(),
            });
        }

        RenderFrame { layout, bars }
    }

    /// Remember the time at the left edge of the view after a scroll.
    pub fn record_scroll(&mut self, scroll_left: f32) {
        let anchor = self.mapper().pixel_to_time_exact(scroll_left);
        self.viewport.scroll_anchor = Some(anchor);
    }

    // --- Gestures ---

    /// Start tracking a gesture on `id`, capturing its interval for cancellation.
    /// A refused gesture leaves any gesture already in progress untouched.
    pub fn begin_gesture(&mut self, id: RowId, kind: GestureKind) -> ScheduleResult<()> {
        if let Some(active) = self.gesture {
            if active.row == id && active.kind == kind {
                return Ok(());
            }
        }
        let row = self.rows.get(&id).ok_or(ScheduleError::UnknownRow(id))?;
        if kind == GestureKind::Drag && row.locked {
            return Err(ScheduleError::RowLocked(id));
        }
        if let Some(active) = self.gesture.take() {
            warn!(row = %active.row, "gesture superseded before completion");
            self.restore(active);
        }
        let (start, end) = self
            .rows
            .get(&id)
            .map(|row| (row.start, row.end))
            .ok_or(ScheduleError::UnknownRow(id))?;
        self.gesture = Some(GestureSnapshot {
            row: id,
            kind,
            start,
            end,
        });
        debug!(%id, ?kind, "gesture started");
        Ok(())
    }

    /// Right edge of the laid-out window, if a layout exists.
    fn canvas_width(&self) -> Option<f32> {
        self.layout.as_ref().map(|layout| layout.total_width)
    }

    /// One drag frame: the bar's left edge is now at `left`, kept inside the
    /// laid-out window.
    pub fn drag_to(&mut self, id: RowId, left: f32) -> ScheduleResult<BarGeometry> {
        self.begin_gesture(id, GestureKind::Drag)?;
        let mapper = self.mapper();
        let width = self.geometry(id)?.width;
        let max_left = self.canvas_width().map_or(f32::INFINITY, |w| (w - width).max(0.0));
        let left = left.clamp(0.0, max_left);
        let row = self.row_mut(id)?;
        let duration = row.duration();
        row.start = mapper.pixel_to_time(left);
        row.end = row.start + duration;
        trace!(%id, start = %row.start, end = %row.end, "drag frame");
        Ok(mapper.geometry(row.start, row.end))
    }

    /// One resize frame: the bar now spans `left .. left + width`.
    ///
    /// Both edges are kept inside the laid-out window. A locked row keeps its
    /// start whatever `left` says. A span that would end at or before its
    /// start is widened to one unit.
    pub fn resize_to(&mut self, id: RowId, left: f32, width: f32) -> ScheduleResult<BarGeometry> {
        self.begin_gesture(id, GestureKind::Resize)?;
        let mapper = self.mapper();
        let current = self.geometry(id)?;
        let canvas = self.canvas_width().unwrap_or(f32::INFINITY);
        let right = (left + width).min(canvas);
        let left = left.clamp(0.0, canvas);
        let width = right - left;
        let row = self.row_mut(id)?;

        let west_moved = !row.locked && (left - current.left).abs() >= 0.5;
        let start = if row.locked {
            row.start
        } else {
            mapper.pixel_to_time(left)
        };
        let end = mapper.pixel_to_time(left + width);

        let (start, end) = if end > start {
            (start, end)
        } else if west_moved {
            (mapper.add_units(end, -1), end)
        } else {
            (start, mapper.add_units(start, 1))
        };
        row.start = start;
        row.end = end;
        trace!(%id, start = %row.start, end = %row.end, "resize frame");
        Ok(mapper.geometry(row.start, row.end))
    }

    /// Commit the gesture on `id` and notify the host once.
    pub fn finish_gesture(&mut self, id: RowId) -> ScheduleResult<()> {
        match self.gesture {
            Some(active) if active.row == id => self.gesture = None,
            _ => return Err(ScheduleError::NoActiveGesture(id)),
        }
        let row = self.rows.get(&id).ok_or(ScheduleError::UnknownRow(id))?;
        debug!(%id, start = %row.start, end = %row.end, "gesture committed");
        if let Some(callback) = self.on_change.as_mut() {
            callback(row);
        }
        Ok(())
    }

    /// Abandon the gesture on `id`, putting its interval back.
    pub fn cancel_gesture(&mut self, id: RowId) -> ScheduleResult<()> {
        match self.gesture {
            Some(active) if active.row == id => {
                self.gesture = None;
                self.restore(active);
                debug!(%id, "gesture cancelled");
                Ok(())
            }
            _ => Err(ScheduleError::NoActiveGesture(id)),
        }
    }

    pub fn active_gesture(&self) -> Option<(RowId, GestureKind)> {
        self.gesture.map(|g| (g.row, g.kind))
    }

    fn restore(&mut self, snapshot: GestureSnapshot) {
        self.gesture = None;
        if let Some(row) = self.rows.get_mut(&snapshot.row) {
            row.start = snapshot.start;
            row.end = snapshot.end;
        }
    }

    /// Forward a bar activation to the host.
    pub fn activate(&mut self, id: RowId) -> ScheduleResult<()> {
        let row = self.rows.get(&id).ok_or(ScheduleError::UnknownRow(id))?;
        if let Some(callback) = self.on_activate.as_mut() {
            callback(row);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixedClock;
    use chrono::{Duration, NaiveDate, NaiveTime};

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    fn schedule_at(now: NaiveDateTime) -> Schedule {
        Schedule::with_clock(ScheduleOptions::default().with_start_date(now), FixedClock(now))
            .unwrap()
    }

    #[test]
    fn origin_aligns_to_earliest_row() {
        let mut schedule = schedule_at(midnight(2024, 6, 15));
        schedule.add_row(NewRow::new("A", midnight(2024, 1, 10), midnight(2024, 1, 20)));
        let layout = schedule.apply_scale(Scale::Month);
        assert_eq!(layout.origin, midnight(2024, 1, 1));
        assert_eq!(layout.header[0].days, 31);
        assert_eq!(layout.header[0].width, 248.0);
        assert_eq!(layout.header.len(), 60);
    }

    #[test]
    fn elapsed_shading_counts_whole_days_to_today() {
        let now = midnight(2024, 1, 5) + Duration::hours(15);
        let mut schedule = Schedule::with_clock(
            ScheduleOptions::default().with_start_date(midnight(2024, 1, 1)),
            FixedClock(now),
        )
        .unwrap();
        let layout = schedule.apply_scale(Scale::Day);
        assert_eq!(layout.elapsed_width, 200.0);
        assert_eq!(layout.grid_period, 100.0);
    }

    #[test]
    fn elapsed_shading_is_never_negative() {
        let mut schedule = Schedule::with_clock(
            ScheduleOptions::default().with_start_date(midnight(2030, 1, 1)),
            FixedClock(midnight(2024, 1, 1)),
        )
        .unwrap();
        assert_eq!(schedule.apply_scale(Scale::Year).elapsed_width, 0.0);
    }

    #[test]
    fn supersede_restores_previous_row() {
        let mut schedule = schedule_at(midnight(2024, 1, 1));
        let a = schedule.add_row(NewRow::new("a", midnight(2024, 2, 1), midnight(2024, 2, 5)));
        let b = schedule.add_row(NewRow::new("b", midnight(2024, 3, 1), midnight(2024, 3, 5)));
        schedule.apply_scale(Scale::Month);
        schedule.drag_to(a, 800.0).unwrap();
        schedule.drag_to(b, 0.0).unwrap();
        assert_eq!(schedule.row(a).unwrap().start, midnight(2024, 2, 1));
        assert_eq!(schedule.active_gesture(), Some((b, GestureKind::Drag)));
    }

    #[test]
    fn refused_gesture_keeps_the_active_one() {
        let mut schedule = schedule_at(midnight(2024, 6, 1));
        let free = schedule.add_row(NewRow::new("free", midnight(2024, 6, 10), midnight(2024, 6, 20)));
        let locked = schedule.add_row(NewRow::new("old", midnight(2024, 5, 1), midnight(2024, 7, 1)));
        schedule.apply_scale(Scale::Month);
        let moved = schedule.geometry(free).unwrap().left + 80.0;
        schedule.drag_to(free, moved).unwrap();
        let in_flight = schedule.row(free).unwrap().start;

        assert!(matches!(schedule.drag_to(locked, 0.0), Err(ScheduleError::RowLocked(_))));
        assert!(matches!(
            schedule.drag_to(RowId::new(), 0.0),
            Err(ScheduleError::UnknownRow(_))
        ));
        assert_eq!(schedule.row(free).unwrap().start, in_flight);
        assert_eq!(schedule.active_gesture(), Some((free, GestureKind::Drag)));
    }

    #[test]
    fn invalid_options_are_refused() {
        let mut options = ScheduleOptions::default();
        options.month.pixel_per_unit = 0.0;
        let result = Schedule::with_clock(options, FixedClock(midnight(2024, 1, 1)));
        assert!(matches!(result, Err(ScheduleError::Config(_))));
    }
}
