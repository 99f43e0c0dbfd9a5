use chrono::{Duration, NaiveDateTime};

use super::{BarGeometry, Scale};
use crate::config::DAY_MS;

/// Converts between calendar time and horizontal pixel offsets.
///
/// Pixel zero is the window origin. Times are measured in whole units
/// (`unit_ms`, one day by default) scaled by `pixel_per_unit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub origin: NaiveDateTime,
    pub pixel_per_unit: f32,
    pub unit_ms: i64,
}

impl CoordinateMapper {
    pub fn new(origin: NaiveDateTime, pixel_per_unit: f32, unit_ms: i64) -> Self {
        Self {
            origin,
            pixel_per_unit,
            unit_ms: unit_ms.max(1),
        }
    }

    fn offset_ms(&self, at: NaiveDateTime) -> i64 {
        (at - self.origin).num_milliseconds()
    }

    /// Whole units from the origin, rounded up. Used for interval starts.
    pub fn units_ceil(&self, at: NaiveDateTime) -> i64 {
        let ms = self.offset_ms(at);
        -(-ms).div_euclid(self.unit_ms)
    }

    /// Whole units from the origin, rounded down. Used for interval ends.
    pub fn units_floor(&self, at: NaiveDateTime) -> i64 {
        self.offset_ms(at).div_euclid(self.unit_ms)
    }

    /// Pixel of an interval start: never left of the first full unit it occupies.
    pub fn start_to_pixel(&self, at: NaiveDateTime) -> f32 {
        self.units_ceil(at) as f32 * self.pixel_per_unit
    }

    /// Pixel of an interval end: never right of the last full unit it occupies.
    pub fn end_to_pixel(&self, at: NaiveDateTime) -> f32 {
        self.units_floor(at) as f32 * self.pixel_per_unit
    }

    /// Unrounded pixel offset, for shading and scroll positions.
    pub fn time_to_pixel(&self, at: NaiveDateTime) -> f32 {
        (self.offset_ms(at) as f64 / self.unit_ms as f64 * f64::from(self.pixel_per_unit)) as f32
    }

    /// Snap a pixel offset to the left edge of its unit and return that time.
    pub fn pixel_to_time(&self, pixel: f32) -> NaiveDateTime {
        let units = (pixel / self.pixel_per_unit).floor() as i64;
        shift(self.origin, units.saturating_mul(self.unit_ms))
    }

    /// Unsnapped inverse of [`Self::time_to_pixel`], truncated to the millisecond.
    pub fn pixel_to_time_exact(&self, pixel: f32) -> NaiveDateTime {
        let ms = f64::from(pixel) / f64::from(self.pixel_per_unit) * self.unit_ms as f64;
        shift(self.origin, ms.floor() as i64)
    }

    /// Width of `days` calendar days.
    pub fn days_to_pixels(&self, days: u64) -> f32 {
        (days as f64 * DAY_MS as f64 / self.unit_ms as f64 * f64::from(self.pixel_per_unit)) as f32
    }

    /// The time reached `units` whole units after `at`.
    pub fn add_units(&self, at: NaiveDateTime, units: i64) -> NaiveDateTime {
        shift(at, units.saturating_mul(self.unit_ms))
    }

    /// Bar placement for an interval, at least one unit wide.
    pub fn geometry(&self, start: NaiveDateTime, end: NaiveDateTime) -> BarGeometry {
        let first = self.units_ceil(start);
        let last = self.units_floor(end);
        let units = (last - first).max(1);
        BarGeometry {
            left: first as f32 * self.pixel_per_unit,
            width: units as f32 * self.pixel_per_unit,
        }
    }
}

/// `at` moved by `ms` milliseconds, saturating at the calendar limits.
fn shift(at: NaiveDateTime, ms: i64) -> NaiveDateTime {
    let limit = if ms < 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    };
    Duration::try_milliseconds(ms)
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(limit)
}

/// Layout parameters in effect after the last scale application.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub scale: Scale,
    /// Bucket-aligned date at pixel zero.
    pub origin: NaiveDateTime,
    pub pixel_per_unit: f32,
    /// Time at the left edge of the scrolled view, kept across scale changes.
    pub scroll_anchor: Option<NaiveDateTime>,
}

impl ViewportState {
    pub fn mapper(&self, unit_ms: i64) -> CoordinateMapper {
        CoordinateMapper::new(self.origin, self.pixel_per_unit, unit_ms)
    }
}
