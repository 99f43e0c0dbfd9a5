use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a schedule row, passed explicitly to gesture handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub Uuid);

impl RowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Host-supplied row content, before the schedule takes ownership of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRow {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Auxiliary label content shown beside the title.
    #[serde(default)]
    pub extra: String,
}

impl NewRow {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            extra: String::new(),
        }
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }
}

/// A labeled row holding one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub id: RowId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Set once when the row is added: its start had already passed.
    pub locked: bool,
    pub extra: String,
    /// Palette slot assigned by the last render pass.
    pub color_index: Option<usize>,
}

impl ScheduleRow {
    pub(crate) fn from_new(row: NewRow, locked: bool) -> Self {
        Self {
            id: RowId::new(),
            title: row.title,
            start: row.start,
            end: row.end,
            locked,
            extra: row.extra,
            color_index: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn start_label(&self) -> String {
        date_label(self.start)
    }

    pub fn end_label(&self) -> String {
        date_label(self.end)
    }

    /// Case-insensitive title key used for render order.
    pub fn sort_key(&self) -> String {
        self.title.to_lowercase()
    }
}

fn date_label(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// Horizontal placement of a row's bar under the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BarGeometry {
    pub left: f32,
    pub width: f32,
}

impl BarGeometry {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}
