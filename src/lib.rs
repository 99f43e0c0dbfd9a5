//! time-schedule: an interactive horizontal timeline of date bars.
//!
//! The library holds the layout engine (calendar buckets, time/pixel mapping,
//! row model, gestures). Drawing and pointer capture live in the binary.

pub mod config;
pub mod error;
pub mod model;
pub mod schedule;
pub mod telemetry;

pub use config::{LockPolicy, ScaleSettings, ScheduleOptions};
pub use error::{ScheduleError, ScheduleResult};
pub use model::{BarGeometry, NewRow, RowId, Scale, ScheduleRow, TimeBucket};
pub use schedule::{GestureKind, Layout, RenderFrame, RenderedBar, Schedule};
