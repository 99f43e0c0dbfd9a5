pub mod calendar;
pub mod clock;
pub mod row;
pub mod scale;
pub mod timeline;

pub use calendar::TimeBucket;
pub use clock::{Clock, FixedClock, SystemClock};
pub use row::{BarGeometry, NewRow, RowId, ScheduleRow};
pub use scale::Scale;
pub use timeline::{CoordinateMapper, ViewportState};
