use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;
use time_schedule::config::DAY_MS;
use time_schedule::model::{calendar, CoordinateMapper, FixedClock};
use time_schedule::{NewRow, Scale, Schedule, ScheduleOptions};

fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_time(NaiveTime::MIN)
}

fn scale_strategy() -> impl Strategy<Value = Scale> {
    prop_oneof![Just(Scale::Day), Just(Scale::Month), Just(Scale::Year)]
}

proptest! {
    #[test]
    fn snapping_a_pixel_twice_changes_nothing(
        whole_pixel in 0u32..20_000,
        pixel_per_unit in prop_oneof![Just(1.0f32), Just(8.0f32), Just(50.0f32)]
    ) {
        let pixel = whole_pixel as f32;
        let mapper = CoordinateMapper::new(midnight(2024, 1, 1), pixel_per_unit, DAY_MS);
        let snapped = mapper.pixel_to_time(pixel);
        let back = mapper.start_to_pixel(snapped);

        prop_assert!(back <= pixel);
        prop_assert!(pixel - back < pixel_per_unit);
        prop_assert_eq!(mapper.pixel_to_time(back), snapped);
    }

    #[test]
    fn dates_survive_the_pixel_round_trip_within_one_unit(
        offset_minutes in 0i64..(365 * 24 * 60 * 8),
        scale in scale_strategy()
    ) {
        let origin = midnight(2024, 1, 1);
        let ppu = ScheduleOptions::default().scale_settings(scale).pixel_per_unit;
        let mapper = CoordinateMapper::new(origin, ppu, DAY_MS);
        let date = origin + Duration::minutes(offset_minutes);
        let unit = Duration::milliseconds(DAY_MS);

        let from_start = mapper.pixel_to_time(mapper.start_to_pixel(date));
        prop_assert!(from_start - date < unit);
        prop_assert!(from_start >= date);

        let from_end = mapper.pixel_to_time(mapper.end_to_pixel(date));
        prop_assert!(from_end <= date);
        prop_assert!(date - from_end < unit);

        let from_exact = mapper.pixel_to_time(mapper.time_to_pixel(date));
        prop_assert!((from_exact - date).abs() < unit);
    }

    #[test]
    fn geometry_is_at_least_one_unit_wide(
        start_minutes in 0i64..200_000,
        span_minutes in -5_000i64..200_000,
        scale in scale_strategy()
    ) {
        let mut schedule = Schedule::with_clock(
            ScheduleOptions::default().with_start_date(midnight(2024, 1, 1)),
            FixedClock(midnight(2024, 1, 1)),
        )
        .expect("valid options");
        let start = midnight(2024, 1, 1) + Duration::minutes(start_minutes);
        let end = start + Duration::minutes(span_minutes);
        let id = schedule.add_row(NewRow::new("row", start, end));
        schedule.set_scale(scale);
        let frame = schedule.render();

        let ppu = frame.layout.pixel_per_unit;
        let geometry = schedule.geometry(id).expect("row");
        prop_assert!(geometry.width >= ppu);
        prop_assert!(geometry.left >= 0.0);
    }

    #[test]
    fn drag_keeps_duration_and_lands_on_unit(
        start_day in 1i64..300,
        span_hours in 1i64..2_000,
        target in 0.0f32..10_000.0,
        scale in scale_strategy()
    ) {
        let today = midnight(2024, 1, 1);
        let mut schedule = Schedule::with_clock(
            ScheduleOptions::default().with_start_date(today),
            FixedClock(today),
        )
        .expect("valid options");
        let start = today + Duration::days(start_day);
        let id = schedule.add_row(NewRow::new("row", start, start + Duration::hours(span_hours)));
        schedule.set_scale(scale);
        schedule.render();

        schedule.drag_to(id, target).expect("drag");
        schedule.finish_gesture(id).expect("commit");

        let row = schedule.row(id).expect("row");
        prop_assert_eq!(row.duration(), Duration::hours(span_hours));
        let mapper = schedule.mapper();
        prop_assert_eq!(mapper.units_ceil(row.start), mapper.units_floor(row.start));
    }

    #[test]
    fn resize_never_inverts_interval(
        left in -500.0f32..5_000.0,
        width in -500.0f32..5_000.0,
        locked in any::<bool>(),
        scale in scale_strategy()
    ) {
        let now = midnight(2024, 3, 1);
        let mut schedule = Schedule::with_clock(
            ScheduleOptions::default().with_start_date(midnight(2024, 1, 1)),
            FixedClock(now),
        )
        .expect("valid options");
        let start = if locked { midnight(2024, 2, 1) } else { midnight(2024, 4, 1) };
        let id = schedule.add_row(NewRow::new("row", start, start + Duration::days(20)));
        schedule.set_scale(scale);
        schedule.render();

        schedule.resize_to(id, left, width).expect("resize");
        let row = schedule.row(id).expect("row");
        prop_assert!(row.end > row.start);
        if locked {
            prop_assert_eq!(row.start, start);
        }
    }

    #[test]
    fn month_buckets_cover_whole_years(year in 1900i32..2200) {
        let buckets = calendar::generate(Scale::Month, midnight(year, 1, 1), 12);
        prop_assert_eq!(calendar::total_days(&buckets), u64::from(calendar::days_in_year(year)));
    }
}
