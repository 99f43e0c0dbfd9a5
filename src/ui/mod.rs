pub mod dialogs;
pub mod row_list;
pub mod schedule_view;
pub mod theme;
pub mod toolbar;
