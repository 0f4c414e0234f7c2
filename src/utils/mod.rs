pub mod display;
pub mod leave_type_cache;
pub mod time;
