pub mod api;
pub mod student;
