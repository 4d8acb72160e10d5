pub mod api;
pub mod core;
pub mod form;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod roster;
pub mod stores;
pub mod utils;
pub mod validation;
