pub mod marks;
pub mod models;
pub mod views;
