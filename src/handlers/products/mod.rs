pub mod admin;
pub mod browse;
