pub mod appointment;
pub mod concern;
