pub mod config;
pub mod observation;
pub mod profile;
pub mod report;
