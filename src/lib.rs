pub mod config;
pub mod field;
pub mod motor;
pub mod station;
