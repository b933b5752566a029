pub mod config;
pub mod execute;
pub mod validate;
