//! different utility modules used throughout the project
/// tiny module to configure and start logging
pub mod logger;
