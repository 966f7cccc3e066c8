//! # EnvShare Infrastructure
//!
//! MySQL-backed implementations of the core repository interfaces, plus
//! connection pool construction.

pub mod database;

pub use database::mysql::{MySqlTokenRepository, MySqlUserRepository};
