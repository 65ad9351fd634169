//! Deterministic exam assembly.
//!
//! A repository of executable question plugins is scanned into an ordered
//! registry; each roster participant gets a reproducible, seeded draw of
//! questions; the draw is substituted into nested document templates; and
//! an external typesetting compiler turns the result into one artifact per
//! document kind (test booklet, answer key, all-questions compilation).

pub mod cli;
pub mod commands;
pub mod domain;
pub mod error;
pub mod services;

pub use domain::models::Config;
pub use error::Error;
pub use services::repository::Repository;
