//! Backend for futureself - turns free-text dreams into letters, suggestions,
//! and validity checks
//!
//! Each endpoint renders one fixed prompt template and makes a single call to
//! a hosted language model. Nothing is stored between requests.

pub mod ai;
pub mod app;
pub mod dreams;
pub mod error;
pub mod models;
pub mod prompts;
pub mod routes;

pub use error::{Error, Result};
