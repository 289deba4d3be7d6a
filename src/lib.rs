//! Persona-driven user-journey tests against a live web application.
//!
//! A run resolves a persona and a journey, opens the target in a headless
//! browser, logs in when the page asks for it, interprets each scripted step
//! and folds the outcomes into a single [`JourneyTestResult`].
//!
//! [`JourneyTestResult`]: journey::result_model::JourneyTestResult

pub mod browser;
pub mod cli;
pub mod documents;
pub mod error;
pub mod journey;
pub mod persona;
pub mod report;

pub use error::{JourneyError, Result};
