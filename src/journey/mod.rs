pub mod aggregator;
pub mod context;
pub mod engine;
pub mod evidence;
pub mod intent;
pub mod interpreter;
pub mod journey_model;
pub mod login;
pub mod result_model;
