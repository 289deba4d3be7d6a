pub mod persona_model;
pub mod store;
pub mod timeout;
