pub mod actor;
pub mod classifier;
pub mod common;
pub mod layout_engine;
pub mod model;
pub mod sys;
