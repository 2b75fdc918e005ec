//the entry point for model
pub mod markers;
pub mod source;
pub mod state;
