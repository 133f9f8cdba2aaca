pub mod config;
pub mod engine;
pub mod surface;
pub mod sync;
pub mod time;
pub mod track;
