pub mod batch;
pub mod chemistry;
pub mod config;
pub mod output;
pub mod roster;
pub mod stderr_buffer;
