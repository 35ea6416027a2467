pub mod engine;
pub mod frontier;
pub mod memo;
