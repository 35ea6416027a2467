pub mod rate_generator;
pub mod scenarios;
