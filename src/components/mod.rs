pub mod flow;
pub mod gyroscope;
pub mod kernel;
pub mod motion;
pub mod rings;
