pub mod artifacts;
pub mod counter;
pub mod persistence;
