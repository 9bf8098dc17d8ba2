pub mod comparison;
pub mod reporter;
pub mod runner;
