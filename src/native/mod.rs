/// Native module contains implementations of core traits
/// talking to the operating system directly: real child processes
/// and real interrupt signals.
pub mod interrupt;
pub mod runner;
