pub mod checker;
pub mod comparator;
pub mod domain;
pub mod errors;
pub mod interrupt;
pub mod pipeline;
pub mod staging;
pub mod traits;
