//! Driver loops. Both are methods on [`Harness`](crate::harness::Harness).

mod batch;
mod stress;
