//! tests/api/main.rs
mod faults;
mod helpers;
mod pipeline;
