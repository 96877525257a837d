//! Level metadata shown by the carousel

mod catalog;

pub use catalog::*;
