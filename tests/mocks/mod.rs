//! Test doubles shared by integration tests

pub mod mock_source;

#[allow(unused_imports)]
pub use mock_source::{mp4, MockSource};
