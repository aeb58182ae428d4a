//! End-to-end test support for Retain
//!
//! - `harness`: an in-memory card store that plays the external persistence role
//! - `mocks`: card and engine fixtures

pub mod harness;

pub use harness::{CardStore, StoredCard};
pub use mocks::TestCardFactory;
