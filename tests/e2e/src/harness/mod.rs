//! Test harness


pub use card_store::{CardStore, StoredCard};
