//! Realtime change feed adapters

mod hub;

pub use hub::{ChangeHub, FileWatch};
