//! Command line surface

pub mod commands;
pub mod vote_input;
