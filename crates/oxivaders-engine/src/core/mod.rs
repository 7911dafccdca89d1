//! Core value types shared by the simulation and the genetic algorithm.
//!
//! - [`Action`] - The four-symbol action alphabet
//! - [`Genome`] - A validated, non-empty action sequence

pub use self::{action::*, genome::*};

mod action;
mod genome;
