//! Core domain models
//!
//! This module defines the step sequence, the steps it holds, the
//! accumulator threaded through a run and the outcome a run ends with.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod outcome;
pub mod sequence;
pub mod step;

pub use accumulator::*;
pub use error::*;
pub use outcome::*;
pub use sequence::*;
pub use step::*;
