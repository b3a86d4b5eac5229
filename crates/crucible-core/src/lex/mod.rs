//! Tokenizing of raw argument text.
//!
//! Two layers: [`Slices`] splits the input into whitespace- or
//! quote-delimited [`Slice`]s with escape handling; [`Tokens`] classifies
//! those slices into plain values and short/long option flags.

mod slice;
mod token;

pub use slice::{Slice, Slices};
pub use token::{Token, Tokens};
