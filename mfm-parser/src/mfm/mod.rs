//! Main module for mfm library functionality

pub mod error;
pub mod formats;
pub mod lexing;
pub mod naming;
pub mod parsing;
pub mod pipeline;
pub mod range;
pub mod table;
