//! Wire formats spoken with the bar.
//!
//! - [`click`]: Scanners for click events arriving on standard input
//! - [`OutputBuffer`]: Header and update lines written to standard output

pub mod click;
mod output;

pub use click::{decode_click, read_param_name, read_param_val, skip_value, Token};
pub use output::OutputBuffer;
