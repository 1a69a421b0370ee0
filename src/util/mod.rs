pub mod bits;
pub mod parse;
