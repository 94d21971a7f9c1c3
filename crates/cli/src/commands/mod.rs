pub mod parse;
pub mod save;
