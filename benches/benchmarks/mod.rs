pub mod generators;

pub mod generate;
pub mod text;
