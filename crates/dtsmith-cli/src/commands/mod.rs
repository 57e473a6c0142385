pub mod ast;
pub mod generate;
