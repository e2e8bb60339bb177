pub mod error;
pub mod shell;

pub mod core;
pub mod highlight;
pub mod inference;
pub mod input;
pub mod process;
