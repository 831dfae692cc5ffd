pub mod cleaner;
pub mod common;
pub mod lister;
pub mod reporter;
pub mod safety;
pub mod scanner;
