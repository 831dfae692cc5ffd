pub mod commands;
pub mod modules;

pub use modules::common::config::YuConfig;
pub use modules::common::error::ResidueError;
pub use modules::common::utils;
pub use modules::cleaner;
pub use modules::lister;
pub use modules::reporter;
pub use modules::safety;
pub use modules::scanner;
