pub mod format;
pub mod run;
pub mod shell;
pub mod utils;
