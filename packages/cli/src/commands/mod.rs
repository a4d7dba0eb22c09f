pub mod compile;
pub mod flatten;
pub mod init;

pub use compile::{compile, CompileArgs};
pub use flatten::{flatten, FlattenArgs};
pub use init::{init, InitArgs};
