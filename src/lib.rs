pub mod builder;
pub mod command;
pub mod error;
pub mod exec;
pub mod io;
pub mod parse;
pub mod render;
pub mod tape;

pub use builder::Builder;
pub use command::{Command, Leaf, Program};
pub use error::{Error, Result};
pub use exec::{EofPolicy, Engine, ExecConfig, execute};
pub use io::{Input, Output};
pub use parse::parse;
pub use render::render;
pub use tape::Tape;
