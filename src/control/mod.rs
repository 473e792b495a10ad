pub mod console;
pub mod generator;

pub use console::parse_command;
pub use console::read_commands;
pub use console::Command;
pub use console::CommandError;
pub use console::Console;
pub use console::Reply;
pub use generator::RequestGenerator;
