// Logging
//
// Minimal leveled logging used by the CLI and the Node binding.

mod console_logger;
mod logger;

pub use console_logger::ConsoleLogger;
pub use logger::{LogLevel, Logger, MemoryLogger, NullLogger};
