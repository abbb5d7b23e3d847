pub mod progress;
pub mod output;
pub mod prompt;
pub mod signals;

pub use progress::ProgressManager;
pub use output::{OutputFormatter, OutputMode};
pub use prompt::{terminal_prompt, Prompt};
pub use signals::GracefulShutdown;
