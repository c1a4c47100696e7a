pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CliError, Outcome, RenderOptions, expand_path, format_stats, log_level, run_render,
};
