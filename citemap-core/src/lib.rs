pub mod citation;
pub mod config;
pub mod error;
pub mod graph;
pub mod load;
pub mod model;
pub mod page;
pub mod template;

use colored::Colorize;

pub use config::RenderConfig;
pub use error::{LoadError, WriteError};
pub use graph::{BibGraph, GraphStats};
pub use load::load_graph;
pub use page::{OutputFormat, PageSummary, emit_page, render_page};

pub fn print_banner() {
    println!(
        "{} {}",
        "citemap".bright_magenta().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!(
        "{}",
        "bibliometric graph -> interactive page".bright_black()
    );
    println!();
}
