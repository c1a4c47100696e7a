use citemap_core::config::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use clap::arg;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("citemap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("citemap")
        .about("Render a bibliometric GraphML graph as an interactive HTML page")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose")
                .required(false)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(clap::ArgAction::Count)
                .conflicts_with("quiet"),
        )
        .arg(
            arg!(-i --"input" <PATH>)
                .required(false)
                .help("GraphML file to read")
                .default_value(DEFAULT_INPUT),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help(format!(
                    "Where to write the page (default: {}, or .json for --format json)",
                    DEFAULT_OUTPUT
                )),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Output format: html page or json payload")
                .value_parser(["html", "json"])
                .default_value("html"),
        )
        .arg(
            arg!(-t --"title" <TITLE>)
                .required(false)
                .help("Title of the emitted page")
                .default_value("Graph"),
        )
        .arg(
            arg!(--"stats")
                .required(false)
                .help("Print graph statistics and exit without writing a page")
                .action(clap::ArgAction::SetTrue),
        )
}
