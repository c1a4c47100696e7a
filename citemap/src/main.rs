use citemap::commands::command_argument_builder;
use citemap::handlers::{
    RenderOptions, init_logging, print_error, print_outcome, run_render, usage_exit_code,
};
use citemap_core::print_banner;

fn main() {
    let matches = match command_argument_builder().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let _ = e.print();
            std::process::exit(usage_exit_code(&e));
        }
    };
    let quiet = matches.get_flag("quiet");

    init_logging(quiet, matches.get_count("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let options = RenderOptions::from_matches(&matches);
    match run_render(&options) {
        Ok(outcome) => {
            if !quiet || options.stats_only {
                print_outcome(&outcome);
            }
        }
        Err(e) => {
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    }
}
