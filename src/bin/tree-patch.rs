use clap::Parser;

use tree_patch::app;
use tree_patch::cancel;
use tree_patch::cli::Cli;
use tree_patch::features::Features;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_target(false)
        .format_timestamp(None)
        .init();

    // Feature flags from the environment, then CLI overrides
    let features = Features::from_env().with_overrides(cli.features.as_deref());
    cancel::register_handler();

    match app::run(&cli, &features) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}
