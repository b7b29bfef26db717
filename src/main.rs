use clap::Parser;
use std::process;

use todoman::cli::commands::{Cli, Commands};
use todoman::config::Settings;
use todoman::{cli, logging};

fn main() {
    let cli_args = Cli::parse();
    logging::init();

    let json_output = cli_args.json;
    let settings = match Settings::resolve(cli_args.file, json_output) {
        Ok(settings) => settings,
        Err(e) => {
            cli::report_error(&e, json_output);
            process::exit(1);
        }
    };

    let exit_code = match cli_args.command {
        None | Some(Commands::Menu) => cli::menu::run(&settings),
        Some(Commands::Task(cmd)) => cli::task::run(cmd, &settings),
    };

    process::exit(exit_code);
}
