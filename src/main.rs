use clap::Parser;
use std::process;

use taskup::cli;
use taskup::cli::commands::{Cli, Commands};

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;
    let org_flag = cli_args.org.clone();

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::Org(cmd) => cli::org::run(cmd, json_output, org_flag.as_deref()),
        Commands::User(cmd) => cli::user::run(cmd, json_output, org_flag.as_deref()),
        Commands::Task(cmd) => cli::task::run(cmd, json_output, org_flag.as_deref()),
        Commands::Goal(cmd) => cli::goal::run(cmd, json_output, org_flag.as_deref()),
        Commands::Points(cmd) => cli::points::run(cmd, json_output, org_flag.as_deref()),
        Commands::Status => cli::status::run(json_output, org_flag.as_deref()),
    };

    process::exit(exit_code);
}
