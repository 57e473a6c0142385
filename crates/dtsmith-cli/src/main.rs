mod cli;
mod commands;
mod util;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            source_file,
            out_file,
            module_name,
            no_warnings,
            json,
            color,
        } => {
            commands::generate::run(commands::generate::GenerateArgs {
                source_file,
                out_file,
                module_name,
                warnings: !no_warnings,
                json,
                color: color.should_colorize(),
            });
        }
        Command::Ast { source_file } => {
            commands::ast::run(commands::ast::AstArgs { source_file });
        }
    }
}
