use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn should_colorize(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

#[derive(Parser)]
#[command(name = "dtsmith", bin_name = "dtsmith")]
#[command(about = "Generate TypeScript declaration files from documented JavaScript")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a declaration file from a JavaScript source file
    #[command(after_help = r#"EXAMPLES:
  dtsmith generate lib/index.js
  dtsmith generate lib/index.js types/index.d.ts
  dtsmith generate lib/index.js --module-name mylib
  dtsmith generate - --json < lib/index.js"#)]
    Generate {
        /// JavaScript source file (use "-" for stdin)
        source_file: PathBuf,

        /// Destination path (standard output if omitted)
        out_file: Option<PathBuf>,

        /// Module name for the declaration block (defaults to the source file stem)
        #[arg(long, value_name = "NAME")]
        module_name: Option<String>,

        /// Suppress inline diagnostic comments
        #[arg(long)]
        no_warnings: bool,

        /// Print the resolved declaration tree as JSON instead of declaration text
        #[arg(long)]
        json: bool,

        /// When to color standard output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Print the syntax tree of a JavaScript source file
    Ast {
        /// JavaScript source file (use "-" for stdin)
        source_file: PathBuf,
    },
}
