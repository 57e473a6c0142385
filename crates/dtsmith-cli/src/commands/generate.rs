//! Generate a declaration file from one JavaScript source.

use std::fs;
use std::path::PathBuf;

use dtsmith_compiler::generator::{Config, Generator};
use dtsmith_compiler::{Message, Severity};
use dtsmith_core::Colors;

use crate::util::{load_source, module_name_of};

pub struct GenerateArgs {
    pub source_file: PathBuf,
    pub out_file: Option<PathBuf>,
    pub module_name: Option<String>,
    pub warnings: bool,
    pub json: bool,
    pub color: bool,
}

pub fn run(args: GenerateArgs) {
    let source = load_source(&args.source_file);
    let module_name = args
        .module_name
        .clone()
        .unwrap_or_else(|| module_name_of(&args.source_file));

    // Files always get plain text; colors only make sense on a terminal.
    let colors = if args.out_file.is_none() && !args.json {
        Colors::new(args.color)
    } else {
        Colors::OFF
    };

    let config = Config::new(module_name)
        .colors(colors)
        .warnings(args.warnings);

    let generated = match Generator::new(config).generate(&source) {
        Ok(generated) => generated,
        Err(e) => {
            let fatal = Message {
                severity: Severity::Error,
                text: e.to_string(),
            };
            eprintln!("{fatal}");
            std::process::exit(1);
        }
    };

    for message in generated.diagnostics.iter() {
        eprintln!("{message}");
    }

    let output = if args.json {
        let mut json = serde_json::to_string_pretty(&generated.module)
            .expect("declaration tree serializes");
        json.push('\n');
        json
    } else {
        generated.dts
    };

    match &args.out_file {
        Some(path) => {
            if let Err(e) = fs::write(path, output) {
                eprintln!("error: failed to write {}: {e}", path.display());
                std::process::exit(1);
            }
        }
        None => print!("{output}"),
    }
}
