//! High-level Generator facade.
//!
//! Ties the stages together: parse, resolve, emit. One call per source unit;
//! nothing is shared between calls, so independent callers can run
//! concurrently without coordination.

use dtsmith_core::{Colors, ModuleDecl};

use crate::diagnostics::Diagnostics;
use crate::emit::Emitter;
use crate::{Result, lang, resolve};

/// Generation options.
#[derive(Clone, Debug)]
pub struct Config {
    pub module_name: String,
    pub colors: Colors,
    pub warnings: bool,
}

impl Config {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            colors: Colors::OFF,
            warnings: true,
        }
    }

    pub fn colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    /// Include inline diagnostic comments in the output (on by default).
    pub fn warnings(mut self, warnings: bool) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Everything one run produces.
pub struct Generated {
    /// Declaration-file text.
    pub dts: String,
    /// The resolved declaration tree the text was rendered from.
    pub module: ModuleDecl,
    /// Pass-level notices (ignored statements and the like).
    pub diagnostics: Diagnostics,
}

/// Source text in, declaration text out.
pub struct Generator {
    config: Config,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn generate(&self, source: &str) -> Result<Generated> {
        let tree = lang::parse(source);
        let (module, diagnostics) = resolve::resolve(source, &tree, &self.config.module_name)?;
        let dts = Emitter::new(&module)
            .colors(self.config.colors)
            .warnings(self.config.warnings)
            .emit();
        Ok(Generated {
            dts,
            module,
            diagnostics,
        })
    }
}
