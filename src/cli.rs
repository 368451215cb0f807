//! Minimal CLI: load the schema export → emit the Nix options module.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::codegen;
use crate::provider::{SchemaFileProvider, SchemaProvider};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate a Nix options module from a repo's JSON Schema export
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// repo checkout holding the schema export (config/schema.json)
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// output .nix file
    #[arg(long, default_value = "nix/generated/config-options.nix")]
    out: PathBuf,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let provider = SchemaFileProvider::for_repo(&self.repo);
        let document = provider.load()?;

        // the whole module is assembled in memory before anything is written
        let module = codegen::generate_module(&document);

        if let Some(parent) = self.out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        std::fs::write(&self.out, &module)
            .with_context(|| format!("failed to write {}", self.out.display()))?;
        Ok(())
    }
}
