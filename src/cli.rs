//! Minimal CLI: check input documents against a schema, or print the
//! resolved descriptor.
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::decl::{DeclTy, SchemaDoc, SchemaRegistry};
use crate::fit::FitOptions;
use crate::path_de;
use crate::Typefit;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// fit untyped JSON documents against a declarative type schema
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// fit each input document against the schema root and report per file
    Check(CheckCmd),
    /// print the resolved root descriptor
    Shape(ShapeCmd),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// schema file (JSON: record declarations + root type)
    #[arg(long, short)]
    schema: PathBuf,

    /// maximum input nesting depth before a fit is rejected
    #[arg(long, default_value_t = FitOptions::default().max_depth)]
    max_depth: usize,
}

#[derive(Args, Debug)]
struct CheckCmd {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug)]
struct ShapeCmd {
    #[command(flatten)]
    schema_settings: SchemaSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn load(&self) -> Result<(SchemaRegistry, DeclTy, FitOptions)> {
        let doc: SchemaDoc = path_de::load_json_file(&self.schema)?;
        let root = doc.root.clone();
        let opts = FitOptions {
            max_depth: self.max_depth,
        };
        Ok((SchemaRegistry::from(doc), root, opts))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Check(cmd) => cmd.run(),
            Command::Shape(cmd) => cmd.run(),
        }
    }
}

impl CheckCmd {
    fn run(&self) -> Result<()> {
        let (registry, root, opts) = self.schema_settings.load()?;
        let engine = Typefit::with_options(&registry, opts);
        // Resolve up front so schema bugs fail before any input is touched.
        engine
            .resolve(&root)
            .context("schema does not resolve")?;

        let paths = resolve_file_path_patterns(&self.input)?;
        let mut failures = 0usize;
        for path in &paths {
            let value: serde_json::Value = match path_de::load_json_file(path) {
                Ok(v) => v,
                Err(err) => {
                    failures += 1;
                    println!("{} {}: {err:#}", "✗".red(), path.display());
                    continue;
                }
            };
            match engine.fit(&root, &value) {
                Ok(_) => println!("{} {}", "✓".green(), path.display()),
                Err(err) => {
                    failures += 1;
                    println!("{} {}: {err}", "✗".red(), path.display());
                }
            }
        }

        if failures > 0 {
            bail!("{failures} of {} inputs did not fit", paths.len());
        }
        Ok(())
    }
}

impl ShapeCmd {
    fn run(&self) -> Result<()> {
        let (registry, root, _) = self.schema_settings.load()?;
        let engine = Typefit::new(&registry);
        let shape = engine.resolve(&root).context("schema does not resolve")?;
        println!("{shape:#?}");
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
