use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use marionette_common::{read_json_object, Diagnostic, DiagnosticLevel};
use marionette_compiler::{build_markup, Compilation, Registry};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Data tree to compile (JSON)
    pub tree: PathBuf,

    /// Component registry manifest (JSON)
    #[arg(short, long)]
    pub registry: PathBuf,

    /// Alias table (JSON, overrides config)
    #[arg(short, long)]
    pub aliases: Option<PathBuf>,

    /// Ambient attribute for the root component; values are parsed as JSON
    /// and fall back to plain strings
    #[arg(long = "ambient", value_name = "KEY=VALUE")]
    pub ambient: Vec<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Write the markup to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Indent unit (overrides config)
    #[arg(long)]
    pub indent: Option<String>,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut options = config.compile_options();
    if let Some(indent) = &args.indent {
        options.indent = indent.clone();
    }

    let tree = read_tree(&resolve(cwd, &args.tree))?;

    let manifest = read_json_object(&resolve(cwd, &args.registry))
        .with_context(|| format!("Failed to read registry {}", args.registry.display()))?;
    let registry = Registry::from_manifest(&Value::Object(manifest))?;

    let aliases = match args
        .aliases
        .as_ref()
        .map(|path| resolve(cwd, path))
        .or_else(|| config.aliases_path(cwd))
    {
        Some(path) => Value::Object(
            read_json_object(&path)
                .with_context(|| format!("Failed to read aliases {}", path.display()))?,
        ),
        None => Value::Object(Map::new()),
    };

    let ambient = args
        .ambient
        .iter()
        .map(|pair| parse_ambient(pair))
        .collect::<Result<Map<String, Value>>>()?;

    let compilation = build_markup(&tree, &registry, &aliases, &ambient, &options);

    match args.format.as_str() {
        "text" => write_text(&compilation, args.out.as_deref().map(|out| resolve(cwd, out)))?,
        "json" => write_json(&compilation, args.out.as_deref().map(|out| resolve(cwd, out)))?,
        other => return Err(anyhow!("Unknown format: {}", other)),
    }

    if compilation.markup.is_empty() {
        return Err(anyhow!("Nothing was compiled"));
    }

    Ok(())
}

fn resolve(cwd: &str, path: &Path) -> PathBuf {
    PathBuf::from(cwd).join(path)
}

fn read_tree(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Parse `key=value`, reading the value as JSON when possible
pub fn parse_ambient(pair: &str) -> Result<(String, Value)> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("Ambient attribute `{}` must look like KEY=VALUE", pair))?;
    if key.is_empty() {
        return Err(anyhow!("Ambient attribute `{}` has an empty key", pair));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn write_text(compilation: &Compilation, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &compilation.markup)?;
            println!("  {} {}", "✓".green(), path.display());
        }
        None => println!("{}", compilation.markup),
    }

    for diagnostic in &compilation.diagnostics {
        print_diagnostic(diagnostic);
    }

    let warnings = compilation.warnings().count();
    if warnings > 0 {
        eprintln!("{} {} warning(s)", "⚠️".yellow(), warnings);
    }

    Ok(())
}

fn write_json(compilation: &Compilation, out: Option<PathBuf>) -> Result<()> {
    let components: Vec<&str> = compilation.registry.names().collect();
    let document = json!({
        "markup": compilation.markup,
        "components": components,
        "diagnostics": compilation.diagnostics,
    });
    let rendered = serde_json::to_string_pretty(&document)?;

    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, rendered)?;
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn print_diagnostic(diagnostic: &Diagnostic) {
    let label = match diagnostic.level {
        DiagnosticLevel::Error => "error:".red().bold(),
        DiagnosticLevel::Warning => "warning:".yellow().bold(),
        DiagnosticLevel::Info => "info:".blue().bold(),
    };
    eprintln!("{} {}", label, diagnostic);
}
