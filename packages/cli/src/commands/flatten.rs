use anyhow::{Context, Result};
use clap::Args;
use marionette_common::read_json_object;
use marionette_compiler::{flatten as flatten_tree, unflatten};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FlattenArgs {
    /// JSON object to convert
    pub input: PathBuf,

    /// Treat the input as a flat map and rebuild the nested object
    #[arg(short, long)]
    pub unflatten: bool,
}

pub fn flatten(args: FlattenArgs, cwd: &str) -> Result<()> {
    let path = PathBuf::from(cwd).join(&args.input);
    let input = read_json_object(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let output = if args.unflatten {
        unflatten(&input)?
    } else {
        flatten_tree(&input)?
    };

    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);
    Ok(())
}
