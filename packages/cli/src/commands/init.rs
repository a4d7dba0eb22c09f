use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Marionette project...".bright_blue().bold());

    let config = Config {
        aliases: Some("aliases.json".to_string()),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let examples = [
        (
            "registry.json",
            json!({
                "Page": true,
                "Text": null,
                "Button": { "defaultAttributes": { "kind": "primary" } }
            }),
        ),
        (
            "tree.json",
            json!({
                "_": "Page",
                "heading": "Welcome",
                "$": [
                    { "_": "Text", "value": "Hello from data" },
                    { "_": "Button", "label": "Continue" }
                ]
            }),
        ),
        ("aliases.json", json!({ "heading": "title" })),
    ];

    for (name, content) in examples {
        let path = PathBuf::from(cwd).join(name);
        if path.exists() && !args.force {
            println!("  {} Kept existing {}", "•".dimmed(), name);
            continue;
        }
        fs::write(&path, serde_json::to_string_pretty(&content)?)?;
        println!("  {} Created {}", "✓".green(), name);
    }

    println!();
    println!(
        "Run {} to compile the example",
        "marionette compile tree.json --registry registry.json".bright_white()
    );

    Ok(())
}
