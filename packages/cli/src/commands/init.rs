use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_tree::{json, Breakpoint, Node, Tree};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Default breakpoint (base, tablet, mobile)
    #[arg(short, long, default_value = "base")]
    pub breakpoint: Breakpoint,

    /// Also write an example page
    #[arg(short, long)]
    pub example: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Pagecraft project...".bright_blue().bold()
    );

    let config = Config {
        default_breakpoint: args.breakpoint,
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    if args.example {
        let page_path = PathBuf::from(cwd).join("page.json");
        if !page_path.exists() {
            fs::write(&page_path, serde_json::to_string_pretty(&example_page())?)?;
            println!("  {} Created page.json", "✓".green());
        }
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagecraft check page.json");
    println!("  2. Run: pagecraft resolve page.json --breakpoint mobile");

    Ok(())
}

fn example_page() -> Tree {
    let hero_styles = serde_json::from_value(json!({
        "base": { "padding": 64, "fontSize": 48 },
        "mobile": { "padding": 24, "fontSize": 28 },
        "hover": { "color": "#3366FF" }
    }))
    .unwrap_or_default();

    Tree::from_nodes(vec![
        Node::new("hero", "hero")
            .with_props(json!({ "title": "Welcome", "subtitle": "Built with Pagecraft" }))
            .with_styles(hero_styles),
        Node::new("features", "features").with_props(json!({
            "items": [
                { "title": "Fast", "text": "Structural edits with instant undo" },
                { "title": "Responsive", "text": "Per-breakpoint styles" }
            ]
        })),
    ])
}
