use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_evaluator::{resolve_binding, BindingSpec, CollectionSet, PaginationMode};
use pagecraft_tree::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BindArgs {
    /// Collections JSON file
    pub collections: PathBuf,

    /// Binding spec JSON file
    pub binding: PathBuf,

    /// Page to show when the binding is paginated (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

pub fn bind(args: BindArgs, _cwd: &str) -> Result<()> {
    let collections = CollectionSet::load(&args.collections)
        .with_context(|| format!("Cannot load collections from {}", args.collections.display()))?;

    let source = fs::read_to_string(&args.binding)
        .with_context(|| format!("Cannot read {}", args.binding.display()))?;
    let spec: BindingSpec = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a binding spec", args.binding.display()))?;

    let Some(records) = resolve_binding(&collections, &spec) else {
        eprintln!(
            "{} binding on {} resolves to nothing",
            "⚠".yellow(),
            spec.collection_id.bright_white()
        );
        println!("null");
        return Ok(());
    };

    let pagination = spec.pagination.unwrap_or_default();
    let visible = pagination.page(&records, args.page);

    if pagination.mode != PaginationMode::None {
        eprintln!(
            "{} page {} of {} ({} records)",
            "→".bright_blue(),
            args.page,
            pagination.page_count(records.len()),
            records.len()
        );
    }

    let values: Vec<Value> = visible.iter().map(|record| record.to_value()).collect();
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
