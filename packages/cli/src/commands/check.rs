use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_evaluator::{is_instance, BindingSpec, Evaluator};
use pagecraft_tree::Tree;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Page JSON file to check
    pub input: PathBuf,

    /// List node counts per block type
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{} duplicate node id(s): {}", .0.len(), .0.join(", "))]
    DuplicateIds(Vec<String>),
}

#[derive(Debug, Default, PartialEq)]
pub struct PageReport {
    pub nodes: usize,
    pub max_depth: usize,
    pub hidden: usize,
    pub instances: usize,
    pub bindings: usize,
    /// Bound nodes whose binding yields nothing
    pub unresolved_bindings: Vec<String>,
    pub by_type: BTreeMap<String, usize>,
    pub duplicate_ids: Vec<String>,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let evaluator = config.evaluator(cwd)?;

    println!("🔍 {} {}", "Checking".green().bold(), args.input.display());

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let tree: Tree = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a page tree", args.input.display()))?;

    let report = inspect(&tree, &evaluator);

    println!("   Nodes:     {}", report.nodes);
    println!("   Depth:     {}", report.max_depth);
    println!("   Hidden:    {}", report.hidden);
    println!("   Instances: {}", report.instances);
    println!("   Bindings:  {}", report.bindings);

    if args.verbose {
        println!();
        for (node_type, count) in &report.by_type {
            println!("   {:<16} {}", node_type.bright_white(), count);
        }
    }

    for id in &report.unresolved_bindings {
        println!("   {} binding on {} resolves to nothing", "⚠".yellow(), id);
    }

    if !report.duplicate_ids.is_empty() {
        return Err(CheckError::DuplicateIds(report.duplicate_ids).into());
    }

    println!();
    println!("✨ {} Page is valid", "Done".green().bold());
    Ok(())
}

/// Collect structural statistics for a page
pub fn inspect(tree: &Tree, evaluator: &Evaluator) -> PageReport {
    let mut report = PageReport {
        duplicate_ids: tree.duplicate_ids(),
        ..PageReport::default()
    };

    tree.walk(|node, depth| {
        report.nodes += 1;
        report.max_depth = report.max_depth.max(depth + 1);
        *report.by_type.entry(node.node_type.clone()).or_default() += 1;

        if node.hidden {
            report.hidden += 1;
        }
        if is_instance(node) {
            report.instances += 1;
        }
        if BindingSpec::from_props(&node.props).is_some() {
            report.bindings += 1;
            if !evaluator.resolve_props(node).1 {
                report.unresolved_bindings.push(node.id.clone());
            }
        }
    });

    report
}
