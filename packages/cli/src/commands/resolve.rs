use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use pagecraft_editor::Document;
use pagecraft_evaluator::resolve_styles;
use pagecraft_tree::{Breakpoint, InteractionState};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Page JSON file
    pub input: PathBuf,

    /// Breakpoint to resolve for (base, tablet, mobile); config default if omitted
    #[arg(short, long)]
    pub breakpoint: Option<Breakpoint>,

    /// Only print the effective styles of this node
    #[arg(short, long)]
    pub node: Option<String>,

    /// Interaction state merged over the node's styles (hover, press, focus)
    #[arg(short, long, requires = "node")]
    pub state: Option<InteractionState>,
}

pub fn resolve(args: ResolveArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let breakpoint = args.breakpoint.unwrap_or(config.default_breakpoint);

    let document = Document::load(&args.input)?.with_history_capacity(config.history_capacity);

    let output = match &args.node {
        Some(node_id) => {
            let node = document
                .find(node_id)
                .ok_or_else(|| anyhow!("Node not found: {}", node_id))?;
            info!(node_id = %node_id, %breakpoint, state = ?args.state, "Resolving node styles");
            serde_json::to_string_pretty(&resolve_styles(node, breakpoint, args.state))?
        }
        None => {
            let evaluator = config.evaluator(cwd)?;
            serde_json::to_string_pretty(&evaluator.evaluate(document.tree(), breakpoint))?
        }
    };

    println!("{}", output);
    Ok(())
}
