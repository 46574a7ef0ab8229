//! # Editing Pipeline
//!
//! Coordinates the edit → render loop: Mutate → Evaluate
//!
//! The Pipeline manages:
//! - Applying mutations through an [`EditSession`]
//! - Re-evaluating the page for the current breakpoint
//! - Caching the last projection

use crate::document::Document;
use crate::mutations::Mutation;
use crate::session::EditSession;
use pagecraft_evaluator::{Evaluator, ResolvedNode};
use pagecraft_tree::Breakpoint;

/// Manages the full edit → render pipeline
pub struct Pipeline {
    session: EditSession,
    evaluator: Evaluator,
    breakpoint: Breakpoint,
    last_render: Option<Vec<ResolvedNode>>,
}

/// Result of pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// New version number
    pub version: u64,

    /// False when the mutation was a no-op
    pub applied: bool,

    /// Projection of the page after the mutation
    pub nodes: Vec<ResolvedNode>,
}

impl Pipeline {
    pub fn new(session: EditSession, evaluator: Evaluator) -> Self {
        Self {
            session,
            evaluator,
            breakpoint: Breakpoint::Base,
            last_render: None,
        }
    }

    pub fn with_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    /// Apply mutation and re-evaluate
    pub fn apply_mutation(&mut self, mutation: Mutation) -> PipelineResult {
        let result = self.session.apply(mutation);

        // a no-op leaves the tree as it was
        let cached = if result.applied {
            None
        } else {
            self.last_render.clone()
        };
        let nodes = match cached {
            Some(nodes) => nodes,
            None => self.full_evaluate(),
        };

        PipelineResult {
            version: result.version,
            applied: result.applied,
            nodes,
        }
    }

    /// Full re-evaluation (initial render, undo/redo, breakpoint switch)
    pub fn full_evaluate(&mut self) -> Vec<ResolvedNode> {
        let nodes = self
            .evaluator
            .evaluate(self.session.document.tree(), self.breakpoint);
        self.last_render = Some(nodes.clone());
        nodes
    }

    /// Switch breakpoint and re-render
    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) -> Vec<ResolvedNode> {
        self.breakpoint = breakpoint;
        self.full_evaluate()
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Mutable session; call [`Pipeline::full_evaluate`] after editing through it
    pub fn session_mut(&mut self) -> &mut EditSession {
        self.last_render = None;
        &mut self.session
    }

    pub fn document(&self) -> &Document {
        &self.session.document
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Get last projection (if any)
    pub fn last_render(&self) -> Option<&[ResolvedNode]> {
        self.last_render.as_deref()
    }

    /// Clear cache (force full re-render on next mutation)
    pub fn clear_cache(&mut self) {
        self.last_render = None;
    }
}
