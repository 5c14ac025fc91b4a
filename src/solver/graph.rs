//! In-memory driver for the retrograde passes.
//!
//! Runs the same passes as the streaming pipeline, with `Vec` sorts standing
//! in for the external sort between them. Only practical for small boards.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::engine::score::Score;
use crate::error::{Error, Result};
use crate::game::Game;
use crate::persist_stream::{EdgeRecord, NodeRecord};
use crate::solver::passes::{backward_fold, expand, link, make_initial_node, resolve};

/// Result of a full solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Generation 0, resolved.
    pub root: NodeRecord,
    /// Number of canonical boards in each generation, generation 0 first.
    pub generation_sizes: Vec<usize>,
    /// Every reachable canonical board with its score, sorted by board key.
    pub nodes: Vec<NodeRecord>,
}

impl Solution {
    pub fn total_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Score of a canonical board key, if reachable.
    pub fn score_of(&self, board: u64) -> Option<Score> {
        self.nodes
            .binary_search_by_key(&board, |n| n.board)
            .ok()
            .map(|i| self.nodes[i].score)
    }
}

/// Sort by board key and drop repeats, like `sort -u` over text node lines.
pub fn sort_unique_nodes(nodes: &mut Vec<NodeRecord>) {
    nodes.sort_unstable_by_key(|n| n.board);
    nodes.dedup_by_key(|n| n.board);
}

fn sort_edges(edges: &mut [EdgeRecord]) {
    edges.sort_unstable();
}

fn spinner(progress: bool, template: &str) -> ProgressBar {
    if !progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn bar(progress: bool, len: u64, template: &str) -> ProgressBar {
    if !progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

fn ok_records<T: Copy>(records: &[T]) -> impl Iterator<Item = Result<T>> + '_ {
    records.iter().copied().map(Ok)
}

/// Enumerate every generation forward, then resolve them backward to the root.
pub fn solve_in_memory(game: &Game, progress: bool) -> Result<Solution> {
    let t_start = Instant::now();

    let mut current: Vec<NodeRecord> = Vec::new();
    make_initial_node(game, &mut current)?;

    let en_pb = spinner(progress, "[{elapsed_precise}] enumerate {spinner} {msg}");
    let mut generations: Vec<Vec<NodeRecord>> = Vec::new();
    loop {
        let mut next: Vec<NodeRecord> = Vec::new();
        expand(game, ok_records(&current), &mut next)?;
        sort_unique_nodes(&mut next);
        debug!("[graph] generation {}: {} nodes", generations.len(), current.len());
        en_pb.set_message(format!("generation {} ({} nodes)", generations.len(), current.len()));
        generations.push(current);
        if next.is_empty() {
            break;
        }
        current = next;
    }
    en_pb.finish_and_clear();

    let generation_sizes: Vec<usize> = generations.iter().map(Vec::len).collect();
    let total: usize = generation_sizes.iter().sum();
    info!(
        "[graph] enumeration done: generations={} states={} elapsed_ms={}",
        generations.len(),
        total,
        t_start.elapsed().as_millis()
    );

    // The deepest generation has no indeterminate boards left.
    let mut resolved: Vec<Vec<NodeRecord>> = vec![Vec::new(); generations.len()];
    let deepest = generations.len() - 1;
    resolved[deepest] = generations[deepest].clone();

    let retro_pb = bar(
        progress,
        u64::try_from(deepest).unwrap_or(u64::MAX),
        "[{elapsed_precise}] retro {bar:40.cyan/blue} {pos}/{len}",
    );
    for n in (0..deepest).rev() {
        let mut edges: Vec<EdgeRecord> = Vec::new();
        link(game, ok_records(&generations[n]), &mut edges)?;
        sort_edges(&mut edges);

        let mut child_scores: Vec<NodeRecord> = Vec::new();
        backward_fold(ok_records(&edges), ok_records(&resolved[n + 1]), &mut child_scores)?;
        child_scores.sort_unstable_by_key(|c| c.board);

        let mut out: Vec<NodeRecord> = Vec::with_capacity(generations[n].len());
        resolve(game, ok_records(&generations[n]), ok_records(&child_scores), &mut out)?;
        debug!("[graph] resolved generation {}: {} nodes from {} edges", n, out.len(), edges.len());
        resolved[n] = out;
        retro_pb.inc(1);
    }
    retro_pb.finish_and_clear();

    let root = resolved[0]
        .first()
        .copied()
        .ok_or(Error::NotFound { board: 0 })?;
    info!(
        "[graph] root {} after {} generations, elapsed_ms={}",
        root.score,
        generations.len(),
        t_start.elapsed().as_millis()
    );

    let mut nodes: Vec<NodeRecord> = resolved.into_iter().flatten().collect();
    nodes.sort_unstable_by_key(|n| n.board);

    Ok(Solution {
        root,
        generation_sizes,
        nodes,
    })
}
