//! The four streaming passes of one backward-induction step.
//!
//! Every pass reads its inputs front to back exactly once and writes into a
//! [`RecordSink`]. Inputs that are merge-joined (Pass C and Pass D) must be
//! sorted ascending by board key; a key that goes backwards aborts the pass.
//!
//! | pass | input (sorted by)                        | output                     |
//! |------|------------------------------------------|----------------------------|
//! | A    | nodes of gen n                           | nodes of gen n+1 (unsorted, repeats) |
//! | B    | nodes of gen n                           | edges (destination, source) |
//! | C    | edges (destination), nodes of gen n+1 (board) | child scores keyed by source |
//! | D    | nodes of gen n (board), child scores (source) | resolved nodes of gen n |

use log::info;

use crate::board::Board;
use crate::engine::score::Score;
use crate::error::{Error, Result};
use crate::game::Game;
use crate::persist_stream::{EdgeRecord, NodeRecord, RecordSink};
use crate::types::{Outcome, Player};

/// Records consumed and produced by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub read: u64,
    pub written: u64,
}

/// Generation 0: the empty board with its trivial score.
pub fn make_initial_node<S: RecordSink<NodeRecord>>(game: &Game, mut sink: S) -> Result<PassStats> {
    let (board, key) = game.canonical(&game.empty_board())?;
    sink.push(NodeRecord {
        board: key,
        score: game.trivial_score(&board)?,
    })?;
    sink.finish()?;
    Ok(PassStats { read: 0, written: 1 })
}

/// Calls `visit(parent, successor_key, successor_board)` for every distinct
/// canonical successor of every indeterminate node.
fn for_each_successor<I, F>(game: &Game, nodes: I, mut visit: F) -> Result<u64>
where
    I: IntoIterator<Item = Result<NodeRecord>>,
    F: FnMut(u64, u64, &Board) -> Result<()>,
{
    let mut read = 0u64;
    for record in nodes {
        let record = record?;
        read += 1;
        if record.score.outcome().is_resolved() {
            continue;
        }
        let board = game.decode(record.board)?;
        for (key, successor) in game.unique_successors(&board)? {
            visit(record.board, key, &successor)?;
        }
    }
    Ok(read)
}

/// Pass A: expand every indeterminate node into its canonical successors,
/// each scored by its trivial outcome. Output needs sort + unique.
pub fn expand<I, S>(game: &Game, nodes: I, mut sink: S) -> Result<PassStats>
where
    I: IntoIterator<Item = Result<NodeRecord>>,
    S: RecordSink<NodeRecord>,
{
    let mut written = 0u64;
    let read = for_each_successor(game, nodes, |_, key, successor| {
        written += 1;
        sink.push(NodeRecord {
            board: key,
            score: game.trivial_score(successor)?,
        })
    })?;
    sink.finish()?;
    info!("[expand] nodes read={} successors written={}", read, written);
    Ok(PassStats { read, written })
}

/// Pass B: one (destination, source) edge per distinct canonical successor.
pub fn link<I, S>(game: &Game, nodes: I, mut sink: S) -> Result<PassStats>
where
    I: IntoIterator<Item = Result<NodeRecord>>,
    S: RecordSink<EdgeRecord>,
{
    let mut written = 0u64;
    let read = for_each_successor(game, nodes, |source, destination, _| {
        written += 1;
        sink.push(EdgeRecord { destination, source })
    })?;
    sink.finish()?;
    info!("[link] nodes read={} edges written={}", read, written);
    Ok(PassStats { read, written })
}

/// One-record lookahead over a stream that must be sorted by `key`.
struct SortedCursor<I, T> {
    inner: I,
    head: Option<T>,
    last_key: Option<u64>,
    stream: &'static str,
    key: fn(&T) -> u64,
    read: u64,
}

impl<I, T> SortedCursor<I, T>
where
    I: Iterator<Item = Result<T>>,
{
    fn new(inner: I, stream: &'static str, key: fn(&T) -> u64) -> Result<Self> {
        let mut cursor = Self {
            inner,
            head: None,
            last_key: None,
            stream,
            key,
            read: 0,
        };
        cursor.fill()?;
        Ok(cursor)
    }

    fn fill(&mut self) -> Result<()> {
        self.head = match self.inner.next() {
            None => None,
            Some(record) => {
                let record = record?;
                let current = (self.key)(&record);
                if let Some(previous) = self.last_key {
                    if current < previous {
                        return Err(Error::UnsortedStream {
                            stream: self.stream,
                            previous,
                            current,
                        });
                    }
                }
                self.last_key = Some(current);
                self.read += 1;
                Some(record)
            }
        };
        Ok(())
    }

    #[inline]
    fn peek_key(&self) -> Option<u64> {
        self.head.as_ref().map(self.key)
    }

    #[inline]
    fn peek(&self) -> Option<&T> {
        self.head.as_ref()
    }

    fn advance(&mut self) -> Result<Option<T>> {
        let taken = self.head.take();
        if taken.is_some() {
            self.fill()?;
        }
        Ok(taken)
    }
}

/// Pass C: attach each destination's score to the edge's source.
///
/// `edges` must be sorted by destination and `scores` by board. Both streams
/// must cover the same boards: an edge whose destination has no score record
/// fails with `UnresolvedDestination`, a score record no edge points at fails
/// with `UnreferencedScore`.
pub fn backward_fold<E, N, S>(edges: E, scores: N, mut sink: S) -> Result<PassStats>
where
    E: IntoIterator<Item = Result<EdgeRecord>>,
    N: IntoIterator<Item = Result<NodeRecord>>,
    S: RecordSink<NodeRecord>,
{
    let mut edges = SortedCursor::new(edges.into_iter(), "edges", |e: &EdgeRecord| e.destination)?;
    let mut scores = SortedCursor::new(scores.into_iter(), "scores", |n: &NodeRecord| n.board)?;
    let mut written = 0u64;

    let mut joined: Option<u64> = None;
    while let Some(edge) = edges.advance()? {
        if joined != Some(edge.destination) {
            // Moving to a new destination: the score head must be that board.
            if joined.is_some() {
                scores.advance()?;
            }
            if let Some(k) = scores.peek_key().filter(|&k| k < edge.destination) {
                return Err(Error::UnreferencedScore { board: k });
            }
            joined = Some(edge.destination);
        }
        let score = match scores.peek() {
            Some(node) if node.board == edge.destination => node.score,
            _ => {
                return Err(Error::UnresolvedDestination {
                    destination: edge.destination,
                })
            }
        };
        sink.push(NodeRecord {
            board: edge.source,
            score,
        })?;
        written += 1;
    }
    if joined.is_some() {
        scores.advance()?;
    }
    if let Some(k) = scores.peek_key() {
        return Err(Error::UnreferencedScore { board: k });
    }
    sink.finish()?;

    let read = edges.read + scores.read;
    info!("[backward-fold] edges read={} scores read={} written={}", edges.read, scores.read, written);
    Ok(PassStats { read, written })
}

/// Running summary of one node's child scores.
#[derive(Debug, Clone, Copy)]
struct ChildSummary {
    board: u64,
    mover: Player,
    best_win: Option<u8>,
    draw: Option<u8>,
    worst_loss: Option<u8>,
}

impl ChildSummary {
    fn new(board: u64, mover: Player) -> Self {
        Self {
            board,
            mover,
            best_win: None,
            draw: None,
            worst_loss: None,
        }
    }

    fn add(&mut self, child: Score) -> Result<()> {
        let ply = child.ply();
        match child.outcome() {
            Outcome::Indeterminate => {
                return Err(Error::UnexpectedIndeterminate { board: self.board });
            }
            Outcome::Draw => match self.draw {
                None => self.draw = Some(ply),
                Some(first) if first != ply => {
                    return Err(Error::InconsistentDrawPly {
                        board: self.board,
                        first,
                        second: ply,
                    });
                }
                Some(_) => {}
            },
            o if o.is_win_for(self.mover) => {
                self.best_win = Some(self.best_win.map_or(ply, |w| w.min(ply)));
            }
            _ => {
                self.worst_loss = Some(self.worst_loss.map_or(ply, |l| l.max(ply)));
            }
        }
        Ok(())
    }

    fn finish(&self) -> Result<Score> {
        let child = if let Some(w) = self.best_win {
            Score::new(Outcome::win_for(self.mover), w)
        } else if let Some(d) = self.draw {
            Score::new(Outcome::Draw, d)
        } else if let Some(l) = self.worst_loss {
            Score::new(Outcome::win_for(self.mover.other()), l)
        } else {
            return Err(Error::MissingChildScores { board: self.board });
        };
        child.one_ply_earlier()
    }
}

/// Score of node `board`, with `mover` to play, from the scores of its children.
///
/// The mover takes the fastest win if there is one, otherwise the draw,
/// otherwise the slowest loss. Draw children must agree on the ply whatever
/// the other children are.
pub fn combine_child_scores<I>(board: u64, mover: Player, children: I) -> Result<Score>
where
    I: IntoIterator<Item = Score>,
{
    let mut summary = ChildSummary::new(board, mover);
    for child in children {
        summary.add(child)?;
    }
    summary.finish()
}

/// Pass D: resolve every indeterminate node from its child scores.
///
/// `nodes` must be sorted by board and `child_scores` (Pass C output) by
/// source board. Resolved nodes pass through unchanged.
pub fn resolve<N, C, S>(game: &Game, nodes: N, child_scores: C, mut sink: S) -> Result<PassStats>
where
    N: IntoIterator<Item = Result<NodeRecord>>,
    C: IntoIterator<Item = Result<NodeRecord>>,
    S: RecordSink<NodeRecord>,
{
    let mut nodes = SortedCursor::new(nodes.into_iter(), "nodes", |n: &NodeRecord| n.board)?;
    let mut children = SortedCursor::new(child_scores.into_iter(), "child scores", |n: &NodeRecord| n.board)?;
    let mut written = 0u64;

    while let Some(node) = nodes.advance()? {
        if let Some(k) = children.peek_key().filter(|&k| k < node.board) {
            return Err(Error::OrphanChildScore { board: k });
        }

        let score = if node.score.outcome().is_resolved() {
            while children.peek_key() == Some(node.board) {
                children.advance()?;
            }
            node.score
        } else {
            let mover = game.decode(node.board)?.mover()?;
            let mut summary = ChildSummary::new(node.board, mover);
            while children.peek_key() == Some(node.board) {
                if let Some(child) = children.advance()? {
                    summary.add(child.score)?;
                }
            }
            summary.finish()?
        };

        sink.push(NodeRecord {
            board: node.board,
            score,
        })?;
        written += 1;
    }
    if let Some(k) = children.peek_key() {
        return Err(Error::OrphanChildScore { board: k });
    }
    sink.finish()?;

    let read = nodes.read + children.read;
    info!("[resolve] nodes read={} child scores read={} written={}", nodes.read, children.read, written);
    Ok(PassStats { read, written })
}
