pub mod graph;
pub mod move_order;
pub mod passes;

pub use graph::{solve_in_memory, Solution};
pub use move_order::{optimal_moves, MoveChoice};
pub use passes::{
    backward_fold, combine_child_scores, expand, link, make_initial_node, resolve, PassStats,
};
