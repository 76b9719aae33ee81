//! Expression trees.
//!
//! This module provides:
//! - Expression and operator kinds with their declared attributes
//! - An arena-backed, immutable expression tree and its builder
//! - The error taxonomy shared by validation, operators and the engine

pub mod error;
pub mod kind;
pub mod tree;

pub use error::{ErrorKind, ExpressionError, ExpressionResult};
pub use kind::{
    CustomAttributes, ExpressionKind, MathConstant, MathFunction, Operator, RoundingMode,
    StatsFunction, ToleranceMode,
};
pub use tree::{ExpressionTree, Node, NodeId, NodeKind, TreeBuilder};
