//! Expression engine.
//!
//! The engine evaluates an [`ExpressionTree`] bottom-up: every child is
//! evaluated before its parent, left to right, and the results of an
//! operator's children become its [`Operands`] in child order. Traversal
//! uses an explicit work stack, so tree depth is bounded by
//! [`EngineConfig::max_depth`] rather than by the call stack.

pub mod config;

pub use config::EngineConfig;

use crate::expression::{
    ExpressionError, ExpressionKind, ExpressionResult, ExpressionTree, Node, NodeId, NodeKind,
};
use crate::operator::{Arity, CustomOperatorResolver, OperatorProcessor, Operands};
use crate::value::Value;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::Arc;

enum Frame {
    /// Schedule the node's children, or evaluate it if it is a leaf
    Enter(NodeId),
    /// All children evaluated; apply the operator
    Exit(NodeId),
}

/// Evaluates expression trees
#[derive(Clone, Default)]
pub struct ExpressionEngine {
    config: EngineConfig,
    resolver: Option<Arc<dyn CustomOperatorResolver>>,
}

impl ExpressionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve `customOperator` implementations through `resolver`
    pub fn with_registry(mut self, resolver: Arc<dyn CustomOperatorResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate `tree` from its root
    ///
    /// Returns `Ok(None)` when the expression evaluates to NULL.
    pub fn process(&self, tree: &ExpressionTree) -> ExpressionResult<Option<Value>> {
        let root = tree.root_node();
        if let NodeKind::Component(name) = root.kind() {
            return Err(ExpressionError::NotAnExpression {
                component: name.clone(),
            });
        }
        self.check_limits(tree)?;
        debug!(
            "Evaluating '{}' expression ({} nodes)",
            root.kind().name(),
            tree.len()
        );

        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut work = vec![Frame::Enter(tree.root())];
        let mut results: Vec<Option<Value>> = Vec::new();

        while let Some(frame) = work.pop() {
            match frame {
                Frame::Enter(id) => {
                    let node = node(tree, id)?;
                    match expression(node)? {
                        ExpressionKind::Operator(_) => {
                            work.push(Frame::Exit(id));
                            work.extend(node.children().iter().rev().map(|c| Frame::Enter(*c)));
                        }
                        leaf => {
                            if !node.children().is_empty() {
                                return Err(ExpressionError::Arity {
                                    operator: leaf.name(),
                                    expected: Arity::exactly(0),
                                    actual: node.children().len(),
                                });
                            }
                            let result = evaluate_leaf(leaf, &mut rng)?;
                            trace!("{} -> {:?}", leaf.name(), result);
                            results.push(result);
                        }
                    }
                }
                Frame::Exit(id) => {
                    let node = node(tree, id)?;
                    let ExpressionKind::Operator(operator) = expression(node)? else {
                        continue;
                    };
                    let split = results
                        .len()
                        .checked_sub(node.children().len())
                        .ok_or_else(|| ExpressionError::InvalidTree {
                            message: format!("missing operands for node {}", id.index()),
                        })?;
                    let operands = Operands::from(results.split_off(split));

                    let mut processor = OperatorProcessor::new(operator, operands)?.with_rng(&mut rng);
                    if let Some(resolver) = self.resolver.as_deref() {
                        processor = processor.with_resolver(resolver);
                    }
                    let result = processor.process()?;
                    trace!("{} -> {:?}", operator.name(), result);
                    results.push(result);
                }
            }
        }

        results.pop().ok_or_else(|| ExpressionError::InvalidTree {
            message: "evaluation produced no result".to_string(),
        })
    }

    fn check_limits(&self, tree: &ExpressionTree) -> ExpressionResult<()> {
        let (visits, depth) = tree.measure(self.config.max_nodes);
        if visits > self.config.max_nodes {
            return Err(ExpressionError::LimitExceeded {
                limit: "node count",
                max: self.config.max_nodes,
            });
        }
        if depth > self.config.max_depth {
            return Err(ExpressionError::LimitExceeded {
                limit: "depth",
                max: self.config.max_depth,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ExpressionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionEngine")
            .field("config", &self.config)
            .field("custom_operators", &self.resolver.is_some())
            .finish()
    }
}

fn node(tree: &ExpressionTree, id: NodeId) -> ExpressionResult<&Node> {
    tree.node(id).ok_or_else(|| ExpressionError::InvalidTree {
        message: format!("unknown node {}", id.index()),
    })
}

fn expression(node: &Node) -> ExpressionResult<&ExpressionKind> {
    match node.kind() {
        NodeKind::Expression(kind) => Ok(kind),
        NodeKind::Component(name) => Err(ExpressionError::NotAnExpression {
            component: name.clone(),
        }),
    }
}

fn evaluate_leaf(kind: &ExpressionKind, rng: &mut StdRng) -> ExpressionResult<Option<Value>> {
    match kind {
        ExpressionKind::BaseValue(value) => Ok(Some(value.clone())),
        ExpressionKind::Null => Ok(None),
        ExpressionKind::MathConstant(constant) => Ok(Some(Value::float(constant.value()))),
        ExpressionKind::RandomInteger { min, max, step } => {
            random_integer(*min, *max, *step, rng).map(Some)
        }
        ExpressionKind::RandomFloat { min, max } => random_float(*min, *max, rng).map(Some),
        ExpressionKind::Operator(op) => Err(ExpressionError::InvalidTree {
            message: format!("'{}' is not a leaf expression", op.name()),
        }),
    }
}

/// Pick `min + k * step` for a random `k`, staying within `max`
fn random_integer(min: i32, max: i32, step: i32, rng: &mut StdRng) -> ExpressionResult<Value> {
    if step < 1 {
        return Err(ExpressionError::InvalidAttribute {
            operator: "randomInteger",
            message: format!("step must be at least 1, {} given", step),
        });
    }
    if max < min {
        return Err(ExpressionError::InvalidAttribute {
            operator: "randomInteger",
            message: format!("max {} is below min {}", max, min),
        });
    }
    let steps = (i64::from(max) - i64::from(min)) / i64::from(step);
    let k = rng.gen_range(0..=steps);
    let value = i64::from(min) + k * i64::from(step);
    i32::try_from(value)
        .map(Value::integer)
        .map_err(|_| ExpressionError::Evaluation {
            operator: "randomInteger",
            message: format!("{} does not fit an integer", value),
        })
}

fn random_float(min: f64, max: f64, rng: &mut StdRng) -> ExpressionResult<Value> {
    if !min.is_finite() || !max.is_finite() || max < min {
        return Err(ExpressionError::InvalidAttribute {
            operator: "randomFloat",
            message: format!("invalid range [{}, {}]", min, max),
        });
    }
    if min == max {
        return Ok(Value::float(min));
    }
    Ok(Value::float(rng.gen_range(min..=max)))
}

/// Evaluate `tree` with a default engine
pub fn evaluate(tree: &ExpressionTree) -> ExpressionResult<Option<Value>> {
    ExpressionEngine::default().process(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{ErrorKind, MathConstant, Operator};
    use crate::value::Scalar;
    use anyhow::Result;

    #[test]
    fn test_constant() -> Result<()> {
        let tree = ExpressionTree::constant(Value::integer(3));
        assert_eq!(evaluate(&tree)?, Some(Value::integer(3)));
        Ok(())
    }

    #[test]
    fn test_nested_operators() -> Result<()> {
        // (1 + 2) > 2.5
        let mut builder = ExpressionTree::builder();
        let one = builder.value(Value::integer(1));
        let two = builder.value(Value::integer(2));
        let sum = builder.operator(Operator::Sum, [one, two])?;
        let bound = builder.value(Value::float(2.5));
        let gt = builder.operator(Operator::Gt, [sum, bound])?;
        let tree = builder.build(gt)?;

        assert_eq!(evaluate(&tree)?, Some(Value::boolean(true)));
        Ok(())
    }

    #[test]
    fn test_operand_order_follows_children() -> Result<()> {
        let mut builder = ExpressionTree::builder();
        let a = builder.value(Value::integer(10));
        let b = builder.value(Value::integer(4));
        let sub = builder.operator(Operator::Subtract, [a, b])?;
        let tree = builder.build(sub)?;
        assert_eq!(evaluate(&tree)?, Some(Value::integer(6)));
        Ok(())
    }

    #[test]
    fn test_shared_child() -> Result<()> {
        let mut builder = ExpressionTree::builder();
        let a = builder.value(Value::integer(7));
        let product = builder.operator(Operator::Product, [a, a])?;
        let tree = builder.build(product)?;
        assert_eq!(evaluate(&tree)?, Some(Value::integer(49)));
        Ok(())
    }

    #[test]
    fn test_component_root_is_rejected() -> Result<()> {
        let mut builder = ExpressionTree::builder();
        let root = builder.component("responseDeclaration");
        let tree = builder.build(root)?;
        let err = evaluate(&tree).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        Ok(())
    }

    #[test]
    fn test_leaf_with_children_is_rejected() -> Result<()> {
        let mut builder = ExpressionTree::builder();
        let a = builder.value(Value::integer(1));
        let leaf = builder.add(ExpressionKind::Null, [a])?;
        let tree = builder.build(leaf)?;
        assert_eq!(evaluate(&tree).unwrap_err().kind(), ErrorKind::Arity);
        Ok(())
    }

    #[test]
    fn test_math_constant() -> Result<()> {
        let mut builder = ExpressionTree::builder();
        let pi = builder.add(ExpressionKind::MathConstant(MathConstant::Pi), [])?;
        let tree = builder.build(pi)?;
        assert_eq!(evaluate(&tree)?, Some(Value::float(std::f64::consts::PI)));
        Ok(())
    }

    #[test]
    fn test_random_integer_respects_step() -> Result<()> {
        let mut builder = ExpressionTree::builder();
        let random = builder.add(
            ExpressionKind::RandomInteger {
                min: 2,
                max: 11,
                step: 3,
            },
            [],
        )?;
        let tree = builder.build(random)?;
        for seed in 0..20 {
            let engine = ExpressionEngine::new().with_config(EngineConfig::default().with_random_seed(seed));
            let value = engine.process(&tree)?;
            assert!(matches!(
                value,
                Some(Value::Single(Scalar::Integer(2 | 5 | 8 | 11)))
            ));
        }
        Ok(())
    }

    #[test]
    fn test_seed_is_deterministic() -> Result<()> {
        let mut builder = ExpressionTree::builder();
        let random = builder.add(ExpressionKind::RandomFloat { min: 0.0, max: 1.0 }, [])?;
        let tree = builder.build(random)?;
        let engine = ExpressionEngine::new().with_config(EngineConfig::default().with_random_seed(9));
        assert_eq!(engine.process(&tree)?, engine.process(&tree)?);
        Ok(())
    }

    #[test]
    fn test_invalid_random_range() -> Result<()> {
        let mut builder = ExpressionTree::builder();
        let random = builder.add(
            ExpressionKind::RandomInteger {
                min: 5,
                max: 1,
                step: 1,
            },
            [],
        )?;
        let tree = builder.build(random)?;
        assert_eq!(evaluate(&tree).unwrap_err().kind(), ErrorKind::Configuration);
        Ok(())
    }

    #[test]
    fn test_limits() -> Result<()> {
        let mut builder = ExpressionTree::builder();
        let mut node = builder.value(Value::boolean(true));
        for _ in 0..10 {
            node = builder.operator(Operator::Not, [node])?;
        }
        let tree = builder.build(node)?;

        let engine = ExpressionEngine::new().with_config(EngineConfig::default().with_max_depth(5));
        let err = engine.process(&tree).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Limit);

        let engine = ExpressionEngine::new().with_config(EngineConfig::default().with_max_nodes(5));
        assert_eq!(engine.process(&tree).unwrap_err().kind(), ErrorKind::Limit);

        // Ten negations of true
        assert_eq!(evaluate(&tree)?, Some(Value::boolean(true)));
        Ok(())
    }
}
