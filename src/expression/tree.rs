//! Arena-backed expression trees.
//!
//! Nodes live in a flat vector and refer to their children by [`NodeId`].
//! A child is always added before its parent, so every child id is smaller
//! than its parent's id and no cycle can be expressed.

use crate::expression::{ExpressionError, ExpressionKind, ExpressionResult, Operator};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Index of a node inside an [`ExpressionTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a node holds: an expression, or another document component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Expression(ExpressionKind),
    /// A component that is not an expression, named by its QTI class
    Component(String),
}

impl NodeKind {
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Expression(kind) => kind.name(),
            NodeKind::Component(name) => name,
        }
    }
}

impl From<ExpressionKind> for NodeKind {
    fn from(kind: ExpressionKind) -> Self {
        NodeKind::Expression(kind)
    }
}

impl From<Operator> for NodeKind {
    fn from(op: Operator) -> Self {
        NodeKind::Expression(ExpressionKind::Operator(op))
    }
}

/// A node and the ids of its ordered children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    kind: NodeKind,
    children: Vec<NodeId>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The expression held by this node, if any
    pub fn expression(&self) -> Option<&ExpressionKind> {
        match &self.kind {
            NodeKind::Expression(kind) => Some(kind),
            NodeKind::Component(_) => None,
        }
    }
}

/// Serialized form of a tree, validated on the way in
#[derive(Deserialize)]
struct TreeParts {
    nodes: Vec<Node>,
    root: NodeId,
}

impl TryFrom<TreeParts> for ExpressionTree {
    type Error = ExpressionError;

    fn try_from(parts: TreeParts) -> ExpressionResult<Self> {
        ExpressionTree::from_parts(parts.nodes, parts.root)
    }
}

/// An immutable expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeParts")]
pub struct ExpressionTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ExpressionTree {
    /// Start building a tree
    pub fn builder() -> TreeBuilder {
        TreeBuilder::default()
    }

    /// Tree made of one constant value
    pub fn constant(value: Value) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Expression(ExpressionKind::BaseValue(value)),
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    /// Assemble a tree from raw nodes, checking that children precede parents
    pub fn from_parts(nodes: Vec<Node>, root: NodeId) -> ExpressionResult<Self> {
        if root.0 >= nodes.len() {
            return Err(ExpressionError::InvalidTree {
                message: format!("root {} out of bounds for {} nodes", root.0, nodes.len()),
            });
        }
        for (index, node) in nodes.iter().enumerate() {
            if let Some(child) = node.children.iter().find(|c| c.0 >= index) {
                return Err(ExpressionError::InvalidTree {
                    message: format!("node {} refers to child {} not added before it", index, child.0),
                });
            }
        }
        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root.0]
    }

    /// Number of nodes stored in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk the tree from the root and report `(visited nodes, max depth)`
    ///
    /// A node shared by several parents is counted once per parent, which
    /// matches the work a full evaluation performs. The walk stops as soon
    /// as `max_visits` is exceeded.
    pub fn measure(&self, max_visits: usize) -> (usize, usize) {
        let mut visits = 0;
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1usize)];
        while let Some((id, depth)) = stack.pop() {
            visits += 1;
            max_depth = max_depth.max(depth);
            if visits > max_visits {
                break;
            }
            stack.extend(self.nodes[id.0].children.iter().map(|c| (*c, depth + 1)));
        }
        (visits, max_depth)
    }
}

/// Incremental builder for an [`ExpressionTree`]
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Add a node whose children were all added before
    pub fn add(
        &mut self,
        kind: impl Into<NodeKind>,
        children: impl IntoIterator<Item = NodeId>,
    ) -> ExpressionResult<NodeId> {
        let id = NodeId(self.nodes.len());
        let children: Vec<NodeId> = children.into_iter().collect();
        if let Some(child) = children.iter().find(|c| c.0 >= id.0) {
            return Err(ExpressionError::InvalidTree {
                message: format!("unknown child node {}", child.0),
            });
        }
        self.nodes.push(Node {
            kind: kind.into(),
            children,
        });
        Ok(id)
    }

    /// Add an operator node
    pub fn operator(
        &mut self,
        op: Operator,
        children: impl IntoIterator<Item = NodeId>,
    ) -> ExpressionResult<NodeId> {
        self.add(op, children)
    }

    /// Add a constant leaf
    pub fn value(&mut self, value: Value) -> NodeId {
        self.leaf(NodeKind::Expression(ExpressionKind::BaseValue(value)))
    }

    /// Add a NULL leaf
    pub fn null(&mut self) -> NodeId {
        self.leaf(NodeKind::Expression(ExpressionKind::Null))
    }

    /// Add a leaf for a component that is not an expression
    pub fn component(&mut self, name: impl Into<String>) -> NodeId {
        self.leaf(NodeKind::Component(name.into()))
    }

    fn leaf(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
        });
        id
    }

    /// Finish the tree with the given root
    pub fn build(self, root: NodeId) -> ExpressionResult<ExpressionTree> {
        ExpressionTree::from_parts(self.nodes, root)
    }
}
