pub mod codec;
pub mod engine;
pub mod expression;
pub mod operator;
pub mod value;

pub use engine::{EngineConfig, ExpressionEngine};
pub use expression::{ErrorKind, ExpressionError, ExpressionResult, ExpressionTree, Operator};
pub use operator::{CustomOperatorRegistry, OperatorProcessor, Operands};
pub use value::{BaseType, Cardinality, Scalar, Value};
