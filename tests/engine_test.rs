use anyhow::Result;
use qtiexpr::engine::{EngineConfig, ExpressionEngine};
use qtiexpr::expression::{
    CustomAttributes, ErrorKind, ExpressionError, ExpressionKind, ExpressionTree, NodeId,
    Operator, ToleranceMode, TreeBuilder,
};
use qtiexpr::operator::{
    CustomOperatorContext, CustomOperatorRegistry, OperatorProcessor, Operands,
};
use qtiexpr::value::{BaseType, Coords, Scalar, Shape, Value};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ints(values: &[i32]) -> Vec<Scalar> {
    values.iter().copied().map(Scalar::Integer).collect()
}

/// Evaluate `op` over constant children
fn apply(op: Operator, children: Vec<Option<Value>>) -> Result<Option<Value>, ExpressionError> {
    let mut builder = ExpressionTree::builder();
    let ids: Vec<NodeId> = children
        .into_iter()
        .map(|child| match child {
            Some(value) => builder.value(value),
            None => builder.null(),
        })
        .collect();
    let root = builder.operator(op, ids)?;
    let tree = builder.build(root)?;
    ExpressionEngine::new().process(&tree)
}

#[test]
fn test_container_equality_laws() {
    let ordered_a = Value::ordered(BaseType::Integer, ints(&[1, 2]));
    let ordered_b = Value::ordered(BaseType::Integer, ints(&[2, 1]));
    assert_ne!(ordered_a, ordered_b);

    let multiple_a = Value::multiple(BaseType::Integer, ints(&[1, 2]));
    let multiple_b = Value::multiple(BaseType::Integer, ints(&[2, 1]));
    assert_eq!(multiple_a, multiple_b);

    // Through the match operator as well
    assert_eq!(
        apply(Operator::Match, vec![Some(ordered_a), Some(ordered_b)]).unwrap(),
        Some(Value::boolean(false))
    );
    assert_eq!(
        apply(Operator::Match, vec![Some(multiple_a), Some(multiple_b)]).unwrap(),
        Some(Value::boolean(true))
    );
}

#[test]
fn test_or_null_propagation() {
    init_logging();
    let f = || Some(Value::boolean(false));
    let t = || Some(Value::boolean(true));

    assert_eq!(apply(Operator::Or, vec![f(), None]).unwrap(), None);
    assert_eq!(
        apply(Operator::Or, vec![f(), None, t()]).unwrap(),
        Some(Value::boolean(true))
    );
    assert_eq!(
        apply(Operator::Or, vec![f(), f()]).unwrap(),
        Some(Value::boolean(false))
    );
}

#[test]
fn test_gt() {
    assert_eq!(
        apply(Operator::Gt, vec![Some(Value::integer(1)), None]).unwrap(),
        None
    );
    assert_eq!(
        apply(Operator::Gt, vec![Some(Value::float(-3.5)), None]).unwrap(),
        None
    );
    assert_eq!(
        apply(
            Operator::Gt,
            vec![Some(Value::integer(1)), Some(Value::float(0.5))]
        )
        .unwrap(),
        Some(Value::boolean(true))
    );
    assert_eq!(
        apply(
            Operator::Gt,
            vec![Some(Value::integer(1)), Some(Value::integer(1))]
        )
        .unwrap(),
        Some(Value::boolean(false))
    );
}

#[test]
fn test_repeat() {
    let repeat = |n| Operator::Repeat { number_repeats: n };

    let result = apply(
        repeat(2),
        vec![Some(Value::ordered(BaseType::Integer, ints(&[1, 2, 3])))],
    )
    .unwrap();
    assert_eq!(
        result,
        Some(Value::ordered(BaseType::Integer, ints(&[1, 2, 3, 1, 2, 3])))
    );

    let result = apply(
        repeat(1),
        vec![None, Some(Value::ordered(BaseType::Integer, []))],
    )
    .unwrap();
    assert_eq!(result, None);

    // One null next to a non-empty container repeats the container
    let result = apply(
        repeat(2),
        vec![None, Some(Value::ordered(BaseType::Integer, ints(&[4])))],
    )
    .unwrap();
    assert_eq!(
        result,
        Some(Value::ordered(BaseType::Integer, ints(&[4, 4])))
    );
}

#[test]
fn test_lcm() {
    let lcm = |values: Vec<Option<Value>>| apply(Operator::Lcm, values).unwrap();
    let int = |i| Some(Value::integer(i));

    assert_eq!(lcm(vec![int(330), int(65), int(15)]), Some(Value::integer(4290)));
    assert_eq!(lcm(vec![int(330), int(0)]), Some(Value::integer(0)));
    assert_eq!(lcm(vec![int(-10), int(-5)]), Some(Value::integer(10)));
    assert_eq!(lcm(vec![None]), None);
}

#[test]
fn test_string_match() {
    let string_match = |a: &str, b: &str, case_sensitive| {
        apply(
            Operator::string_match(case_sensitive),
            vec![Some(Value::string(a)), Some(Value::string(b))],
        )
        .unwrap()
    };
    assert_eq!(string_match("one", "oNe", true), Some(Value::boolean(false)));
    assert_eq!(string_match("one", "oNe", false), Some(Value::boolean(true)));
    assert_eq!(
        string_match("它的工作原理", "它的工作原理", true),
        Some(Value::boolean(true))
    );
    assert_eq!(
        string_match("它的工作原理", "它的工作", true),
        Some(Value::boolean(false))
    );
}

#[test]
fn test_arity_checked_before_process() {
    let one = || Some(Value::integer(1));

    let err = OperatorProcessor::new(&Operator::Gt, Operands::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Arity);
    let err = OperatorProcessor::new(&Operator::Gt, Operands::from(vec![one(), one(), one()]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Arity);
    let err = OperatorProcessor::new(&Operator::Or, Operands::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Arity);

    // The engine reports the same error for a malformed tree
    let err = apply(Operator::Gt, vec![one()]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Arity);
}

#[test]
fn test_type_errors_abort_evaluation() {
    // not(gt(1, "x")) fails as a whole
    let mut builder = ExpressionTree::builder();
    let one = builder.value(Value::integer(1));
    let text = builder.value(Value::string("x"));
    let gt = builder.operator(Operator::Gt, [one, text]).unwrap();
    let not = builder.operator(Operator::Not, [gt]).unwrap();
    let tree = builder.build(not).unwrap();

    let err = ExpressionEngine::new().process(&tree).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(matches!(
        err,
        ExpressionError::WrongBaseType {
            operator: "gt",
            position: 1,
            found: BaseType::String,
        }
    ));
}

#[test]
fn test_equal_with_tolerance() {
    let operator = Operator::Equal {
        tolerance_mode: ToleranceMode::Absolute,
        tolerance: vec![0.1, 0.2],
        include_lower_bound: true,
        include_upper_bound: false,
    };
    let result = apply(
        operator,
        vec![Some(Value::float(1.0)), Some(Value::float(1.15))],
    )
    .unwrap();
    assert_eq!(result, Some(Value::boolean(true)));
}

#[test]
fn test_inside() {
    let coords = Coords::new(Shape::Circle, vec![10, 10, 5]).unwrap();
    let points = Value::multiple(
        BaseType::Point,
        [
            Scalar::Point(qtiexpr::value::Point::new(0, 0)),
            Scalar::Point(qtiexpr::value::Point::new(12, 13)),
        ],
    );
    let result = apply(Operator::Inside { coords }, vec![Some(points)]).unwrap();
    assert_eq!(result, Some(Value::boolean(true)));
}

fn explode(ctx: &CustomOperatorContext<'_>, operands: &Operands) -> Result<Option<Value>> {
    let delimiter = ctx.attribute("delimiter").unwrap_or("-");
    let Some(text) = operands.get(0).and_then(Value::as_scalar).and_then(Scalar::as_str) else {
        return Ok(None);
    };
    let parts = text.split(delimiter).map(|p| Scalar::String(p.to_string()));
    Ok(Some(Value::ordered(BaseType::String, parts)))
}

fn custom_tree(attributes: CustomAttributes, input: &str) -> Result<ExpressionTree> {
    let mut builder = TreeBuilder::default();
    let text = builder.value(Value::string(input));
    let root = builder.operator(Operator::Custom(attributes), [text])?;
    Ok(builder.build(root)?)
}

#[test]
fn test_custom_operator() -> Result<()> {
    init_logging();
    let registry = CustomOperatorRegistry::new();
    registry.register("org.qtism.test.Explode", explode);
    let engine = ExpressionEngine::new().with_registry(Arc::new(registry));

    let tree = custom_tree(CustomAttributes::new("org.qtism.test.Explode"), "this-is-a-test")?;
    let expected = Value::ordered(
        BaseType::String,
        ["this", "is", "a", "test"].map(|s| Scalar::String(s.to_string())),
    );
    assert_eq!(engine.process(&tree)?, Some(expected));

    let attributes =
        CustomAttributes::new("org.qtism.test.Explode").with_attribute("delimiter", " ");
    let tree = custom_tree(attributes, "a b")?;
    let expected = Value::ordered(
        BaseType::String,
        ["a", "b"].map(|s| Scalar::String(s.to_string())),
    );
    assert_eq!(engine.process(&tree)?, Some(expected));
    Ok(())
}

#[test]
fn test_custom_operator_errors() -> Result<()> {
    let registry = CustomOperatorRegistry::new();
    registry.register("org.qtism.test.Explode", explode);
    let engine = ExpressionEngine::new().with_registry(Arc::new(registry));

    let tree = custom_tree(CustomAttributes::default(), "x")?;
    let err = engine.process(&tree).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        err.to_string(),
        "Only custom operators with a 'class' attribute value can be processed"
    );

    let tree = custom_tree(CustomAttributes::new("org.qtism.test.Unknown"), "x")?;
    let err = engine.process(&tree).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(err.to_string().contains("org.qtism.test.Unknown"));

    // Without a registry nothing resolves
    let tree = custom_tree(CustomAttributes::new("org.qtism.test.Explode"), "x")?;
    let err = ExpressionEngine::new().process(&tree).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
    Ok(())
}

#[test]
fn test_non_expression_root() -> Result<()> {
    let mut builder = ExpressionTree::builder();
    let root = builder.component("itemSessionControl");
    let tree = builder.build(root)?;
    let err = ExpressionEngine::new().process(&tree).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(
        err.to_string(),
        "Only expressions can be evaluated, 'itemSessionControl' given"
    );
    Ok(())
}

#[test]
fn test_deep_tree_does_not_overflow() -> Result<()> {
    let depth = 50_000;
    let mut builder = ExpressionTree::builder();
    let mut node = builder.value(Value::boolean(false));
    for _ in 0..depth {
        node = builder.operator(Operator::Not, [node])?;
    }
    let tree = builder.build(node)?;

    let config = EngineConfig::default()
        .with_max_depth(depth + 1)
        .with_max_nodes(depth + 1);
    let engine = ExpressionEngine::new().with_config(config);
    assert_eq!(engine.process(&tree)?, Some(Value::boolean(false)));

    let err = ExpressionEngine::new().process(&tree).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
    Ok(())
}

#[test]
fn test_random_expressions_are_seeded() -> Result<()> {
    let mut builder = ExpressionTree::builder();
    let a = builder.add(
        ExpressionKind::RandomInteger {
            min: 0,
            max: 1000,
            step: 1,
        },
        [],
    )?;
    let b = builder.add(ExpressionKind::RandomFloat { min: 0.0, max: 1.0 }, [])?;
    let list = builder.value(Value::multiple(BaseType::Integer, ints(&[1, 2, 3])));
    let pick = builder.operator(Operator::Random, [list])?;
    let a_float = builder.operator(Operator::IntegerToFloat, [a])?;
    let sum = builder.operator(Operator::Sum, [a_float, b])?;
    let pick_float = builder.operator(Operator::IntegerToFloat, [pick])?;
    let total = builder.operator(Operator::Sum, [sum, pick_float])?;
    let tree = builder.build(total)?;

    let engine =
        ExpressionEngine::new().with_config(EngineConfig::default().with_random_seed(2024));
    let first = engine.process(&tree)?;
    assert!(first.is_some());
    assert_eq!(engine.process(&tree)?, first);
    Ok(())
}

#[test]
fn test_tree_without_nodes_is_rejected() {
    let err = ExpressionTree::from_parts(Vec::new(), NodeId(0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
