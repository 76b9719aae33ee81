//! Host-supplied operator implementations.
//!
//! A `customOperator` expression names its implementation through the
//! `class` attribute. The host registers implementations under those
//! references in a [`CustomOperatorRegistry`]; the processor resolves the
//! reference at evaluation time and hands the implementation its operands.

use crate::expression::{CustomAttributes, ExpressionError, ExpressionResult};
use crate::operator::Operands;
use crate::value::Value;
use dashmap::DashMap;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Declared attributes visible to a custom operator implementation
#[derive(Debug, Clone, Copy)]
pub struct CustomOperatorContext<'a> {
    pub class: &'a str,
    pub definition: Option<&'a str>,
    pub attributes: &'a BTreeMap<String, String>,
}

impl<'a> CustomOperatorContext<'a> {
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A custom operator implementation
pub trait CustomOperator: Send + Sync {
    fn process(
        &self,
        context: &CustomOperatorContext<'_>,
        operands: &Operands,
    ) -> anyhow::Result<Option<Value>>;
}

impl<F> CustomOperator for F
where
    F: Fn(&CustomOperatorContext<'_>, &Operands) -> anyhow::Result<Option<Value>> + Send + Sync,
{
    fn process(
        &self,
        context: &CustomOperatorContext<'_>,
        operands: &Operands,
    ) -> anyhow::Result<Option<Value>> {
        self(context, operands)
    }
}

/// Lookup of custom operator implementations by reference
pub trait CustomOperatorResolver: Send + Sync {
    fn resolve(&self, class: &str) -> Option<Arc<dyn CustomOperator>>;
}

/// Concurrent map from implementation reference to implementation
#[derive(Default)]
pub struct CustomOperatorRegistry {
    operators: DashMap<String, Arc<dyn CustomOperator>>,
}

impl CustomOperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `operator` under `class`, replacing any previous registration
    pub fn register<O>(&self, class: impl Into<String>, operator: O)
    where
        O: CustomOperator + 'static,
    {
        let class = class.into();
        debug!("Registering custom operator '{}'", class);
        self.operators.insert(class, Arc::new(operator));
    }

    pub fn unregister(&self, class: &str) -> bool {
        self.operators.remove(class).is_some()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.operators.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl CustomOperatorResolver for CustomOperatorRegistry {
    fn resolve(&self, class: &str) -> Option<Arc<dyn CustomOperator>> {
        let found = self.operators.get(class).map(|entry| Arc::clone(entry.value()));
        if found.is_none() {
            warn!("No custom operator registered for '{}'", class);
        }
        found
    }
}

impl fmt::Debug for CustomOperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<String> = self.operators.iter().map(|e| e.key().clone()).collect();
        classes.sort();
        f.debug_struct("CustomOperatorRegistry")
            .field("operators", &classes)
            .finish()
    }
}

/// Resolve and run the implementation referenced by `attributes`
pub(crate) fn process(
    attributes: &CustomAttributes,
    resolver: Option<&dyn CustomOperatorResolver>,
    operands: &Operands,
) -> ExpressionResult<Option<Value>> {
    let class = attributes
        .class
        .as_deref()
        .ok_or(ExpressionError::MissingImplementationReference)?;
    let implementation = resolver
        .and_then(|r| r.resolve(class))
        .ok_or_else(|| ExpressionError::UnknownImplementation {
            class: class.to_string(),
        })?;
    let context = CustomOperatorContext {
        class,
        definition: attributes.definition.as_deref(),
        attributes: &attributes.attributes,
    };
    implementation
        .process(&context, operands)
        .map_err(|source| ExpressionError::Custom {
            class: class.to_string(),
            source,
        })
}
