//! Source provenance for runtime values.
//!
//! The Value Kernel records, for every value produced during evaluation,
//! the expression node responsible and the operand values it was built
//! from. This module stays decoupled from the ELM expression tree (which
//! lives in a higher crate) by addressing the producing node through its
//! `locator` string rather than a back-pointer, so library objects stay
//! freely reparentable across engine instances (see the design notes on
//! cyclic references).

use std::fmt;
use std::sync::Arc;

use crate::type_system::CqlType;
use crate::value::CqlValue;

/// Identifies the expression node that produced a [`SourcedValue`].
///
/// Carries the node's `locator` (the `{row, column}` position ELM nodes
/// expose) rather than a reference to the node itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceExpressionId(Arc<str>);

impl SourceExpressionId {
    /// Build an id from a node locator string (e.g. `"12:5"`).
    pub fn new(locator: impl Into<Arc<str>>) -> Self {
        Self(locator.into())
    }

    /// The raw locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceExpressionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A runtime value together with the provenance that produced it.
///
/// Values are immutable by construction: every wrapping operation
/// (`with_sources`) returns a new `SourcedValue` rather than mutating an
/// existing one, so a value shared by two callers never silently
/// acquires a new history.
#[derive(Debug, Clone)]
pub struct SourcedValue {
    value: CqlValue,
    source_expression: Option<SourceExpressionId>,
    source_values: Vec<SourcedValue>,
}

impl SourcedValue {
    /// Wrap a bare value with no provenance.
    pub fn new(value: CqlValue) -> Self {
        Self {
            value,
            source_expression: None,
            source_values: Vec::new(),
        }
    }

    /// The wrapped value.
    pub fn value(&self) -> &CqlValue {
        &self.value
    }

    /// Unwrap, discarding provenance.
    pub fn into_value(self) -> CqlValue {
        self.value
    }

    /// The expression node that produced this value, if known.
    pub fn source_expression(&self) -> Option<&SourceExpressionId> {
        self.source_expression.as_ref()
    }

    /// The operand values this value was computed from.
    pub fn source_values(&self) -> &[SourcedValue] {
        &self.source_values
    }

    /// The runtime type of the wrapped value (§4.6 inference rules).
    pub fn runtime_type(&self) -> CqlType {
        self.value.runtime_type()
    }

    /// Attach provenance, returning a new `SourcedValue`.
    ///
    /// `self` is never mutated. If `sources` is empty, the value being
    /// wrapped (`self`, with whatever history it already carries) becomes
    /// the sole source value; otherwise `sources` replaces it outright.
    pub fn with_sources(&self, expression: SourceExpressionId, sources: Vec<SourcedValue>) -> Self {
        let source_values = if sources.is_empty() {
            vec![self.clone()]
        } else {
            sources
        };
        Self {
            value: self.value.clone(),
            source_expression: Some(expression),
            source_values,
        }
    }
}

impl From<CqlValue> for SourcedValue {
    fn from(value: CqlValue) -> Self {
        Self::new(value)
    }
}

impl PartialEq for SourcedValue {
    /// Equality ignores provenance, matching `CqlValue`'s own equality —
    /// the interpreter's CQL equality semantics are layered separately.
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
