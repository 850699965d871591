//! Model info provider contract (external collaborator).
//!
//! The Conversion Resolver consults a data model (FHIR, QDM, ...) for
//! three things: the subtype relation, base-type traversal, and the
//! implicit conversions the model itself registers (e.g. FHIRHelpers).
//! This module defines the consumer-side trait; the concrete XML-catalog
//! implementation lives in `octofhir-cql-model` so that crate can depend
//! on this one without a cycle.

use crate::CqlType;

/// Result of an implicit-conversion lookup against the model info.
///
/// Mirrors the conversion operator a model registers for a `from -> to`
/// pair, so the Conversion Resolver can wrap the operand in a call to it
/// rather than a bare cast.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImplicitConversion {
    pub convertible: bool,
    pub library: Option<String>,
    pub function: Option<String>,
    pub output_type: Option<CqlType>,
}

impl ImplicitConversion {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Minimal descriptor of a named type returned by a per-type model-info
/// lookup: enough for the Conversion Resolver and Reference Resolver to
/// reason about inheritance and retrievability without depending on the
/// model crate's full `TypeInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTypeDescriptor {
    pub name: String,
    pub namespace: Option<String>,
    pub base_type: Option<String>,
    pub retrievable: bool,
}

/// External collaborator consumed by the Conversion Resolver: the
/// subtype relation, base-type traversal, and implicit-conversion
/// registry for a data model (e.g. FHIR).
pub trait ModelInfoProvider: Send + Sync {
    /// Whether `a` is a subtype of `b` per this model's hierarchy.
    fn is_sub_type(&self, a: &CqlType, b: &CqlType) -> bool;

    /// The immediate base types of `t`, excluding the universal `Any`
    /// (which would otherwise let unrelated system types like String and
    /// Integer bridge through a shared ancestor).
    fn base_types(&self, t: &CqlType) -> Vec<CqlType>;

    /// Whether the model registers an implicit conversion from `from` to
    /// `to`, and if so, the operator that performs it.
    fn is_implicitly_convertible(&self, from: &CqlType, to: &CqlType) -> ImplicitConversion;

    /// Look up type info by its canonical model-info key
    /// (`CqlType::model_info_key`).
    fn lookup(&self, key: &str) -> Option<ModelTypeDescriptor>;
}

/// A model info provider with no registered types, used where no data
/// model is loaded (pure System-type CQL) and in resolver unit tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyModelInfo;

impl ModelInfoProvider for EmptyModelInfo {
    fn is_sub_type(&self, _a: &CqlType, _b: &CqlType) -> bool {
        false
    }

    fn base_types(&self, _t: &CqlType) -> Vec<CqlType> {
        Vec::new()
    }

    fn is_implicitly_convertible(&self, _from: &CqlType, _to: &CqlType) -> ImplicitConversion {
        ImplicitConversion::none()
    }

    fn lookup(&self, _key: &str) -> Option<ModelTypeDescriptor> {
        None
    }
}
