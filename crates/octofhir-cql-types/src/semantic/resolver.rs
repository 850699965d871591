//! Reference Resolution for CQL Semantic Analysis
//!
//! This module handles resolution of references in CQL including:
//! - Expression references (ExpressionRef)
//! - Parameter references (ParameterRef)
//! - Function calls (FunctionRef)
//! - Code/ValueSet/CodeSystem references
//! - Library-qualified references

use thiserror::Error;

use crate::coercion::{ConversionResolver, OverloadCandidate, ResolverError};
use crate::model_info::{EmptyModelInfo, ModelInfoProvider};
use crate::CqlType;
use super::scope::ScopeManager;
use super::symbols::{FunctionParameter, FunctionSignature, Symbol, SymbolKind, SymbolTable};

static EMPTY_MODEL: EmptyModelInfo = EmptyModelInfo;

/// Resolution errors
#[derive(Debug, Clone, Error)]
pub enum ResolutionError {
    /// Symbol not found
    #[error("Cannot resolve symbol '{name}'")]
    SymbolNotFound { name: String },

    /// Qualified symbol not found
    #[error("Cannot resolve symbol '{library}.{name}'")]
    QualifiedSymbolNotFound { library: String, name: String },

    /// Library not found
    #[error("Library '{name}' not found (did you forget to include it?)")]
    LibraryNotFound { name: String },

    /// Ambiguous reference
    #[error("Ambiguous reference to '{name}': multiple definitions found")]
    AmbiguousReference { name: String },

    /// No matching overload
    #[error("No matching overload for function '{name}' with arguments ({args})")]
    NoMatchingOverload { name: String, args: String },

    /// Ambiguous overload
    #[error("Ambiguous call to function '{name}': multiple overloads match")]
    AmbiguousOverload { name: String },

    /// Wrong argument count
    #[error("Function '{name}' expects {expected} arguments, but got {found}")]
    WrongArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Private symbol access
    #[error("Cannot access private symbol '{name}' from outside its library")]
    PrivateAccess { name: String },

    /// Invalid reference kind
    #[error("'{name}' is a {actual}, expected {expected}")]
    InvalidReferenceKind {
        name: String,
        actual: String,
        expected: String,
    },
}

/// Resolution result
pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// Resolved reference
#[derive(Debug, Clone)]
pub struct ResolvedRef {
    /// The resolved symbol
    pub symbol: Symbol,
    /// Library qualifier (if qualified reference)
    pub library: Option<String>,
    /// Reference kind
    pub kind: RefKind,
}

impl ResolvedRef {
    /// Create a new resolved reference
    pub fn new(symbol: Symbol, kind: RefKind) -> Self {
        Self {
            symbol,
            library: None,
            kind,
        }
    }

    /// With library qualifier
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }
}

/// Kind of reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Expression reference
    Expression,
    /// Parameter reference
    Parameter,
    /// Function reference
    Function,
    /// Code system reference
    CodeSystem,
    /// Value set reference
    ValueSet,
    /// Code reference
    Code,
    /// Concept reference
    Concept,
    /// Alias reference (in query)
    Alias,
    /// Let reference (in query)
    Let,
    /// Variable reference
    Variable,
    /// Context reference
    Context,
}

/// Reference resolver
pub struct Resolver<'a> {
    /// Global symbol table
    symbol_table: &'a SymbolTable,
    /// Current scope manager
    scope_manager: &'a ScopeManager,
    /// Model info consulted by the conversion resolver for named-type
    /// subtyping and implicit conversions; `EmptyModelInfo` when no data
    /// model is loaded.
    model: &'a dyn ModelInfoProvider,
}

impl<'a> Resolver<'a> {
    /// Create a new resolver with no data model loaded (pure System types).
    pub fn new(symbol_table: &'a SymbolTable, scope_manager: &'a ScopeManager) -> Self {
        Self {
            symbol_table,
            scope_manager,
            model: &EMPTY_MODEL,
        }
    }

    /// Create a resolver backed by a loaded data model (e.g. FHIR).
    pub fn with_model(
        symbol_table: &'a SymbolTable,
        scope_manager: &'a ScopeManager,
        model: &'a dyn ModelInfoProvider,
    ) -> Self {
        Self {
            symbol_table,
            scope_manager,
            model,
        }
    }

    /// Resolve an identifier reference
    ///
    /// Resolution order:
    /// 1. Local scope (aliases, let bindings, variables)
    /// 2. Special variables ($this, $index, $total)
    /// 3. Parameters
    /// 4. Expression definitions
    pub fn resolve_identifier(&self, name: &str) -> ResolutionResult<ResolvedRef> {
        // Check local scope first
        if let Some(symbol) = self.scope_manager.lookup(name) {
            let kind = match &symbol.kind {
                SymbolKind::Alias => RefKind::Alias,
                SymbolKind::Let => RefKind::Let,
                SymbolKind::Variable => RefKind::Variable,
                SymbolKind::Iteration => RefKind::Variable,
                SymbolKind::Index => RefKind::Variable,
                SymbolKind::Aggregate => RefKind::Variable,
                SymbolKind::Parameter => RefKind::Parameter,
                SymbolKind::ExpressionDef => RefKind::Expression,
                SymbolKind::Context => RefKind::Context,
                _ => RefKind::Variable,
            };
            return Ok(ResolvedRef::new(symbol.clone(), kind));
        }

        // Check global symbol table
        if let Some(symbol) = self.symbol_table.lookup(name) {
            let kind = match &symbol.kind {
                SymbolKind::Parameter => RefKind::Parameter,
                SymbolKind::ExpressionDef => RefKind::Expression,
                SymbolKind::FunctionDef(_) => RefKind::Function,
                SymbolKind::CodeSystem => RefKind::CodeSystem,
                SymbolKind::ValueSet => RefKind::ValueSet,
                SymbolKind::Code => RefKind::Code,
                SymbolKind::Concept => RefKind::Concept,
                SymbolKind::Context => RefKind::Context,
                _ => RefKind::Expression,
            };
            return Ok(ResolvedRef::new(symbol.clone(), kind));
        }

        Err(ResolutionError::SymbolNotFound {
            name: name.to_string(),
        })
    }

    /// Resolve a qualified identifier (Library.Name)
    pub fn resolve_qualified(
        &self,
        library: &str,
        name: &str,
    ) -> ResolutionResult<ResolvedRef> {
        // Check if library is a known alias
        if self.symbol_table.get_library(library).is_none() {
            return Err(ResolutionError::LibraryNotFound {
                name: library.to_string(),
            });
        }

        // Try to resolve in the library
        if let Some(symbol) = self.symbol_table.lookup_qualified(library, name) {
            let kind = match &symbol.kind {
                SymbolKind::Parameter => RefKind::Parameter,
                SymbolKind::ExpressionDef => RefKind::Expression,
                SymbolKind::FunctionDef(_) => RefKind::Function,
                SymbolKind::CodeSystem => RefKind::CodeSystem,
                SymbolKind::ValueSet => RefKind::ValueSet,
                SymbolKind::Code => RefKind::Code,
                SymbolKind::Concept => RefKind::Concept,
                _ => RefKind::Expression,
            };
            return Ok(ResolvedRef::new(symbol.clone(), kind).with_library(library));
        }

        Err(ResolutionError::QualifiedSymbolNotFound {
            library: library.to_string(),
            name: name.to_string(),
        })
    }

    /// Resolve a function call with arguments
    ///
    /// Performs overload resolution based on argument types.
    pub fn resolve_function(
        &self,
        name: &str,
        arg_types: &[CqlType],
    ) -> ResolutionResult<ResolvedOverload> {
        let overloads = self.symbol_table.function_overloads(name);

        if overloads.is_empty() {
            // Check if it's a non-function symbol
            if let Some(symbol) = self.symbol_table.lookup(name) {
                return Err(ResolutionError::InvalidReferenceKind {
                    name: name.to_string(),
                    actual: format!("{:?}", symbol.kind),
                    expected: "function".to_string(),
                });
            }
            return Err(ResolutionError::SymbolNotFound {
                name: name.to_string(),
            });
        }

        let candidates: Vec<OverloadCandidate<&FunctionSignature>> = overloads
            .into_iter()
            .map(|sig| {
                OverloadCandidate::new(
                    sig.parameters.iter().map(|p| p.param_type.clone()).collect(),
                    sig,
                )
            })
            .collect();

        let resolver = ConversionResolver::new(self.model);
        match resolver.match_overload(arg_types, &candidates) {
            Ok(m) => Ok(ResolvedOverload {
                name: name.to_string(),
                signature: (*m.payload).clone(),
                conversion_cost: m.wrapped_operands.iter().map(|o| o.score.0).sum(),
            }),
            Err(ResolverError::Ambiguous(_)) => Err(ResolutionError::AmbiguousOverload {
                name: name.to_string(),
            }),
            Err(_) => {
                let args = arg_types
                    .iter()
                    .map(|t| t.qualified_name())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(ResolutionError::NoMatchingOverload {
                    name: name.to_string(),
                    args,
                })
            }
        }
    }

    /// Resolve a function using only the exact-match rule (§4.2): an
    /// invocation matches a candidate only at score 0 (exact) or 1
    /// (subtype), never through a conversion path. This is what the
    /// runtime dispatcher uses once the parser has already settled the
    /// static overload and just needs to pick the matching runtime
    /// implementation.
    pub fn resolve_function_exact(
        &self,
        name: &str,
        arg_types: &[CqlType],
    ) -> ResolutionResult<ResolvedOverload> {
        let overloads = self.symbol_table.function_overloads(name);
        if overloads.is_empty() {
            return Err(ResolutionError::SymbolNotFound {
                name: name.to_string(),
            });
        }

        let candidates: Vec<OverloadCandidate<&FunctionSignature>> = overloads
            .into_iter()
            .map(|sig| {
                OverloadCandidate::new(
                    sig.parameters.iter().map(|p| p.param_type.clone()).collect(),
                    sig,
                )
            })
            .collect();

        let resolver = ConversionResolver::new(self.model);
        match resolver.match_overload_exact(arg_types, &candidates) {
            Ok(m) => Ok(ResolvedOverload {
                name: name.to_string(),
                signature: (*m.payload).clone(),
                conversion_cost: m.wrapped_operands.iter().map(|o| o.score.0).sum(),
            }),
            Err(ResolverError::Ambiguous(_)) => Err(ResolutionError::AmbiguousOverload {
                name: name.to_string(),
            }),
            Err(_) => {
                let args = arg_types
                    .iter()
                    .map(|t| t.qualified_name())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(ResolutionError::NoMatchingOverload {
                    name: name.to_string(),
                    args,
                })
            }
        }
    }

    /// Resolve a code system reference
    pub fn resolve_codesystem(&self, name: &str) -> ResolutionResult<ResolvedRef> {
        let resolved = self.resolve_identifier(name)?;
        if resolved.kind != RefKind::CodeSystem {
            return Err(ResolutionError::InvalidReferenceKind {
                name: name.to_string(),
                actual: format!("{:?}", resolved.kind),
                expected: "codesystem".to_string(),
            });
        }
        Ok(resolved)
    }

    /// Resolve a value set reference
    pub fn resolve_valueset(&self, name: &str) -> ResolutionResult<ResolvedRef> {
        let resolved = self.resolve_identifier(name)?;
        if resolved.kind != RefKind::ValueSet {
            return Err(ResolutionError::InvalidReferenceKind {
                name: name.to_string(),
                actual: format!("{:?}", resolved.kind),
                expected: "valueset".to_string(),
            });
        }
        Ok(resolved)
    }

    /// Resolve a code reference
    pub fn resolve_code(&self, name: &str) -> ResolutionResult<ResolvedRef> {
        let resolved = self.resolve_identifier(name)?;
        if resolved.kind != RefKind::Code {
            return Err(ResolutionError::InvalidReferenceKind {
                name: name.to_string(),
                actual: format!("{:?}", resolved.kind),
                expected: "code".to_string(),
            });
        }
        Ok(resolved)
    }

    /// Resolve a concept reference
    pub fn resolve_concept(&self, name: &str) -> ResolutionResult<ResolvedRef> {
        let resolved = self.resolve_identifier(name)?;
        if resolved.kind != RefKind::Concept {
            return Err(ResolutionError::InvalidReferenceKind {
                name: name.to_string(),
                actual: format!("{:?}", resolved.kind),
                expected: "concept".to_string(),
            });
        }
        Ok(resolved)
    }

    /// Resolve an expression reference
    pub fn resolve_expression(&self, name: &str) -> ResolutionResult<ResolvedRef> {
        let resolved = self.resolve_identifier(name)?;
        if resolved.kind != RefKind::Expression {
            return Err(ResolutionError::InvalidReferenceKind {
                name: name.to_string(),
                actual: format!("{:?}", resolved.kind),
                expected: "expression".to_string(),
            });
        }
        Ok(resolved)
    }

    /// Resolve a parameter reference
    pub fn resolve_parameter(&self, name: &str) -> ResolutionResult<ResolvedRef> {
        let resolved = self.resolve_identifier(name)?;
        if resolved.kind != RefKind::Parameter {
            return Err(ResolutionError::InvalidReferenceKind {
                name: name.to_string(),
                actual: format!("{:?}", resolved.kind),
                expected: "parameter".to_string(),
            });
        }
        Ok(resolved)
    }
}

/// Result of function overload resolution
#[derive(Debug, Clone)]
pub struct ResolvedOverload {
    /// Function name
    pub name: String,
    /// Resolved function signature
    pub signature: FunctionSignature,
    /// Conversion cost (for ranking)
    pub conversion_cost: u32,
}

impl ResolvedOverload {
    /// Get the return type
    pub fn return_type(&self) -> &CqlType {
        &self.signature.return_type
    }

    /// Get the parameter count
    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    /// Get the parameters
    pub fn parameters(&self) -> &[FunctionParameter] {
        &self.signature.parameters
    }
}

/// Overload resolver for system functions
pub struct OverloadResolver {
    /// Model info consulted by the conversion resolver.
    model: &'static dyn ModelInfoProvider,
    /// Registered overloads (function name -> signatures)
    overloads: indexmap::IndexMap<String, Vec<FunctionSignature>>,
}

impl OverloadResolver {
    /// Create a new overload resolver
    pub fn new() -> Self {
        Self {
            model: &EMPTY_MODEL,
            overloads: indexmap::IndexMap::new(),
        }
    }

    /// Create with standard CQL operators registered
    pub fn with_standard_operators() -> Self {
        let mut resolver = Self::new();
        resolver.register_standard_operators();
        resolver
    }

    /// Register a function overload
    pub fn register(&mut self, name: impl Into<String>, signature: FunctionSignature) {
        self.overloads
            .entry(name.into())
            .or_default()
            .push(signature);
    }

    /// Register standard CQL operators
    fn register_standard_operators(&mut self) {
        // Add - unary negate
        self.register(
            "Negate",
            FunctionSignature::new(
                vec![FunctionParameter::new("operand", CqlType::Integer)],
                CqlType::Integer,
            ),
        );
        self.register(
            "Negate",
            FunctionSignature::new(
                vec![FunctionParameter::new("operand", CqlType::Long)],
                CqlType::Long,
            ),
        );
        self.register(
            "Negate",
            FunctionSignature::new(
                vec![FunctionParameter::new("operand", CqlType::Decimal)],
                CqlType::Decimal,
            ),
        );
        self.register(
            "Negate",
            FunctionSignature::new(
                vec![FunctionParameter::new("operand", CqlType::Quantity)],
                CqlType::Quantity,
            ),
        );

        // Add - binary add
        self.register(
            "Add",
            FunctionSignature::new(
                vec![
                    FunctionParameter::new("left", CqlType::Integer),
                    FunctionParameter::new("right", CqlType::Integer),
                ],
                CqlType::Integer,
            ),
        );
        self.register(
            "Add",
            FunctionSignature::new(
                vec![
                    FunctionParameter::new("left", CqlType::Long),
                    FunctionParameter::new("right", CqlType::Long),
                ],
                CqlType::Long,
            ),
        );
        self.register(
            "Add",
            FunctionSignature::new(
                vec![
                    FunctionParameter::new("left", CqlType::Decimal),
                    FunctionParameter::new("right", CqlType::Decimal),
                ],
                CqlType::Decimal,
            ),
        );
        self.register(
            "Add",
            FunctionSignature::new(
                vec![
                    FunctionParameter::new("left", CqlType::Quantity),
                    FunctionParameter::new("right", CqlType::Quantity),
                ],
                CqlType::Quantity,
            ),
        );

        // String concatenation
        self.register(
            "Concatenate",
            FunctionSignature::new(
                vec![
                    FunctionParameter::new("left", CqlType::String),
                    FunctionParameter::new("right", CqlType::String),
                ],
                CqlType::String,
            ),
        );

        // Comparison
        for op in ["Equal", "NotEqual", "Less", "LessOrEqual", "Greater", "GreaterOrEqual"] {
            for ty in [
                CqlType::Integer,
                CqlType::Long,
                CqlType::Decimal,
                CqlType::String,
                CqlType::Date,
                CqlType::DateTime,
                CqlType::Time,
            ] {
                self.register(
                    op,
                    FunctionSignature::new(
                        vec![
                            FunctionParameter::new("left", ty.clone()),
                            FunctionParameter::new("right", ty),
                        ],
                        CqlType::Boolean,
                    ),
                );
            }
        }

        // Boolean operations
        for op in ["And", "Or", "Xor", "Implies"] {
            self.register(
                op,
                FunctionSignature::new(
                    vec![
                        FunctionParameter::new("left", CqlType::Boolean),
                        FunctionParameter::new("right", CqlType::Boolean),
                    ],
                    CqlType::Boolean,
                ),
            );
        }

        self.register(
            "Not",
            FunctionSignature::new(
                vec![FunctionParameter::new("operand", CqlType::Boolean)],
                CqlType::Boolean,
            ),
        );
    }

    /// Resolve an overload
    pub fn resolve(&self, name: &str, arg_types: &[CqlType]) -> ResolutionResult<ResolvedOverload> {
        let overloads = self.overloads.get(name).ok_or_else(|| {
            ResolutionError::SymbolNotFound {
                name: name.to_string(),
            }
        })?;

        let candidates: Vec<OverloadCandidate<&FunctionSignature>> = overloads
            .iter()
            .map(|sig| {
                OverloadCandidate::new(
                    sig.parameters.iter().map(|p| p.param_type.clone()).collect(),
                    sig,
                )
            })
            .collect();

        let resolver = ConversionResolver::new(self.model);
        match resolver.match_overload(arg_types, &candidates) {
            Ok(m) => Ok(ResolvedOverload {
                name: name.to_string(),
                signature: (*m.payload).clone(),
                conversion_cost: m.wrapped_operands.iter().map(|o| o.score.0).sum(),
            }),
            Err(ResolverError::Ambiguous(_)) => Err(ResolutionError::AmbiguousOverload {
                name: name.to_string(),
            }),
            Err(_) => {
                let args = arg_types
                    .iter()
                    .map(|t| t.qualified_name())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(ResolutionError::NoMatchingOverload {
                    name: name.to_string(),
                    args,
                })
            }
        }
    }
}

impl Default for OverloadResolver {
    fn default() -> Self {
        Self::new()
    }
}
