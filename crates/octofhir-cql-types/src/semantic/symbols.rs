//! Symbol Table for CQL Semantic Analysis
//!
//! This module implements the symbol table for tracking definitions
//! during CQL compilation.

use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

use crate::CqlType;

/// Errors raised while populating or querying a library's namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolTableError {
    /// A definition with this name (and, for functions, this exact
    /// signature) already exists in the current library.
    #[error("'{name}' is already defined in this library")]
    AlreadyExists { name: String },
    /// `resolve_include` was asked for an alias with no matching
    /// `include_library` call.
    #[error("library '{alias}' is not included")]
    NotExist { alias: String },
    /// A qualified reference named a library that resolved, but not the
    /// symbol within it.
    #[error("'{library}.{name}' could not be resolved")]
    Unresolved { library: String, name: String },
}

/// Session-wide registry of every library identity seen so far.
///
/// `SymbolTable` owns a single library's four namespaces; detecting a
/// duplicate `setCurrentLibrary` identity or a `includeLibrary` reference
/// to a library that was never parsed needs a view across *all* libraries
/// the session has touched, which is exactly what this registry tracks.
/// Callers share one `LibraryRegistry` across every `SymbolTable` built
/// during a parse session.
#[derive(Debug, Clone, Default)]
pub struct LibraryRegistry {
    /// Every library identity registered so far (named or synthetic).
    known: std::collections::HashSet<LibraryIdentifier>,
    /// Counter used to mint a globally-unique synthetic key per unnamed
    /// library (an unnamed library's definitions are effectively private,
    /// but it still needs an identity to register).
    unnamed_counter: u64,
}

impl LibraryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `setCurrentLibrary`'s identity half: register `id`, or mint a
    /// synthetic identity for an unnamed library. Fails with
    /// `AlreadyExists` if `id` names a library identity already
    /// registered this session.
    pub fn register(
        &mut self,
        id: Option<LibraryIdentifier>,
    ) -> Result<LibraryIdentifier, SymbolTableError> {
        match id {
            Some(identifier) => {
                if !self.known.insert(identifier.clone()) {
                    return Err(SymbolTableError::AlreadyExists {
                        name: identifier.id.clone(),
                    });
                }
                Ok(identifier)
            }
            None => {
                self.unnamed_counter += 1;
                let synthetic = LibraryIdentifier::new(format!("~unnamed~{}", self.unnamed_counter));
                self.known.insert(synthetic.clone());
                Ok(synthetic)
            }
        }
    }

    /// Whether `id` has been registered (i.e. some library was already
    /// parsed under that identity) — what `includeLibrary`'s `mustExist`
    /// check consults.
    pub fn contains(&self, id: &LibraryIdentifier) -> bool {
        self.known.contains(id)
    }
}

/// A symbol in the symbol table
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Symbol name
    pub name: String,
    /// Symbol kind
    pub kind: SymbolKind,
    /// Symbol type
    pub symbol_type: CqlType,
    /// Access level
    pub access: AccessLevel,
    /// Library where symbol is defined
    pub library: Option<String>,
    /// Documentation/description
    pub doc: Option<String>,
}

impl Symbol {
    /// Create a new symbol
    pub fn new(name: impl Into<String>, kind: SymbolKind, symbol_type: CqlType) -> Self {
        Self {
            name: name.into(),
            kind,
            symbol_type,
            access: AccessLevel::Public,
            library: None,
            doc: None,
        }
    }

    /// Set the access level
    pub fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    /// Set the library
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    /// Set the documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Kind of symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    /// Parameter definition
    Parameter,
    /// Expression definition
    ExpressionDef,
    /// Function definition
    FunctionDef(FunctionSignature),
    /// Code system definition
    CodeSystem,
    /// Value set definition
    ValueSet,
    /// Code definition
    Code,
    /// Concept definition
    Concept,
    /// Context (e.g., Patient, Practitioner)
    Context,
    /// Alias (query source alias)
    Alias,
    /// Let binding in query
    Let,
    /// Using definition (model)
    Using,
    /// Include definition (library)
    Include,
    /// Local variable
    Variable,
    /// Aggregate ($total)
    Aggregate,
    /// Iteration variable ($this)
    Iteration,
    /// Index variable ($index)
    Index,
}

/// Function signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Function parameters
    pub parameters: Vec<FunctionParameter>,
    /// Return type
    pub return_type: CqlType,
    /// Whether this is a fluent function
    pub fluent: bool,
    /// Whether this is an external function
    pub external: bool,
}

impl FunctionSignature {
    /// Create a new function signature
    pub fn new(parameters: Vec<FunctionParameter>, return_type: CqlType) -> Self {
        Self {
            parameters,
            return_type,
            fluent: false,
            external: false,
        }
    }

    /// Set fluent flag
    pub fn fluent(mut self) -> Self {
        self.fluent = true;
        self
    }

    /// Set external flag
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    /// Get parameter count
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub param_type: CqlType,
}

impl FunctionParameter {
    /// Create a new function parameter
    pub fn new(name: impl Into<String>, param_type: CqlType) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }
}

/// Access level for definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessLevel {
    /// Public access (default)
    #[default]
    Public,
    /// Private access
    Private,
}

/// Symbol table for managing definitions
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Symbols indexed by name
    symbols: IndexMap<String, Vec<Symbol>>,
    /// Library aliases (local name -> library identifier)
    library_aliases: IndexMap<String, LibraryRef>,
    /// Model aliases (local name -> model info)
    model_aliases: IndexMap<String, ModelRef>,
    /// Current context (e.g., "Patient")
    current_context: Option<String>,
    /// Library identifier
    library_id: Option<LibraryIdentifier>,
}

impl SymbolTable {
    /// Create a new symbol table
    pub fn new() -> Self {
        Self {
            symbols: IndexMap::new(),
            library_aliases: IndexMap::new(),
            model_aliases: IndexMap::new(),
            current_context: None,
            library_id: None,
        }
    }

    /// Set the library identifier
    pub fn set_library(&mut self, id: LibraryIdentifier) {
        self.library_id = Some(id);
    }

    /// `set_current_library`: establish the identity of the library whose
    /// four namespaces (public/private defs, public/private functions)
    /// subsequent `define`/`define_func` calls populate. `id` is `None`
    /// for an unnamed library, which still gets a globally-unique
    /// synthetic key from `registry`. Fails with `AlreadyExists` if `id`
    /// names a library identity `registry` has already seen this session.
    pub fn set_current_library(
        &mut self,
        id: Option<LibraryIdentifier>,
        registry: &mut LibraryRegistry,
    ) -> Result<(), SymbolTableError> {
        let resolved = registry.register(id)?;
        self.set_library(resolved);
        Ok(())
    }

    /// Get the library identifier
    pub fn library(&self) -> Option<&LibraryIdentifier> {
        self.library_id.as_ref()
    }

    /// Set the current context
    pub fn set_context(&mut self, context: impl Into<String>) {
        self.current_context = Some(context.into());
    }

    /// Get the current context
    pub fn context(&self) -> Option<&str> {
        self.current_context.as_deref()
    }

    /// Define a symbol, rejecting a name that collides with an include
    /// alias, or an exact duplicate (same name, and for functions the
    /// same parameter types) already present in the library's relevant
    /// namespace (`validateUnique`, §4.3).
    pub fn define(&mut self, symbol: Symbol) -> Result<(), SymbolTableError> {
        let name = symbol.name.clone();
        if self.library_aliases.contains_key(&name) {
            return Err(SymbolTableError::AlreadyExists { name });
        }
        if let Some(existing) = self.symbols.get(&name) {
            let duplicate = existing.iter().any(|s| match (&s.kind, &symbol.kind) {
                (SymbolKind::FunctionDef(a), SymbolKind::FunctionDef(b)) => {
                    a.parameters.iter().map(|p| &p.param_type).eq(
                        b.parameters.iter().map(|p| &p.param_type),
                    )
                }
                (SymbolKind::FunctionDef(_), _) | (_, SymbolKind::FunctionDef(_)) => false,
                _ => true,
            });
            if duplicate {
                return Err(SymbolTableError::AlreadyExists { name });
            }
        }
        self.symbols.entry(name).or_default().push(symbol);
        Ok(())
    }

    /// `define_func`: define a user-authored function overload.
    pub fn define_func(
        &mut self,
        name: impl Into<String>,
        signature: FunctionSignature,
        access: AccessLevel,
    ) -> Result<(), SymbolTableError> {
        self.define(
            Symbol::new(name, SymbolKind::FunctionDef(signature), CqlType::Any).with_access(access),
        )
    }

    /// `define_builtin_func`: define a system-operator overload. Builtins
    /// are always public and never conflict with a user's own overloads
    /// of the same name (the operator catalog, not this namespace, is
    /// consulted first for built-in dispatch); duplicate-builtin
    /// registration is still rejected.
    pub fn define_builtin_func(
        &mut self,
        name: impl Into<String>,
        signature: FunctionSignature,
    ) -> Result<(), SymbolTableError> {
        self.define_func(name, signature, AccessLevel::Public)
    }

    /// Look up a symbol by name
    ///
    /// For non-function symbols, returns the first match.
    /// For functions, all overloads are available via `lookup_all`.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name).and_then(|syms| syms.first())
    }

    /// Look up all symbols with a given name (for overloading)
    pub fn lookup_all(&self, name: &str) -> Option<&[Symbol]> {
        self.symbols.get(name).map(|v| v.as_slice())
    }

    /// Look up a qualified symbol (Library.Name): global resolution
    /// consults the named include's resolved table and its *public*
    /// surface only (§4.3) — a private definition in the included library
    /// is invisible here even if the name matches.
    pub fn lookup_qualified(&self, library: &str, name: &str) -> Option<&Symbol> {
        let lib_ref = self.library_aliases.get(library)?;
        let included = lib_ref.symbols.as_deref()?;
        included.symbols.get(name).and_then(|syms| {
            syms.iter().find(|s| s.access == AccessLevel::Public)
        })
    }

    /// Check if a symbol is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Register a library alias (from include statement)
    pub fn add_library_alias(&mut self, alias: impl Into<String>, lib_ref: LibraryRef) {
        self.library_aliases.insert(alias.into(), lib_ref);
    }

    /// `include_library`: register an included library under its local
    /// alias, rejecting a second `include` of the same alias bound to a
    /// different library identity (re-including the identical library is
    /// a no-op, matching CQL's own idempotent include semantics), and, if
    /// `must_exist` is set, rejecting an alias whose identity `registry`
    /// has never seen (§4.3: "Referring to a library that was never
    /// parsed fails with *does not exist*").
    pub fn include_library(
        &mut self,
        alias: impl Into<String>,
        lib_ref: LibraryRef,
        must_exist: bool,
        registry: &LibraryRegistry,
    ) -> Result<(), SymbolTableError> {
        let alias = alias.into();
        if must_exist && !registry.contains(&lib_ref.identifier) {
            return Err(SymbolTableError::NotExist {
                alias: lib_ref.identifier.id.clone(),
            });
        }
        if self.symbols.contains_key(&alias) {
            return Err(SymbolTableError::AlreadyExists { name: alias });
        }
        if let Some(existing) = self.library_aliases.get(&alias) {
            if existing.identifier != lib_ref.identifier {
                return Err(SymbolTableError::AlreadyExists { name: alias });
            }
            return Ok(());
        }
        self.library_aliases.insert(alias, lib_ref);
        Ok(())
    }

    /// Get a library reference by alias
    pub fn get_library(&self, alias: &str) -> Option<&LibraryRef> {
        self.library_aliases.get(alias)
    }

    /// `resolve_include`: look up an included library by its local alias.
    pub fn resolve_include(&self, alias: &str) -> Result<&LibraryRef, SymbolTableError> {
        self.library_aliases
            .get(alias)
            .ok_or_else(|| SymbolTableError::NotExist {
                alias: alias.to_string(),
            })
    }

    /// `public_defs`: all public (non-function) definitions visible to
    /// another library that includes this one.
    pub fn public_defs(&self) -> impl Iterator<Item = &Symbol> {
        self.all_symbols().filter(|s| {
            s.access == AccessLevel::Public && !matches!(s.kind, SymbolKind::FunctionDef(_))
        })
    }

    /// `public_and_private_defs`: every definition in this library,
    /// regardless of access level — used when resolving references from
    /// within the library's own scope.
    pub fn public_and_private_defs(&self) -> impl Iterator<Item = &Symbol> {
        self.all_symbols()
            .filter(|s| !matches!(s.kind, SymbolKind::FunctionDef(_)))
    }

    /// All public function overloads, across every registered name.
    pub fn public_funcs(&self) -> impl Iterator<Item = &Symbol> {
        self.all_symbols().filter(|s| {
            s.access == AccessLevel::Public && matches!(s.kind, SymbolKind::FunctionDef(_))
        })
    }

    /// Every function overload, public and private.
    pub fn public_and_private_funcs(&self) -> impl Iterator<Item = &Symbol> {
        self.all_symbols()
            .filter(|s| matches!(s.kind, SymbolKind::FunctionDef(_)))
    }

    /// Register a model alias (from using statement)
    pub fn add_model_alias(&mut self, alias: impl Into<String>, model_ref: ModelRef) {
        self.model_aliases.insert(alias.into(), model_ref);
    }

    /// Get a model reference by alias
    pub fn get_model(&self, alias: &str) -> Option<&ModelRef> {
        self.model_aliases.get(alias)
    }

    /// Get all defined symbol names
    pub fn all_names(&self) -> impl Iterator<Item = &String> {
        self.symbols.keys()
    }

    /// Get all symbols
    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values().flatten()
    }

    /// Get symbols by kind
    pub fn symbols_of_kind(&self, kind: &SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.all_symbols()
            .filter(move |s| std::mem::discriminant(&s.kind) == std::mem::discriminant(kind))
    }

    /// Get all function overloads for a name
    pub fn function_overloads(&self, name: &str) -> Vec<&FunctionSignature> {
        self.symbols
            .get(name)
            .map(|syms| {
                syms.iter()
                    .filter_map(|s| {
                        if let SymbolKind::FunctionDef(sig) = &s.kind {
                            Some(sig)
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove a symbol
    pub fn remove(&mut self, name: &str) {
        self.symbols.shift_remove(name);
    }

    /// Clear all symbols
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.library_aliases.clear();
        self.model_aliases.clear();
        self.current_context = None;
    }
}

/// Library identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryIdentifier {
    /// Library name/id
    pub id: String,
    /// System/namespace
    pub system: Option<String>,
    /// Version
    pub version: Option<String>,
}

impl LibraryIdentifier {
    /// Create a new library identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system: None,
            version: None,
        }
    }

    /// With version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// With system
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Reference to an included library
#[derive(Debug, Clone)]
pub struct LibraryRef {
    /// Library identifier
    pub identifier: LibraryIdentifier,
    /// Local alias
    pub local_alias: String,
    /// Resolved symbol table (populated during resolution)
    pub symbols: Option<Arc<SymbolTable>>,
}

impl LibraryRef {
    /// Create a new library reference
    pub fn new(identifier: LibraryIdentifier, local_alias: impl Into<String>) -> Self {
        Self {
            identifier,
            local_alias: local_alias.into(),
            symbols: None,
        }
    }
}

/// Reference to a using model
#[derive(Debug, Clone)]
pub struct ModelRef {
    /// Model name
    pub name: String,
    /// Model URI
    pub uri: Option<String>,
    /// Version
    pub version: Option<String>,
}

impl ModelRef {
    /// Create a new model reference
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: None,
            version: None,
        }
    }

    /// With URI
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// With version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table_basic() {
        let mut table = SymbolTable::new();

        // Define a parameter
        table.define(Symbol::new("MeasurementPeriod", SymbolKind::Parameter, CqlType::Interval(Box::new(CqlType::DateTime))));

        // Define an expression
        table.define(Symbol::new("InitialPopulation", SymbolKind::ExpressionDef, CqlType::list(CqlType::Any)));

        // Lookup
        assert!(table.is_defined("MeasurementPeriod"));
        assert!(table.is_defined("InitialPopulation"));
        assert!(!table.is_defined("Unknown"));

        let param = table.lookup("MeasurementPeriod").unwrap();
        assert_eq!(param.kind, SymbolKind::Parameter);
    }

    #[test]
    fn test_function_overloads() {
        let mut table = SymbolTable::new();

        // Define two overloads of a function
        let sig1 = FunctionSignature::new(
            vec![FunctionParameter::new("x", CqlType::Integer)],
            CqlType::Integer,
        );
        let sig2 = FunctionSignature::new(
            vec![FunctionParameter::new("x", CqlType::Decimal)],
            CqlType::Decimal,
        );

        table.define(Symbol::new("Abs", SymbolKind::FunctionDef(sig1), CqlType::Integer));
        table.define(Symbol::new("Abs", SymbolKind::FunctionDef(sig2), CqlType::Decimal));

        // Get overloads
        let overloads = table.function_overloads("Abs");
        assert_eq!(overloads.len(), 2);
    }

    #[test]
    fn test_library_aliases() {
        let mut table = SymbolTable::new();

        let lib_ref = LibraryRef::new(
            LibraryIdentifier::new("MATGlobalCommonFunctions").with_version("1.0.0"),
            "Global",
        );

        table.add_library_alias("Global", lib_ref);

        assert!(table.get_library("Global").is_some());
        assert!(table.get_library("Unknown").is_none());
    }

    #[test]
    fn test_lookup_qualified_only_sees_included_librarys_public_surface() {
        let mut included = SymbolTable::new();
        included.define(Symbol::new("HelperFn", SymbolKind::ExpressionDef, CqlType::Integer))
            .unwrap();
        included
            .define(
                Symbol::new("PrivateHelper", SymbolKind::ExpressionDef, CqlType::Integer)
                    .with_access(AccessLevel::Private),
            )
            .unwrap();

        let mut includer = SymbolTable::new();
        let identifier = LibraryIdentifier::new("Common").with_version("1.0.0");
        let mut lib_ref = LibraryRef::new(identifier.clone(), "Common");
        lib_ref.symbols = Some(Arc::new(included));

        let mut registry = LibraryRegistry::new();
        registry.register(Some(identifier)).unwrap();
        includer
            .include_library("Common", lib_ref, true, &registry)
            .unwrap();

        assert!(includer.lookup_qualified("Common", "HelperFn").is_some());
        assert!(includer.lookup_qualified("Common", "PrivateHelper").is_none());
        assert!(includer.lookup_qualified("Common", "NoSuchDef").is_none());
        assert!(includer.lookup_qualified("NotIncluded", "HelperFn").is_none());
    }

    #[test]
    fn test_set_current_library_rejects_duplicate_identity() {
        let mut registry = LibraryRegistry::new();
        let mut first = SymbolTable::new();
        let mut second = SymbolTable::new();

        let id = LibraryIdentifier::new("Common").with_version("1.0.0");
        first.set_current_library(Some(id.clone()), &mut registry).unwrap();

        let err = second
            .set_current_library(Some(id), &mut registry)
            .unwrap_err();
        assert_eq!(err, SymbolTableError::AlreadyExists { name: "Common".to_string() });
    }

    #[test]
    fn test_set_current_library_unnamed_gets_unique_synthetic_key() {
        let mut registry = LibraryRegistry::new();
        let mut a = SymbolTable::new();
        let mut b = SymbolTable::new();

        a.set_current_library(None, &mut registry).unwrap();
        b.set_current_library(None, &mut registry).unwrap();

        assert_ne!(a.library().unwrap().id, b.library().unwrap().id);
    }

    #[test]
    fn test_include_library_must_exist_rejects_never_parsed_library() {
        let registry = LibraryRegistry::new();
        let mut includer = SymbolTable::new();
        let lib_ref = LibraryRef::new(
            LibraryIdentifier::new("NeverParsed").with_version("1.0.0"),
            "NP",
        );

        let err = includer
            .include_library("NP", lib_ref, true, &registry)
            .unwrap_err();
        assert_eq!(err, SymbolTableError::NotExist { alias: "NeverParsed".to_string() });
    }

    #[test]
    fn test_define_rejects_name_colliding_with_include_alias() {
        let mut registry = LibraryRegistry::new();
        let identifier = LibraryIdentifier::new("Common").with_version("1.0.0");
        registry.register(Some(identifier.clone())).unwrap();

        let mut table = SymbolTable::new();
        let lib_ref = LibraryRef::new(identifier, "Common");
        table.include_library("Common", lib_ref, true, &registry).unwrap();

        let err = table
            .define(Symbol::new("Common", SymbolKind::ExpressionDef, CqlType::Integer))
            .unwrap_err();
        assert_eq!(err, SymbolTableError::AlreadyExists { name: "Common".to_string() });
    }
}
