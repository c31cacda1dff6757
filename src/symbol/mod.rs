//! Scoped symbol table (module B).
//!
//! A fixed-size hash table of symbol-chain buckets (DJB2, `N = 1000`
//! buckets) per scope, with scopes forming a parent-linked stack. Scopes are
//! owned by an arena (`SymbolTable::scopes`) keyed by `ScopeId` rather than
//! freed on `exit_scope`, because the code generator re-queries function
//! scopes for return types after analysis has already left them
//! (spec.md §3.4, §5, §9).

use crate::ast::DataType;
use crate::error::SymbolTableError;

/// Number of hash buckets per scope, matching the reference table size.
const BUCKET_COUNT: usize = 1000;

/// Opaque handle to a scope within a `SymbolTable`. Only meaningful in the
/// table that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The outermost scope of any table, created by `SymbolTable::new`.
    pub const GLOBAL: ScopeId = ScopeId(0);
}

/// DJB2: `h = 5381; h = h*33 + c` for each byte, bucket = `h mod N`.
fn djb2_bucket(name: &str) -> usize {
    let mut hash: u32 = 5381;
    for byte in name.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u32);
    }
    (hash as usize) % BUCKET_COUNT
}

/// A bound name. Variables, arrays, and functions all share one symbol
/// shape and one per-scope namespace (spec.md §3.3).
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    /// Scalar type; for arrays this is the element type.
    pub data_type: DataType,
    pub is_array: bool,
    pub array_size: usize,
    pub is_function: bool,
    /// Meaningful only when `is_function` is true.
    pub return_type: DataType,
    /// Reserved for a future backend; unused by this emitter.
    pub address: Option<usize>,
}

impl Symbol {
    fn variable(name: String, data_type: DataType) -> Self {
        Symbol {
            name,
            data_type,
            is_array: false,
            array_size: 0,
            is_function: false,
            return_type: DataType::Void,
            address: None,
        }
    }
}

struct Scope {
    parent: Option<ScopeId>,
    level: usize,
    buckets: Vec<Vec<Symbol>>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, level: usize) -> Self {
        Scope {
            parent,
            level,
            buckets: (0..BUCKET_COUNT).map(|_| Vec::new()).collect(),
        }
    }
}

pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// `createTable()`: an empty table with only the global scope (level 0,
    /// no parent).
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(None, 0)],
        }
    }

    pub fn global_scope(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    /// `enterScope(curr)`: allocate a new empty child scope one level
    /// deeper than `curr`.
    pub fn enter_scope(&mut self, current: ScopeId) -> ScopeId {
        let level = self.scopes[current.0].level + 1;
        self.scopes.push(Scope::new(Some(current), level));
        let id = ScopeId(self.scopes.len() - 1);
        log::trace!("entered scope {} (level {level})", id.0);
        id
    }

    /// `exitScope(curr)`: returns the parent scope id. The exited scope is
    /// never freed (see module docs) — codegen may still query it.
    pub fn exit_scope(&self, current: ScopeId) -> ScopeId {
        let parent = self.scopes[current.0].parent.unwrap_or(ScopeId::GLOBAL);
        log::trace!("exited scope {} -> {}", current.0, parent.0);
        parent
    }

    fn add(
        &mut self,
        scope: ScopeId,
        name: &str,
        build: impl FnOnce(String) -> Symbol,
    ) -> Result<&Symbol, SymbolTableError> {
        if self.lookup_current_scope(scope, name).is_some() {
            return Err(SymbolTableError::Redeclaration(name.to_string()));
        }
        let bucket = djb2_bucket(name);
        let symbol = build(name.to_string());
        let bucket_vec = &mut self.scopes[scope.0].buckets[bucket];
        // Newest insertion at head of the chain.
        bucket_vec.insert(0, symbol);
        Ok(&bucket_vec[0])
    }

    /// `addSymbol`: fails with `Redeclaration` if `name` already exists in
    /// `scope` (parent scopes are not consulted — shadowing is allowed).
    pub fn add_symbol(
        &mut self,
        scope: ScopeId,
        name: &str,
        data_type: DataType,
    ) -> Result<&Symbol, SymbolTableError> {
        self.add(scope, name, |name| Symbol::variable(name, data_type))
    }

    pub fn add_array_symbol(
        &mut self,
        scope: ScopeId,
        name: &str,
        elem_type: DataType,
        size: usize,
    ) -> Result<&Symbol, SymbolTableError> {
        self.add(scope, name, |name| Symbol {
            is_array: true,
            array_size: size,
            ..Symbol::variable(name, elem_type)
        })
    }

    pub fn add_function_symbol(
        &mut self,
        scope: ScopeId,
        name: &str,
        return_type: DataType,
    ) -> Result<&Symbol, SymbolTableError> {
        self.add(scope, name, |name| Symbol {
            is_function: true,
            return_type,
            ..Symbol::variable(name, DataType::Void)
        })
    }

    /// `lookupSymbolCurrentScope`: only the given scope's own bucket chain
    /// is searched.
    pub fn lookup_current_scope(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let bucket = djb2_bucket(name);
        self.scopes[scope.0].buckets[bucket]
            .iter()
            .find(|s| s.name == name)
    }

    /// `lookupSymbol`: walks the parent chain until a hit or the root is
    /// exhausted.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(symbol) = self.lookup_current_scope(id, name) {
                return Some(symbol);
            }
            current = self.scopes[id.0].parent;
        }
        None
    }

    /// Bucket-major traversal (bucket 0 first, chain head-to-tail, then
    /// bucket 1, …) of a single scope. This order is observable in the TAC
    /// preamble and is part of the stable golden-file contract
    /// (spec.md §6).
    pub fn iter_scope(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> {
        self.scopes[scope.0].buckets.iter().flatten()
    }

    pub fn scope_level(&self, scope: ScopeId) -> usize {
        self.scopes[scope.0].level
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, scope) in self.scopes.iter().enumerate() {
            writeln!(f, "scope {idx} (level {}):", scope.level)?;
            for symbol in scope.buckets.iter().flatten() {
                writeln!(f, "  {symbol:?}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        table.add_symbol(global, "x", DataType::Int).unwrap();
        let err = table.add_symbol(global, "x", DataType::Float).unwrap_err();
        assert_eq!(err, SymbolTableError::Redeclaration("x".to_string()));
    }

    #[test]
    fn shadowing_across_scopes_is_allowed() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        table.add_symbol(global, "x", DataType::Int).unwrap();
        let inner = table.enter_scope(global);
        table.add_symbol(inner, "x", DataType::Bool).unwrap();

        assert_eq!(table.lookup(inner, "x").unwrap().data_type, DataType::Bool);
        assert_eq!(table.lookup(global, "x").unwrap().data_type, DataType::Int);
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        table.add_symbol(global, "counter", DataType::Int).unwrap();
        let inner = table.enter_scope(global);

        assert!(table.lookup_current_scope(inner, "counter").is_none());
        assert!(table.lookup(inner, "counter").is_some());
    }

    #[test]
    fn exited_scope_is_still_queryable() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        let func_scope = table.enter_scope(global);
        table
            .add_function_symbol(func_scope, "helper", DataType::Int)
            .unwrap();
        let back_to = table.exit_scope(func_scope);
        assert_eq!(back_to, global);

        // The exited scope was never freed: codegen can still query it.
        assert!(table.lookup(func_scope, "helper").is_some());
    }

    #[test]
    fn bucket_iteration_is_newest_first_within_a_bucket() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        // Pick two names that collide in the same bucket.
        let (a, b) = find_colliding_pair();
        table.add_symbol(global, &a, DataType::Int).unwrap();
        table.add_symbol(global, &b, DataType::Int).unwrap();

        let names: Vec<_> = table.iter_scope(global).map(|s| s.name.clone()).collect();
        assert_eq!(names, vec![b, a]);
    }

    fn find_colliding_pair() -> (String, String) {
        let mut seen = std::collections::HashMap::new();
        for i in 0..10_000 {
            let name = format!("v{i}");
            let bucket = djb2_bucket(&name);
            if let Some(first) = seen.get(&bucket) {
                return (first.clone(), name);
            }
            seen.insert(bucket, name);
        }
        panic!("no colliding pair found in search space");
    }
}
