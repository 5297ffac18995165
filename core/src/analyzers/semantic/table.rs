use std::collections::{BTreeMap, HashSet};

use crate::error::MinicErrorExt;
use crate::location::{Location, Span};

/// Variables known to be assigned (or bound as parameters) in one scope.
type Scope = HashSet<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub name: String,
    pub params: Vec<String>,
    pub location: Option<Location>,
    pub span: Option<Span>,
}

impl FunctionSymbol {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

pub struct SymbolTable {
    scopes: Vec<Scope>,
    functions: BTreeMap<String, FunctionSymbol>,
    /// Declaration order, used for reporting.
    order: Vec<String>,
    diagnostics: Vec<Box<dyn MinicErrorExt>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashSet::new()],
            functions: BTreeMap::new(),
            order: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// ------- Scope Helpers -------

    pub fn enter_scope(&mut self, names: Scope) {
        self.scopes.push(names);
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn is_global_scope(&self) -> bool {
        self.scopes.len() == 1
    }

    /// Add names to the innermost scope.
    pub fn define_variables(&mut self, names: Scope) {
        if let Some(current) = self.scopes.last_mut() {
            current.extend(names);
        }
    }

    /// Lookup in the innermost scope only; function bodies do not see
    /// top-level variables.
    pub fn variable_exists(&self, name: &str) -> bool {
        self.scopes.last().is_some_and(|scope| scope.contains(name))
    }

    /// ------- Function Helpers -------

    /// Returns the previous declaration when `symbol` redeclares a name.
    pub fn insert_function(&mut self, symbol: FunctionSymbol) -> Option<FunctionSymbol> {
        if let Some(existing) = self.functions.get(&symbol.name) {
            return Some(existing.clone());
        }
        self.order.push(symbol.name.clone());
        self.functions.insert(symbol.name.clone(), symbol);
        None
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionSymbol> {
        self.functions.get(name)
    }

    pub fn functions_in_order(&self) -> Vec<&FunctionSymbol> {
        self.order.iter().filter_map(|n| self.functions.get(n)).collect()
    }

    /// ------- Diagnostics -------

    pub fn push_diagnostic(&mut self, diag: Box<dyn MinicErrorExt>) {
        self.diagnostics.push(diag);
    }

    pub fn take_diagnostics(&mut self) -> Vec<Box<dyn MinicErrorExt>> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_scope_hides_globals() {
        let mut tbl = SymbolTable::new();
        tbl.define_variables(HashSet::from(["x".to_string()]));
        assert!(tbl.variable_exists("x"));
        tbl.enter_scope(HashSet::from(["a".to_string()]));
        assert!(!tbl.is_global_scope());
        assert!(!tbl.variable_exists("x"));
        assert!(tbl.variable_exists("a"));
        tbl.exit_scope();
        tbl.exit_scope();
        assert!(tbl.is_global_scope());
        assert!(tbl.variable_exists("x"));
    }

    #[test]
    fn duplicate_function_returns_first_declaration() {
        let mut tbl = SymbolTable::new();
        let f = |params: &[&str]| FunctionSymbol {
            name: "f".into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            location: None,
            span: None,
        };
        assert!(tbl.insert_function(f(&["a"])).is_none());
        let previous = tbl.insert_function(f(&[])).expect("duplicate");
        assert_eq!(previous.arity(), 1);
        assert_eq!(tbl.functions_in_order().len(), 1);
    }
}
