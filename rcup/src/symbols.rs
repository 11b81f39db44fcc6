//! The symbol table and the non-terminal table.
//!
//! Terminals and non-terminals share one namespace.  Every symbol lives in a single arena,
//! indexed by `SymbolId`, in the order it was declared.  The arena begins with three reserved
//! symbols: `EOF`, `error`, and `$START`.  Of these only `error` has an entry in the name index,
//! so it is the only one a specification can refer to (or try to redeclare).

use crate::errors::DuplicateSymbolDeclaration;
use crate::production::ProductionPart;
use crate::{ProductionId, SymbolId};
use core::fmt;
use log::debug;
use std::collections::HashMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Terminal => f.write_str("terminal"),
            SymbolKind::NonTerminal => f.write_str("non-terminal"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,

    /// The type given in the declaration, e.g. `Integer` in `terminal Integer NUM;`.  RCUP does
    /// not interpret it.
    pub ty: Option<String>,

    /// Position among the symbols of the same kind, in declaration order.  `EOF` is terminal 0,
    /// `error` is terminal 1, and `$START` is non-terminal 0.
    pub kind_index: usize,

    use_count: usize,
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }

    pub fn is_non_terminal(&self) -> bool {
        self.kind == SymbolKind::NonTerminal
    }

    /// The number of times this symbol appears on the right-hand side of a production,
    /// including the start production.
    pub fn use_count(&self) -> usize {
        self.use_count
    }
}

/// The index of the first symbol that came from a declaration.
const FIRST_DECLARED: usize = 3;

#[derive(Clone, Debug)]
pub struct SymbolTable {
    /// All symbols, reserved ones first.  Index = SymbolId.
    symbols: Vec<Symbol>,

    /// Names that a specification can refer to.
    names: HashMap<String, SymbolId>,

    nterminals: usize,
    nnonterminals: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = Self {
            symbols: Vec::new(),
            names: HashMap::new(),
            nterminals: 0,
            nnonterminals: 0,
        };

        table.push("EOF", SymbolKind::Terminal, None);
        table.push("error", SymbolKind::Terminal, None);
        table.push("$START", SymbolKind::NonTerminal, None);
        debug_assert_eq!(table.symbols.len(), FIRST_DECLARED);

        // Only `error` can be named by a grammar.
        table.names.insert("error".to_string(), SymbolId::ERROR);
        table
    }

    fn push(&mut self, name: &str, kind: SymbolKind, ty: Option<&str>) -> SymbolId {
        let kind_index = match kind {
            SymbolKind::Terminal => {
                self.nterminals += 1;
                self.nterminals - 1
            }
            SymbolKind::NonTerminal => {
                self.nnonterminals += 1;
                self.nnonterminals - 1
            }
        };
        let id = SymbolId::from(self.symbols.len());
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            ty: ty.map(|t| t.to_string()),
            kind_index,
            use_count: 0,
        });
        id
    }

    fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        ty: Option<&str>,
    ) -> Result<SymbolId, DuplicateSymbolDeclaration> {
        if let Some(&existing) = self.names.get(name) {
            return Err(DuplicateSymbolDeclaration {
                name: name.to_string(),
                previous: self.symbols[existing.index()].kind,
            });
        }

        let id = self.push(name, kind, ty);
        self.names.insert(name.to_string(), id);
        debug!("declared {} {} = {}", kind, name, id);
        Ok(id)
    }

    /// Declares a terminal.  Fails if the name is already declared, as anything.
    pub fn declare_terminal(
        &mut self,
        name: &str,
        ty: Option<&str>,
    ) -> Result<SymbolId, DuplicateSymbolDeclaration> {
        self.declare(name, SymbolKind::Terminal, ty)
    }

    /// Declares a non-terminal, and enters it in the non-terminal table.  Fails if the name is
    /// already declared, as anything.
    pub fn declare_nonterminal(
        &mut self,
        name: &str,
        ty: Option<&str>,
        non_terminals: &mut NonTerminalTable,
    ) -> Result<SymbolId, DuplicateSymbolDeclaration> {
        let id = self.declare(name, SymbolKind::NonTerminal, ty)?;
        non_terminals.insert(name, id);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }

    /// Looks up a name for use on the right-hand side of a production.
    pub fn resolve(&self, name: &str) -> Option<ProductionPart> {
        self.lookup(name).map(ProductionPart::symbol)
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn name(&self, id: SymbolId) -> &str {
        &self.symbols[id.index()].name
    }

    pub fn note_use(&mut self, id: SymbolId) {
        self.symbols[id.index()].use_count += 1;
    }

    /// The number of names a grammar can refer to: every declared symbol, plus `error`.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The number of symbols declared by the grammar itself.
    pub fn declared_len(&self) -> usize {
        self.symbols.len() - FIRST_DECLARED
    }

    /// Total number of symbols, including the reserved ones.
    pub fn nsyms(&self) -> usize {
        self.symbols.len()
    }

    pub fn nterminals(&self) -> usize {
        self.nterminals
    }

    pub fn nnonterminals(&self) -> usize {
        self.nnonterminals
    }

    /// All symbols, reserved ones included, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId::from(i), s))
    }

    /// The symbols that were declared by the grammar, in declaration order.
    pub fn declared(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.iter().skip(FIRST_DECLARED)
    }

    pub fn terminals(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.iter().filter(|(_, s)| s.is_terminal())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The non-terminals, indexed by name.  Also records which productions each non-terminal heads.
#[derive(Clone, Debug, Default)]
pub struct NonTerminalTable {
    names: HashMap<String, SymbolId>,
    order: Vec<SymbolId>,
    productions: HashMap<SymbolId, Vec<ProductionId>>,
}

impl NonTerminalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, id: SymbolId) {
        self.names.insert(name.to_string(), id);
        self.order.push(id);
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.order.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The declared non-terminals, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.order.iter().copied()
    }

    pub(crate) fn add_production(&mut self, lhs: SymbolId, production: ProductionId) {
        self.productions
            .entry(lhs)
            .or_insert_with(Vec::new)
            .push(production);
    }

    /// The productions whose left-hand side is `lhs`, in the order they were finalized.
    pub fn productions_for(&self, lhs: SymbolId) -> &[ProductionId] {
        match self.productions.get(&lhs) {
            Some(list) => list,
            None => &[],
        }
    }
}
