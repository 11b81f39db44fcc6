//! `GrammarBuilder` holds everything that one compilation run accumulates, and has one method
//! for each event the reader produces.
//!
//! The reader (or any other driver) calls these methods in textual order.  Problems are reported
//! to the builder's `ErrorSink` as they are found, and the builder always stays consistent: a
//! bad declaration is ignored, a reference to an unknown symbol is dropped, and an alternative
//! that cannot be finalized is discarded.

use crate::errors::{Diagnostics, ErrorKind, ErrorSink, GrammarError};
use crate::grammar::{CodeKind, GrammarModel};
use crate::name::MultipartName;
use crate::production::{Production, ProductionBuilder, ProductionPart};
use crate::start::StartResolver;
use crate::symbols::{NonTerminalTable, SymbolKind, SymbolTable};
use crate::{Config, ProductionId, SymbolId};
use log::debug;

pub struct GrammarBuilder<S: ErrorSink = Diagnostics> {
    config: Config,
    sink: S,

    symbols: SymbolTable,
    non_terminals: NonTerminalTable,
    name: MultipartName,
    rhs: ProductionBuilder,
    start: StartResolver,
    productions: Vec<Production>,

    package: Option<String>,
    imports: Vec<String>,
    code: [Option<String>; 4],
    debug_hook: Option<String>,

    /// The left-hand side of the production being read.  None if there is no production being
    /// read, or if its left-hand side did not resolve.
    current_lhs: Option<SymbolId>,
    current_lhs_name: String,

    /// Set by the first `begin_production`.  A start directive after this point is an error.
    in_productions: bool,
}

impl GrammarBuilder<Diagnostics> {
    pub fn new(config: Config) -> Self {
        Self::with_sink(config, Diagnostics::new())
    }
}

impl<S: ErrorSink> GrammarBuilder<S> {
    pub fn with_sink(config: Config, sink: S) -> Self {
        let rhs = ProductionBuilder::new(config.rhs_capacity);
        Self {
            config,
            sink,
            symbols: SymbolTable::new(),
            non_terminals: NonTerminalTable::new(),
            name: MultipartName::new(),
            rhs,
            start: StartResolver::new(),
            productions: Vec::new(),
            package: None,
            imports: Vec::new(),
            code: [None, None, None, None],
            debug_hook: None,
            current_lhs: None,
            current_lhs_name: String::new(),
            in_productions: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn error_count(&self) -> usize {
        self.sink.error_count()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn non_terminals(&self) -> &NonTerminalTable {
        &self.non_terminals
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn start_symbol(&self) -> Option<SymbolId> {
        self.start.chosen()
    }

    /// The accumulator for the dotted name being read.  The method that consumes the name
    /// (`set_package`, `add_import`, `set_debug_hook`, `take_type_id`) resets it.
    pub fn name(&mut self) -> &mut MultipartName {
        &mut self.name
    }

    pub fn report(&mut self, error: GrammarError) {
        self.sink.emit_error(error);
    }

    pub fn syntax_error(&mut self, message: impl Into<String>, context: Option<String>) {
        self.report(GrammarError::syntax(message, context));
    }

    fn warn(&mut self, message: String) {
        self.sink.emit_warning(message);
    }

    /// Throws away anything half-read: a partial dotted name, a partial alternative, and the
    /// production it belonged to.  Used when the reader gives up on a statement.
    pub fn reset_transient(&mut self) {
        self.name.reset();
        self.abandon_alternative();
        self.end_production();
    }

    pub fn set_package(&mut self) {
        let package = self.name.take_and_reset();
        if self.package.is_some() {
            self.syntax_error("package is declared more than once", Some(package));
            return;
        }
        debug!("package {}", package);
        self.package = Some(package);
    }

    pub fn add_import(&mut self) {
        let import = self.name.take_and_reset();
        debug!("import {}", import);
        self.imports.push(import);
    }

    pub fn set_debug_hook(&mut self) {
        let hook = self.name.take_and_reset();
        if self.debug_hook.is_some() {
            self.syntax_error("redundant debug hook (skipping)", Some(hook));
            return;
        }
        debug!("debug with {}", hook);
        self.debug_hook = Some(hook);
    }

    pub fn take_type_id(&mut self) -> String {
        self.name.take_and_reset()
    }

    /// Stores one of the code parts.  Each may be given only once; a repeat is an error and is
    /// ignored.
    pub fn set_code(&mut self, kind: CodeKind, code: String) {
        let slot = &mut self.code[kind.index()];
        if slot.is_some() {
            self.syntax_error(format!("redundant {} (skipping)", kind), None);
            return;
        }
        debug!("{}: {} bytes", kind, code.len());
        *slot = Some(code);
    }

    pub fn declare_terminal(&mut self, name: &str, ty: Option<&str>) -> Option<SymbolId> {
        match self.symbols.declare_terminal(name, ty) {
            Ok(id) => Some(id),
            Err(e) => {
                self.report(GrammarError::from(e).with_context(name));
                None
            }
        }
    }

    pub fn declare_nonterminal(&mut self, name: &str, ty: Option<&str>) -> Option<SymbolId> {
        match self
            .symbols
            .declare_nonterminal(name, ty, &mut self.non_terminals)
        {
            Ok(id) => Some(id),
            Err(e) => {
                self.report(GrammarError::from(e).with_context(name));
                None
            }
        }
    }

    pub fn declare(&mut self, kind: SymbolKind, name: &str, ty: Option<&str>) -> Option<SymbolId> {
        match kind {
            SymbolKind::Terminal => self.declare_terminal(name, ty),
            SymbolKind::NonTerminal => self.declare_nonterminal(name, ty),
        }
    }

    /// Handles `start with name;`.
    pub fn explicit_start(&mut self, name: &str) {
        let message = if self.in_productions {
            Some("start symbol must be specified before the productions")
        } else if self.start.is_decided() {
            Some("start symbol is specified more than once")
        } else {
            None
        };
        if let Some(message) = message {
            self.syntax_error(message, Some(name.to_string()));
            return;
        }

        match self.start.explicit_start(name, &self.non_terminals) {
            Ok(id) => {
                debug!("using '{}' as start symbol", name);
                self.symbols.note_use(id);
            }
            Err(e) => self.report(GrammarError::from(e).with_context(name)),
        }
    }

    /// Begins the productions for `lhs ::= ...`.  If `lhs` is not a declared non-terminal, the
    /// error is reported here, and every alternative of this production will be discarded.
    pub fn begin_production(&mut self, lhs: &str) {
        self.in_productions = true;
        self.current_lhs_name = lhs.to_string();
        self.current_lhs = self.non_terminals.lookup(lhs);
        if self.current_lhs.is_some() {
            return;
        }

        let message = match self.symbols.lookup(lhs) {
            Some(id) if self.symbols.get(id).is_terminal() => format!(
                "'{}' is a terminal, and cannot be the left-hand side of a production",
                lhs
            ),
            _ => format!("left-hand side '{}' has not been declared", lhs),
        };
        self.report(
            GrammarError::new(ErrorKind::UndeclaredSymbolReference, message).with_context(lhs),
        );
    }

    pub fn end_production(&mut self) {
        self.current_lhs = None;
        self.current_lhs_name.clear();
    }

    pub fn start_alternative(&mut self) {
        self.rhs.start_rhs();
    }

    pub fn abandon_alternative(&mut self) {
        self.rhs.start_rhs();
    }

    /// Adds `name` (or `name:label`) to the alternative being read.  An undeclared name is
    /// reported and left out of the alternative.
    pub fn push_symbol(&mut self, name: &str, label: Option<String>) {
        match self.symbols.resolve(name) {
            Some(part) => self.push(part, label),
            None => self.report(
                GrammarError::new(
                    ErrorKind::UndeclaredSymbolReference,
                    format!("symbol '{}' has not been declared", name),
                )
                .with_context(name),
            ),
        }
    }

    pub fn push_action(&mut self, code: String) {
        self.push(ProductionPart::action(code), None);
    }

    fn push(&mut self, part: ProductionPart, label: Option<String>) {
        // Report the overflow only once per alternative.
        if self.rhs.overflowed() {
            return;
        }
        if let Err(e) = self.rhs.push_part(part, label) {
            let context = self.current_lhs_name.clone();
            self.report(GrammarError::from(e).with_context(context));
        }
    }

    /// Finishes the alternative being read.  The first production that is finalized decides the
    /// start symbol, unless `start with` already did.
    pub fn end_alternative(&mut self) -> Option<ProductionId> {
        let index = ProductionId::from(self.productions.len());
        let production = self.rhs.finalize(self.current_lhs, index)?;
        let lhs = production.lhs();

        for symbol in production.rhs_symbols() {
            self.symbols.note_use(symbol);
        }
        self.non_terminals.add_production(lhs, index);

        if self.productions.is_empty() && !self.start.is_decided() {
            self.start.implicit_start(lhs);
            self.symbols.note_use(lhs);
            debug!("using '{}' as start symbol", self.symbols.name(lhs));
        }

        debug!("production {}: {}", index, production.to_string(&self.symbols));
        self.productions.push(production);
        Some(index)
    }

    /// Runs the end-of-grammar checks and produces the model, along with the sink.
    pub fn finish(mut self) -> (GrammarModel, S) {
        if self.productions.is_empty() {
            self.syntax_error("grammar defines no productions", None);
        }

        let mut warnings = Vec::new();
        for (id, sym) in self.symbols.declared() {
            if self.config.warn_unused && sym.use_count() == 0 {
                warnings.push(format!("{} '{}' is declared but never used", sym.kind, sym.name));
            }
            if sym.is_non_terminal() && self.non_terminals.productions_for(id).is_empty() {
                warnings.push(format!("non-terminal '{}' has no productions", sym.name));
            }
        }
        for w in warnings {
            self.warn(w);
        }

        let model = GrammarModel {
            package: self.package.unwrap_or_default(),
            imports: self.imports,
            code: self.code,
            debug_hook: self.debug_hook,
            symbols: self.symbols,
            non_terminals: self.non_terminals,
            productions: self.productions,
            start: self.start.start_production(),
        };
        model.print_grammar();
        (model, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc() -> GrammarBuilder {
        let mut b = GrammarBuilder::new(Config::default());
        b.declare_terminal("NUM", Some("Integer"));
        b.declare_terminal("PLUS", None);
        b.declare_nonterminal("E", Some("Integer"));
        b
    }

    #[test]
    fn implicit_start_from_first_production() {
        let mut b = calc();
        b.begin_production("E");
        b.start_alternative();
        b.push_symbol("E", Some("l".to_string()));
        b.push_symbol("PLUS", None);
        b.push_symbol("E", Some("r".to_string()));
        assert_eq!(b.end_alternative(), Some(ProductionId(0)));
        b.start_alternative();
        b.push_symbol("NUM", None);
        assert_eq!(b.end_alternative(), Some(ProductionId(1)));
        b.end_production();

        let (g, d) = b.finish();
        assert_eq!(d.error_count(), 0);
        assert_eq!(d.warning_count(), 0);
        assert_eq!(g.productions().len(), 2);
        assert_eq!(g.start_production_to_string().unwrap(), "$START ::= E EOF");
    }

    #[test]
    fn undeclared_rhs_symbol_is_dropped() {
        let mut b = calc();
        b.begin_production("E");
        b.start_alternative();
        b.push_symbol("NUM", None);
        b.push_symbol("MINUS", None);
        b.push_symbol("NUM", None);
        b.end_alternative();
        b.end_production();

        let (g, d) = b.finish();
        assert_eq!(d.count(ErrorKind::UndeclaredSymbolReference), 1);
        assert_eq!(
            g.production_to_string(&g.productions()[0]),
            "E ::= NUM NUM"
        );
    }

    #[test]
    fn undeclared_lhs_discards_alternatives() {
        let mut b = calc();
        b.begin_production("F");
        b.start_alternative();
        b.push_symbol("NUM", None);
        assert_eq!(b.end_alternative(), None);
        b.start_alternative();
        assert_eq!(b.end_alternative(), None);
        b.end_production();

        b.begin_production("NUM");
        b.start_alternative();
        assert_eq!(b.end_alternative(), None);
        b.end_production();

        assert_eq!(b.error_count(), 2);
        assert!(b.productions().is_empty());
        assert_eq!(b.start_symbol(), None);
    }

    #[test]
    fn capacity_reported_once() {
        let mut b = GrammarBuilder::new(Config {
            rhs_capacity: 2,
            ..Config::default()
        });
        b.declare_terminal("A", None);
        b.declare_nonterminal("s", None);
        b.begin_production("s");
        b.start_alternative();
        for _ in 0..5 {
            b.push_symbol("A", None);
        }
        assert_eq!(b.end_alternative(), None);
        b.start_alternative();
        b.push_symbol("A", None);
        assert_eq!(b.end_alternative(), Some(ProductionId(0)));
        b.end_production();

        let (g, d) = b.finish();
        assert_eq!(d.count(ErrorKind::CapacityExceeded), 1);
        assert_eq!(d.error_count(), 1);
        assert_eq!(g.productions().len(), 1);
        // The discarded alternative does not count as a use.
        assert_eq!(g.symbols().get(g.symbols().lookup("A").unwrap()).use_count(), 1);
    }

    #[test]
    fn duplicate_declaration_keeps_first() {
        let mut b = calc();
        assert_eq!(b.declare_nonterminal("NUM", None), None);
        assert_eq!(b.declare_terminal("E", None), None);
        assert_eq!(b.sink().count(ErrorKind::DuplicateSymbolDeclaration), 2);
        assert!(b.symbols().get(b.symbols().lookup("NUM").unwrap()).is_terminal());
        assert_eq!(b.non_terminals().len(), 1);
    }

    #[test]
    fn explicit_start() {
        let mut b = calc();
        b.declare_nonterminal("T", None);
        b.explicit_start("T");
        b.explicit_start("E");
        assert_eq!(b.sink().count(ErrorKind::SyntaxError), 1);
        assert_eq!(b.start_symbol(), b.symbols().lookup("T"));
    }

    #[test]
    fn start_after_productions() {
        let mut b = calc();
        assert_eq!(b.config().rhs_capacity, crate::DEFAULT_RHS_CAPACITY);

        // No production was finalized, so nothing has chosen a start symbol yet.
        b.begin_production("F");
        b.start_alternative();
        assert_eq!(b.end_alternative(), None);
        b.end_production();
        b.explicit_start("E");

        assert_eq!(b.sink().count(ErrorKind::SyntaxError), 1);
        assert_eq!(
            b.sink().errors()[1].message,
            "start symbol must be specified before the productions"
        );
        assert_eq!(b.start_symbol(), None);
    }

    #[test]
    fn missing_start() {
        let mut b = calc();
        b.explicit_start("X");
        b.begin_production("E");
        b.start_alternative();
        b.push_symbol("NUM", None);
        b.end_alternative();
        b.end_production();

        let (g, d) = b.finish();
        assert_eq!(d.count(ErrorKind::MissingDeclaration), 1);
        assert!(g.start_production().is_none());
        assert_eq!(g.productions().len(), 1);
    }

    #[test]
    fn code_parts_and_names() {
        let mut b = calc();
        b.name().append("calc");
        b.set_package();
        b.name().append("java");
        b.name().append("util");
        b.name().append_wildcard();
        b.add_import();
        assert!(b.name().is_empty());
        b.set_code(CodeKind::Action, "int x;".to_string());
        b.set_code(CodeKind::Action, "int y;".to_string());
        b.name().append("trace");
        b.set_debug_hook();

        let (g, d) = b.finish();
        assert_eq!(d.count(ErrorKind::SyntaxError), 2); // redundant code, no productions
        assert_eq!(g.package(), "calc");
        assert_eq!(g.imports(), &["java.util.*".to_string()]);
        assert_eq!(g.code(CodeKind::Action), Some("int x;"));
        assert_eq!(g.code(CodeKind::Scan), None);
        assert_eq!(g.debug_hook(), Some("trace"));
    }

    #[test]
    fn unused_warnings() {
        let mut b = calc();
        b.declare_nonterminal("orphan", None);
        b.begin_production("E");
        b.start_alternative();
        b.push_symbol("NUM", None);
        b.end_alternative();
        b.end_production();

        let (_, d) = b.finish();
        assert_eq!(d.error_count(), 0);
        let w = d.warnings();
        assert!(w.contains(&"terminal 'PLUS' is declared but never used".to_string()));
        assert!(w.contains(&"non-terminal 'orphan' is declared but never used".to_string()));
        assert!(w.contains(&"non-terminal 'orphan' has no productions".to_string()));
        assert_eq!(w.len(), 3);
    }
}
