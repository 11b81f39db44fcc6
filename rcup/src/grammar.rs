use crate::production::{Production, StartProduction};
use crate::symbols::{NonTerminalTable, SymbolTable};
use crate::{ProductionId, SymbolId};
use core::fmt;
use log::debug;
use log::log_enabled;

/// The four blocks of code that a specification can pass through to the generated parser.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CodeKind {
    /// `action code {: ... :}`
    Action,
    /// `parser code {: ... :}`
    Parser,
    /// `init with {: ... :}`
    Init,
    /// `scan with {: ... :}`
    Scan,
}

impl CodeKind {
    pub(crate) fn index(self) -> usize {
        match self {
            CodeKind::Action => 0,
            CodeKind::Parser => 1,
            CodeKind::Init => 2,
            CodeKind::Scan => 3,
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodeKind::Action => "action code",
            CodeKind::Parser => "parser code",
            CodeKind::Init => "init code",
            CodeKind::Scan => "scan code",
        })
    }
}

// Defines a grammar, as read from a specification.  A grammar has these elements:
//
//     * a set of terminals and non-terminals, sharing one namespace
//     * a list of productions, in the form A ::= B C ..., where A is a non-terminal and B and C
//       are any combination of terminals, non-terminals, and action code
//     * the start production, $START ::= S EOF, where S is the start symbol
//     * the package, imports, and code blocks, which are passed through to code generation
//
// The productions are numbered in the order they appear in the specification.  The start
// production is not in the list; table construction adds it as it sees fit.
#[derive(Clone, Debug)]
pub struct GrammarModel {
    pub(crate) package: String,
    pub(crate) imports: Vec<String>,
    pub(crate) code: [Option<String>; 4],
    pub(crate) debug_hook: Option<String>,
    pub(crate) symbols: SymbolTable,
    pub(crate) non_terminals: NonTerminalTable,
    pub(crate) productions: Vec<Production>,
    pub(crate) start: Option<StartProduction>,
}

impl GrammarModel {
    /// The package name, or an empty string if none was given.
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn code(&self, kind: CodeKind) -> Option<&str> {
        self.code[kind.index()].as_deref()
    }

    pub fn debug_hook(&self) -> Option<&str> {
        self.debug_hook.as_deref()
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

    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id.index()]
    }

    /// The productions for one non-terminal, in the order they were written.
    pub fn productions_for<'a>(
        &'a self,
        lhs: SymbolId,
    ) -> impl Iterator<Item = &'a Production> + 'a {
        self.non_terminals
            .productions_for(lhs)
            .iter()
            .map(move |&id| self.production(id))
    }

    pub fn start_production(&self) -> Option<&StartProduction> {
        self.start.as_ref()
    }

    pub fn start_symbol(&self) -> Option<SymbolId> {
        self.start.map(|p| p.start())
    }

    pub fn production_to_string(&self, production: &Production) -> String {
        production.to_string(&self.symbols)
    }

    pub fn start_production_to_string(&self) -> Option<String> {
        self.start.map(|p| p.to_string(&self.symbols))
    }

    pub fn print_grammar(&self) {
        if !log_enabled!(log::Level::Debug) {
            return;
        }

        debug!(
            "symbols: nterminals={} nnonterminals={} nsyms={}",
            self.symbols.nterminals(),
            self.symbols.nnonterminals(),
            self.symbols.nsyms()
        );
        for (id, sym) in self.symbols.iter() {
            let kind = if sym.is_terminal() { "term" } else { "nonterm" };
            match &sym.ty {
                Some(ty) => debug!("    {:3}  {:7} {} : {}", id, kind, sym.name, ty),
                None => debug!("    {:3}  {:7} {}", id, kind, sym.name),
            }
        }

        debug!("");
        debug!("productions:");
        if let Some(start) = self.start_production_to_string() {
            debug!("    [start]  {}", start);
        }
        for p in self.productions.iter() {
            debug!("    [p{:-3} ]  {}", p.index(), self.production_to_string(p));
        }
        debug!("");
    }
}
