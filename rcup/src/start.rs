//! Chooses the start symbol and synthesizes the start production.
//!
//! There are two ways to choose: a `start with X;` directive, or, failing that, the left-hand
//! side of the first production.  The directive always comes before the productions, so if it is
//! present it is seen first and wins.  Both paths go through `synthesize`, which runs at most
//! once per grammar.

use crate::errors::MissingDeclaration;
use crate::production::StartProduction;
use crate::symbols::NonTerminalTable;
use crate::SymbolId;
use log::debug;

#[derive(Clone, Debug, Eq, PartialEq)]
enum State {
    /// Nothing has chosen a start symbol yet.
    Pending,
    /// `start with` named something that is not a non-terminal.  There will be no start
    /// production.
    Failed,
    Synthesized(StartProduction),
}

#[derive(Clone, Debug)]
pub struct StartResolver {
    state: State,
}

impl StartResolver {
    pub fn new() -> Self {
        Self {
            state: State::Pending,
        }
    }

    /// True once a start directive or a first production has been seen.  Later ones have no
    /// effect.
    pub fn is_decided(&self) -> bool {
        self.state != State::Pending
    }

    pub fn chosen(&self) -> Option<SymbolId> {
        self.start_production().map(|p| p.start())
    }

    pub fn start_production(&self) -> Option<StartProduction> {
        match &self.state {
            State::Synthesized(p) => Some(*p),
            _ => None,
        }
    }

    /// Handles `start with name;`.  The caller must not call this after a previous directive or
    /// after the first production; such a call changes nothing.
    pub fn explicit_start(
        &mut self,
        name: &str,
        non_terminals: &NonTerminalTable,
    ) -> Result<SymbolId, MissingDeclaration> {
        match non_terminals.lookup(name) {
            Some(nt) => {
                self.synthesize(nt);
                Ok(nt)
            }
            None => {
                if self.state == State::Pending {
                    self.state = State::Failed;
                }
                Err(MissingDeclaration {
                    name: name.to_string(),
                })
            }
        }
    }

    /// Called when the first production of the grammar is finalized.  Does nothing if a start
    /// directive was already seen, whether or not it succeeded.
    pub fn implicit_start(&mut self, first_lhs: SymbolId) {
        self.synthesize(first_lhs);
    }

    fn synthesize(&mut self, start: SymbolId) {
        if self.state != State::Pending {
            return;
        }
        debug!("start production: $START ::= {} EOF", start);
        self.state = State::Synthesized(StartProduction::new(start));
    }
}

impl Default for StartResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolTable;

    fn tables() -> (SymbolTable, NonTerminalTable, SymbolId, SymbolId) {
        let mut symbols = SymbolTable::new();
        let mut nts = NonTerminalTable::new();
        let a = symbols.declare_nonterminal("a", None, &mut nts).unwrap();
        let b = symbols.declare_nonterminal("b", None, &mut nts).unwrap();
        symbols.declare_terminal("T", None).unwrap();
        (symbols, nts, a, b)
    }

    #[test]
    fn implicit_takes_first() {
        let (_, _, a, b) = tables();
        let mut r = StartResolver::new();
        assert!(!r.is_decided());
        r.implicit_start(a);
        r.implicit_start(b);
        assert_eq!(r.chosen(), Some(a));
        assert_eq!(r.start_production().unwrap().rhs(), [a, SymbolId::EOF]);
    }

    #[test]
    fn explicit_wins() {
        let (_, nts, a, b) = tables();
        let mut r = StartResolver::new();
        assert_eq!(r.explicit_start("b", &nts), Ok(b));
        r.implicit_start(a);
        assert_eq!(r.chosen(), Some(b));
        assert_eq!(r.start_production().unwrap().lhs(), SymbolId::START);
    }

    #[test]
    fn explicit_and_implicit_agree() {
        let (_, nts, a, _) = tables();
        let mut explicit = StartResolver::new();
        explicit.explicit_start("a", &nts).unwrap();
        let mut implicit = StartResolver::new();
        implicit.implicit_start(a);
        assert_eq!(explicit.start_production(), implicit.start_production());
    }

    #[test]
    fn missing_start_suppresses_synthesis() {
        let (_, nts, a, _) = tables();
        let mut r = StartResolver::new();
        let err = r.explicit_start("nowhere", &nts).unwrap_err();
        assert_eq!(err.name, "nowhere");
        assert!(r.is_decided());
        r.implicit_start(a);
        assert_eq!(r.start_production(), None);
    }

    #[test]
    fn terminal_is_not_a_start_symbol() {
        let (_, nts, _, _) = tables();
        let mut r = StartResolver::new();
        assert!(r.explicit_start("T", &nts).is_err());
        assert_eq!(r.chosen(), None);
    }
}
