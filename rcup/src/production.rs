//! Productions, and the builder that accumulates the right-hand side of one alternative.

use crate::errors::CapacityExceeded;
use crate::symbols::SymbolTable;
use crate::{ProductionId, SymbolId};
use log::debug;

/// One element of a right-hand side.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProductionPart {
    /// A reference to a declared terminal or non-terminal.  `label` is the name given with
    /// `sym:label`, through which action code can refer to the symbol's value.
    Symbol {
        symbol: SymbolId,
        label: Option<String>,
    },

    /// Action code.  It has no meaning to the grammar.
    Action { code: String },
}

impl ProductionPart {
    pub fn symbol(symbol: SymbolId) -> Self {
        ProductionPart::Symbol {
            symbol,
            label: None,
        }
    }

    pub fn action(code: impl Into<String>) -> Self {
        ProductionPart::Action { code: code.into() }
    }

    /// Attaches a label.  Only symbol parts can carry a label; an action part is returned
    /// unchanged.
    pub fn with_label(self, label: String) -> Self {
        match self {
            ProductionPart::Symbol { symbol, .. } => ProductionPart::Symbol {
                symbol,
                label: Some(label),
            },
            action @ ProductionPart::Action { .. } => action,
        }
    }

    pub fn as_symbol(&self) -> Option<SymbolId> {
        match self {
            ProductionPart::Symbol { symbol, .. } => Some(*symbol),
            ProductionPart::Action { .. } => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            ProductionPart::Symbol { label, .. } => label.as_deref(),
            ProductionPart::Action { .. } => None,
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self, ProductionPart::Action { .. })
    }
}

/// One finalized alternative: `lhs ::= parts...`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Production {
    index: ProductionId,
    lhs: SymbolId,
    parts: Vec<ProductionPart>,
}

impl Production {
    /// The position of this production in the grammar, counting from zero in the order the
    /// productions were finalized.
    pub fn index(&self) -> ProductionId {
        self.index
    }

    pub fn lhs(&self) -> SymbolId {
        self.lhs
    }

    pub fn parts(&self) -> &[ProductionPart] {
        &self.parts
    }

    /// The symbols of the right-hand side, with the actions left out.
    pub fn rhs_symbols<'a>(&'a self) -> impl Iterator<Item = SymbolId> + 'a {
        self.parts.iter().filter_map(|p| p.as_symbol())
    }

    /// The action at the very end of the right-hand side, if there is one.  This is the action
    /// that runs when the production is reduced.
    pub fn trailing_action(&self) -> Option<&str> {
        match self.parts.last() {
            Some(ProductionPart::Action { code }) => Some(code),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rhs_symbols().next().is_none()
    }

    pub fn to_string(&self, symbols: &SymbolTable) -> String {
        let mut s = format!("{} ::=", symbols.name(self.lhs));
        for part in self.parts.iter() {
            match part {
                ProductionPart::Symbol { symbol, label } => {
                    s.push(' ');
                    s.push_str(symbols.name(*symbol));
                    if let Some(label) = label {
                        s.push(':');
                        s.push_str(label);
                    }
                }
                ProductionPart::Action { code } => {
                    s.push_str(" {:");
                    s.push_str(code);
                    s.push_str(":}");
                }
            }
        }
        s
    }
}

/// The augmented start production, `$START ::= start EOF`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StartProduction {
    start: SymbolId,
}

impl StartProduction {
    pub(crate) fn new(start: SymbolId) -> Self {
        Self { start }
    }

    /// The start symbol the grammar chose.
    pub fn start(&self) -> SymbolId {
        self.start
    }

    pub fn lhs(&self) -> SymbolId {
        SymbolId::START
    }

    pub fn rhs(&self) -> [SymbolId; 2] {
        [self.start, SymbolId::EOF]
    }

    pub fn to_string(&self, symbols: &SymbolTable) -> String {
        format!(
            "{} ::= {} {}",
            symbols.name(SymbolId::START),
            symbols.name(self.start),
            symbols.name(SymbolId::EOF)
        )
    }
}

/// Accumulates the parts of one alternative.
///
/// Call `start_rhs` before the first part of every alternative, then `push_part` for each part,
/// then `finalize` exactly once.
#[derive(Debug)]
pub struct ProductionBuilder {
    parts: Vec<ProductionPart>,
    capacity: usize,

    /// Set when a push was refused.  The alternative will not be finalized.
    overflowed: bool,
}

impl ProductionBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            parts: Vec::new(),
            capacity,
            overflowed: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn start_rhs(&mut self) {
        self.parts.clear();
        self.overflowed = false;
    }

    /// Appends a part, attaching `label` if the part is a symbol.  If the alternative is already
    /// full, the part is not added and the alternative is marked as overflowed.
    pub fn push_part(
        &mut self,
        part: ProductionPart,
        label: Option<String>,
    ) -> Result<(), CapacityExceeded> {
        if self.parts.len() >= self.capacity {
            self.overflowed = true;
            return Err(CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let part = match label {
            Some(label) => part.with_label(label),
            None => part,
        };
        self.parts.push(part);
        Ok(())
    }

    /// Turns the accumulated parts into a production.  Returns `None`, and produces nothing, if
    /// the left-hand side could not be resolved or the alternative overflowed.  Either way, the
    /// builder is empty afterward.
    pub fn finalize(&mut self, lhs: Option<SymbolId>, index: ProductionId) -> Option<Production> {
        let parts = core::mem::take(&mut self.parts);
        let overflowed = core::mem::replace(&mut self.overflowed, false);

        let lhs = match lhs {
            Some(lhs) => lhs,
            None => {
                debug!("discarding alternative with {} parts: no lhs", parts.len());
                return None;
            }
        };
        if overflowed {
            debug!("discarding alternative: too many parts");
            return None;
        }

        Some(Production { index, lhs, parts })
    }
}
