//! String interning for identifiers and type names
//!
//! Every class, method, attribute and variable name in the AST is stored as
//! a small `Symbol`. Equal text always interns to the same symbol, so name
//! comparison during checking is a single integer compare.

use rustc_hash::FxHashMap;
use std::num::NonZeroU32;

/// Handle for a name stored in an `Interner`; resolve it to get the text back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(NonZeroU32);

impl Symbol {
    #[inline]
    fn from_raw(raw: u32) -> Self {
        // Index 0 is stored as 1
        Symbol(NonZeroU32::MIN.saturating_add(raw))
    }

    #[inline]
    fn to_raw(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Name table for one program; owns the text behind every `Symbol`
#[derive(Debug, Clone)]
pub struct Interner {
    /// Text to handle, for deduplication
    map: FxHashMap<String, Symbol>,

    /// Text of each symbol, in intern order
    strings: Vec<String>,
}

impl Interner {
    /// Empty name table
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::new(),
        }
    }

    /// Symbol for `s`, adding it on first sight
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }

        let sym = Symbol::from_raw(self.strings.len() as u32);
        let text = s.to_owned();
        self.map.insert(text.clone(), sym);
        self.strings.push(text);
        sym
    }

    /// Symbol for `s` if it has been seen, without adding it
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.map.get(s).copied()
    }

    /// Text of `sym`.
    ///
    /// `sym` must come from this table; a foreign symbol indexes out of range.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.to_raw()]
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
