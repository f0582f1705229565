//!
//! Mask pattern compiler.
//!
//! A pattern is compiled against a [ClassMap] that maps mask symbols to
//! character classes. Symbols become editable slots, everything else
//! becomes a literal. `\` escapes the next char to a literal.
//!

use crate::{upos_type, MaskError};
use dyn_clone::DynClone;
use rustc_hash::FxHashMap;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// Default placeholder for unfilled editable slots.
pub const DEFAULT_MASK_CHAR: char = '_';

/// Escape marker in a mask pattern.
pub const ESCAPE_CHAR: char = '\\';

/// Validation predicate for a custom character class.
///
/// Blanket-implemented for cloneable closures, so a plain
/// `|c: char| c.is_ascii_hexdigit()` registers directly.
pub trait ClassTest: DynClone {
    /// Valid input for this class.
    fn test(&self, c: char) -> bool;
}

dyn_clone::clone_trait_object!(ClassTest);

impl<F> ClassTest for F
where
    F: Fn(char) -> bool + Clone,
{
    fn test(&self, c: char) -> bool {
        self(c)
    }
}

/// Character class of one editable slot.
#[allow(variant_size_differences)]
#[derive(Clone)]
#[non_exhaustive]
pub enum CharClass {
    /// 0-9
    Digit,
    /// Alphabetic.
    Letter,
    /// Letter or digit.
    Alnum,
    /// Accepts anything.
    Any,
    /// Custom predicate.
    Custom(Box<dyn ClassTest>),
}

impl Debug for CharClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CharClass::Digit => write!(f, "Digit"),
            CharClass::Letter => write!(f, "Letter"),
            CharClass::Alnum => write!(f, "Alnum"),
            CharClass::Any => write!(f, "Any"),
            CharClass::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl CharClass {
    /// Valid input for this class.
    #[inline]
    pub fn is_valid(&self, c: char) -> bool {
        match self {
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::Letter => c.is_alphabetic(),
            CharClass::Alnum => c.is_alphanumeric(),
            CharClass::Any => true,
            CharClass::Custom(t) => t.test(c),
        }
    }
}

/// Maps mask symbols to character classes.
///
/// The default map knows `9` for digits, `a` for letters and `*` for
/// letters or digits.
#[derive(Debug, Clone)]
pub struct ClassMap {
    map: FxHashMap<char, CharClass>,
}

impl Default for ClassMap {
    fn default() -> Self {
        let mut map = FxHashMap::default();
        map.insert('9', CharClass::Digit);
        map.insert('a', CharClass::Letter);
        map.insert('*', CharClass::Alnum);
        Self { map }
    }
}

impl ClassMap {
    /// Map with the default symbols.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map without any symbols.
    pub fn empty() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Add or replace a symbol.
    pub fn set(&mut self, symbol: char, class: CharClass) -> &mut Self {
        self.map.insert(symbol, class);
        self
    }

    /// Remove a symbol. The symbol then compiles to a literal.
    pub fn unset(&mut self, symbol: char) -> &mut Self {
        self.map.remove(&symbol);
        self
    }

    /// Class for a symbol.
    pub fn get(&self, symbol: char) -> Option<&CharClass> {
        self.map.get(&symbol)
    }
}

/// One slot of a compiled mask.
#[allow(variant_size_differences)]
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Slot {
    /// Fixed char. Never holds user input.
    Literal(char),
    /// Editable, validated by the class.
    Editable(CharClass),
}

impl Slot {
    #[inline]
    pub fn is_editable(&self) -> bool {
        matches!(self, Slot::Editable(_))
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Slot::Literal(_))
    }

    /// Valid input for this slot. Literal slots match only themselves.
    #[inline]
    pub fn accepts(&self, c: char) -> bool {
        match self {
            Slot::Literal(l) => *l == c,
            Slot::Editable(class) => class.is_valid(c),
        }
    }
}

/// A compiled mask. Length is fixed for its lifetime, changing the
/// pattern means compiling a new mask.
#[derive(Debug, Clone)]
pub struct InputMask {
    slots: Vec<Slot>,
    mask_char: Option<char>,
    always_show: bool,
}

impl InputMask {
    /// Compile a pattern with the default symbol map.
    pub fn parse(pattern: &str) -> Result<InputMask, MaskError> {
        Self::parse_with(pattern, &ClassMap::default())
    }

    /// Compile a pattern.
    ///
    /// Scans left to right. A symbol known to the map becomes an
    /// editable slot, any other char a literal. [ESCAPE_CHAR] forces
    /// the next char to a literal, a trailing escape is taken verbatim.
    ///
    /// Fails only for an empty pattern.
    pub fn parse_with(pattern: &str, classes: &ClassMap) -> Result<InputMask, MaskError> {
        if pattern.is_empty() {
            return Err(MaskError::InvalidPattern);
        }

        let mut slots = Vec::new();
        let mut esc = false;
        for c in pattern.chars() {
            if esc {
                esc = false;
                slots.push(Slot::Literal(c));
            } else if c == ESCAPE_CHAR {
                esc = true;
            } else {
                match classes.get(c) {
                    Some(class) => slots.push(Slot::Editable(class.clone())),
                    None => slots.push(Slot::Literal(c)),
                }
            }
        }
        if esc {
            slots.push(Slot::Literal(ESCAPE_CHAR));
        }

        Ok(InputMask {
            slots,
            mask_char: Some(DEFAULT_MASK_CHAR),
            always_show: false,
        })
    }

    /// Placeholder char. None switches to shift mode: unfilled slots
    /// are not rendered and deletions close the gap.
    pub fn with_mask_char(mut self, mask_char: Option<char>) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Render placeholders even for an unfocused, empty value.
    pub fn with_always_show(mut self, always_show: bool) -> Self {
        self.always_show = always_show;
        self
    }

    pub fn mask_char(&self) -> Option<char> {
        self.mask_char
    }

    pub fn always_show(&self) -> bool {
        self.always_show
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> upos_type {
        self.slots.len() as upos_type
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot at pos.
    ///
    /// Panic
    /// Panics if pos is out of bounds.
    #[inline]
    pub fn slot(&self, pos: upos_type) -> &Slot {
        &self.slots[pos as usize]
    }

    #[inline]
    pub fn is_editable(&self, pos: upos_type) -> bool {
        self.slots[pos as usize].is_editable()
    }

    /// Valid input at pos. Literal slots match only themselves,
    /// editable slots run the class predicate.
    #[inline]
    pub fn accepts(&self, pos: upos_type, c: char) -> bool {
        self.slots[pos as usize].accepts(c)
    }

    /// First editable position.
    pub fn first_editable(&self) -> Option<upos_type> {
        self.next_editable(0)
    }

    /// Last editable position.
    pub fn last_editable(&self) -> Option<upos_type> {
        self.slots
            .iter()
            .rposition(|s| s.is_editable())
            .map(|i| i as upos_type)
    }

    /// First editable position at or after pos.
    pub fn next_editable(&self, pos: upos_type) -> Option<upos_type> {
        self.slots
            .iter()
            .enumerate()
            .skip(pos as usize)
            .find(|(_, s)| s.is_editable())
            .map(|(i, _)| i as upos_type)
    }

    /// Last editable position strictly before pos.
    pub fn prev_editable(&self, pos: upos_type) -> Option<upos_type> {
        self.slots[..(pos as usize).min(self.slots.len())]
            .iter()
            .rposition(|s| s.is_editable())
            .map(|i| i as upos_type)
    }
}
