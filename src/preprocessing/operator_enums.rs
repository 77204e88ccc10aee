//! Contains enum structures for the different kinds of operators, predicates, and variable
//! kinds occurring in a first-order formula.

use std::fmt;

/// Enum of the kinds a named variable can take in a formula tree.
///
/// Only `Individual` variables with `bound == false` are ever bound by first-order
/// unification. `Parameter` variables are Skolem constants that no substitution may
/// rewrite. `Function` and `Predicate` variables are symbol heads for applications.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum VariableKind {
    Individual,
    Function,
    Predicate,
    Metavar,
    Parameter,
}

/// Enum for the two quantifier symbols.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum Quantifier {
    Forall, // '\forall'
    Exists, // '\exists'
}

impl Quantifier {
    /// The dual quantifier, used when a negation is pushed through a binder.
    pub fn dual(self) -> Quantifier {
        match self {
            Quantifier::Forall => Quantifier::Exists,
            Quantifier::Exists => Quantifier::Forall,
        }
    }
}

/// Enum for all binary logical connectives.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum LogicalBinaryOp {
    And,     // '\wedge'
    Or,      // '\vee'
    Implies, // '\implies'
    Iff,     // '\iff'
}

/// Enum for logical constants and the set-theoretic constant symbols.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum ConstantSymbol {
    Top,      // '\top'
    Bot,      // '\bot'
    EmptySet, // '\emptyset'
}

/// Enum for unary set-operation symbol heads.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum SetUnaryOp {
    PowerSet, // '\mathcal{P}'
}

/// Enum for binary set-operation symbol heads.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum SetBinaryOp {
    Cap,      // '\cap'
    Cup,      // '\cup'
    SetMinus, // '\setminus'
    Times,    // '\times'
}

/// Enum for unary predicate symbol heads.
///
/// `IsSet` is the structural typing predicate used by special-implication guards.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum UnaryPredSymbol {
    IsSet, // '\mathrm{set}'
}

/// Enum for binary predicate symbol heads.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum BinaryPredSymbol {
    Equals,   // '='
    Subset,   // '\subset'
    SubsetEq, // '\subseteq'
    Elem,     // '\in'
}

/// Operator associativity, used when deciding parenthesization during display.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// Operator fixity: infix binary symbols versus functionally applied ones.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Fixity {
    Infix,
    Functional,
    None,
}

/// Precedence data for a displayed symbol. Lower binds stronger.
#[derive(Clone, Copy, Debug)]
pub struct PrecedenceInfo {
    pub precedence: u32,
    pub associativity: Associativity,
    pub fixity: Fixity,
    /// Re-parsable representation of the symbol.
    pub repr: &'static str,
    /// Unicode representation for user display.
    pub unicode: &'static str,
}

const fn prec(
    precedence: u32,
    associativity: Associativity,
    fixity: Fixity,
    repr: &'static str,
    unicode: &'static str,
) -> PrecedenceInfo {
    PrecedenceInfo {
        precedence,
        associativity,
        fixity,
        repr,
        unicode,
    }
}

impl Quantifier {
    pub fn precedence_info(self) -> PrecedenceInfo {
        match self {
            Quantifier::Forall => prec(0, Associativity::None, Fixity::None, "\\forall", "∀"),
            Quantifier::Exists => prec(0, Associativity::None, Fixity::None, "\\exists", "∃"),
        }
    }
}

impl LogicalBinaryOp {
    pub fn precedence_info(self) -> PrecedenceInfo {
        match self {
            LogicalBinaryOp::And => prec(4, Associativity::Left, Fixity::Infix, "\\wedge", "∧"),
            LogicalBinaryOp::Or => prec(4, Associativity::Left, Fixity::Infix, "\\vee", "∨"),
            LogicalBinaryOp::Implies => {
                prec(5, Associativity::Right, Fixity::Infix, "\\implies", "→")
            }
            LogicalBinaryOp::Iff => prec(6, Associativity::None, Fixity::Infix, "\\iff", "↔"),
        }
    }
}

impl ConstantSymbol {
    pub fn precedence_info(self) -> PrecedenceInfo {
        match self {
            ConstantSymbol::Top => prec(0, Associativity::None, Fixity::None, "\\top", "⊤"),
            ConstantSymbol::Bot => prec(0, Associativity::None, Fixity::None, "\\bot", "⊥"),
            ConstantSymbol::EmptySet => {
                prec(0, Associativity::None, Fixity::None, "\\emptyset", "∅")
            }
        }
    }
}

impl SetUnaryOp {
    pub fn precedence_info(self) -> PrecedenceInfo {
        match self {
            SetUnaryOp::PowerSet => {
                prec(0, Associativity::None, Fixity::Functional, "\\mathcal{P}", "𝒫")
            }
        }
    }
}

impl SetBinaryOp {
    pub fn precedence_info(self) -> PrecedenceInfo {
        match self {
            SetBinaryOp::Cap => prec(2, Associativity::Left, Fixity::Infix, "\\cap", "∩"),
            SetBinaryOp::Cup => prec(2, Associativity::Left, Fixity::Infix, "\\cup", "∪"),
            SetBinaryOp::SetMinus => {
                prec(2, Associativity::Left, Fixity::Infix, "\\setminus", "∖")
            }
            SetBinaryOp::Times => prec(2, Associativity::Left, Fixity::Infix, "\\times", "×"),
        }
    }
}

impl UnaryPredSymbol {
    pub fn precedence_info(self) -> PrecedenceInfo {
        match self {
            UnaryPredSymbol::IsSet => {
                prec(0, Associativity::None, Fixity::Functional, "\\mathrm{set}", "set")
            }
        }
    }
}

impl BinaryPredSymbol {
    pub fn precedence_info(self) -> PrecedenceInfo {
        match self {
            BinaryPredSymbol::Equals => prec(3, Associativity::None, Fixity::Infix, "=", "="),
            BinaryPredSymbol::Subset => {
                prec(3, Associativity::None, Fixity::Infix, "\\subset", "⊂")
            }
            BinaryPredSymbol::SubsetEq => {
                prec(3, Associativity::None, Fixity::Infix, "\\subseteq", "⊆")
            }
            BinaryPredSymbol::Elem => prec(3, Associativity::None, Fixity::Infix, "\\in", "∈"),
        }
    }
}

/// Precedence data of the negation symbol (it is not part of any operator enum since it is
/// the only unary connective).
pub fn not_precedence_info() -> PrecedenceInfo {
    prec(1, Associativity::None, Fixity::Functional, "\\neg", "¬")
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.precedence_info().unicode)
    }
}

impl fmt::Display for LogicalBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.precedence_info().unicode)
    }
}

impl fmt::Display for ConstantSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.precedence_info().unicode)
    }
}

impl fmt::Display for SetUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.precedence_info().unicode)
    }
}

impl fmt::Display for SetBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.precedence_info().unicode)
    }
}

impl fmt::Display for UnaryPredSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.precedence_info().unicode)
    }
}

impl fmt::Display for BinaryPredSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.precedence_info().unicode)
    }
}
