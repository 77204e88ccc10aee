//! A single line of the proof tableau, together with its justification metadata.

use crate::manipulation::variables::RewriteOrientation;
use crate::preprocessing::fol_tree::FolTreeNode;

/// Enumeration representing reasons for justifications of tableau lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reason {
    Hypothesis,
    Target,
    ModusPonens,
    ModusTollens,
    ConjunctiveIdempotence,
    DisjunctiveIdempotence,
    SplitConjunction,
    SplitDisjunctiveImplication,
    SplitConjunctiveImplication,
    NegatedImplication,
    MaterialEquivalence,
    ConditionalPremise,
    SplitDisjunction,
    EqualitySubst,
}

/// Origin of a tableau line: part of the current problem, or loaded from a library.
///
/// Library lines are skipped by the cleanup passes of the main proof (they were
/// already normalized when loaded) but remain usable by the reasoning moves.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineRole {
    #[default]
    Normal,
    Theorem,
    Definition,
}

/// Represents a single line in the tableau.
///
/// A line is appended once and its index never changes; moves only flip the metadata
/// flags. `formula` holds the canonical form of the assertion; for target lines,
/// `negation` keeps a copy of the formula before negation for printing and re-use.
#[derive(Clone, Debug)]
pub struct TableauLine {
    /// Whether this line is a target rather than a hypothesis.
    pub target: bool,
    /// Whether the line is still live for the currently selected targets.
    pub active: bool,
    /// Stronger than `!active`: the line has been discharged or subsumed.
    pub dead: bool,
    /// Whether this implication has already been used forward.
    pub split: bool,
    pub role: LineRole,
    pub formula: FolTreeNode,
    pub negation: Option<FolTreeNode>,
    /// How this line was derived, and from which lines.
    pub justification: (Reason, Vec<usize>),
    /// Signed case-split markers: `+n` means line `n` (1-based) was assumed true,
    /// `-n` assumed false.
    pub assumptions: Vec<i32>,
    /// Indices of targets for which this hypothesis is meaningful; empty means
    /// unrestricted.
    pub restrictions: Vec<usize>,
    /// Cache of predicate/function symbols occurring in the formula.
    pub constants: Vec<String>,
    /// Target lines this implication has already been tried against.
    pub applied_units: Vec<usize>,
    /// Lines this equality has already been used to rewrite.
    pub rewrites_applied: Vec<usize>,
    /// Pairs `(prior line, this line)` whose formulas unify with this line's negation,
    /// recorded by the closure detector.
    pub unifications: Vec<(usize, usize)>,
    /// Rewrite-direction heuristic flags, for equality and implication lines.
    pub orientation: Option<RewriteOrientation>,
}

impl TableauLine {
    /// Create a hypothesis line for the given formula.
    pub fn hypothesis(formula: FolTreeNode) -> TableauLine {
        TableauLine {
            target: false,
            active: true,
            dead: false,
            split: false,
            role: LineRole::Normal,
            formula,
            negation: None,
            justification: (Reason::Hypothesis, Vec::new()),
            assumptions: Vec::new(),
            restrictions: Vec::new(),
            constants: Vec::new(),
            applied_units: Vec::new(),
            rewrites_applied: Vec::new(),
            unifications: Vec::new(),
            orientation: None,
        }
    }

    /// Create a target line; `formula` is the negated goal, `negation` the original.
    pub fn target(formula: FolTreeNode, negation: FolTreeNode) -> TableauLine {
        TableauLine {
            target: true,
            negation: Some(negation),
            justification: (Reason::Target, Vec::new()),
            ..TableauLine::hypothesis(formula)
        }
    }

    pub fn is_theorem(&self) -> bool {
        self.role == LineRole::Theorem
    }

    pub fn is_definition(&self) -> bool {
        self.role == LineRole::Definition
    }

    /// Format the justification of this line, with one-based line numbers.
    pub fn justification_string(&self) -> String {
        let (reason, lines) = &self.justification;
        let tag = match reason {
            Reason::Hypothesis => return "Hyp".to_string(),
            Reason::Target => return "Tar".to_string(),
            Reason::ModusPonens => "MP",
            Reason::ModusTollens => "MT",
            Reason::ConjunctiveIdempotence => "CI",
            Reason::DisjunctiveIdempotence => "DI",
            Reason::SplitConjunction => "SC",
            Reason::SplitDisjunctiveImplication => "SDI",
            Reason::SplitConjunctiveImplication => "SCI",
            Reason::NegatedImplication => "NI",
            Reason::MaterialEquivalence => "ME",
            Reason::ConditionalPremise => "CP",
            Reason::SplitDisjunction => "SD",
            Reason::EqualitySubst => "ES",
        };
        let numbers = lines
            .iter()
            .map(|line| (line + 1).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{tag}[{numbers}]")
    }
}
