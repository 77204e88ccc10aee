//! Negation of formula trees into negation normal form, together with the
//! disjunction-to-implication rewrite and the contrapositive.

use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::{ConstantSymbol, LogicalBinaryOp, VariableKind};

use std::error::Error;
use std::fmt;

/// Structural errors of the formula algebra.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormulaError {
    /// A term was passed where a formula is required (e.g. negation of a term).
    NotAFormula,
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormulaError::NotAFormula => {
                write!(f, "Cannot negate a term. Only predicates and logical formulas can be negated.")
            }
        }
    }
}

impl Error for FormulaError {}

impl From<FormulaError> for String {
    fn from(error: FormulaError) -> String {
        error.to_string()
    }
}

/// Produce the negation-normal-form negation of `formula`, consuming it.
///
/// Double negations collapse, De Morgan is applied to conjunctions and disjunctions,
/// `¬(φ → ψ) ≡ φ ∧ ¬ψ`, `¬(φ ↔ ψ) ≡ (φ ∧ ¬ψ) ∨ (ψ ∧ ¬φ)`, quantifiers dualize, and
/// `¬⊤ ≡ ⊥`. When `rewrite_disj` is set, every disjunction produced anywhere in the
/// result is canonicalized into the equivalent implication `¬A → B` on the spot.
///
/// Fails with [FormulaError::NotAFormula] when `formula` is a term.
pub fn negate_node(formula: FolTreeNode, rewrite_disj: bool) -> Result<FolTreeNode, FormulaError> {
    match formula.node_type {
        NodeType::UnaryPred(_) | NodeType::BinaryPred(_) => {
            Ok(FolTreeNode::mk_negation(formula))
        }
        NodeType::Variable(ref data) => match data.kind {
            // a bare predicate or metavariable is an atomic proposition
            VariableKind::Predicate | VariableKind::Metavar => {
                Ok(FolTreeNode::mk_negation(formula))
            }
            _ => Err(FormulaError::NotAFormula),
        },
        NodeType::Negation(child) => {
            // eliminate double negation: ¬¬φ ≡ φ
            let phi = *child;
            if rewrite_disj {
                Ok(disjunction_to_implication(phi))
            } else {
                Ok(phi)
            }
        }
        NodeType::LogicalBinary(op, left, right) => match op {
            LogicalBinaryOp::And => {
                // ¬(φ ∧ ψ) ≡ ¬φ ∨ ¬ψ
                let result = FolTreeNode::mk_binary(
                    LogicalBinaryOp::Or,
                    negate_node(*left, rewrite_disj)?,
                    negate_node(*right, rewrite_disj)?,
                );
                if rewrite_disj {
                    Ok(disjunction_to_implication(result))
                } else {
                    Ok(result)
                }
            }
            LogicalBinaryOp::Or => {
                // ¬(φ ∨ ψ) ≡ ¬φ ∧ ¬ψ
                Ok(FolTreeNode::mk_binary(
                    LogicalBinaryOp::And,
                    negate_node(*left, rewrite_disj)?,
                    negate_node(*right, rewrite_disj)?,
                ))
            }
            LogicalBinaryOp::Implies => {
                // ¬(φ → ψ) ≡ φ ∧ ¬ψ
                Ok(FolTreeNode::mk_binary(
                    LogicalBinaryOp::And,
                    *left,
                    negate_node(*right, rewrite_disj)?,
                ))
            }
            LogicalBinaryOp::Iff => {
                // ¬(φ ↔ ψ) ≡ (φ ∧ ¬ψ) ∨ (ψ ∧ ¬φ)
                let neg_left = negate_node(left.as_ref().clone(), rewrite_disj)?;
                let neg_right = negate_node(right.as_ref().clone(), rewrite_disj)?;
                let left_clause =
                    FolTreeNode::mk_binary(LogicalBinaryOp::And, *left, neg_right);
                let right_clause =
                    FolTreeNode::mk_binary(LogicalBinaryOp::And, *right, neg_left);
                let result =
                    FolTreeNode::mk_binary(LogicalBinaryOp::Or, left_clause, right_clause);
                if rewrite_disj {
                    Ok(disjunction_to_implication(result))
                } else {
                    Ok(result)
                }
            }
        },
        NodeType::Quantifier(op, var, body) => {
            // ¬∀x φ ≡ ∃x ¬φ and ¬∃x φ ≡ ∀x ¬φ
            let negated_body = negate_node(*body, rewrite_disj)?;
            Ok(FolTreeNode::mk_quantifier(op.dual(), *var, negated_body))
        }
        NodeType::Application(ref children) => {
            if children.first().map(|head| head.is_predicate()).unwrap_or(false) {
                Ok(FolTreeNode::mk_negation(formula))
            } else {
                Err(FormulaError::NotAFormula)
            }
        }
        NodeType::Constant(symbol) => match symbol {
            ConstantSymbol::Top => Ok(FolTreeNode::mk_constant(ConstantSymbol::Bot)),
            ConstantSymbol::Bot => Ok(FolTreeNode::mk_constant(ConstantSymbol::Top)),
            ConstantSymbol::EmptySet => Err(FormulaError::NotAFormula),
        },
        NodeType::UnaryOp(_) | NodeType::BinaryOp(_) | NodeType::Tuple(_) => {
            Err(FormulaError::NotAFormula)
        }
    }
}

/// Canonicalize a top-level disjunction `A ∨ B` into the implication `¬A → B`,
/// consuming the formula. Anything that is not a disjunction passes through unchanged.
pub fn disjunction_to_implication(formula: FolTreeNode) -> FolTreeNode {
    if let NodeType::LogicalBinary(LogicalBinaryOp::Or, left, right) = formula.node_type {
        match negate_node(left.as_ref().clone(), true) {
            Ok(negated) => FolTreeNode::mk_binary(LogicalBinaryOp::Implies, negated, *right),
            // a malformed disjunct cannot be negated; leave the disjunction as-is
            Err(_) => FolTreeNode::mk_binary(LogicalBinaryOp::Or, *left, *right),
        }
    } else {
        formula
    }
}

/// The contrapositive `¬B → ¬A` of an implication `A → B`.
pub fn contrapositive(implication: &FolTreeNode) -> Result<FolTreeNode, String> {
    if let NodeType::LogicalBinary(LogicalBinaryOp::Implies, left, right) =
        &implication.node_type
    {
        let not_consequent = negate_node(right.as_ref().clone(), false)?;
        let not_antecedent = negate_node(left.as_ref().clone(), false)?;
        Ok(FolTreeNode::mk_binary(
            LogicalBinaryOp::Implies,
            not_consequent,
            not_antecedent,
        ))
    } else {
        Err("The formula to take a contrapositive of is not an implication.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::manipulation::equality::equal;
    use crate::manipulation::negation::{contrapositive, negate_node};
    use crate::preprocessing::fol_tree::FolTreeNode;
    use crate::preprocessing::parser::parse_fol_formula;

    /// Negate the formula twice (with the disjunction rewrite) and compare with the
    /// original modulo bound-variable renaming.
    fn check_double_negation(formula: &str) {
        let tree = parse_fol_formula(formula).unwrap();
        let negated = negate_node(tree.clone(), true).unwrap();
        let restored = negate_node(negated, true).unwrap();
        assert!(
            equal(&tree, &restored),
            "double negation failed for {formula}: got {restored}"
        );
    }

    #[test]
    /// Double negation is the identity on the canonical (disjunction-free) fragment.
    fn double_negation_identity() {
        check_double_negation("P(a)");
        check_double_negation("\\neg P(a)");
        check_double_negation("P(x) \\wedge Q(y)");
        check_double_negation("P(x) \\implies Q(x)");
        check_double_negation("\\forall x (P(x) \\implies Q(x))");
        check_double_negation("\\exists x (P(x) \\wedge \\neg Q(x))");
        check_double_negation("x \\in a \\implies x \\in b");
        check_double_negation("\\forall x \\exists y (P(x, y) \\wedge Q(y))");
    }

    #[test]
    /// Double negation on seeded random formulae over the canonical fragment.
    fn double_negation_random() {
        let predicates = vec!["P".to_string(), "Q".to_string(), "R".to_string()];
        for seed in 0..20 {
            let tree = FolTreeNode::new_random_formula(4, &predicates, seed);
            let negated = negate_node(tree.clone(), true).unwrap();
            let restored = negate_node(negated, true).unwrap();
            assert!(equal(&tree, &restored));
        }
    }

    #[test]
    /// Test the individual negation rules.
    fn negation_rules() {
        let cases = vec![
            ("P \\wedge Q", "\\neg P \\vee \\neg Q"),
            ("P \\vee Q", "\\neg P \\wedge \\neg Q"),
            ("P \\implies Q", "P \\wedge \\neg Q"),
            ("\\forall x P(x)", "\\exists x \\neg P(x)"),
            ("\\exists x P(x)", "\\forall x \\neg P(x)"),
            ("\\top", "\\bot"),
            ("\\bot", "\\top"),
            (
                "P \\iff Q",
                "(P \\wedge \\neg Q) \\vee (Q \\wedge \\neg P)",
            ),
        ];
        for (input, expected) in cases {
            let tree = parse_fol_formula(input).unwrap();
            let negated = negate_node(tree, false).unwrap();
            let expected_tree = parse_fol_formula(expected).unwrap();
            assert!(
                equal(&negated, &expected_tree),
                "negation of {input}: got {negated}"
            );
        }
    }

    #[test]
    /// Negating a term must fail.
    fn negate_term_fails() {
        let term = parse_fol_formula("x = y").unwrap();
        // the equality itself is fine, its left side is not
        assert!(negate_node(term.clone(), false).is_ok());
        if let crate::preprocessing::fol_tree::NodeType::Application(children) = term.node_type {
            assert!(negate_node(children[1].clone(), false).is_err());
        }
    }

    #[test]
    /// Test the contrapositive of an implication.
    fn contrapositive_of_implication() {
        let tree = parse_fol_formula("P(x) \\implies Q(x)").unwrap();
        let contra = contrapositive(&tree).unwrap();
        let expected = parse_fol_formula("\\neg Q(x) \\implies \\neg P(x)").unwrap();
        assert!(equal(&contra, &expected));

        let not_impl = parse_fol_formula("P(x) \\wedge Q(x)").unwrap();
        assert!(contrapositive(&not_impl).is_err());
    }
}
