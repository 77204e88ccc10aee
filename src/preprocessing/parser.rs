//! Contains functionality regarding parsing formula (or formula tokens) into a syntax tree.
//!
//! The connective precedence is the following (the lower, the stronger):
//!  - negation: 1
//!  - set operations: 2, predicates: 3
//!  - boolean binary operators: and=4, or=5, imp=6, equiv=7
//!  - quantifiers: 8
//!

use crate::manipulation::variables::bind_var;
use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::*;
use crate::preprocessing::tokenizer::{FolToken, try_tokenize_formula};

/// Parse a first-order formula string representation into an actual formula tree.
///
/// Variables bound by quantifiers get their `bound` flag set; all remaining names in
/// term positions become free individual variables.
pub fn parse_fol_formula(formula: &str) -> Result<FolTreeNode, String> {
    let tokens = try_tokenize_formula(formula.to_string())?;
    parse_fol_tokens(&tokens)
}

/// Parse `tokens` of a first-order formula into an abstract syntax tree using
/// recursive steps.
pub fn parse_fol_tokens(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    parse_1_quantifiers(tokens)
}

/// Utility method to find the first occurrence of a given binary connective.
fn index_of_first(tokens: &[FolToken], op: LogicalBinaryOp) -> Option<usize> {
    tokens.iter().position(|t| *t == FolToken::Binary(op))
}

/// Utility method to find the last occurrence of a given binary connective.
fn index_of_last(tokens: &[FolToken], op: LogicalBinaryOp) -> Option<usize> {
    tokens.iter().rposition(|t| *t == FolToken::Binary(op))
}

/// Utility method to find the first occurrence of a quantifier token.
fn index_of_first_quantifier(tokens: &[FolToken]) -> Option<usize> {
    tokens
        .iter()
        .position(|t| matches!(t, FolToken::Quantified(..)))
}

/// Utility method to find the first occurrence of a binary predicate (or `≠`).
fn index_of_first_predicate(tokens: &[FolToken]) -> Option<usize> {
    tokens
        .iter()
        .position(|t| matches!(t, FolToken::BinaryPred(..) | FolToken::Neq))
}

/// Utility method to find the last occurrence of a binary set operation.
fn index_of_last_set_op(tokens: &[FolToken]) -> Option<usize> {
    tokens
        .iter()
        .rposition(|t| matches!(t, FolToken::SetBinary(..)))
}

/// Recursive parsing step 1: extract quantifiers.
///
/// A quantifier must stand at the beginning of its token block (its scope extends as
/// far right as possible); anything else requires parentheses.
fn parse_1_quantifiers(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    if let Some(i) = index_of_first_quantifier(tokens) {
        if i > 0 {
            return Err(format!(
                "Quantifier can't be directly preceded by '{}'.",
                &tokens[i - 1]
            ));
        }
        if let FolToken::Quantified(op, name) = &tokens[0] {
            let mut body = parse_1_quantifiers(&tokens[1..])?;
            // mark all occurrences of the bound variable, including the binder itself
            bind_var(&mut body, name);
            let mut var_node = FolTreeNode::mk_variable(name);
            if let Some(data) = var_node.as_variable_mut() {
                data.bound = true;
            }
            return Ok(FolTreeNode::mk_quantifier(*op, var_node, body));
        }
    }
    parse_2_iff(tokens)
}

/// Recursive parsing step 2: extract `↔` operators.
fn parse_2_iff(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    if let Some(i) = index_of_first(tokens, LogicalBinaryOp::Iff) {
        Ok(FolTreeNode::mk_binary(
            LogicalBinaryOp::Iff,
            parse_3_implies(&tokens[..i])?,
            parse_2_iff(&tokens[(i + 1)..])?,
        ))
    } else {
        parse_3_implies(tokens)
    }
}

/// Recursive parsing step 3: extract `→` operators (right-associative).
fn parse_3_implies(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    if let Some(i) = index_of_first(tokens, LogicalBinaryOp::Implies) {
        Ok(FolTreeNode::mk_binary(
            LogicalBinaryOp::Implies,
            parse_4_or(&tokens[..i])?,
            parse_3_implies(&tokens[(i + 1)..])?,
        ))
    } else {
        parse_4_or(tokens)
    }
}

/// Recursive parsing step 4: extract `∨` operators (left-associative).
fn parse_4_or(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    if let Some(i) = index_of_last(tokens, LogicalBinaryOp::Or) {
        Ok(FolTreeNode::mk_binary(
            LogicalBinaryOp::Or,
            parse_4_or(&tokens[..i])?,
            parse_5_and(&tokens[(i + 1)..])?,
        ))
    } else {
        parse_5_and(tokens)
    }
}

/// Recursive parsing step 5: extract `∧` operators (left-associative).
fn parse_5_and(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    if let Some(i) = index_of_last(tokens, LogicalBinaryOp::And) {
        Ok(FolTreeNode::mk_binary(
            LogicalBinaryOp::And,
            parse_5_and(&tokens[..i])?,
            parse_6_negation(&tokens[(i + 1)..])?,
        ))
    } else {
        parse_6_negation(tokens)
    }
}

/// Recursive parsing step 6: extract `¬` operators.
fn parse_6_negation(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    if tokens.first() == Some(&FolToken::Not) {
        Ok(FolTreeNode::mk_negation(parse_6_negation(&tokens[1..])?))
    } else {
        parse_7_atom(tokens)
    }
}

/// Recursive parsing step 7: atomic formulae (binary predicate atoms, predicate
/// applications, propositional names, constants, and parenthesized sub-formulae).
fn parse_7_atom(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    if let Some(i) = index_of_first_predicate(tokens) {
        let left = parse_term(&tokens[..i])?;
        let right = parse_term(&tokens[(i + 1)..])?;
        return match &tokens[i] {
            FolToken::BinaryPred(symbol) => Ok(FolTreeNode::mk_application(vec![
                FolTreeNode {
                    node_type: NodeType::BinaryPred(*symbol),
                },
                left,
                right,
            ])),
            FolToken::Neq => Ok(FolTreeNode::mk_negation(FolTreeNode::mk_equality(
                left, right,
            ))),
            _ => unreachable!(),
        };
    }

    match tokens {
        [] => Err("Expected formula, found nothing.".to_string()),
        [FolToken::Constant(symbol)] if *symbol != ConstantSymbol::EmptySet => {
            Ok(FolTreeNode::mk_constant(*symbol))
        }
        [FolToken::Name(name)] => {
            // a bare name in formula position is a propositional predicate
            Ok(FolTreeNode::mk_variable_with_kind(
                name,
                VariableKind::Predicate,
                0,
            ))
        }
        [FolToken::Name(name), FolToken::Tokens(args)] => {
            let arguments = parse_argument_terms(args)?;
            let head = FolTreeNode::mk_variable_with_kind(
                name,
                VariableKind::Predicate,
                arguments.len(),
            );
            let mut children = vec![head];
            children.extend(arguments);
            Ok(FolTreeNode::mk_application(children))
        }
        [FolToken::UnaryPred(symbol), FolToken::Tokens(args)] => {
            let arguments = parse_argument_terms(args)?;
            if arguments.len() != 1 {
                return Err(format!("Predicate '{symbol}' takes exactly one argument."));
            }
            let mut children = vec![FolTreeNode {
                node_type: NodeType::UnaryPred(*symbol),
            }];
            children.extend(arguments);
            Ok(FolTreeNode::mk_application(children))
        }
        [FolToken::Tokens(inner)] => parse_fol_tokens(inner),
        _ => Err(format!(
            "Unexpected token combination at '{}'.",
            tokens.first().unwrap()
        )),
    }
}

/// Parse a token slice as a term, handling the (equally strong, left-associative)
/// binary set operations.
fn parse_term(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    if let Some(i) = index_of_last_set_op(tokens) {
        if let FolToken::SetBinary(op) = &tokens[i] {
            let left = parse_term(&tokens[..i])?;
            let right = parse_term_atom(&tokens[(i + 1)..])?;
            return Ok(FolTreeNode::mk_application(vec![
                FolTreeNode {
                    node_type: NodeType::BinaryOp(*op),
                },
                left,
                right,
            ]));
        }
    }
    parse_term_atom(tokens)
}

/// Parse an atomic term: a variable, a function application, a set constant, a power
/// set application, a tuple, or a parenthesized term.
fn parse_term_atom(tokens: &[FolToken]) -> Result<FolTreeNode, String> {
    match tokens {
        [] => Err("Expected term, found nothing.".to_string()),
        [FolToken::Name(name)] => Ok(FolTreeNode::mk_variable(name)),
        [FolToken::Name(name), FolToken::Tokens(args)] => {
            let arguments = parse_argument_terms(args)?;
            let head = FolTreeNode::mk_variable_with_kind(
                name,
                VariableKind::Function,
                arguments.len(),
            );
            let mut children = vec![head];
            children.extend(arguments);
            Ok(FolTreeNode::mk_application(children))
        }
        [FolToken::Constant(ConstantSymbol::EmptySet)] => {
            Ok(FolTreeNode::mk_constant(ConstantSymbol::EmptySet))
        }
        [FolToken::SetUnary(op), FolToken::Tokens(args)] => {
            let arguments = parse_argument_terms(args)?;
            if arguments.len() != 1 {
                return Err(format!("Operator '{op}' takes exactly one argument."));
            }
            let mut children = vec![FolTreeNode {
                node_type: NodeType::UnaryOp(*op),
            }];
            children.extend(arguments);
            Ok(FolTreeNode::mk_application(children))
        }
        [FolToken::Tokens(inner)] => {
            if inner.iter().any(|t| *t == FolToken::Comma) {
                let items = parse_argument_terms(inner)?;
                Ok(FolTreeNode::mk_tuple(items))
            } else {
                parse_term(inner)
            }
        }
        _ => Err(format!(
            "Unexpected token combination in term at '{}'.",
            tokens.first().unwrap()
        )),
    }
}

/// Parse a comma-separated token block into a list of terms.
fn parse_argument_terms(tokens: &[FolToken]) -> Result<Vec<FolTreeNode>, String> {
    let mut arguments = Vec::new();
    for part in tokens.split(|t| *t == FolToken::Comma) {
        arguments.push(parse_term(part)?);
    }
    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use crate::preprocessing::fol_tree::NodeType;
    use crate::preprocessing::operator_enums::*;
    use crate::preprocessing::parser::parse_fol_formula;

    #[test]
    /// Test parsing of a quantified implication and the binding of its variable.
    fn parse_quantified_implication() {
        let tree = parse_fol_formula("\\forall x (P(x) \\implies Q(x))").unwrap();
        match &tree.node_type {
            NodeType::Quantifier(op, var, body) => {
                assert_eq!(*op, Quantifier::Forall);
                assert_eq!(var.name(), "x");
                assert!(var.as_variable().unwrap().bound);
                assert!(body.is_implication());
                // occurrences of `x` inside the body are bound
                if let NodeType::LogicalBinary(_, left, _) = &body.node_type {
                    if let NodeType::Application(children) = &left.node_type {
                        assert!(children[1].as_variable().unwrap().bound);
                    } else {
                        panic!("expected application");
                    }
                }
            }
            _ => panic!("expected quantifier"),
        }
    }

    #[test]
    /// Test connective precedence: `P \wedge Q \implies R` parses as `(P ∧ Q) → R`.
    fn parse_precedence() {
        let tree = parse_fol_formula("P \\wedge Q \\implies R").unwrap();
        assert!(tree.is_implication());
        if let NodeType::LogicalBinary(_, left, _) = &tree.node_type {
            assert!(left.is_conjunction());
        }
    }

    #[test]
    /// Test that conjunctions associate to the left.
    fn parse_left_associative_conjunction() {
        let tree = parse_fol_formula("P \\wedge Q \\wedge R").unwrap();
        if let NodeType::LogicalBinary(LogicalBinaryOp::And, left, right) = &tree.node_type {
            assert!(left.is_conjunction());
            assert!(matches!(&right.node_type, NodeType::Variable(_)));
        } else {
            panic!("expected conjunction");
        }
    }

    #[test]
    /// Test parsing of set-theoretic terms and predicates.
    fn parse_set_expressions() {
        let tree = parse_fol_formula("x \\in a \\cup b").unwrap();
        if let NodeType::Application(children) = &tree.node_type {
            assert!(matches!(
                children[0].node_type,
                NodeType::BinaryPred(BinaryPredSymbol::Elem)
            ));
            assert!(children[2].is_term());
        } else {
            panic!("expected elem atom");
        }

        let tree = parse_fol_formula("\\mathcal{P}(\\emptyset) \\neq \\emptyset").unwrap();
        assert!(tree.is_negation());
    }

    #[test]
    /// Test that parsing the repr output gives back the same tree.
    fn parse_repr_round_trip() {
        let inputs = vec![
            "\\forall x \\exists y (P(x, y) \\implies Q(y))",
            "P \\iff (Q \\vee R)",
            "\\forall x (x \\in a \\implies x \\in a \\cup b)",
            "f(x, g(y)) = (x, y)",
        ];
        for input in inputs {
            let tree = parse_fol_formula(input).unwrap();
            let reparsed = parse_fol_formula(tree.to_repr().as_str()).unwrap();
            assert_eq!(tree, reparsed);
        }
    }

    #[test]
    /// Test that malformed formulae are rejected.
    fn parse_invalid_formulae() {
        assert!(parse_fol_formula("P \\wedge").is_err());
        assert!(parse_fol_formula("P \\forall x Q(x)").is_err());
        assert!(parse_fol_formula("\\wedge P").is_err());
        assert!(parse_fol_formula("x = ").is_err());
    }
}
