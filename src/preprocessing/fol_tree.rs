//! A syntax tree struct for first-order formulae and terms, with constructors, shape
//! probes, and precedence-aware display.

use crate::preprocessing::operator_enums::*;

use rand::prelude::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;

/// Output format selector for rendering a formula tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    /// Re-parsable string format.
    Repr,
    /// Unicode format for user display.
    Unicode,
}

/// The data carried by a `Variable` node.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct VariableData {
    pub kind: VariableKind,
    pub bound: bool,
    pub arity: usize,
    pub name: String,
}

/// Enum of possible node data types in a first-order syntax tree.
///
/// In particular, a node can be:
///     - A `Variable` with a name, a kind, and a bound flag.
///     - A `Constant` (`⊤`, `⊥`, `∅`).
///     - A `Quantifier` node owning its binding variable node and a body.
///     - A `Negation` (the only unary connective) or a `LogicalBinary` connective.
///     - A bare symbol head for set operations (`UnaryOp`, `BinaryOp`) or predicate
///       relations (`UnaryPred`, `BinaryPred`).
///     - An `Application` whose first child is the head (an operator, a predicate, or a
///       function/predicate variable) and whose remaining children are the arguments.
///     - A `Tuple` of terms.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeType {
    Variable(VariableData),
    Constant(ConstantSymbol),
    Quantifier(Quantifier, Box<FolTreeNode>, Box<FolTreeNode>),
    Negation(Box<FolTreeNode>),
    LogicalBinary(LogicalBinaryOp, Box<FolTreeNode>, Box<FolTreeNode>),
    UnaryOp(SetUnaryOp),
    BinaryOp(SetBinaryOp),
    UnaryPred(UnaryPredSymbol),
    BinaryPred(BinaryPredSymbol),
    Application(Vec<FolTreeNode>),
    Tuple(Vec<FolTreeNode>),
}

/// A single node in a syntax tree of a first-order formula or term.
///
/// Each node owns its children exclusively; transformations either consume the node and
/// move children out, or work on an explicit deep copy (`clone`). Equality via `==` is
/// exact structural equality; use [crate::manipulation::equality::equal] for equality
/// modulo renaming of quantified variables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FolTreeNode {
    pub node_type: NodeType,
}

impl FolTreeNode {
    /// Create a free individual variable node.
    pub fn mk_variable(name: &str) -> FolTreeNode {
        Self::mk_variable_with_kind(name, VariableKind::Individual, 0)
    }

    /// Create a variable node of the given kind and arity.
    pub fn mk_variable_with_kind(name: &str, kind: VariableKind, arity: usize) -> FolTreeNode {
        FolTreeNode {
            node_type: NodeType::Variable(VariableData {
                kind,
                bound: false,
                arity,
                name: name.to_string(),
            }),
        }
    }

    /// Create a constant node.
    pub fn mk_constant(symbol: ConstantSymbol) -> FolTreeNode {
        FolTreeNode {
            node_type: NodeType::Constant(symbol),
        }
    }

    /// Create a quantifier node from an explicit variable node and a body.
    pub fn mk_quantifier(op: Quantifier, var_node: FolTreeNode, body: FolTreeNode) -> FolTreeNode {
        FolTreeNode {
            node_type: NodeType::Quantifier(op, Box::new(var_node), Box::new(body)),
        }
    }

    /// Create a negation node.
    pub fn mk_negation(child: FolTreeNode) -> FolTreeNode {
        FolTreeNode {
            node_type: NodeType::Negation(Box::new(child)),
        }
    }

    /// Create a binary connective node.
    pub fn mk_binary(op: LogicalBinaryOp, left: FolTreeNode, right: FolTreeNode) -> FolTreeNode {
        FolTreeNode {
            node_type: NodeType::LogicalBinary(op, Box::new(left), Box::new(right)),
        }
    }

    /// Create an application node; `children[0]` is the head.
    pub fn mk_application(children: Vec<FolTreeNode>) -> FolTreeNode {
        FolTreeNode {
            node_type: NodeType::Application(children),
        }
    }

    /// Create a tuple node.
    pub fn mk_tuple(children: Vec<FolTreeNode>) -> FolTreeNode {
        FolTreeNode {
            node_type: NodeType::Tuple(children),
        }
    }

    /// Create an equality atom `left = right` (an application of the `=` head).
    pub fn mk_equality(left: FolTreeNode, right: FolTreeNode) -> FolTreeNode {
        Self::mk_application(vec![
            FolTreeNode {
                node_type: NodeType::BinaryPred(BinaryPredSymbol::Equals),
            },
            left,
            right,
        ])
    }

    /// Reference to the variable data, if this is a variable node.
    pub fn as_variable(&self) -> Option<&VariableData> {
        match &self.node_type {
            NodeType::Variable(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable reference to the variable data, if this is a variable node.
    pub fn as_variable_mut(&mut self) -> Option<&mut VariableData> {
        match &mut self.node_type {
            NodeType::Variable(data) => Some(data),
            _ => None,
        }
    }

    /// The name of a variable node. Panics on any other node type (programmer error,
    /// mirroring out-of-contract use of the tree).
    pub fn name(&self) -> &str {
        match &self.node_type {
            NodeType::Variable(data) => data.name.as_str(),
            _ => panic!("node is not a variable"),
        }
    }

    /// Children of this node as a slice, in a uniform order (quantifiers list the bound
    /// variable first, then the body).
    pub fn children(&self) -> Vec<&FolTreeNode> {
        match &self.node_type {
            NodeType::Variable(_)
            | NodeType::Constant(_)
            | NodeType::UnaryOp(_)
            | NodeType::BinaryOp(_)
            | NodeType::UnaryPred(_)
            | NodeType::BinaryPred(_) => Vec::new(),
            NodeType::Quantifier(_, var, body) => vec![var, body],
            NodeType::Negation(child) => vec![child],
            NodeType::LogicalBinary(_, left, right) => vec![left, right],
            NodeType::Application(children) | NodeType::Tuple(children) => {
                children.iter().collect()
            }
        }
    }

    /// True for predicate heads and propositional constants, i.e. nodes that head a
    /// formula-level application.
    pub fn is_predicate(&self) -> bool {
        match &self.node_type {
            NodeType::UnaryPred(_) | NodeType::BinaryPred(_) => true,
            NodeType::Variable(data) => {
                data.kind == VariableKind::Predicate || data.kind == VariableKind::Metavar
            }
            NodeType::Constant(symbol) => {
                *symbol == ConstantSymbol::Top || *symbol == ConstantSymbol::Bot
            }
            _ => false,
        }
    }

    /// True for individual variables.
    pub fn is_variable(&self) -> bool {
        matches!(&self.node_type, NodeType::Variable(data) if data.kind == VariableKind::Individual)
    }

    /// True for individual variables not bound by a quantifier.
    pub fn is_free_variable(&self) -> bool {
        matches!(
            &self.node_type,
            NodeType::Variable(data) if data.kind == VariableKind::Individual && !data.bound
        )
    }

    pub fn is_negation(&self) -> bool {
        matches!(&self.node_type, NodeType::Negation(_))
    }

    pub fn is_conjunction(&self) -> bool {
        matches!(
            &self.node_type,
            NodeType::LogicalBinary(LogicalBinaryOp::And, _, _)
        )
    }

    pub fn is_disjunction(&self) -> bool {
        matches!(
            &self.node_type,
            NodeType::LogicalBinary(LogicalBinaryOp::Or, _, _)
        )
    }

    pub fn is_implication(&self) -> bool {
        matches!(
            &self.node_type,
            NodeType::LogicalBinary(LogicalBinaryOp::Implies, _, _)
        )
    }

    pub fn is_equivalence(&self) -> bool {
        matches!(
            &self.node_type,
            NodeType::LogicalBinary(LogicalBinaryOp::Iff, _, _)
        )
    }

    /// True for equality atoms `s = t`.
    pub fn is_equality(&self) -> bool {
        match &self.node_type {
            NodeType::Application(children) => matches!(
                children.first().map(|head| &head.node_type),
                Some(NodeType::BinaryPred(BinaryPredSymbol::Equals))
            ),
            _ => false,
        }
    }

    /// True for nodes that denote terms rather than formulae.
    pub fn is_term(&self) -> bool {
        match &self.node_type {
            NodeType::Variable(data) => matches!(
                data.kind,
                VariableKind::Individual | VariableKind::Function | VariableKind::Parameter
            ),
            NodeType::Constant(symbol) => *symbol == ConstantSymbol::EmptySet,
            NodeType::UnaryOp(_) | NodeType::BinaryOp(_) | NodeType::Tuple(_) => true,
            NodeType::Application(children) => children
                .first()
                .map(|head| !head.is_predicate())
                .unwrap_or(false),
            _ => false,
        }
    }

    /// True for a guard implication `P(x) → φ` where `P` is a structural predicate and
    /// `x` an individual variable.
    pub fn is_special_implication(&self) -> bool {
        match &self.node_type {
            NodeType::LogicalBinary(LogicalBinaryOp::Implies, left, _) => {
                match &left.node_type {
                    NodeType::Application(children) => {
                        children.len() == 2
                            && matches!(children[0].node_type, NodeType::UnaryPred(_))
                            && children[1].is_variable()
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// True for a quantifier whose body is a special implication guarding the quantified
    /// variable itself.
    pub fn is_special_binder(&self) -> bool {
        match &self.node_type {
            NodeType::Quantifier(_, var, body) => {
                if !body.is_special_implication() {
                    return false;
                }
                match &body.node_type {
                    NodeType::LogicalBinary(_, left, _) => match &left.node_type {
                        NodeType::Application(children) => children[1].name() == var.name(),
                        _ => false,
                    },
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Precedence information of the symbol displayed at this node. Nodes without an
    /// operator symbol (variables, tuples) report the default atom-level info.
    fn precedence_info(&self) -> PrecedenceInfo {
        match &self.node_type {
            NodeType::Quantifier(op, _, _) => op.precedence_info(),
            NodeType::Negation(_) => not_precedence_info(),
            NodeType::LogicalBinary(op, _, _) => op.precedence_info(),
            NodeType::Constant(symbol) => symbol.precedence_info(),
            NodeType::UnaryOp(op) => op.precedence_info(),
            NodeType::BinaryOp(op) => op.precedence_info(),
            NodeType::UnaryPred(symbol) => symbol.precedence_info(),
            NodeType::BinaryPred(symbol) => symbol.precedence_info(),
            NodeType::Application(children) => match children.first().map(|head| &head.node_type) {
                Some(NodeType::UnaryOp(_))
                | Some(NodeType::BinaryOp(_))
                | Some(NodeType::UnaryPred(_))
                | Some(NodeType::BinaryPred(_)) => children[0].precedence_info(),
                // applications of named heads display functionally, `f(...)`
                _ => PrecedenceInfo {
                    precedence: 0,
                    associativity: Associativity::None,
                    fixity: Fixity::Functional,
                    repr: "",
                    unicode: "",
                },
            },
            NodeType::Variable(_) | NodeType::Tuple(_) => PrecedenceInfo {
                precedence: 0,
                associativity: Associativity::None,
                fixity: Fixity::None,
                repr: "",
                unicode: "",
            },
        }
    }

    /// Render the tree in the selected output format.
    pub fn to_string_fmt(&self, format: OutputFormat) -> String {
        match &self.node_type {
            NodeType::Variable(data) => {
                if format == OutputFormat::Unicode {
                    let mut out = render_subscripted_name(&data.name);
                    if data.kind == VariableKind::Individual && !data.bound {
                        out.push('\'');
                    }
                    out
                } else {
                    data.name.clone()
                }
            }
            NodeType::Constant(_)
            | NodeType::UnaryOp(_)
            | NodeType::BinaryOp(_)
            | NodeType::UnaryPred(_)
            | NodeType::BinaryPred(_) => {
                let info = self.precedence_info();
                let symbol = if format == OutputFormat::Repr {
                    info.repr
                } else {
                    info.unicode
                };
                symbol.to_string()
            }
            NodeType::Negation(child) => {
                // `¬(a = b)` displays as the infix inequality
                if child.is_equality() {
                    if let NodeType::Application(children) = &child.node_type {
                        let neq = if format == OutputFormat::Repr {
                            " \\neq "
                        } else {
                            " ≠ "
                        };
                        return format!(
                            "{}{}{}",
                            children[1].to_string_fmt(format),
                            neq,
                            children[2].to_string_fmt(format)
                        );
                    }
                }
                let info = not_precedence_info();
                let symbol = if format == OutputFormat::Repr {
                    format!("{} ", info.repr)
                } else {
                    info.unicode.to_string()
                };
                format!("{}{}", symbol, self.parenthesize(child, format, "left"))
            }
            NodeType::LogicalBinary(op, left, right) => {
                let info = op.precedence_info();
                let symbol = if format == OutputFormat::Repr {
                    info.repr
                } else {
                    info.unicode
                };
                format!(
                    "{} {} {}",
                    self.parenthesize(left, format, "left"),
                    symbol,
                    self.parenthesize(right, format, "right")
                )
            }
            NodeType::Application(children) => {
                let head = &children[0];
                match &head.node_type {
                    NodeType::UnaryOp(_)
                    | NodeType::BinaryOp(_)
                    | NodeType::UnaryPred(_)
                    | NodeType::BinaryPred(_) => {
                        let info = head.precedence_info();
                        let symbol = if format == OutputFormat::Repr {
                            info.repr
                        } else {
                            info.unicode
                        };
                        if info.fixity == Fixity::Infix && children.len() == 3 {
                            format!(
                                "{} {} {}",
                                children[1].to_string_fmt(format),
                                symbol,
                                children[2].to_string_fmt(format)
                            )
                        } else {
                            format!("{}({})", symbol, children[1].to_string_fmt(format))
                        }
                    }
                    _ => {
                        let args = children[1..]
                            .iter()
                            .map(|arg| arg.to_string_fmt(format))
                            .collect::<Vec<_>>()
                            .join(", ");
                        format!("{}({})", head.to_string_fmt(format), args)
                    }
                }
            }
            NodeType::Tuple(children) => {
                let items = children
                    .iter()
                    .map(|child| child.to_string_fmt(format))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({items})")
            }
            NodeType::Quantifier(op, var, body) => {
                let info = op.precedence_info();
                let symbol = if format == OutputFormat::Repr {
                    format!("{} ", info.repr)
                } else {
                    info.unicode.to_string()
                };
                format!(
                    "{}{} {}",
                    symbol,
                    var.to_string_fmt(format),
                    self.parenthesize(body, format, "right")
                )
            }
        }
    }

    /// Re-parsable representation of the tree.
    pub fn to_repr(&self) -> String {
        self.to_string_fmt(OutputFormat::Repr)
    }

    /// Parenthesize a child rendering based on precedence and associativity.
    fn parenthesize(&self, child: &FolTreeNode, format: OutputFormat, position: &str) -> String {
        let parent_info = self.precedence_info();
        let child_info = child.precedence_info();

        // simple children never need parentheses
        let simple = matches!(
            &child.node_type,
            NodeType::Variable(_)
                | NodeType::Constant(_)
                | NodeType::Tuple(_)
                | NodeType::Quantifier(_, _, _)
        ) || matches!(&child.node_type, NodeType::Application(_) if child_info.fixity == Fixity::Functional);
        if simple {
            return child.to_string_fmt(format);
        }

        if child_info.precedence < parent_info.precedence {
            return child.to_string_fmt(format);
        }

        format!("({})", child.to_string_fmt(format))
    }

    /// Create a new random formula over the given predicate names, containing only
    /// conjunctions, implications, and negations (the connectives stable under double
    /// negation). The `tree_height` is the number of binary levels; the number of
    /// leaves will be `2^tree_height`.
    pub fn new_random_formula(
        tree_height: u8,
        predicates: &Vec<String>,
        seed: u64,
    ) -> FolTreeNode {
        let num_predicates = predicates.len() as u32;
        let mut rand = StdRng::seed_from_u64(seed);

        if tree_height <= 1 {
            let index = rand.next_u32() % num_predicates;
            let name = predicates.get(index as usize).unwrap();
            return FolTreeNode::mk_variable_with_kind(name, VariableKind::Predicate, 0);
        }

        let binary_op = match rand.next_u32() % 2 {
            0 => LogicalBinaryOp::And,
            _ => LogicalBinaryOp::Implies,
        };

        let binary_node = FolTreeNode::mk_binary(
            binary_op,
            FolTreeNode::new_random_formula(tree_height - 1, predicates, rand.next_u64()),
            FolTreeNode::new_random_formula(tree_height - 1, predicates, rand.next_u64()),
        );

        let negate = rand.next_u32() % 2 == 0;
        if negate {
            FolTreeNode::mk_negation(binary_node)
        } else {
            binary_node
        }
    }
}

/// Render a variable name, turning a trailing `_N` subscript for a single digit into the
/// corresponding unicode subscript character.
fn render_subscripted_name(name: &str) -> String {
    if let Some(pos) = name.rfind('_') {
        let suffix = &name[pos + 1..];
        if suffix.len() == 1 && suffix.chars().all(|c| c.is_ascii_digit()) {
            let digit = suffix.chars().next().unwrap().to_digit(10).unwrap();
            let subscript = char::from_u32(0x2080 + digit).unwrap();
            return format!("{}{}", &name[..pos], subscript);
        }
    }
    name.to_string()
}

impl fmt::Display for FolTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_string_fmt(OutputFormat::Unicode))
    }
}

#[cfg(test)]
mod tests {
    use crate::preprocessing::fol_tree::{FolTreeNode, OutputFormat};
    use crate::preprocessing::operator_enums::*;

    #[test]
    /// Test creation and display of formula tree nodes.
    fn tree_generating() {
        // P(x) \wedge \neg Q(x)
        let p_x = FolTreeNode::mk_application(vec![
            FolTreeNode::mk_variable_with_kind("P", VariableKind::Predicate, 1),
            FolTreeNode::mk_variable("x"),
        ]);
        let q_x = FolTreeNode::mk_application(vec![
            FolTreeNode::mk_variable_with_kind("Q", VariableKind::Predicate, 1),
            FolTreeNode::mk_variable("x"),
        ]);
        let formula =
            FolTreeNode::mk_binary(LogicalBinaryOp::And, p_x, FolTreeNode::mk_negation(q_x));

        assert_eq!(formula.to_repr(), "P(x) \\wedge \\neg Q(x)");
        assert_eq!(formula.to_string(), "P(x') ∧ ¬Q(x')");
        assert!(formula.is_conjunction());
        assert!(!formula.is_term());
    }

    #[test]
    /// Test display of equality, inequality, and subscripted variables.
    fn equality_display() {
        let eq = FolTreeNode::mk_equality(
            FolTreeNode::mk_variable("x_0"),
            FolTreeNode::mk_constant(ConstantSymbol::EmptySet),
        );
        assert_eq!(eq.to_repr(), "x_0 = \\emptyset");
        // free individual variables carry a prime in the unicode rendering
        assert_eq!(eq.to_string(), "x₀' = ∅");

        let neq = FolTreeNode::mk_negation(eq);
        assert_eq!(neq.to_repr(), "x_0 \\neq \\emptyset");
        assert_eq!(neq.to_string(), "x₀' ≠ ∅");
    }

    #[test]
    /// Test that quantifier display parenthesizes compound bodies.
    fn quantifier_display() {
        let mut var = FolTreeNode::mk_variable("x");
        if let Some(data) = var.as_variable_mut() {
            data.bound = true;
        }
        let mut body_var = FolTreeNode::mk_variable("x");
        if let Some(data) = body_var.as_variable_mut() {
            data.bound = true;
        }
        let body = FolTreeNode::mk_equality(
            body_var,
            FolTreeNode::mk_constant(ConstantSymbol::EmptySet),
        );
        let formula = FolTreeNode::mk_quantifier(Quantifier::Forall, var, body);
        assert_eq!(formula.to_repr(), "\\forall x (x = \\emptyset)");
        assert_eq!(formula.to_string_fmt(OutputFormat::Unicode), "∀x (x = ∅)");
    }

    #[test]
    /// Random formula trees are deterministic in the seed.
    fn random_formula_deterministic() {
        let predicates = vec!["P".to_string(), "Q".to_string(), "R".to_string()];
        let tree1 = FolTreeNode::new_random_formula(4, &predicates, 7);
        let tree2 = FolTreeNode::new_random_formula(4, &predicates, 7);
        let tree3 = FolTreeNode::new_random_formula(4, &predicates, 8);
        assert_eq!(tree1, tree2);
        assert_ne!(tree1, tree3);
    }
}
