//! Contains functionality regarding the tokenizing of first-order formula strings.

use crate::preprocessing::operator_enums::*;

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Enum of all possible tokens occurring in a first-order formula string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FolToken {
    /// A quantifier together with the name of the variable it binds.
    Quantified(Quantifier, String),
    /// The negation symbol.
    Not,
    /// Binary logical connectives.
    Binary(LogicalBinaryOp),
    /// Unary set-operation symbol (power set).
    SetUnary(SetUnaryOp),
    /// Binary set-operation symbols.
    SetBinary(SetBinaryOp),
    /// Unary structural predicate symbol.
    UnaryPred(UnaryPredSymbol),
    /// Binary predicate symbols.
    BinaryPred(BinaryPredSymbol),
    /// The inequality symbol (sugar for a negated equality).
    Neq,
    /// Logical and set-theoretic constants.
    Constant(ConstantSymbol),
    /// A variable, function, or predicate name.
    Name(String),
    /// An argument or tuple separator.
    Comma,
    /// A block of tokens inside parentheses.
    Tokens(Vec<FolToken>),
}

/// Try to tokenize a first-order formula string into a token vector, with parenthesized
/// sub-strings nested into `FolToken::Tokens` blocks.
///
/// Both the LaTeX-style command syntax (`\forall`, `\wedge`, ...) and the unicode
/// symbols (`∀`, `∧`, ...) are accepted.
pub fn try_tokenize_formula(formula: String) -> Result<Vec<FolToken>, String> {
    try_tokenize_recursive(&mut formula.chars().peekable(), true)
}

/// Process a peekable iterator of characters into a vector of `FolToken`s.
fn try_tokenize_recursive(
    input_chars: &mut Peekable<Chars>,
    top_level: bool,
) -> Result<Vec<FolToken>, String> {
    let mut output = Vec::new();

    while let Some(c) = input_chars.next() {
        match c {
            c if c.is_whitespace() => {} // skip whitespace
            '\\' => {
                let command = collect_command(input_chars)?;
                output.push(token_for_command(command.as_str(), input_chars)?);
            }
            '=' => output.push(FolToken::BinaryPred(BinaryPredSymbol::Equals)),
            ',' => output.push(FolToken::Comma),
            '(' => {
                // nested block of tokens
                let block = try_tokenize_recursive(input_chars, false)?;
                output.push(FolToken::Tokens(block));
            }
            ')' => {
                return if !top_level {
                    Ok(output)
                } else {
                    Err("Unexpected ')'.".to_string())
                };
            }
            // unicode alternatives of the command symbols
            '∀' => output.push(quantified_token(Quantifier::Forall, input_chars)?),
            '∃' => output.push(quantified_token(Quantifier::Exists, input_chars)?),
            '¬' => output.push(FolToken::Not),
            '∧' => output.push(FolToken::Binary(LogicalBinaryOp::And)),
            '∨' => output.push(FolToken::Binary(LogicalBinaryOp::Or)),
            '→' => output.push(FolToken::Binary(LogicalBinaryOp::Implies)),
            '↔' => output.push(FolToken::Binary(LogicalBinaryOp::Iff)),
            '∩' => output.push(FolToken::SetBinary(SetBinaryOp::Cap)),
            '∪' => output.push(FolToken::SetBinary(SetBinaryOp::Cup)),
            '∖' => output.push(FolToken::SetBinary(SetBinaryOp::SetMinus)),
            '×' => output.push(FolToken::SetBinary(SetBinaryOp::Times)),
            '𝒫' => output.push(FolToken::SetUnary(SetUnaryOp::PowerSet)),
            '⊂' => output.push(FolToken::BinaryPred(BinaryPredSymbol::Subset)),
            '⊆' => output.push(FolToken::BinaryPred(BinaryPredSymbol::SubsetEq)),
            '∈' => output.push(FolToken::BinaryPred(BinaryPredSymbol::Elem)),
            '≠' => output.push(FolToken::Neq),
            '⊤' => output.push(FolToken::Constant(ConstantSymbol::Top)),
            '⊥' => output.push(FolToken::Constant(ConstantSymbol::Bot)),
            '∅' => output.push(FolToken::Constant(ConstantSymbol::EmptySet)),
            c if is_valid_in_name(c) => {
                let name = collect_name(input_chars, c);
                output.push(FolToken::Name(name));
            }
            _ => return Err(format!("Unexpected character '{c}'.")),
        }
    }

    if top_level {
        Ok(output)
    } else {
        Err("Expected ')'.".to_string())
    }
}

/// Check if given char can appear in a name.
fn is_valid_in_name(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Collect a name from the iterator, starting with the already-consumed first char.
fn collect_name(input_chars: &mut Peekable<Chars>, first: char) -> String {
    let mut name = String::new();
    name.push(first);
    while let Some(c) = input_chars.peek() {
        if is_valid_in_name(*c) {
            name.push(*c);
            input_chars.next();
        } else {
            break;
        }
    }
    name
}

/// Collect the alphabetic body of a backslash command.
fn collect_command(input_chars: &mut Peekable<Chars>) -> Result<String, String> {
    let mut command = String::new();
    while let Some(c) = input_chars.peek() {
        if c.is_ascii_alphabetic() {
            command.push(*c);
            input_chars.next();
        } else {
            break;
        }
    }
    if command.is_empty() {
        Err("Expected a command after '\\'.".to_string())
    } else {
        Ok(command)
    }
}

/// Collect the variable name following a quantifier and build the quantifier token.
fn quantified_token(
    op: Quantifier,
    input_chars: &mut Peekable<Chars>,
) -> Result<FolToken, String> {
    // skip whitespace before the bound variable name
    while let Some(c) = input_chars.peek() {
        if c.is_whitespace() {
            input_chars.next();
        } else {
            break;
        }
    }
    match input_chars.next() {
        Some(c) if is_valid_in_name(c) => {
            let name = collect_name(input_chars, c);
            Ok(FolToken::Quantified(op, name))
        }
        _ => Err(format!("Expected a variable name after '{op}'.")),
    }
}

/// Collect the `{...}` argument of commands like `\mathcal{P}` or `\mathrm{set}`.
fn collect_braced_argument(input_chars: &mut Peekable<Chars>) -> Result<String, String> {
    match input_chars.next() {
        Some('{') => {}
        _ => return Err("Expected '{' after command.".to_string()),
    }
    let mut argument = String::new();
    for c in input_chars.by_ref() {
        if c == '}' {
            return Ok(argument);
        }
        argument.push(c);
    }
    Err("Expected '}' after command argument.".to_string())
}

/// Translate a backslash command into the corresponding token.
fn token_for_command(
    command: &str,
    input_chars: &mut Peekable<Chars>,
) -> Result<FolToken, String> {
    match command {
        "forall" => quantified_token(Quantifier::Forall, input_chars),
        "exists" => quantified_token(Quantifier::Exists, input_chars),
        "neg" => Ok(FolToken::Not),
        "wedge" => Ok(FolToken::Binary(LogicalBinaryOp::And)),
        "vee" => Ok(FolToken::Binary(LogicalBinaryOp::Or)),
        "implies" => Ok(FolToken::Binary(LogicalBinaryOp::Implies)),
        "iff" => Ok(FolToken::Binary(LogicalBinaryOp::Iff)),
        "cap" => Ok(FolToken::SetBinary(SetBinaryOp::Cap)),
        "cup" => Ok(FolToken::SetBinary(SetBinaryOp::Cup)),
        "setminus" => Ok(FolToken::SetBinary(SetBinaryOp::SetMinus)),
        "times" => Ok(FolToken::SetBinary(SetBinaryOp::Times)),
        "subset" => Ok(FolToken::BinaryPred(BinaryPredSymbol::Subset)),
        "subseteq" => Ok(FolToken::BinaryPred(BinaryPredSymbol::SubsetEq)),
        "in" => Ok(FolToken::BinaryPred(BinaryPredSymbol::Elem)),
        "neq" => Ok(FolToken::Neq),
        "top" => Ok(FolToken::Constant(ConstantSymbol::Top)),
        "bot" => Ok(FolToken::Constant(ConstantSymbol::Bot)),
        "emptyset" => Ok(FolToken::Constant(ConstantSymbol::EmptySet)),
        "mathcal" => {
            let argument = collect_braced_argument(input_chars)?;
            if argument == "P" {
                Ok(FolToken::SetUnary(SetUnaryOp::PowerSet))
            } else {
                Err(format!("Unknown operator '\\mathcal{{{argument}}}'."))
            }
        }
        "mathrm" => {
            let argument = collect_braced_argument(input_chars)?;
            if argument == "set" {
                Ok(FolToken::UnaryPred(UnaryPredSymbol::IsSet))
            } else {
                Err(format!("Unknown predicate '\\mathrm{{{argument}}}'."))
            }
        }
        _ => Err(format!("Unknown command '\\{command}'.")),
    }
}

impl fmt::Display for FolToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FolToken::Quantified(op, name) => write!(f, "{op}{name}"),
            FolToken::Not => write!(f, "¬"),
            FolToken::Binary(op) => write!(f, "{op}"),
            FolToken::SetUnary(op) => write!(f, "{op}"),
            FolToken::SetBinary(op) => write!(f, "{op}"),
            FolToken::UnaryPred(symbol) => write!(f, "{symbol}"),
            FolToken::BinaryPred(symbol) => write!(f, "{symbol}"),
            FolToken::Neq => write!(f, "≠"),
            FolToken::Constant(symbol) => write!(f, "{symbol}"),
            FolToken::Name(name) => write!(f, "{name}"),
            FolToken::Comma => write!(f, ","),
            FolToken::Tokens(_) => write!(f, "( ... )"),
        }
    }
}
