//! Loading of theorem and definition libraries: plain-text `.dat` files of records
//! `{kind, formula, blank}` whose formulas join the tableau pre-normalized.

use crate::moves::cleanup::{cleanup_definition, cleanup_moves};
use crate::preprocessing::parser::parse_fol_formula;
use crate::tableau::context::ProofContext;
use crate::tableau::tabline::{LineRole, TableauLine};

use std::fs::read_to_string;

/// Load the library file `<base>.dat` into the tableau.
///
/// Each record is a kind line (`theorem` or `definition`), a formula line, and a
/// blank separator. The lines of each record run `cleanup_moves` (theorems) or
/// `cleanup_definition` (definitions) right away and are then flagged with their
/// role, so the main proof's cleanup passes skip them.
pub fn library_load(ctx: &mut ProofContext, base: &str) -> Result<(), String> {
    let filename = format!("{base}.dat");
    let contents = read_to_string(filename.as_str())
        .map_err(|e| format!("Could not open file {filename}: {e}"))?;

    let mut lines = contents.lines();
    let mut record_number = 0;

    while let Some(kind_line) = lines.next() {
        let kind = kind_line.trim();
        if kind.is_empty() {
            continue; // skip blank lines between records
        }

        let Some(formula_line) = lines.next() else {
            return Err(format!(
                "Incomplete record after kind '{kind}' in {filename}."
            ));
        };
        record_number += 1;

        let role = match kind {
            "theorem" => LineRole::Theorem,
            "definition" => LineRole::Definition,
            _ => {
                return Err(format!(
                    "Unknown record type '{kind}' in record {record_number} of {filename}."
                ));
            }
        };

        let formula = parse_fol_formula(formula_line.trim()).map_err(|e| {
            format!("Error parsing formula in record {record_number} of {filename}: {e}")
        })?;

        let initial_upto = ctx.tableau.len();
        ctx.tableau.push(TableauLine::hypothesis(formula));

        match role {
            LineRole::Definition => cleanup_definition(ctx, initial_upto),
            _ => cleanup_moves(ctx, initial_upto),
        };

        // flag everything the record produced so later cleanup passes skip it
        for index in initial_upto..ctx.tableau.len() {
            ctx.tableau[index].role = role;
        }
        ctx.upto = ctx.tableau.len();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::library::library_load;
    use crate::tableau::context::ProofContext;
    use crate::tableau::tabline::LineRole;

    use std::fs::File;
    use std::io::Write;

    fn write_library(base: &str, contents: &str) {
        let mut file = File::create(format!("{base}.dat")).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    /// Records load, normalize, and get their role flags.
    fn load_records() {
        let base = std::env::temp_dir().join("fol_library_basic");
        let base = base.to_str().unwrap();
        write_library(
            base,
            "theorem\n\\forall x (P(x) \\implies Q(x))\n\ndefinition\n\\forall x (R(x) \\iff P(x))\n",
        );

        let mut ctx = ProofContext::new();
        library_load(&mut ctx, base).unwrap();

        assert!(!ctx.tableau.is_empty());
        // the theorem was skolemized into a quantifier-free implication
        assert_eq!(ctx.tableau[0].formula.to_repr(), "P(x) \\implies Q(x)");
        assert_eq!(ctx.tableau[0].role, LineRole::Theorem);
        // the definition equivalence was split into its two directions
        let definitions: Vec<String> = ctx
            .tableau
            .iter()
            .filter(|line| line.role == LineRole::Definition && line.active)
            .map(|line| line.formula.to_repr())
            .collect();
        assert_eq!(definitions.len(), 2);
        assert_eq!(ctx.upto, ctx.tableau.len());
    }

    #[test]
    /// Unknown record kinds and missing files are reported.
    fn invalid_library() {
        let mut ctx = ProofContext::new();
        assert!(library_load(&mut ctx, "/nonexistent/library").is_err());

        let base = std::env::temp_dir().join("fol_library_bad_kind");
        let base = base.to_str().unwrap();
        write_library(base, "axiom\nP(a)\n");
        assert!(library_load(&mut ctx, base).is_err());
    }
}
