//! Print the proof state: either aggregated progress information only, or the full
//! tableau with justifications and the hydra of open targets.

use crate::tableau::context::ProofContext;
use crate::tableau::hydra::HydraId;

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrintOptions {
    NoPrint,
    ShortPrint,
    MediumPrint,
    FullPrint,
}

/// Print the given text, but only if the correct print options are selected (medium
/// or full). This simplifies the code regarding printing (no redundant if statements).
pub(crate) fn print_if_allowed(text: String, print_options: PrintOptions) {
    if print_options == PrintOptions::NoPrint || print_options == PrintOptions::ShortPrint {
        return;
    }
    println!("{}", text)
}

/// Print all live lines of the tableau with one-based numbers and justifications.
/// Hypotheses display their formula (green), targets their goal (red).
pub fn print_tableau(ctx: &ProofContext) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    println!("Hypotheses:");
    for (index, line) in ctx.tableau.iter().enumerate() {
        if line.target || !line.active {
            continue;
        }
        print!(" {} {}: ", index + 1, line.justification_string());
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
        let _ = writeln!(&mut stdout, "{}", line.formula);
        let _ = stdout.reset();
    }

    println!();
    println!("Targets:");
    for (index, line) in ctx.tableau.iter().enumerate() {
        if !line.target || !line.active {
            continue;
        }
        print!(" {} {}: ", index + 1, line.justification_string());
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        match &line.negation {
            Some(goal) => {
                let _ = writeln!(&mut stdout, "{goal}");
            }
            None => {
                let _ = writeln!(&mut stdout, "{}", line.formula);
            }
        }
        let _ = stdout.reset();
    }
}

fn print_hydra_node(ctx: &ProofContext, id: HydraId, depth: usize) {
    let node = ctx.hydra.node(id);
    let targets = node
        .target_indices
        .iter()
        .map(|t| (t + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}{{{targets}}}", "  ".repeat(depth));
    for child in &node.children {
        print_hydra_node(ctx, *child, depth + 1);
    }
}

/// Dump the hydra tree of outstanding target conjunctions, one node per line.
pub fn print_hydras(ctx: &ProofContext) {
    let Some(root) = ctx.hydra.root else {
        eprintln!("Hydra graph is not initialized.");
        return;
    };
    for child in &ctx.hydra.node(root).children {
        print_hydra_node(ctx, *child, 0);
    }
}
