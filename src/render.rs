use std::io::{self, Write};

use crate::BrainstormResult;

const RULE_WIDTH: usize = 80;
pub const NO_POINTS: &str = "  (No specific points generated for this category)";

/// Writes `result` for a human. `concept` labels the output when the model left `idea` out.
pub fn render<W: Write>(out: &mut W, result: &BrainstormResult, concept: &str) -> io::Result<()> {
	let side = "=".repeat(30);
	let rule = "=".repeat(RULE_WIDTH);
	let idea = result.idea.as_deref().filter(|idea| !idea.trim().is_empty()).unwrap_or(concept);

	writeln!(out, "\n{side} BRAINSTORMING RESULTS {side}")?;
	writeln!(out, "Original Concept: {idea}")?;
	writeln!(out, "{rule}")?;

	for angle in &result.angles {
		writeln!(out, "\n--- {} ---", angle.category.to_uppercase())?;
		if angle.points.is_empty() {
			writeln!(out, "{NO_POINTS}")?;
		}
		for point in &angle.points {
			writeln!(out, "  - {point}")?;
		}
	}
	writeln!(out, "\n{rule}")
}
