use std::io::{self, BufRead, Write};

use crate::{Brainstorm, BrainstormRequest, render};

pub const EXIT_SENTINEL: &str = "exit";
const PROMPT: &str = "Enter your concept (e.g., 'AI for fitness', 'sustainable tech'): ";
const FAILURE_HINT: &str = "Failed to get a valid brainstorming response from the LLM. Please check your API key, network, or try a different concept.";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
	AwaitingInput,
	Terminated,
}

/// Reads concepts line by line until the exit sentinel or end of input.
pub fn run<R: BufRead, W: Write, B: Brainstorm>(mut input: R, out: &mut W, brainstormer: &mut B) -> io::Result<()> {
	writeln!(out, "\n--- IdeaSpark: Your Dynamic Brainstorming Partner ---")?;
	writeln!(out, "Enter a vague concept, and I'll generate structured brainstorming angles for you.")?;
	writeln!(out, "Type '{EXIT_SENTINEL}' to quit.")?;

	let mut buf = Vec::new();
	loop {
		write!(out, "\n{PROMPT}")?;
		out.flush()?;
		buf.clear();
		// bytes, not `lines()`: one undecodable line must not end the session
		let line = match input.read_until(b'\n', &mut buf)? {
			0 => None,
			_ => Some(String::from_utf8_lossy(&buf).into_owned()),
		};
		if step(line.as_deref(), out, brainstormer)? == State::Terminated {
			return Ok(());
		}
	}
}

/// One cycle of the loop. `None` is end of input.
pub fn step<W: Write, B: Brainstorm>(line: Option<&str>, out: &mut W, brainstormer: &mut B) -> io::Result<State> {
	let line = match line {
		Some(line) => line.trim(),
		None => {
			writeln!(out)?;
			return farewell(out);
		}
	};
	if line.eq_ignore_ascii_case(EXIT_SENTINEL) {
		return farewell(out);
	}
	let Some(request) = BrainstormRequest::new(line) else {
		writeln!(out, "Please enter a concept to brainstorm.")?;
		return Ok(State::AwaitingInput);
	};

	writeln!(out, "\nBrainstorming... Please wait a moment. (This may take 10-30 seconds)")?;
	out.flush()?;
	match brainstormer.brainstorm(&request) {
		Ok(result) => render::render(out, &result, request.concept())?,
		Err(e) => {
			writeln!(out, "{e}")?;
			writeln!(out, "{FAILURE_HINT}")?;
		}
	}
	Ok(State::AwaitingInput)
}

fn farewell<W: Write>(out: &mut W) -> io::Result<State> {
	writeln!(out, "Exiting IdeaSpark. Happy ideating!")?;
	Ok(State::Terminated)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Angle, BrainstormError, BrainstormResult};

	/// Replays canned outcomes and remembers what it was asked.
	#[derive(Default)]
	struct Scripted {
		outcomes: Vec<Result<BrainstormResult, BrainstormError>>,
		asked: Vec<String>,
	}
	impl Brainstorm for Scripted {
		fn brainstorm(&mut self, request: &BrainstormRequest) -> Result<BrainstormResult, BrainstormError> {
			self.asked.push(request.concept().to_owned());
			match self.outcomes.is_empty() {
				true => Ok(BrainstormResult::default()),
				false => self.outcomes.remove(0),
			}
		}
	}

	fn session(input: &str, brainstormer: &mut Scripted) -> String {
		let mut out = Vec::new();
		run(input.as_bytes(), &mut out, brainstormer).unwrap();
		String::from_utf8(out).unwrap()
	}

	#[test]
	fn exit_sentinel_any_casing() {
		for sentinel in ["exit", "EXIT", "Exit", "  eXiT  "] {
			let mut brainstormer = Scripted::default();
			let out = session(&format!("{sentinel}\nnever reached\n"), &mut brainstormer);
			assert!(brainstormer.asked.is_empty());
			assert!(out.trim_end().ends_with("Exiting IdeaSpark. Happy ideating!"));
		}
	}

	#[test]
	fn blank_lines_reprompt_without_calls() {
		let mut brainstormer = Scripted::default();
		let out = session("\n   \n\t\nexit\n", &mut brainstormer);
		assert!(brainstormer.asked.is_empty());
		assert_eq!(out.matches("Please enter a concept to brainstorm.").count(), 3);
		assert_eq!(out.matches(PROMPT).count(), 4);
	}

	#[test]
	fn failure_is_reported_and_loop_continues() {
		let mut brainstormer = Scripted {
			outcomes: vec![
				Err(BrainstormError::Status {
					status: 429,
					body: "Resource has been exhausted".into(),
				}),
				Ok(BrainstormResult::new(Some("retry".into()), vec![Angle::new("A".into(), vec!["p".into()])])),
			],
			..Default::default()
		};
		let out = session("first\n  retry  \nexit\n", &mut brainstormer);
		assert_eq!(brainstormer.asked, vec!["first", "retry"]);
		assert!(out.contains("HTTP Error: 429 - Resource has been exhausted\n"));
		assert!(out.contains(FAILURE_HINT));
		assert!(out.contains("Original Concept: retry"));
	}

	#[test]
	fn invalid_utf8_line_does_not_end_session() {
		let mut brainstormer = Scripted::default();
		let mut out = Vec::new();
		run(&b"caf\xe9\nsolar boats\nexit\n"[..], &mut out, &mut brainstormer).unwrap();
		assert_eq!(brainstormer.asked, vec!["caf\u{FFFD}", "solar boats"]);
		assert!(String::from_utf8(out).unwrap().trim_end().ends_with("Happy ideating!"));
	}

	#[test]
	fn end_of_input_terminates() {
		let mut brainstormer = Scripted::default();
		let out = session("AI for fitness\n", &mut brainstormer);
		assert_eq!(brainstormer.asked, vec!["AI for fitness"]);
		assert!(out.contains("Original Concept: AI for fitness"));
		assert!(out.trim_end().ends_with("Happy ideating!"));
	}

	#[test]
	fn step_states() {
		let mut brainstormer = Scripted::default();
		let mut out = Vec::new();
		assert_eq!(step(Some(""), &mut out, &mut brainstormer).unwrap(), State::AwaitingInput);
		assert_eq!(step(Some("idea"), &mut out, &mut brainstormer).unwrap(), State::AwaitingInput);
		assert_eq!(step(Some("Exit"), &mut out, &mut brainstormer).unwrap(), State::Terminated);
		assert_eq!(step(None, &mut out, &mut brainstormer).unwrap(), State::Terminated);
	}
}
