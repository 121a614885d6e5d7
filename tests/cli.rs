use std::process::{Command, Stdio};

#[test]
fn missing_api_key_exits_before_prompting() {
	for value in [None, Some(""), Some("   ")] {
		let mut command = Command::new(env!("CARGO_BIN_EXE_ideaspark"));
		command.env_remove("GOOGLE_API_KEY").env_remove("RUST_LOG").stdin(Stdio::null());
		if let Some(value) = value {
			command.env("GOOGLE_API_KEY", value);
		}
		let output = command.output().unwrap();

		assert_eq!(output.status.code(), Some(1));
		let stdout = String::from_utf8(output.stdout).unwrap();
		assert!(stdout.starts_with("Error: GOOGLE_API_KEY environment variable not found."));
		assert!(!stdout.contains("Enter your concept"));
	}
}

#[test]
fn end_of_input_exits_cleanly() {
	let output = Command::new(env!("CARGO_BIN_EXE_ideaspark"))
		.env("GOOGLE_API_KEY", "not-a-real-key")
		.env_remove("RUST_LOG")
		.stdin(Stdio::null())
		.output()
		.unwrap();

	assert!(output.status.success());
	let stdout = String::from_utf8(output.stdout).unwrap();
	assert!(stdout.contains("Enter your concept"));
	assert!(stdout.trim_end().ends_with("Exiting IdeaSpark. Happy ideating!"));
}
