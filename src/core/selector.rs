//! Numbered menu selection with a synthetic "(all)" entry.

use std::io::{BufRead, Write};

use crate::console::Console;
use crate::error::{Error, Result};

pub const ALL_LABEL: &str = "(all)";

/// Present `options` as a 1-indexed menu followed by "(all)" and return the selection.
///
/// Invalid input is warned about and re-prompted. Choosing "(all)" returns every
/// option in its original order; any other entry returns just that option.
pub fn choose<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    title: &str,
    options: &[String],
) -> Result<Vec<String>> {
    if options.is_empty() {
        return Err(Error::validation_invalid_argument(
            "options",
            format!("Nothing to choose for {}", title),
            None,
            None,
        ));
    }

    console.line("")?;
    console.line(format!("▶ {}", title))?;
    for (idx, option) in options.iter().enumerate() {
        console.line(format!("{}. {}", idx + 1, option))?;
    }
    let all_index = options.len() + 1;
    console.line(format!("{}. {}", all_index, ALL_LABEL))?;

    loop {
        let answer = console
            .prompt("Select an option: ")?
            .ok_or_else(|| Error::input_closed(format!("select {}", title)))?;

        match parse_choice(&answer, all_index) {
            Some(choice) if choice == all_index => return Ok(options.to_vec()),
            Some(choice) => return Ok(vec![options[choice - 1].clone()]),
            None => console.line("⚠ Invalid option. Please try again.")?,
        }
    }
}

fn parse_choice(answer: &str, max: usize) -> Option<usize> {
    let choice: usize = answer.trim().parse().ok()?;
    (1..=max).contains(&choice).then_some(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn options() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    fn run(input: &str, options: &[String]) -> (Result<Vec<String>>, String) {
        let mut console = Console::new(Cursor::new(input.to_string()), Vec::new());
        let result = choose(&mut console, "Test", options);
        let output = String::from_utf8(console.into_output()).unwrap();
        (result, output)
    }

    #[test]
    fn single_selection() {
        let (result, _) = run("1\n", &options());
        assert_eq!(result.unwrap(), vec!["a"]);
    }

    #[test]
    fn all_expands_in_original_order() {
        let (result, _) = run("3\n", &options());
        assert_eq!(result.unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn menu_lists_options_then_all() {
        let (_, output) = run("2\n", &options());
        assert!(output.contains("▶ Test\n1. a\n2. b\n3. (all)\n"));
    }

    #[test]
    fn invalid_input_reprompts_until_valid() {
        let (result, output) = run("x\n0\n4\n-1\n\n2\n", &options());
        assert_eq!(result.unwrap(), vec!["b"]);
        assert_eq!(output.matches("⚠ Invalid option. Please try again.").count(), 5);
        assert_eq!(output.matches("Select an option: ").count(), 6);
    }

    #[test]
    fn input_closed_while_waiting_is_an_error() {
        let (result, _) = run("9\n", &options());
        assert_eq!(result.unwrap_err().code.as_str(), "input.closed");
    }

    #[test]
    fn empty_options_are_rejected_without_prompting() {
        let (result, output) = run("1\n", &[]);
        assert!(result.is_err());
        assert!(output.is_empty());
    }
}
