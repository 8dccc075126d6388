//! Numbered-menu prompts on a terminal (or any reader/writer pair).

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::error::RecordError;

/// Asks the user to pick one of `options`.
pub trait Prompter {
  /// Returns the zero-based index of the chosen option.
  fn choose(&mut self, question: &str, options: &[&str]) -> Result<usize, RecordError>;
}

/// Prints a numbered menu and reads the answer line by line until it is valid.
pub struct TerminalPrompter<R, W> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }

  pub fn into_inner(self) -> (R, W) {
    (self.input, self.output)
  }
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
  pub fn stdio() -> Self {
    Self::new(io::stdin().lock(), io::stdout())
  }
}

/// Renders the question followed by `1) option` lines.
pub(crate) fn render_menu(question: &str, options: &[&str]) -> String {
  let mut menu = format!("{}\n\n", question);
  for (i, option) in options.iter().enumerate() {
    menu.push_str(&format!("{}) {}\n", i + 1, option));
  }
  menu
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
  fn choose(&mut self, question: &str, options: &[&str]) -> Result<usize, RecordError> {
    let menu = render_menu(question, options);
    loop {
      self.output.write_all(menu.as_bytes())?;
      self.output.flush()?;
      let mut line = String::new();
      if self.input.read_line(&mut line)? == 0 {
        return Err(RecordError::Io(io::Error::new(
          io::ErrorKind::UnexpectedEof,
          "no answer on input",
        )));
      }
      match line.trim().parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => {
          writeln!(self.output, "You chose {}", n)?;
          return Ok(n - 1);
        }
        _ => continue,
      }
    }
  }
}
