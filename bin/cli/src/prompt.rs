//! Sources of command parameters that were not given on the command line.

use crate::error::CliError;
use rootcause::prelude::Report;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Checks an answer, returning a message to show when it is rejected.
pub type Validator<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// Accepts any answer, including an empty one.
///
/// # Errors
///
/// Never fails.
pub fn any(_: &str) -> Result<(), String> {
    Ok(())
}

/// Rejects empty answers.
///
/// # Errors
///
/// Returns a message when the answer is empty.
pub fn required(answer: &str) -> Result<(), String> {
    if answer.is_empty() {
        Err("a value is required".to_string())
    } else {
        Ok(())
    }
}

/// Rejects names that are not valid profile names.
///
/// # Errors
///
/// Returns a message when the name is invalid.
pub fn profile_name(answer: &str) -> Result<(), String> {
    authctl_profile::validate_profile_name(answer)
        .map_err(|report| report.current_context().to_string())
}

/// Answers questions a command asks when arguments are missing.
pub trait ParameterSource {
    /// Asks for free text.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Prompt`] when no acceptable answer can be obtained.
    fn text(&mut self, question: &str, validate: Validator<'_>)
    -> Result<String, Report<CliError>>;

    /// Asks for one of `options`, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Prompt`] when no acceptable answer can be obtained.
    fn select(&mut self, question: &str, options: &[String]) -> Result<usize, Report<CliError>>;

    /// Asks a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Prompt`] when no acceptable answer can be obtained.
    fn confirm(&mut self, question: &str) -> Result<bool, Report<CliError>>;
}

fn prompt_error(details: impl Into<String>) -> Report<CliError> {
    CliError::Prompt {
        details: details.into(),
    }
    .into()
}

fn choose(answer: &str, options: &[String]) -> Option<usize> {
    match answer.parse::<usize>() {
        Ok(number) if (1..=options.len()).contains(&number) => Some(number - 1),
        _ => options.iter().position(|option| option == answer),
    }
}

fn yes_or_no(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Asks on a terminal, repeating each question until the answer is accepted.
#[derive(Debug)]
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Creates a prompt reading answers from `input` and writing questions to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String, Report<CliError>> {
        write!(self.output, "{question} ")
            .and_then(|()| self.output.flush())
            .map_err(|e| prompt_error(e.to_string()))?;

        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .map_err(|e| prompt_error(e.to_string()))?;
        if read == 0 {
            return Err(prompt_error(format!("no answer to '{question}'")));
        }
        Ok(answer.trim().to_string())
    }

    fn reject(&mut self, message: &str) -> Result<(), Report<CliError>> {
        writeln!(self.output, "  {message}").map_err(|e| prompt_error(e.to_string()))
    }
}

impl<R: BufRead, W: Write> ParameterSource for TerminalPrompt<R, W> {
    fn text(
        &mut self,
        question: &str,
        validate: Validator<'_>,
    ) -> Result<String, Report<CliError>> {
        loop {
            let answer = self.ask(question)?;
            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(message) => self.reject(&message)?,
            }
        }
    }

    fn select(&mut self, question: &str, options: &[String]) -> Result<usize, Report<CliError>> {
        if options.is_empty() {
            return Err(prompt_error(format!("nothing to choose for '{question}'")));
        }

        let mut menu = format!("{question}\n");
        for (index, option) in options.iter().enumerate() {
            menu.push_str(&format!("  {}) {}\n", index + 1, option));
        }
        write!(self.output, "{menu}").map_err(|e| prompt_error(e.to_string()))?;

        loop {
            let answer = self.ask(">")?;
            match choose(&answer, options) {
                Some(index) => return Ok(index),
                None => self.reject(&format!("enter a number from 1 to {}", options.len()))?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool, Report<CliError>> {
        loop {
            let answer = self.ask(&format!("{question} [y/N]"))?;
            if answer.is_empty() {
                return Ok(false);
            }
            match yes_or_no(&answer) {
                Some(confirmed) => return Ok(confirmed),
                None => self.reject("answer y or n")?,
            }
        }
    }
}

/// Answers taken, in order, from a pre-supplied list.
///
/// Unlike [`TerminalPrompt`], a rejected answer is an error.
#[derive(Debug, Clone, Default)]
pub struct SuppliedAnswers {
    answers: VecDeque<String>,
}

impl SuppliedAnswers {
    /// Creates a source that hands out `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns how many answers are left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, question: &str) -> Result<String, Report<CliError>> {
        self.answers
            .pop_front()
            .ok_or_else(|| prompt_error(format!("no answer supplied for '{question}'")))
    }
}

impl ParameterSource for SuppliedAnswers {
    fn text(
        &mut self,
        question: &str,
        validate: Validator<'_>,
    ) -> Result<String, Report<CliError>> {
        let answer = self.next(question)?;
        validate(&answer).map_err(prompt_error)?;
        Ok(answer)
    }

    fn select(&mut self, question: &str, options: &[String]) -> Result<usize, Report<CliError>> {
        let answer = self.next(question)?;
        choose(&answer, options)
            .ok_or_else(|| prompt_error(format!("'{answer}' is not one of {options:?}")))
    }

    fn confirm(&mut self, question: &str) -> Result<bool, Report<CliError>> {
        let answer = self.next(question)?;
        yes_or_no(&answer).ok_or_else(|| prompt_error(format!("'{answer}' is not y or n")))
    }
}
