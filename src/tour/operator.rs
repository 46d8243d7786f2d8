use std::io;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::TourError;

/// The person going through the tour.
pub trait Operator {
    /// Show narration.
    fn say(&mut self, text: &str);
    /// Block until the operator presses Enter.
    fn pause(&mut self, prompt: &str) -> Result<(), TourError>;
    /// Ask a yes/no question. An empty answer picks `default`.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, TourError>;
    /// Ask for a line of free text.
    fn ask(&mut self, question: &str) -> Result<String, TourError>;
}

/// Line-editing terminal prompts.
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self, TourError> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }

    fn readline(&mut self, prompt: &str) -> Result<String, TourError> {
        self.editor.readline(prompt).map_err(readline_error)
    }
}

fn readline_error(err: ReadlineError) -> TourError {
    match err {
        ReadlineError::Interrupted | ReadlineError::Eof => TourError::Interrupted,
        ReadlineError::Io(err) => TourError::Io(err),
        other => TourError::Io(io::Error::other(other.to_string())),
    }
}

impl Operator for Terminal {
    fn say(&mut self, text: &str) {
        println!("{text}");
    }

    fn pause(&mut self, prompt: &str) -> Result<(), TourError> {
        self.readline(&format!("{prompt} ")).map(drop)
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, TourError> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        loop {
            let answer = self.readline(&format!("? {question} {hint} "))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer y or n."),
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<String, TourError> {
        let answer = self.readline(&format!("? {question} "))?;
        Ok(answer.trim().to_owned())
    }
}
