//! Line-oriented terminal I/O shared by the wizard and the REPL.

use std::io::{self, BufRead, Write};

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }

    /// Prints `question` and reads one trimmed line; `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        self.say(question)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Yes/no question; a blank answer or end of input picks `default`.
    pub fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.ask(&format!("{question} {hint}: "))?;
        Ok(match answer.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("") => default,
            Some("y" | "yes" | "نعم") => true,
            Some(_) => false,
        })
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}
