use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::session::Session;

const COMMENT_PREFIX: char = '#';

/// Line-oriented front-end: shows the prompt, hands each line to the session
/// and prints whatever comes back.
pub struct Terminal<W: Write> {
    output: W,
    colorize: bool,
}

impl<W: Write> Terminal<W> {
    pub fn new(output: W, colorize: bool) -> Self {
        Self { output, colorize }
    }

    fn write_prompt(&mut self, session: &Session) -> io::Result<()> {
        let prompt = session.prompt();
        if self.colorize {
            write!(self.output, "{}", prompt.green())?;
        } else {
            write!(self.output, "{prompt}")?;
        }
        self.output.flush()
    }

    fn write_output(&mut self, output: &str) -> io::Result<()> {
        if output.is_empty() {
            return Ok(());
        }
        writeln!(self.output, "{output}")
    }

    pub fn report(&mut self, message: &str) -> io::Result<()> {
        self.write_output(message)
    }

    /// Runs a startup script, echoing each command after the prompt as if it
    /// had been typed. Blank lines and `#` comments are skipped.
    pub fn run_script(&mut self, session: &mut Session, script: &str) -> io::Result<()> {
        for line in script.lines().map(str::trim) {
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            self.write_prompt(session)?;
            writeln!(self.output, "{line}")?;
            let output = session.execute(line);
            self.write_output(&output)?;

            if session.is_finished() {
                break;
            }
        }
        Ok(())
    }

    /// Reads commands from `input` until `exit` or end of input
    pub fn run_interactive(
        &mut self,
        session: &mut Session,
        mut input: impl BufRead,
    ) -> io::Result<()> {
        while !session.is_finished() {
            self.write_prompt(session)?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }

            let output = session.execute(line.trim());
            self.write_output(&output)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.output
    }
}
