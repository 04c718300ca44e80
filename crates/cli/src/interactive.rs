//! Terminal interaction: prompts, confirmations, and stage transcripts.

use std::io::{self, BufRead, Write};

use nodes::StageObserver;
use pipeline::StageName;

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks `question` until a non-blank answer arrives.
    ///
    /// End of input is an error: there is nobody left to answer.
    pub fn ask_non_empty(&mut self, question: &str, field: &str) -> io::Result<String> {
        loop {
            write!(self.output, "{question}: ")?;
            self.output.flush()?;

            let answer = self.read_line()?.ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, format!("no {field} given"))
            })?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "{field} cannot be empty")?;
        }
    }

    /// Asks a yes/no question. End of input counts as "no".
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            write!(self.output, "{question} (y/n): ")?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                return Ok(false);
            };
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n")?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Prints a banner when each stage starts and its summary when it finishes.
pub struct TranscriptPrinter<W> {
    output: W,
}

impl<W: Write + Send> TranscriptPrinter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

fn stage_number(stage: StageName) -> usize {
    StageName::ALL
        .iter()
        .position(|s| *s == stage)
        .map_or(0, |i| i + 1)
}

impl<W: Write + Send> StageObserver for TranscriptPrinter<W> {
    fn stage_started(&mut self, stage: StageName) {
        // Transcript output is best effort; a closed stdout must not abort a run.
        let _ = writeln!(
            self.output,
            "STAGE {}/{}: {}\n",
            stage_number(stage),
            StageName::ALL.len(),
            stage.to_string().to_uppercase()
        );
        let _ = self.output.flush();
    }

    fn stage_finished(&mut self, stage: StageName, summary: &str) {
        let _ = writeln!(self.output, "{stage} complete!\n\n{summary}\n");
        let _ = self.output.flush();
    }
}
