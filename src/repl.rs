//! Interactive command loop.
//!
//! Reads one line at a time, parses it into a [`Command`], runs it against
//! the predictor and writes localized output. Generic over the input and
//! output streams so tests can drive it with in-memory buffers.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::messages::{self, Text};
use crate::predictor::selftest::{self, Outcome};
use crate::predictor::{self, SequencePredictor};
use crate::types::{join_numbers, parse_text_sequence, ErrorKind, Locale};

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Predict from the raw argument text (parsed later so errors are
    /// reported in the user's locale).
    Predict(String),
    Validate(String),
    History,
    Clear,
    Samples,
    SelfCheck,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };

        match head.to_lowercase().as_str() {
            "predict" | "p" => Command::Predict(rest.to_string()),
            "validate" | "v" => Command::Validate(rest.to_string()),
            "history" | "h" => Command::History,
            "clear" => Command::Clear,
            "samples" => Command::Samples,
            "test" | "check" => Command::SelfCheck,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ if looks_numeric(line) => Command::Predict(line.to_string()),
            _ => Command::Unknown(head.to_string()),
        }
    }
}

/// A bare list of numbers is shorthand for `predict`.
fn looks_numeric(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}

/// Whether the loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl<'a, R, W> {
    input: R,
    output: W,
    predictor: &'a mut SequencePredictor,
    locale: Locale,
}

impl<'a, R: BufRead, W: Write> Repl<'a, R, W> {
    pub fn new(input: R, output: W, predictor: &'a mut SequencePredictor, locale: Locale) -> Self {
        Self {
            input,
            output,
            predictor,
            locale,
        }
    }

    /// Print the greeting, then process lines until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", messages::text(self.locale, Text::Title))?;
        writeln!(self.output, "{}", messages::text(self.locale, Text::Welcome))?;
        writeln!(self.output)?;
        writeln!(self.output, "{}", messages::text(self.locale, Text::Help))?;

        let mut line = String::new();
        loop {
            write!(self.output, "{}", messages::text(self.locale, Text::Prompt))?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }

            if self.execute(Command::parse(&line))? == Flow::Quit {
                break;
            }
        }

        writeln!(self.output, "{}", messages::text(self.locale, Text::Goodbye))?;
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        debug!(?command, "REPL command");
        let locale = self.locale;

        match command {
            Command::Predict(args) => {
                let parsed = parse_text_sequence(&args);
                match parsed
                    .as_deref()
                    .map_err(|kind| *kind)
                    .and_then(|seq| self.predictor.predict_next(seq))
                {
                    Ok(record) => {
                        writeln!(self.output, "{}", messages::prediction(locale, record.predicted_next))?;
                        writeln!(
                            self.output,
                            "{}: {}",
                            messages::text(locale, Text::CommonDifference),
                            record.common_difference
                        )?;
                        writeln!(self.output, "{}", messages::text(locale, Text::Stored))?;
                    }
                    Err(kind) => self.write_error(kind, parsed.as_deref().ok())?,
                }
            }
            Command::Validate(args) => {
                let parsed = parse_text_sequence(&args);
                match parsed
                    .as_deref()
                    .map_err(|kind| *kind)
                    .and_then(|seq| self.predictor.validate(seq))
                {
                    Ok(progression) => {
                        writeln!(self.output, "{}", messages::text(locale, Text::ValidProgression))?;
                        writeln!(
                            self.output,
                            "{}: {}",
                            messages::text(locale, Text::CommonDifference),
                            progression.common_difference
                        )?;
                    }
                    Err(kind) => self.write_error(kind, parsed.as_deref().ok())?,
                }
            }
            Command::History => self.write_history()?,
            Command::Clear => {
                let removed = self.predictor.clear_history();
                writeln!(self.output, "{}", messages::cleared(locale, removed))?;
            }
            Command::Samples => {
                writeln!(self.output, "{}", messages::text(locale, Text::SamplesHeader))?;
                for (i, sample) in selftest::sample_views(locale).iter().enumerate() {
                    writeln!(
                        self.output,
                        "{}. {}: [{}] -> {}",
                        i + 1,
                        sample.name,
                        join_numbers(sample.sequence),
                        sample.expected
                    )?;
                }
            }
            Command::SelfCheck => self.write_self_check()?,
            Command::Help => writeln!(self.output, "{}", messages::text(locale, Text::Help))?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Empty => {}
            Command::Unknown(_) => {
                writeln!(self.output, "{}", messages::text(locale, Text::UnknownCommand))?
            }
        }

        Ok(Flow::Continue)
    }

    fn write_error(&mut self, kind: ErrorKind, sequence: Option<&[f64]>) -> Result<()> {
        let differences = predictor::rejected_differences(kind, sequence);
        writeln!(
            self.output,
            "Error: {}",
            messages::rejection(self.locale, kind, differences.as_deref())
        )?;
        Ok(())
    }

    fn write_history(&mut self) -> Result<()> {
        let history = self.predictor.history();
        if history.is_empty() {
            writeln!(self.output, "{}", messages::text(self.locale, Text::HistoryEmpty))?;
            return Ok(());
        }

        writeln!(self.output, "{}", messages::text(self.locale, Text::HistoryHeader))?;
        for (i, record) in history.iter().enumerate() {
            writeln!(self.output, "  #{} {record}", i + 1)?;
        }
        Ok(())
    }

    fn write_self_check(&mut self) -> Result<()> {
        let locale = self.locale;
        let report = selftest::run_self_check(locale);

        writeln!(self.output, "{}", messages::text(locale, Text::SelfCheckHeader))?;
        for case in &report.cases {
            let status = if case.passed { Text::Passed } else { Text::Failed };
            writeln!(
                self.output,
                "  [{}] {}: [{}] -> {} ({} {})",
                messages::text(locale, status),
                case.name,
                join_numbers(&case.sequence),
                describe(locale, &case.outcome),
                messages::text(locale, Text::Expected),
                describe(locale, &case.expected),
            )?;
        }
        writeln!(
            self.output,
            "{}",
            messages::success_rate(locale, report.passed, report.failed, report.success_rate())
        )?;
        Ok(())
    }
}

fn describe(locale: Locale, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Predicted(n) => n.to_string(),
        Outcome::Rejected(kind) => messages::error(locale, *kind).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str, locale: Locale) -> (String, SequencePredictor) {
        let mut predictor = SequencePredictor::new();
        let mut out = Vec::new();
        Repl::new(Cursor::new(script.as_bytes()), &mut out, &mut predictor, locale)
            .run()
            .unwrap();
        (String::from_utf8(out).unwrap(), predictor)
    }

    // -- parsing --

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("predict 1, 2, 3"), Command::Predict("1, 2, 3".into()));
        assert_eq!(Command::parse("  P 1 2 "), Command::Predict("1 2".into()));
        assert_eq!(Command::parse("validate 1,2"), Command::Validate("1,2".into()));
        assert_eq!(Command::parse("HISTORY"), Command::History);
        assert_eq!(Command::parse("clear"), Command::Clear);
        assert_eq!(Command::parse("samples"), Command::Samples);
        assert_eq!(Command::parse("test"), Command::SelfCheck);
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("dance now"), Command::Unknown("dance".into()));
    }

    #[test]
    fn test_parse_bare_numbers_is_predict() {
        assert_eq!(Command::parse("3, 6, 9"), Command::Predict("3, 6, 9".into()));
        assert_eq!(Command::parse("-1 -2"), Command::Predict("-1 -2".into()));
        assert_eq!(Command::parse(".5,1"), Command::Predict(".5,1".into()));
    }

    #[test]
    fn test_predict_without_args_is_too_short() {
        let (out, predictor) = run_script("predict\nquit\n", Locale::En);
        assert!(out.contains(messages::error(Locale::En, ErrorKind::TooShort)));
        assert!(predictor.is_empty());
    }

    // -- sessions --

    #[test]
    fn test_predict_session() {
        let (out, predictor) = run_script("3, 6, 9, 12\nquit\n", Locale::En);
        assert!(out.contains("The next number in the sequence is: 15"));
        assert!(out.contains("Common difference: 3"));
        assert_eq!(predictor.len(), 1);
    }

    #[test]
    fn test_invalid_sequence_not_recorded() {
        let (out, predictor) = run_script("predict 1,2,4,8\npredict 1,x\nhistory\n", Locale::En);
        assert!(out.contains(messages::error(Locale::En, ErrorKind::NotArithmetic)));
        assert!(out.contains(messages::error(Locale::En, ErrorKind::NonNumeric)));
        assert!(out.contains(messages::text(Locale::En, Text::HistoryEmpty)));
        assert!(predictor.is_empty());
    }

    #[test]
    fn test_not_arithmetic_lists_differences() {
        let (out, _) = run_script("predict 1,2,4,8\nvalidate 1 3 4\n", Locale::En);
        assert!(out.contains("Differences are: 1, 2, 4"));
        assert!(out.contains("Differences are: 2, 1"));
    }

    #[test]
    fn test_validate_does_not_store() {
        let (out, predictor) = run_script("validate 20 15 10 5\n", Locale::En);
        assert!(out.contains("Common difference: -5"));
        assert!(predictor.is_empty());
    }

    #[test]
    fn test_history_and_clear() {
        let (out, predictor) = run_script("1,2\n2,4\nhistory\nclear\nhistory\n", Locale::En);
        assert!(out.contains("#1 [1, 2] d=1 next=3"));
        assert!(out.contains("#2 [2, 4] d=2 next=6"));
        assert!(out.contains("Removed 2 memories"));
        assert!(predictor.is_empty());
    }

    #[test]
    fn test_eof_ends_session() {
        let (out, _) = run_script("1,2", Locale::En);
        assert!(out.contains(messages::text(Locale::En, Text::Goodbye)));
    }

    #[test]
    fn test_quit_stops_processing() {
        let (_, predictor) = run_script("quit\n1,2\n", Locale::En);
        assert!(predictor.is_empty());
    }

    #[test]
    fn test_unknown_command() {
        let (out, _) = run_script("dance\n", Locale::En);
        assert!(out.contains(messages::text(Locale::En, Text::UnknownCommand)));
    }

    #[test]
    fn test_spanish_session() {
        let (out, _) = run_script("5 10\nsamples\n", Locale::Es);
        assert!(out.contains("El siguiente número de la secuencia es: 15"));
        assert!(out.contains("Secuencia básica: [3, 6, 9, 12] -> 15"));
        assert!(out.contains(messages::text(Locale::Es, Text::Goodbye)));
    }

    #[test]
    fn test_self_check_does_not_touch_session_history() {
        let (out, predictor) = run_script("test\n", Locale::En);
        assert!(out.contains("Failed: 0"));
        assert!(!out.contains("[FAILED]"));
        assert!(predictor.is_empty());
    }
}
