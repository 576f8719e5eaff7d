use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};

/// Source of answers for the questions the CLI asks when a value is missing.
pub trait Prompter {
    /// Asks for free text. An empty answer yields `default` when one is given.
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String>;

    /// Asks to pick one of `choices`; returns its index.
    fn select(&mut self, question: &str, choices: &[&str], default: usize) -> Result<usize>;
}

/// Answers every question with its default, for non-interactive runs.
pub struct Defaults;

impl Prompter for Defaults {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(default) => Ok(default.to_string()),
            None => bail!("'{question}' needs an answer but no terminal is attached"),
        }
    }

    fn select(&mut self, _question: &str, _choices: &[&str], default: usize) -> Result<usize> {
        Ok(default)
    }
}

/// Line-based prompts: questions go to `output`, answers come from `input`.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `None` at end of input.
    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(default) => write!(self.output, "? {question} ({default}) › ")?,
            None => write!(self.output, "? {question} › ")?,
        }
        self.output.flush()?;

        match (self.read_answer()?, default) {
            (Some(answer), _) if !answer.is_empty() => Ok(answer),
            (_, Some(default)) => Ok(default.to_string()),
            (Some(_), None) => Ok(String::new()),
            (None, None) => bail!("no answer to '{question}' (end of input)"),
        }
    }

    fn select(&mut self, question: &str, choices: &[&str], default: usize) -> Result<usize> {
        loop {
            writeln!(self.output, "? {question}")?;
            for (index, choice) in choices.iter().enumerate() {
                let marker = if index == default { "›" } else { " " };
                writeln!(self.output, "  {marker} {}) {choice}", index + 1)?;
            }
            write!(self.output, "  Choice ({}) › ", default + 1)?;
            self.output.flush()?;

            let Some(answer) = self.read_answer()? else {
                return Ok(default);
            };
            if answer.is_empty() {
                return Ok(default);
            }
            if let Some(index) = parse_choice(&answer, choices) {
                return Ok(index);
            }
            writeln!(self.output, "  '{answer}' is not one of the choices")?;
        }
    }
}

/// Accepts a 1-based number or a choice name, case-insensitively.
fn parse_choice(answer: &str, choices: &[&str]) -> Option<usize> {
    if let Ok(number) = answer.parse::<usize>() {
        return (1..=choices.len()).contains(&number).then(|| number - 1);
    }
    choices
        .iter()
        .position(|choice| choice.eq_ignore_ascii_case(answer))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Replays canned answers; an empty string stands for "accept the default".
    pub(crate) struct Scripted {
        answers: VecDeque<String>,
        pub questions: Vec<String>,
    }

    impl Scripted {
        pub(crate) fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                questions: Vec::new(),
            }
        }
    }

    impl Prompter for Scripted {
        fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
            self.questions.push(question.to_string());
            let answer = self.answers.pop_front().unwrap_or_default();
            Ok(match (answer.is_empty(), default) {
                (true, Some(default)) => default.to_string(),
                _ => answer,
            })
        }

        fn select(&mut self, question: &str, choices: &[&str], default: usize) -> Result<usize> {
            self.questions.push(question.to_string());
            let answer = self.answers.pop_front().unwrap_or_default();
            Ok(parse_choice(&answer, choices).unwrap_or(default))
        }
    }

    fn prompter(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn ask_returns_trimmed_answer() {
        let mut p = prompter("  CCO \n");
        assert_eq!(p.ask("Please insert a SMILES", None).unwrap(), "CCO");
        let shown = String::from_utf8(p.output).unwrap();
        assert_eq!(shown, "? Please insert a SMILES › ");
    }

    #[test]
    fn ask_falls_back_to_default() {
        let mut p = prompter("\n");
        assert_eq!(
            p.ask("Please insert the name of the MolFile", Some("untitled.mol"))
                .unwrap(),
            "untitled.mol"
        );

        let mut p = prompter("");
        assert_eq!(p.ask("SVG Width", Some("400")).unwrap(), "400");
    }

    #[test]
    fn ask_without_default_fails_at_end_of_input() {
        let mut p = prompter("");
        assert!(p.ask("Please insert a SMILES", None).is_err());
    }

    #[test]
    fn select_accepts_numbers_and_names() {
        let choices = ["V2000", "V3000"];
        assert_eq!(prompter("2\n").select("Type", &choices, 0).unwrap(), 1);
        assert_eq!(prompter("v3000\n").select("Type", &choices, 0).unwrap(), 1);
        assert_eq!(prompter("\n").select("Type", &choices, 0).unwrap(), 0);
    }

    #[test]
    fn select_asks_again_after_invalid_answer() {
        let mut p = prompter("7\nV2000\n");
        assert_eq!(p.select("Type", &["V2000", "V3000"], 1).unwrap(), 0);
        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("'7' is not one of the choices"));
        assert_eq!(shown.matches("? Type").count(), 2);
    }

    #[test]
    fn defaults_answer_without_input() {
        let mut d = Defaults;
        assert_eq!(d.ask("SVG Height", Some("400")).unwrap(), "400");
        assert_eq!(d.select("Type", &["a", "b"], 1).unwrap(), 1);
        assert!(d.ask("Please insert a SMILES", None).is_err());
    }
}
