use crate::error::{InstallerError, Result};
use console::{style, Term};
use std::io::{self, BufRead, Write};

/// Numbered-list prompt over any line reader and writer.
pub struct Prompt<R, W> {
    reader: R,
    writer: W,
    use_colors: bool,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            use_colors: false,
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Picks one of `options`, either the preset value or by asking.
    pub fn select(
        &mut self,
        what: &str,
        prompt_text: &str,
        options: &[String],
        preset: Option<&str>,
    ) -> Result<String> {
        if options.is_empty() {
            return Err(InstallerError::NoOptions {
                what: what.to_string(),
            });
        }

        match preset {
            Some(value) if options.iter().any(|o| o == value) => Ok(value.to_string()),
            Some(value) => Err(InstallerError::InvalidSelection {
                what: what.to_string(),
                value: value.to_string(),
                available: options.to_vec(),
            }),
            None => self.ask(prompt_text, options),
        }
    }

    /// Lists the options numbered from 1 and reads numbers until one is valid.
    pub fn ask(&mut self, prompt_text: &str, options: &[String]) -> Result<String> {
        writeln!(self.writer)?;
        if self.use_colors {
            writeln!(self.writer, "{}", style(prompt_text).bold())?;
        } else {
            writeln!(self.writer, "{}", prompt_text)?;
        }
        for (index, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {}: {}", index + 1, option)?;
        }
        writeln!(self.writer)?;

        loop {
            write!(self.writer, "Your number: ")?;
            self.writer.flush()?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(InstallerError::Cancelled);
            }

            match line.trim().parse::<usize>() {
                Ok(number) if (1..=options.len()).contains(&number) => {
                    return Ok(options[number - 1].clone());
                }
                _ => continue,
            }
        }
    }
}

/// Prompt bound to the process stdin and the terminal.
pub fn terminal_prompt(to_stderr: bool) -> Prompt<io::StdinLock<'static>, Term> {
    let term = if to_stderr {
        Term::stderr()
    } else {
        Term::stdout()
    };
    let use_colors = term.features().colors_supported();

    Prompt::new(io::stdin().lock(), term).with_colors(use_colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn options() -> Vec<String> {
        vec![
            "desktop_release".to_string(),
            "desktop_beta".to_string(),
            "desktop_nightly".to_string(),
        ]
    }

    fn run(input: &str) -> (Result<String>, String) {
        let mut output = Vec::new();
        let result = {
            let mut prompt = Prompt::new(Cursor::new(input.as_bytes()), &mut output);
            prompt.ask("Pick a product:", &options())
        };
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_prompt_lists_options() {
        let (result, output) = run("2\n");

        assert_eq!(result.unwrap(), "desktop_beta");
        assert_eq!(
            output,
            "\nPick a product:\n  1: desktop_release\n  2: desktop_beta\n  3: desktop_nightly\n\nYour number: "
        );
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let (result, output) = run("abc\n0\n4\n-1\n\n 3 \n");

        assert_eq!(result.unwrap(), "desktop_nightly");
        assert_eq!(output.matches("Your number: ").count(), 6);
    }

    #[test]
    fn test_prompt_end_of_input() {
        let (result, _) = run("9\n");
        assert!(matches!(result, Err(InstallerError::Cancelled)));
    }

    #[test]
    fn test_select_preset() {
        let mut output = Vec::new();
        let mut prompt = Prompt::new(Cursor::new(&b""[..]), &mut output);

        let chosen = prompt
            .select("product", "Pick a product:", &options(), Some("desktop_release"))
            .unwrap();
        assert_eq!(chosen, "desktop_release");

        let invalid = prompt.select("product", "Pick a product:", &options(), Some("desktop_esr"));
        match invalid {
            Err(InstallerError::InvalidSelection {
                what,
                value,
                available,
            }) => {
                assert_eq!(what, "product");
                assert_eq!(value, "desktop_esr");
                assert_eq!(available.len(), 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        drop(prompt);
        assert!(output.is_empty());
    }

    #[test]
    fn test_select_without_options() {
        let mut prompt = Prompt::new(Cursor::new(&b"1\n"[..]), Vec::new());
        let result = prompt.select("platform", "Pick a platform:", &[], None);
        assert!(matches!(result, Err(InstallerError::NoOptions { .. })));
    }
}
