// src/prompt.rs

//! Interactive questions asked during installation

use crate::error::{Error, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Asks questions on `output` and reads answers from `input`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Aborted("input closed".to_string()));
        }
        Ok(line.trim().to_string())
    }

    /// Ask for a display name, falling back to `default` on an empty answer
    pub fn friendly_name(&mut self, default: &str) -> Result<String> {
        write!(self.output, "Enter a friendly name for the package [{}]: ", default)?;
        self.output.flush()?;

        let answer = self.read_answer()?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Pick one of `candidates`; a single candidate is chosen without asking
    pub fn select_executable(&mut self, root: &Path, candidates: &[PathBuf]) -> Result<PathBuf> {
        match candidates {
            [] => Err(Error::NoExecutables(root.to_path_buf())),
            [only] => {
                writeln!(self.output, "Automatically selected executable: {}", file_label(only))?;
                Ok(only.clone())
            }
            _ => {
                writeln!(self.output, "Multiple executables found:")?;
                for (index, candidate) in candidates.iter().enumerate() {
                    let relative = candidate.strip_prefix(root).unwrap_or(candidate);
                    writeln!(self.output, "  {}) {}", index + 1, relative.display())?;
                }

                loop {
                    write!(
                        self.output,
                        "Select an executable to symlink (1-{}): ",
                        candidates.len()
                    )?;
                    self.output.flush()?;

                    let answer = self.read_answer()?;
                    match answer.parse::<usize>() {
                        Ok(choice) if (1..=candidates.len()).contains(&choice) => {
                            let selected = candidates[choice - 1].clone();
                            writeln!(self.output, "Selected executable: {}", file_label(&selected))?;
                            return Ok(selected);
                        }
                        _ => writeln!(self.output, "Invalid selection. Please enter a valid number.")?,
                    }
                }
            }
        }
    }

    /// Yes/no question; only `y` or `yes` confirm
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{} (y/n): ", question)?;
        self.output.flush()?;

        let answer = self.read_answer()?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_friendly_name_default_on_empty() {
        let mut p = prompter("\n");
        assert_eq!(p.friendly_name("editor").unwrap(), "editor");
    }

    #[test]
    fn test_friendly_name_trims_answer() {
        let mut p = prompter("  My Editor  \n");
        assert_eq!(p.friendly_name("editor").unwrap(), "My Editor");
    }

    #[test]
    fn test_select_single_executable_without_asking() {
        let mut p = prompter("");
        let root = Path::new("/opt/pkg");
        let chosen = p.select_executable(root, &[root.join("bin/tool")]).unwrap();
        assert_eq!(chosen, root.join("bin/tool"));
    }

    #[test]
    fn test_select_reprompts_until_valid() {
        let mut p = prompter("0\nabc\n2\n");
        let root = Path::new("/opt/pkg");
        let candidates = vec![root.join("bin/a"), root.join("bin/b")];

        let chosen = p.select_executable(root, &candidates).unwrap();
        assert_eq!(chosen, root.join("bin/b"));

        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("  1) bin/a"));
        assert_eq!(shown.matches("Invalid selection").count(), 2);
    }

    #[test]
    fn test_select_with_no_candidates() {
        let mut p = prompter("");
        let result = p.select_executable(Path::new("/opt/pkg"), &[]);
        assert!(matches!(result, Err(Error::NoExecutables(_))));
    }

    #[test]
    fn test_confirm_answers() {
        assert!(prompter("y\n").confirm("Overwrite?").unwrap());
        assert!(prompter("YES\n").confirm("Overwrite?").unwrap());
        assert!(!prompter("n\n").confirm("Overwrite?").unwrap());
        assert!(!prompter("\n").confirm("Overwrite?").unwrap());
    }

    #[test]
    fn test_closed_input_aborts() {
        let result = prompter("").confirm("Overwrite?");
        assert!(matches!(result, Err(Error::Aborted(_))));
    }
}
