//! Parsing of typed commands.

use std::path::PathBuf;

use anyhow::{Context, bail};
use cvsorter_core::ReasonMap;

/// A user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open a folder of CVs.
    Open(PathBuf),
    /// Reject the current CV with a reason key.
    Reject(char),
    /// Hold the current CV for later review.
    Hold,
    /// Undo the last reject or hold.
    Undo,
    /// Show recent moves.
    History,
    /// Import candidate emails from a CSV file.
    Import(PathBuf),
    /// Export rejected CVs to a CSV file.
    Export(PathBuf),
    /// Set the viewer zoom kept with the session.
    Zoom(f64),
    /// Reprint the status line.
    Status,
    /// Show the key reference.
    Help,
    /// Save and exit.
    Quit,
}

impl Command {
    /// Parse one input line.
    ///
    /// A single character that is a configured reason key always means
    /// "reject", even if it shadows a one-letter command; the long command
    /// names stay available. A blank line maps to [`Command::Status`].
    pub fn parse(line: &str, reasons: &ReasonMap) -> anyhow::Result<Self> {
        let line = line.trim();
        let (word, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, a)| (w, a.trim()));

        let mut chars = word.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            if reasons.contains(key) && arg.is_empty() {
                return Ok(Self::Reject(key));
            }
        }

        let command = match word.to_lowercase().as_str() {
            "" | "s" | "status" => Self::Status,
            "h" | "hold" => Self::Hold,
            "u" | "undo" => Self::Undo,
            "history" => Self::History,
            "?" | "help" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            "open" => Self::Open(path_arg("open", arg)?),
            "import" => Self::Import(path_arg("import", arg)?),
            "export" => Self::Export(path_arg("export", arg)?),
            "zoom" => Self::Zoom(
                arg.parse()
                    .with_context(|| format!("zoom needs a number, got {arg:?}"))?,
            ),
            "reject" | "r" => {
                let mut key = arg.chars();
                match (key.next(), key.next()) {
                    (Some(k), None) => Self::Reject(k),
                    _ => bail!("reject needs a single reason key"),
                }
            }
            other => bail!("Unknown command {other:?}, type 'help' for the key reference"),
        };
        Ok(command)
    }
}

/// Export target with a `.csv` extension, appended unless one is already
/// present in any letter case.
pub fn export_path(mut path: PathBuf) -> PathBuf {
    if !path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    {
        path.as_mut_os_string().push(".csv");
    }
    path
}

fn path_arg(command: &str, arg: &str) -> anyhow::Result<PathBuf> {
    if arg.is_empty() {
        bail!("{command} needs a path");
    }
    Ok(PathBuf::from(arg))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(line: &str) -> anyhow::Result<Command> {
        Command::parse(line, &ReasonMap::default())
    }

    #[test]
    fn test_reason_keys() {
        assert_eq!(parse("1").unwrap(), Command::Reject('1'));
        assert_eq!(parse(" 3 ").unwrap(), Command::Reject('3'));
        assert_eq!(parse("reject 9").unwrap(), Command::Reject('9'));
    }

    #[test]
    fn test_single_letter_commands() {
        assert_eq!(parse("h").unwrap(), Command::Hold);
        assert_eq!(parse("U").unwrap(), Command::Undo);
        assert_eq!(parse("").unwrap(), Command::Status);
        assert_eq!(parse("q").unwrap(), Command::Quit);
    }

    #[test]
    fn test_reason_key_shadows_short_command() {
        let reasons: ReasonMap = [('h', "NoVisa".to_string())].into_iter().collect();

        assert_eq!(Command::parse("h", &reasons).unwrap(), Command::Reject('h'));
        assert_eq!(Command::parse("hold", &reasons).unwrap(), Command::Hold);
    }

    #[test]
    fn test_path_arguments_keep_spaces() {
        assert_eq!(
            parse("open /home/hr/Spring Intake").unwrap(),
            Command::Open(PathBuf::from("/home/hr/Spring Intake"))
        );
        assert_eq!(
            parse("export out").unwrap(),
            Command::Export(PathBuf::from("out"))
        );
        assert!(parse("import").is_err());
    }

    #[test]
    fn test_export_path_extension() {
        assert_eq!(export_path("out".into()), PathBuf::from("out.csv"));
        assert_eq!(export_path("out.csv".into()), PathBuf::from("out.csv"));
        assert_eq!(export_path("out.CSV".into()), PathBuf::from("out.CSV"));
        assert_eq!(export_path("out.txt".into()), PathBuf::from("out.txt.csv"));
        assert_eq!(
            export_path("reports/spring intake".into()),
            PathBuf::from("reports/spring intake.csv")
        );
    }

    #[test]
    fn test_zoom() {
        assert_eq!(parse("zoom 2.5").unwrap(), Command::Zoom(2.5));
        assert!(parse("zoom big").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse("frobnicate").is_err());
        assert!(parse("7").is_err());
    }
}
