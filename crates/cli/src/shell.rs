// Interactive review shell: load, validate, inspect errors, fix, preview.
//
// One command per line. Output goes to the supplied writer so the loop can be
// driven from tests with in-memory buffers.

use std::io::{self, BufRead, Write};
use std::path::Path;

use rowcheck_access::Credentials;
use rowcheck_engine::{EngineError, Session};
use rowcheck_io::preview::NO_DATA;

use crate::edits;
use crate::gate::PreviewGate;

pub const NO_ERRORS: &str = "No errors found. Run validation first.";

const HELP: &str = "\
Commands:
  load <path>                  Load a CSV/TSV file (replaces the current data)
  validate                     Check every row and list the rows with issues
  errors                       Show the invalid fields recorded by the last run
  fix <row> field=value ...    Correct flagged fields of a row (rows start at 1)
  preview <id> <secret>        Show the first rows of the data
  status                       Show what is loaded and whether results are stale
  help                         Show this help
  quit                         Leave the shell";

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    session: Session,
    gate: PreviewGate,
    delimiter: Option<u8>,
}

impl Shell {
    pub fn new(session: Session, gate: PreviewGate, delimiter: Option<u8>) -> Self {
        Self { session, gate, delimiter }
    }

    /// Read commands until EOF or `quit`.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write, prompt: bool) -> io::Result<()> {
        if prompt {
            write!(out, "rowcheck> ")?;
            out.flush()?;
        }
        for line in input.lines() {
            let line = line?;
            let (text, flow) = self.execute(&line);
            if !text.is_empty() {
                writeln!(out, "{text}")?;
            }
            if flow == Flow::Quit {
                return Ok(());
            }
            if prompt {
                write!(out, "rowcheck> ")?;
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Execute one command line and return its output.
    pub fn execute(&mut self, line: &str) -> (String, Flow) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return (String::new(), Flow::Continue);
        }

        let words = match tokenize(trimmed) {
            Ok(words) => words,
            Err(e) => return (format!("error: {e}"), Flow::Continue),
        };
        let Some((command, args)) = words.split_first() else {
            return (String::new(), Flow::Continue);
        };
        log::debug!("shell command: {command} ({} args)", args.len());

        let result = match command.as_str() {
            "load" => self.cmd_load(args),
            "validate" => Ok(self.cmd_validate()),
            "errors" => Ok(self.cmd_errors()),
            "fix" => self.cmd_fix(args),
            "preview" => self.cmd_preview(args),
            "status" => Ok(self.cmd_status()),
            "help" | "?" => Ok(HELP.to_string()),
            "quit" | "exit" => return (String::new(), Flow::Quit),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        };

        match result {
            Ok(text) => (text, Flow::Continue),
            Err(e) => (format!("error: {e}"), Flow::Continue),
        }
    }

    fn cmd_load(&mut self, args: &[String]) -> Result<String, String> {
        let [path] = args else {
            return Err("usage: load <path>".into());
        };
        let rows = rowcheck_io::csv::load(Path::new(path), self.delimiter).map_err(|e| e.to_string())?;
        let count = rows.len();
        self.session.load(rows);
        Ok(format!("Loaded {count} rows from {path}."))
    }

    fn cmd_validate(&mut self) -> String {
        if !self.session.is_loaded() {
            return NO_DATA.to_string();
        }
        self.session.validate().display_lines().join("\n")
    }

    fn cmd_errors(&self) -> String {
        let review = self.session.review();
        if review.is_empty() {
            return NO_ERRORS.to_string();
        }

        let mut lines = Vec::with_capacity(review.len());
        for item in &review {
            let fields: Vec<String> = item
                .fields
                .iter()
                .map(|f| {
                    if f.current_value == f.invalid_value {
                        format!("{}={:?}", f.field, f.invalid_value)
                    } else {
                        format!("{}={:?} (now {:?})", f.field, f.invalid_value, f.current_value)
                    }
                })
                .collect();
            let marker = if item.stale { "  [corrected]" } else { "" };
            lines.push(format!("Row {}: {}{marker}", item.row_index + 1, fields.join(", ")));
        }
        if self.session.is_stale() {
            lines.push("Corrected rows are re-checked on the next 'validate'.".into());
        }
        lines.join("\n")
    }

    fn cmd_fix(&mut self, args: &[String]) -> Result<String, String> {
        let Some((row, field_edits)) = args.split_first() else {
            return Err("usage: fix <row> field=value ...".into());
        };
        let display_row: usize = row
            .parse()
            .map_err(|_| format!("row must be a number, got {row:?}"))?;
        let request = edits::build_request(display_row, field_edits)?;

        if self.session.report().is_none() {
            return Err("run 'validate' before fixing rows".into());
        }
        if self.session.store().get(request.row_index).is_none() {
            return Err(out_of_range(request.row_index, self.session.store().len()));
        }
        edits::check_flagged(&request, &self.session)?;

        self.session
            .apply_correction(&request)
            .map_err(|e| match e {
                EngineError::IndexOutOfRange { index, len } => out_of_range(index, len),
                other => other.to_string(),
            })?;
        Ok(format!("Row {display_row} updated successfully."))
    }

    fn cmd_preview(&self, args: &[String]) -> Result<String, String> {
        let [identity, secret] = args else {
            return Err("usage: preview <id> <secret>".into());
        };
        self.gate
            .open(&Credentials::new(identity.as_str(), secret.as_str()), self.session.store())
            .map_err(|e| e.to_string())
    }

    fn cmd_status(&self) -> String {
        if !self.session.is_loaded() {
            return NO_DATA.to_string();
        }
        let rows = self.session.store().len();
        match self.session.report() {
            None => format!("{rows} rows loaded, not validated."),
            Some(report) => {
                let mut text = format!(
                    "{rows} rows loaded, {} with issues at last validation.",
                    report.ledger.len()
                );
                let stale: Vec<String> =
                    self.session.stale_rows().map(|i| (i + 1).to_string()).collect();
                if !stale.is_empty() {
                    text.push_str(&format!(" Corrected since: rows {}.", stale.join(", ")));
                }
                text
            }
        }
    }
}

/// 1-based message for a 0-based index.
pub fn out_of_range(index: usize, len: usize) -> String {
    format!("row {} does not exist (dataset has {len} rows)", index + 1)
}

/// Split a command line on whitespace. Single or double quotes group words;
/// quotes are removed.
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcheck_access::{DenyAll, StaticAuthenticator};
    use std::fs;
    use tempfile::tempdir;

    fn shell() -> Shell {
        let gate = PreviewGate::new(Box::new(StaticAuthenticator::with_secret("admin", "pw")), 10);
        Shell::new(Session::default(), gate, None)
    }

    fn run(shell: &mut Shell, line: &str) -> String {
        shell.execute(line).0
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("fix 2 sales=5").unwrap(), vec!["fix", "2", "sales=5"]);
        assert_eq!(
            tokenize(r#"fix 1 "email=a b@c.com" note='x y'"#).unwrap(),
            vec!["fix", "1", "email=a b@c.com", "note=x y"]
        );
        assert_eq!(tokenize(r#"fix 1 email="""#).unwrap(), vec!["fix", "1", "email="]);
        assert!(tokenize("load \"oops").is_err());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_commands_before_load() {
        let mut sh = shell();
        assert_eq!(run(&mut sh, "validate"), NO_DATA);
        assert_eq!(run(&mut sh, "errors"), NO_ERRORS);
        assert_eq!(run(&mut sh, "status"), NO_DATA);
        assert_eq!(run(&mut sh, "preview admin pw"), NO_DATA);
        assert!(run(&mut sh, "bogus").contains("unknown command"));
        assert_eq!(sh.execute("quit").1, Flow::Quit);
        assert_eq!(sh.execute("# comment").0, "");
    }

    #[test]
    fn test_review_cycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "sales,email\n100,x@y.com\n-5,bad\n").unwrap();

        let mut sh = shell();
        let loaded = run(&mut sh, &format!("load \"{}\"", path.display()));
        assert!(loaded.starts_with("Loaded 2 rows"));

        assert_eq!(
            run(&mut sh, "validate"),
            "Row 2: Negative sales, Invalid email format"
        );
        assert_eq!(run(&mut sh, "errors"), r#"Row 2: sales="-5", email="bad""#);

        assert!(run(&mut sh, "fix 1 sales=3").contains("not flagged"));
        assert!(run(&mut sh, "fix 9 sales=3").contains("does not exist"));
        assert!(run(&mut sh, "fix 0 sales=3").contains("numbered from 1"));

        assert_eq!(run(&mut sh, "fix 2 sales=5 email=ok@fixed.com"), "Row 2 updated successfully.");
        let errors = run(&mut sh, "errors");
        assert!(errors.contains(r#"sales="-5" (now "5")"#));
        assert!(errors.contains("[corrected]"));
        assert!(run(&mut sh, "status").contains("Corrected since: rows 2."));

        assert_eq!(run(&mut sh, "validate"), "All data passed validation.");
        assert_eq!(run(&mut sh, "errors"), NO_ERRORS);
    }

    #[test]
    fn test_fix_requires_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "sales,email\n-1,a@b.com\n").unwrap();
        let mut sh = shell();
        run(&mut sh, &format!("load {}", path.display()));
        assert!(run(&mut sh, "fix 1 sales=1").contains("run 'validate'"));
    }

    #[test]
    fn test_preview_gate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "sales,email\n1,a@b.com\n").unwrap();
        let mut sh = shell();
        run(&mut sh, &format!("load {}", path.display()));

        assert!(run(&mut sh, "preview admin wrong").contains("Access denied"));
        let out = run(&mut sh, "preview admin pw");
        assert!(out.starts_with("sales\temail\n"));
        assert!(out.ends_with("1\ta@b.com\n"));

        let mut locked = Shell::new(Session::default(), PreviewGate::new(Box::new(DenyAll), 10), None);
        assert!(run(&mut locked, "preview admin 1234").contains("Access denied"));
    }

    #[test]
    fn test_run_loop_stops_at_quit() {
        let mut sh = shell();
        let input = b"help\nquit\nvalidate\n";
        let mut out = Vec::new();
        sh.run(&input[..], &mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Commands:"));
        assert!(!text.contains(NO_DATA));
    }
}
