use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::{BrowseArgs, OutputFormat, ViewMode};
use crate::export::write_export;
use crate::render::{ToggleHints, render};
use crate::session::Session;

const HELP: &str = "\
commands:
  open <path>    load a report (replaces the current one)
  close          discard the current report
  expand <n>     toggle chunk n (1-based)
  details        toggle detail sections in the summary view
  prompt | sql | llm
                 toggle user prompt, SQL facts, LLM summary
  summary | full switch view
  export [dir]   write a timestamped copy
  show           render again
  help           this text
  quit           leave";

#[derive(Debug, Eq, PartialEq)]
enum Step {
    Continue,
    Quit,
}

pub fn run(args: BrowseArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    let mut browser = Browser::new(args.view, args.out_dir);
    if let Some(file) = &args.file {
        browser.open(file, &mut output)?;
    } else {
        writeln!(output, "No report loaded. Type `open <path>` or `help`.")?;
    }
    browser.run_loop(&mut input, &mut output)
}

struct Browser {
    session: Session,
    mode: ViewMode,
    out_dir: PathBuf,
}

impl Browser {
    fn new(mode: ViewMode, out_dir: PathBuf) -> Self {
        Self {
            session: Session::new(),
            mode,
            out_dir,
        }
    }

    fn run_loop<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(output, "> ")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                return Ok(());
            }
            if self.handle_line(line.trim(), output)? == Step::Quit {
                return Ok(());
            }
        }
    }

    fn handle_line<W: Write>(&mut self, line: &str, output: &mut W) -> Result<Step> {
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => return Ok(Step::Continue),
            "quit" | "exit" => return Ok(Step::Quit),
            "help" => writeln!(output, "{HELP}")?,
            "open" if argument.is_empty() => writeln!(output, "usage: open <path>")?,
            "open" => self.open(Path::new(argument), output)?,
            "close" => {
                self.session.close();
                writeln!(output, "Report closed.")?;
            }
            "expand" => match argument.parse::<usize>() {
                Ok(number) if number >= 1 => {
                    self.toggle(output, |session| session.toggle_chunk(number - 1))?
                }
                _ => writeln!(output, "usage: expand <chunk number, starting at 1>")?,
            },
            "details" => self.toggle(output, Session::toggle_details)?,
            "prompt" => self.toggle(output, Session::toggle_prompt)?,
            "sql" => self.toggle(output, Session::toggle_sql_facts)?,
            "llm" => self.toggle(output, Session::toggle_llm_summary)?,
            "summary" => {
                self.mode = ViewMode::Summary;
                self.show(output)?;
            }
            "full" => {
                self.mode = ViewMode::Full;
                self.show(output)?;
            }
            "show" => self.show(output)?,
            "export" => {
                let out_dir = if argument.is_empty() {
                    self.out_dir.clone()
                } else {
                    PathBuf::from(argument)
                };
                self.export(&out_dir, output)?;
            }
            other => writeln!(output, "unknown command `{other}`; type `help`")?,
        }
        Ok(Step::Continue)
    }

    fn open<W: Write>(&mut self, path: &Path, output: &mut W) -> Result<()> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(err) => {
                self.session.fail(format!("failed to read {}: {err}", path.display()));
                return self.show(output);
            }
        };

        let source_name = path.display().to_string();
        if self.session.load_bytes(&raw, &source_name).is_ok() {
            if let Some(loaded) = self.session.loaded() {
                writeln!(
                    output,
                    "Loaded {} ({:.1} KB)",
                    loaded.source_name,
                    loaded.byte_len as f64 / 1024.0
                )?;
            }
        }
        self.show(output)
    }

    fn toggle<W, F>(&mut self, output: &mut W, toggle: F) -> Result<()>
    where
        W: Write,
        F: FnOnce(&mut Session) -> bool,
    {
        if toggle(&mut self.session) {
            self.show(output)
        } else {
            writeln!(output, "No report loaded.")?;
            Ok(())
        }
    }

    fn show<W: Write>(&self, output: &mut W) -> Result<()> {
        match self.session.report() {
            Some(report) => {
                let rendered = render(
                    report,
                    self.session.view(),
                    self.mode,
                    OutputFormat::Text,
                    ToggleHints::BROWSE,
                )?;
                output.write_all(rendered.as_bytes())?;
            }
            None => {
                if let Some(error) = self.session.error() {
                    writeln!(output, "error: {error}")?;
                }
                writeln!(output, "No report loaded.")?;
            }
        }
        Ok(())
    }

    fn export<W: Write>(&self, out_dir: &Path, output: &mut W) -> Result<()> {
        let Some(report) = self.session.report() else {
            writeln!(output, "No report loaded.")?;
            return Ok(());
        };
        match write_export(report, out_dir, Utc::now()) {
            Ok(path) => {
                info!(path = %path.display(), "wrote exported report");
                writeln!(output, "Exported to {}", path.display())?;
            }
            Err(err) => {
                warn!(out_dir = %out_dir.display(), error = %format!("{err:#}"), "export failed");
                writeln!(output, "error: {err:#}")?;
            }
        }
        Ok(())
    }
}
