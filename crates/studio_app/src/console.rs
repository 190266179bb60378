use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use studio_core::{DocumentKind, Msg, Notice, NoticeLevel};
use thiserror::Error;

use crate::session::Session;

/// How often the console looks for engine results while no input arrives.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub const DEFAULT_WAIT: Duration = Duration::from_secs(10);

pub const HELP: &str = "\
Form:
  name <text>            project name
  description <text>     project description
  features <a, b, ...>   comma-separated features
  technologies <a, ...>  comma-separated technologies
  license [text]         license (empty clears it)
Pipeline:
  generate               generate a README and render it
  edit <file>            replace the README text with a file's contents
  text <markdown>        replace the README text (\\n for newlines)
  render                 re-render the current text
  wait [seconds]         wait for requests in flight (default 10)
Export:
  copy                   copy the README text to the clipboard
  save <file>            save the README text
  html <file>            save the rendered preview as a page
Other:
  show                   print the README text and preview
  status                 print the pipeline status
  help                   this text
  quit                   leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Name(String),
    Description(String),
    Features(String),
    Technologies(String),
    License(String),
    Generate,
    Edit(PathBuf),
    Text(String),
    Render,
    Wait(Duration),
    Copy,
    Save(PathBuf),
    Html(PathBuf),
    Show,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` takes no argument")]
    UnexpectedArgument(&'static str),
    #[error("`{0}` expects a number of seconds")]
    NotSeconds(&'static str),
}

/// Parse one console line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "name" => ConsoleCommand::Name(required("name", rest)?),
        "description" | "desc" => ConsoleCommand::Description(required("description", rest)?),
        "features" => ConsoleCommand::Features(rest.to_string()),
        "technologies" | "tech" => ConsoleCommand::Technologies(rest.to_string()),
        "license" => ConsoleCommand::License(rest.to_string()),
        "generate" | "gen" => bare("generate", rest, ConsoleCommand::Generate)?,
        "edit" => ConsoleCommand::Edit(PathBuf::from(required("edit", rest)?)),
        "text" => ConsoleCommand::Text(rest.replace("\\n", "\n")),
        "render" => bare("render", rest, ConsoleCommand::Render)?,
        "wait" => ConsoleCommand::Wait(seconds("wait", rest)?),
        "copy" => bare("copy", rest, ConsoleCommand::Copy)?,
        "save" => ConsoleCommand::Save(PathBuf::from(required("save", rest)?)),
        "html" => ConsoleCommand::Html(PathBuf::from(required("html", rest)?)),
        "show" => bare("show", rest, ConsoleCommand::Show)?,
        "status" => bare("status", rest, ConsoleCommand::Status)?,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn required(command: &'static str, rest: &str) -> Result<String, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(command))
    } else {
        Ok(rest.to_string())
    }
}

fn seconds(command: &'static str, rest: &str) -> Result<Duration, ParseError> {
    if rest.is_empty() {
        return Ok(DEFAULT_WAIT);
    }
    rest.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ParseError::NotSeconds(command))
}

fn bare(
    command: &'static str,
    rest: &str,
    parsed: ConsoleCommand,
) -> Result<ConsoleCommand, ParseError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(ParseError::UnexpectedArgument(command))
    }
}

/// Read commands until `quit` or end of input.
///
/// Input is read on its own thread. Engine results are applied between lines,
/// so a slow or hung request never holds up editing.
pub fn run_console<R>(session: &mut Session, input: R, mut out: impl Write) -> Result<()>
where
    R: BufRead + Send + 'static,
{
    let lines = spawn_line_reader(input)?;
    writeln!(out, "readme-studio interactive mode; type `help` for commands.")?;
    prompt(&mut out)?;
    loop {
        if session.pump() > 0 && report(session, &mut out)? {
            prompt(&mut out)?;
        }
        let line = match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => line?,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => execute(session, command, &mut out)?,
            Err(err) => writeln!(out, "{err}")?,
        }
        prompt(&mut out)?;
    }
    Ok(())
}

fn spawn_line_reader<R>(input: R) -> io::Result<mpsc::Receiver<io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("studio-console-input".to_string())
        .spawn(move || {
            for line in input.lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

fn prompt(out: &mut impl Write) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn execute(session: &mut Session, command: ConsoleCommand, out: &mut impl Write) -> Result<()> {
    match command {
        ConsoleCommand::Name(value) => session.dispatch(Msg::NameChanged(value)),
        ConsoleCommand::Description(value) => session.dispatch(Msg::DescriptionChanged(value)),
        ConsoleCommand::Features(value) => session.dispatch(Msg::FeaturesChanged(value)),
        ConsoleCommand::Technologies(value) => session.dispatch(Msg::TechnologiesChanged(value)),
        ConsoleCommand::License(value) => session.dispatch(Msg::LicenseChanged(value)),
        ConsoleCommand::Generate => {
            if !session.view().submit_enabled() {
                writeln!(out, "Name and description are required.")?;
                return Ok(());
            }
            writeln!(out, "Generating...")?;
            session.dispatch(Msg::Submitted);
        }
        ConsoleCommand::Edit(path) => match fs::read_to_string(&path) {
            Ok(text) => session.dispatch(Msg::TextEdited(text)),
            Err(err) => writeln!(out, "Cannot read {}: {err}", path.display())?,
        },
        ConsoleCommand::Text(text) => session.dispatch(Msg::TextEdited(text)),
        ConsoleCommand::Render => session.dispatch(Msg::RenderRequested),
        ConsoleCommand::Wait(timeout) => {
            if !session.settle_for(timeout) {
                writeln!(
                    out,
                    "Still waiting on {} request(s).",
                    session.outstanding()
                )?;
            }
        }
        ConsoleCommand::Copy => session.dispatch(Msg::CopyRequested),
        ConsoleCommand::Save(path) => session.dispatch(Msg::SaveRequested {
            kind: DocumentKind::Markdown,
            path,
        }),
        ConsoleCommand::Html(path) => session.dispatch(Msg::SaveRequested {
            kind: DocumentKind::Html,
            path,
        }),
        ConsoleCommand::Show => print_documents(session, out)?,
        ConsoleCommand::Status => print_status(session, out)?,
        ConsoleCommand::Help => writeln!(out, "{HELP}")?,
        ConsoleCommand::Quit => {}
    }

    session.pump();
    report(session, out)?;
    Ok(())
}

/// Print pending notices and, if it changed, the status line.
fn report(session: &mut Session, out: &mut impl Write) -> Result<bool> {
    let notices = session.take_notices();
    let printed_notices = !notices.is_empty();
    print_notices(notices, out)?;
    if session.consume_dirty() {
        writeln!(out, "[{}]", session.view().status_line())?;
        return Ok(true);
    }
    Ok(printed_notices)
}

pub fn print_notices(notices: Vec<Notice>, out: &mut impl Write) -> Result<()> {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        writeln!(out, "{tag}: {}", notice.message)?;
    }
    Ok(())
}

fn print_documents(session: &Session, out: &mut impl Write) -> Result<()> {
    let view = session.view();
    if view.raw_text.is_empty() {
        writeln!(out, "(no README text yet)")?;
    } else {
        writeln!(out, "{}", view.raw_text)?;
    }
    if let Some(html) = &view.rendered_html {
        writeln!(out, "----- preview -----")?;
        writeln!(out, "{html}")?;
    }
    Ok(())
}

fn print_status(session: &Session, out: &mut impl Write) -> Result<()> {
    let view = session.view();
    let descriptor = &view.descriptor;
    writeln!(out, "status:       {}", view.status_line())?;
    writeln!(out, "name:         {}", descriptor.name)?;
    writeln!(out, "description:  {}", descriptor.description)?;
    writeln!(out, "features:     {}", descriptor.features.join(", "))?;
    writeln!(out, "technologies: {}", descriptor.technologies.join(", "))?;
    writeln!(
        out,
        "license:      {}",
        descriptor.license.as_deref().unwrap_or("-")
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{mpsc, Arc};
    use std::thread;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use studio_core::PipelineStatus;

    use super::{parse_command, run_console, ConsoleCommand, ParseError, DEFAULT_WAIT};
    use crate::session::tests::{fake_session, session_with_renderer, HangingRenderer};

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn field_commands_keep_their_whole_argument() {
        assert_eq!(
            parse_command("description  A small tool, for testing  "),
            Ok(Some(ConsoleCommand::Description(
                "A small tool, for testing".to_string()
            )))
        );
        assert_eq!(
            parse_command("features fast, small"),
            Ok(Some(ConsoleCommand::Features("fast, small".to_string())))
        );
        assert_eq!(
            parse_command("license"),
            Ok(Some(ConsoleCommand::License(String::new())))
        );
    }

    #[test]
    fn text_expands_newline_escapes() {
        assert_eq!(
            parse_command(r"text # x\n\nbody"),
            Ok(Some(ConsoleCommand::Text("# x\n\nbody".to_string())))
        );
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_command("GENERATE"), Ok(Some(ConsoleCommand::Generate)));
        assert_eq!(
            parse_command("Save out/README.md"),
            Ok(Some(ConsoleCommand::Save(PathBuf::from("out/README.md"))))
        );
    }

    #[test]
    fn wait_takes_optional_seconds() {
        assert_eq!(parse_command("wait"), Ok(Some(ConsoleCommand::Wait(DEFAULT_WAIT))));
        assert_eq!(
            parse_command("wait 3"),
            Ok(Some(ConsoleCommand::Wait(Duration::from_secs(3))))
        );
        assert_eq!(parse_command("wait soon"), Err(ParseError::NotSeconds("wait")));
    }

    #[test]
    fn argument_errors_are_reported() {
        assert_eq!(parse_command("name"), Err(ParseError::MissingArgument("name")));
        assert_eq!(parse_command("html"), Err(ParseError::MissingArgument("html")));
        assert_eq!(
            parse_command("render now"),
            Err(ParseError::UnexpectedArgument("render"))
        );
        assert_eq!(
            parse_command("publish"),
            Err(ParseError::Unknown("publish".to_string()))
        );
    }

    #[test]
    fn console_session_generates_and_reports() {
        let mut session = fake_session(Arc::default());
        let input =
            "name Tool\ngenerate\ndescription A tool\ngenerate\nwait\ncopy\nwait\nbogus\nquit\nstatus\n";
        let mut out = Vec::new();

        run_console(&mut session, input.as_bytes(), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Name and description are required."));
        assert!(out.contains("[Ready]"));
        assert!(out.contains("ok: Copied to clipboard!"));
        assert!(out.contains("unknown command `bogus`"));
        // Nothing after quit is executed.
        assert!(!out.contains("status:"));
        assert_eq!(session.state().raw_text(), "# Tool\n\nA tool");
    }

    #[test]
    fn text_edits_apply_while_render_never_answers() {
        let mut session = session_with_renderer(Arc::new(HangingRenderer), Arc::default());
        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || {
            let input = "name x\ndescription y\ngenerate\nwait 1\ntext # edited\nquit\n";
            let mut out = Vec::new();
            let result = run_console(&mut session, input.as_bytes(), &mut out);
            let _ = done_tx.send((result.is_ok(), session, out));
        });

        let (finished_ok, session, out) = done_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("console must not block on a hung render");
        assert!(finished_ok);
        assert_eq!(session.state().status(), PipelineStatus::Rendering);
        assert_eq!(session.state().raw_text(), "# edited");
        assert_eq!(session.outstanding(), 1);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Still waiting on 1 request(s)."));
    }
}
