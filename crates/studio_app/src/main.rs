mod cli;
mod config;
mod console;
mod effects;
mod session;

use std::fs;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use studio_core::{DocumentKind, Msg, PipelineStatus};
use studio_engine::EngineHandle;
use studio_logging::{studio_error, studio_info};

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::console::{print_notices, run_console};
use crate::effects::EffectRunner;
use crate::session::Session;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.generator_url, cli.render_url);
    studio_logging::initialize(config.log_destination, cli.log_level.into());
    studio_info!(
        "readme-studio {} generator={} renderer={}",
        env!("CARGO_PKG_VERSION"),
        config.generator_url,
        config.render_url
    );

    let engine = EngineHandle::new(&config.engine_config())
        .context("failed to start the request engine")?;
    let mut session = Session::new(EffectRunner::new(engine));

    match cli.command {
        Command::Generate {
            name,
            description,
            features,
            technologies,
            license,
            readme_out,
            html_out,
            copy,
        } => {
            session.dispatch(Msg::NameChanged(name));
            session.dispatch(Msg::DescriptionChanged(description));
            session.dispatch(Msg::FeaturesChanged(features));
            session.dispatch(Msg::TechnologiesChanged(technologies));
            if let Some(license) = license {
                session.dispatch(Msg::LicenseChanged(license));
            }
            run_generate(&mut session, readme_out, html_out, copy)
        }
        Command::Render { file, html_out } => run_render(&mut session, file, html_out),
        Command::Interactive => {
            run_console(&mut session, BufReader::new(io::stdin()), io::stdout())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_generate(
    session: &mut Session,
    readme_out: Option<PathBuf>,
    html_out: Option<PathBuf>,
    copy: bool,
) -> Result<ExitCode> {
    session.dispatch(Msg::Submitted);
    session.settle();
    print_notices(session.take_notices(), &mut io::stderr())?;

    if session.state().status() == PipelineStatus::GenerationFailed {
        studio_error!("generation failed; nothing to export");
        return Ok(ExitCode::FAILURE);
    }
    println!("{}", session.state().raw_text());

    if let Some(path) = readme_out {
        session.dispatch(Msg::SaveRequested {
            kind: DocumentKind::Markdown,
            path,
        });
    }
    if let Some(path) = html_out {
        session.dispatch(Msg::SaveRequested {
            kind: DocumentKind::Html,
            path,
        });
    }
    if copy {
        session.dispatch(Msg::CopyRequested);
    }
    session.settle();
    print_notices(session.take_notices(), &mut io::stderr())?;
    Ok(ExitCode::SUCCESS)
}

fn run_render(session: &mut Session, file: PathBuf, html_out: Option<PathBuf>) -> Result<ExitCode> {
    let text = fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    session.dispatch(Msg::TextEdited(text));
    session.dispatch(Msg::RenderRequested);
    session.settle();
    print_notices(session.take_notices(), &mut io::stderr())?;

    if session.state().status() != PipelineStatus::Ready {
        return Ok(ExitCode::FAILURE);
    }
    match html_out {
        Some(path) => {
            session.dispatch(Msg::SaveRequested {
                kind: DocumentKind::Html,
                path,
            });
            session.settle();
            print_notices(session.take_notices(), &mut io::stderr())?;
        }
        None => println!("{}", session.state().rendered_html().unwrap_or_default()),
    }
    Ok(ExitCode::SUCCESS)
}
