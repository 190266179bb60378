use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

/// Generate a project README from a short description and preview it as GitHub would.
#[derive(Debug, Parser)]
#[command(name = "readme-studio", version)]
pub struct Cli {
    /// RON config file (defaults to ./readme_studio.ron when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the README generation service
    #[arg(long, global = true, env = "README_STUDIO_GENERATOR_URL")]
    pub generator_url: Option<String>,

    /// Markdown rendering endpoint
    #[arg(long, global = true, env = "README_STUDIO_RENDER_URL")]
    pub render_url: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a README, render it, and optionally export the results
    Generate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Comma-separated feature list
        #[arg(long, default_value = "")]
        features: String,
        /// Comma-separated technology list
        #[arg(long, default_value = "")]
        technologies: String,
        #[arg(long)]
        license: Option<String>,
        /// Write the generated markdown here
        #[arg(long)]
        readme_out: Option<PathBuf>,
        /// Write the rendered preview page here
        #[arg(long)]
        html_out: Option<PathBuf>,
        /// Copy the generated markdown to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Render an existing markdown file
    Render {
        file: PathBuf,
        #[arg(long)]
        html_out: Option<PathBuf>,
    },
    /// Line-oriented editing session
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Command, LogLevel};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_arguments_parse() {
        let cli = Cli::try_parse_from([
            "readme-studio",
            "generate",
            "--name",
            "Tool",
            "--description",
            "Does things",
            "--features",
            "fast, small",
            "--readme-out",
            "out/README.md",
            "--copy",
        ])
        .unwrap();

        assert_eq!(cli.log_level, LogLevel::Info);
        match cli.command {
            Command::Generate {
                name,
                features,
                technologies,
                readme_out,
                html_out,
                copy,
                ..
            } => {
                assert_eq!(name, "Tool");
                assert_eq!(features, "fast, small");
                assert_eq!(technologies, "");
                assert_eq!(readme_out, Some(PathBuf::from("out/README.md")));
                assert_eq!(html_out, None);
                assert!(copy);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn generate_requires_name_and_description() {
        assert!(Cli::try_parse_from(["readme-studio", "generate", "--name", "x"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "readme-studio",
            "render",
            "README.md",
            "--render-url",
            "http://localhost:9999/markdown",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.render_url.as_deref(), Some("http://localhost:9999/markdown"));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert!(matches!(cli.command, Command::Render { .. }));
    }
}
