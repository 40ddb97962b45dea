//! CLI entry point for `mailcard`.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use mailcard::host::eml::EmlHost;
use mailcard::parser::{header, html};
use mailcard::prefill::Prefill;

#[derive(Parser)]
#[command(name = "mailcard", version, about = "Turn an open email into a task-card draft")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the card draft for the first readable message file
    Prefill {
        /// Message files, treated as open message windows in this order
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
        /// Print only the Markdown body instead of the JSON draft
        #[arg(long)]
        body_only: bool,
    },
    /// Convert an HTML file to Markdown-style text ("-" reads stdin)
    Convert {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Answer newline-delimited JSON commands from stdin
    Listen {
        /// Message files, treated as open message windows in this order
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Write the current configuration (defaults if none) to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mailcard::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Prefill { files, body_only } => cmd_prefill(files, body_only, &config).await,
        Commands::Convert { path } => cmd_convert(&path),
        Commands::Listen { files } => cmd_listen(files, &config).await,
        Commands::Init { force } => cmd_init(force, &config),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &mailcard::config::Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_path = mailcard::config::log_file_path(config);
    let file_target = match (log_path.parent(), log_path.file_name()) {
        (Some(dir), Some(name)) if std::fs::create_dir_all(dir).is_ok() => Some((dir, name)),
        _ => None,
    };

    if let Some((log_dir, log_name)) = file_target {
        let file_appender = tracing_appender::rolling::never(log_dir, log_name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Run one prefill request over the given files and print the result.
async fn cmd_prefill(
    files: Vec<PathBuf>,
    body_only: bool,
    config: &mailcard::config::Config,
) -> anyhow::Result<()> {
    let prefill = Prefill::with_config(EmlHost::new(files), config);
    let draft = prefill.current_draft().await;

    if body_only {
        match draft {
            Some(draft) => println!("{}", draft.body),
            None => anyhow::bail!("No readable message among the given files"),
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&draft)?);
    }
    Ok(())
}

/// Print the Markdown rendering of an HTML file.
fn cmd_convert(path: &Path) -> anyhow::Result<()> {
    let raw = if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        std::fs::read(path)?
    };

    println!("{}", html::to_markdown(&header::decode_header_bytes(&raw)));
    Ok(())
}

/// Serve `{"command": ...}` requests from stdin, one JSON response per line.
async fn cmd_listen(files: Vec<PathBuf>, config: &mailcard::config::Config) -> anyhow::Result<()> {
    let prefill = Prefill::with_config(EmlHost::new(files), config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = prefill.handle_json(&line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}

/// Write a config file so the available settings can be edited.
fn cmd_init(force: bool, config: &mailcard::config::Config) -> anyhow::Result<()> {
    let path = mailcard::config::config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    mailcard::config::save_config(config, &path)?;
    println!("{}", path.display());
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailcard", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
