//! logscope - Time-windowed keyword and spatial-radius search over event logs.
//!
//! Answers chat-style search commands either once (trailing arguments) or line-by-line
//! from stdin.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use logscope::search::engine::candidate_files;
use logscope::{Application, SearchConfig};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging, controlled by RUST_LOG
    env_logger::init();

    let matches = Command::new("logscope")
        .version(logscope::VERSION)
        .about("Time-windowed keyword and spatial-radius search over event logs")
        .long_about(
            "logscope scans a directory of timestamped log files and answers search \
             commands such as:\n\n  \
             /search-keyword <date> <time start> <time end> <keyword>\n  \
             /search-radius <date> <time start> <time end> <x> <y> <radius>\n  \
             /search-dismantle <date> <time start> <time end> <x> <y> <radius>\n\n\
             Without a command, commands are read one per line from stdin.",
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (TOML)"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .short('r')
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Directory scanned recursively for log files"),
        )
        .arg(
            Arg::new("ext")
                .long("ext")
                .short('e')
                .value_name("EXT")
                .help("Filename suffix of log files (default: .log)"),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .short('j')
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Number of files scanned concurrently"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .value_parser(value_parser!(u64))
                .help("Abort a search that runs longer than this"),
        )
        .arg(
            Arg::new("list-files")
                .long("list-files")
                .action(ArgAction::SetTrue)
                .help("Print the log files that would be searched and exit"),
        )
        .arg(
            Arg::new("command")
                .help("Search command to run once, e.g. /search-keyword 01.03.2024 09:00 11:00 Fence")
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .index(1),
        )
        .get_matches();

    let config = resolve_config(&matches)?;

    if matches.get_flag("list-files") {
        for path in candidate_files(&config)? {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let app = Application::new(config).context("Invalid configuration")?;

    if let Some(words) = matches.get_many::<String>("command") {
        let text = words.map(String::as_str).collect::<Vec<_>>().join(" ");
        let Some(messages) = app.handle_message(&text).await else {
            anyhow::bail!("Not a search command: {text}");
        };
        for message in messages {
            println!("{message}\n");
        }
        return Ok(());
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    app.run(stdin, tokio::io::stdout()).await?;

    Ok(())
}

/// Config file (explicit, else the per-user default if present), then CLI overrides
fn resolve_config(matches: &ArgMatches) -> Result<SearchConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match SearchConfig::default_path().filter(|path| path.is_file()) {
            Some(path) => SearchConfig::load(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SearchConfig::default(),
        },
    };

    if let Some(root) = matches.get_one::<PathBuf>("root") {
        config.root = root.clone();
    }
    if let Some(ext) = matches.get_one::<String>("ext") {
        config = config.with_extension(ext.clone());
    }
    if let Some(workers) = matches.get_one::<usize>("workers") {
        config = config.with_scan_concurrency(*workers);
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.scan_timeout_secs = Some(*timeout);
    }

    config.validate()?;
    Ok(config)
}
