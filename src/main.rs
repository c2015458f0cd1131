use clap::{crate_version, App, Arg, ArgMatches};
use postindex::build::run;
use postindex::config::{self, Config};
use postindex::language::Language;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = App::new("postindex")
        .version(crate_version!())
        .about("Writes year/month and per-tag index pages for a Markdown content tree")
        .arg(
            Arg::with_name("content")
                .value_name("CONTENT_DIR")
                .help("The content directory (defaults to the project file's `content_directory`, or `content`)")
                .index(1),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("The project file (defaults to the nearest `postindex.yaml`)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("title")
                .short("t")
                .long("title")
                .value_name("TITLE")
                .help("The title written into every index page")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("language")
                .short("l")
                .long("language")
                .value_name("LANG")
                .help("The language for month names and labels")
                .possible_values(&["pt", "en"])
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increases log verbosity (-v, -vv)"),
        )
        .arg(
            Arg::with_name("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .possible_values(&["text", "json"])
                .default_value("text")
                .help("The log output format"),
        )
        .get_matches();

    init_tracing(
        matches.occurrences_of("verbose"),
        matches.value_of("log-format") == Some("json"),
    );

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "loading configuration");
            std::process::exit(1);
        }
    };

    info!(content = %config.content_directory.display(), "building indexes");
    let summary = run(&config);
    info!(
        entries = summary.entries,
        skipped = summary.skipped,
        failed = summary.failed,
        tags = summary.tags,
        written = summary.written,
        write_failures = summary.write_failures,
        "done"
    );
}

/// Loads the project file named by `--config`, or the nearest one above the
/// working directory, then applies the command-line overrides.
fn load_config(matches: &ArgMatches) -> config::Result<Config> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_project_file(Path::new(path))?,
        None => {
            let cwd = std::env::current_dir().map_err(|err| config::Error::Io {
                path: PathBuf::from("."),
                err,
            })?;
            Config::from_directory(&cwd)?
        }
    };

    if let Some(dir) = matches.value_of("content") {
        config.content_directory = PathBuf::from(dir);
    }
    if let Some(title) = matches.value_of("title") {
        config.title = title.to_owned();
    }
    if let Some(language) = matches.value_of("language") {
        config.language = language.parse::<Language>()?;
    }
    Ok(config)
}

/// Installs the global `tracing` subscriber. `RUST_LOG` takes precedence over
/// the `-v` count. Logs go to stderr.
fn init_tracing(verbosity: u64, json: bool) {
    let filter = match verbosity {
        0 => "postindex=info",
        1 => "postindex=debug",
        _ => "postindex=trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}
