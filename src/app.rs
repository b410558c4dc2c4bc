use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, TimeZone, Utc};
use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::export::{self, ExportFormat};
use crate::fetch::{self, FileSource, HttpSource, RecordStore};
use crate::model::DateStyle;
use crate::table::{PageSize, ViewState};
use crate::view::{self, interactive};

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[derive(Clone, Debug, PartialEq)]
enum SourceConfig {
    Http { url: String, timeout: u64 },
    File { path: String },
}

impl SourceConfig {
    fn label(&self) -> String {
        match self {
            SourceConfig::Http { url, .. } => url.clone(),
            SourceConfig::File { path } => format!("file {path}"),
        }
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    source: SourceConfig,
    page_size: PageSize,
    page: usize,
    search: String,
    reset_page_on_search: bool,
    output_dir: PathBuf,
    formats: Vec<ExportFormat>,
    date_style: DateStyle,
    utc: bool,
    no_color: bool,
    interactive: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(fetch::DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid timeout, expected positive number of seconds".to_string());
    }

    let source = if let Some(url) = args.url {
        SourceConfig::Http {
            url: url.trim().to_string(),
            timeout,
        }
    } else if let Some(path) = args.input.or(cfg.input_file) {
        SourceConfig::File {
            path: config::expand_tilde_string(path.trim()),
        }
    } else {
        SourceConfig::Http {
            url: cfg
                .endpoint
                .map(|u| u.trim().to_string())
                .unwrap_or_else(|| fetch::DEFAULT_ENDPOINT.to_string()),
            timeout,
        }
    };
    if let SourceConfig::Http { url, .. } = &source {
        reqwest::Url::parse(url).map_err(|e| format!("invalid endpoint '{url}': {e}"))?;
    }

    let page_size = match args.per_page.or(cfg.items_per_page) {
        Some(count) => PageSize::from_count(count).ok_or_else(|| {
            format!("invalid items per page {count}, expected 5, 10, 15 or 20")
        })?,
        None => PageSize::default(),
    };

    let page = args.page.or(cfg.page).unwrap_or(1);
    if page == 0 {
        return Err("invalid page, pages start at 1".to_string());
    }

    let search = args.search.or(cfg.search).unwrap_or_default();
    let reset_page_on_search =
        args.reset_page_on_search || cfg.reset_page_on_search.unwrap_or(false);

    let output_dir = config::expand_tilde(
        args.output_dir
            .or(cfg.output_dir)
            .unwrap_or_else(|| ".".to_string())
            .as_str(),
    );

    let format_specs = if args.export.is_empty() {
        cfg.formats.unwrap_or_default()
    } else {
        args.export
    };
    let mut formats: Vec<ExportFormat> = Vec::new();
    for raw in format_specs.iter() {
        for format in export::parse_format_list(raw)? {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
    }

    let date_style = match args.date_format.or(cfg.date_format) {
        Some(pattern) => DateStyle::new(&pattern)?,
        None => DateStyle::default(),
    };

    Ok(RunConfig {
        source,
        page_size,
        page,
        search,
        reset_page_on_search,
        output_dir,
        formats,
        date_style,
        utc: args.utc || cfg.utc.unwrap_or(false),
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
        interactive: args.interactive,
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,reqwest=warn")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

async fn load_records(source: &SourceConfig) -> Result<RecordStore, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg}")
            .map_err(|e| format!("failed to build spinner style: {e}"))?,
    );
    pb.set_message(view::LOADING);
    pb.enable_steady_tick(Duration::from_millis(100));

    let store = match source {
        SourceConfig::Http { url, timeout } => {
            let http = HttpSource::new(url, *timeout).map_err(|e| e.to_string())?;
            RecordStore::new().load(&http).await
        }
        SourceConfig::File { path } => RecordStore::new().load(&FileSource::new(path)).await,
    };

    pb.finish_and_clear();
    Ok(store)
}

async fn run_view<Tz: TimeZone>(run: RunConfig, tz: Tz) -> Result<(), String> {
    format_kv_line("Source", &run.source.label());
    format_kv_line("Per page", &run.page_size.to_string());
    format_kv_line("Dates", run.date_style.pattern());
    if !run.formats.is_empty() {
        let names: Vec<&str> = run.formats.iter().map(|f| f.file_name()).collect();
        format_kv_line("Export", &names.join(","));
        format_kv_line("Output", &run.output_dir.display().to_string());
    }
    format_kv_line("Interactive", format_bool(run.interactive));
    println!();

    let store = load_records(&run.source).await?;

    let state = ViewState::new()
        .loaded(store.into_records())
        .with_page_size(run.page_size)
        .with_search(run.search.clone())
        .with_page(run.page);

    print!("{}", view::render_table(&state, &run.date_style, &tz));

    let options = interactive::SessionOptions {
        date_style: run.date_style.clone(),
        tz,
        output_dir: run.output_dir.clone(),
        reset_page_on_search: run.reset_page_on_search,
    };

    if !run.formats.is_empty() {
        println!();
        let paths = interactive::export_visible(&state, &run.formats, &options)
            .map_err(|e| e.to_string())?;
        for path in paths {
            format_kv_line("Saved", &path.display().to_string());
        }
    }

    if run.interactive {
        println!();
        let reader = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        interactive::run_session(reader, &mut stdout, state, &options).await?;
    }

    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    if run.utc {
        run_view(run, Utc).await
    } else {
        run_view(run, Local).await
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine a config path".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!(":: {:<10}: {}", "Wrote", path.display().to_string().green());
        } else {
            println!(":: {:<10}: {} (already exists)", "Config", path.display());
        }
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };
    tracing::debug!(?cfg, "configuration loaded");

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
