// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;

use anyhow::{Context, Result, bail};
use config::Config;
use shiksha_api::{Client, DataStore, RetryPolicy};
use shiksha_chat::{ChatSession, mode_label};
use shiksha_model::{DashboardSnapshot, Language, NavigationState, PrefUpdate, months_to_csv};
use shiksha_prefs::PreferenceStore;
use shiksha_views::{QueryOutcome, RenderCoordinator, SearchIndex, ViewRegistry};
use std::env;
use std::path::PathBuf;

fn main() {
    init_tracing();
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `shiksha --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let prefs_path = PreferenceStore::default_path()?;
    let prefs_existed = prefs_path.exists();
    let mut prefs = PreferenceStore::open(&prefs_path);
    if !prefs_existed {
        // First run: the config's [ui] section seeds the preferences.
        prefs.set(&PrefUpdate {
            theme: Some(config.ui_theme()),
            ui_language: Some(config.ui_language()),
            ..PrefUpdate::default()
        });
    }

    // Language precedence: CLI flag, then saved preference, then config.
    let mut language = config.ui_language();
    if prefs_existed {
        language = prefs.get().ui_language;
    }
    if let Some(flag_language) = options.language {
        language = flag_language;
        prefs.set(&PrefUpdate {
            ui_language: Some(flag_language),
            ..PrefUpdate::default()
        });
    }

    if options.check_only {
        let client = Client::new(config.api_base_url(), config.api_timeout()?)?;
        let overview = client.overview().with_context(|| {
            format!("backend check failed for {}", config.api_base_url())
        })?;
        println!(
            "backend reachable at {} ({} months, {} states)",
            config.api_base_url(),
            overview.attendance_trend.len(),
            overview.states.len(),
        );
        return Ok(());
    }

    let snapshot = load_snapshot(&options, &config)?;
    let mut nav = NavigationState::new(snapshot.months.len(), language);
    if let Some(index) = options.month {
        nav.select_month(index);
    }

    if let Some(query) = &options.search {
        run_search(&snapshot, query);
        return Ok(());
    }

    if let Some(question) = &options.ask {
        return run_ask(&config, &prefs, language, question);
    }

    if options.export_csv {
        print!("{}", months_to_csv(&snapshot.months));
        return Ok(());
    }

    let coordinator = RenderCoordinator::new(ViewRegistry::standard());
    let report = coordinator.render_all(&snapshot, &nav);
    for output in &report.outputs {
        println!("{}", output.body);
    }
    for failure in &report.failures {
        eprintln!("warning: {failure}");
    }
    Ok(())
}

fn load_snapshot(options: &CliOptions, config: &Config) -> Result<DashboardSnapshot> {
    if options.demo {
        return Ok(shiksha_testkit::sample_snapshot());
    }

    let client = Client::new(config.api_base_url(), config.api_timeout()?)?;
    let policy = RetryPolicy::new(config.api_attempts(), config.api_backoff()?);
    let mut store = DataStore::new(client, policy);
    match store.load() {
        Ok(snapshot) => Ok(snapshot.clone()),
        Err(error) => bail!(
            "{error}; check api.base_url ({}) or run with --demo",
            config.api_base_url()
        ),
    }
}

fn run_search(snapshot: &DashboardSnapshot, query: &str) {
    let index = SearchIndex::build(snapshot);
    match index.query(query) {
        QueryOutcome::TooShort => {
            println!("Please enter at least 2 characters");
        }
        QueryOutcome::Matches(found) if found.is_empty() => {
            println!("No results found for {query:?}");
        }
        QueryOutcome::Matches(found) => {
            println!("{} result(s) for {query:?}", found.len());
            for result in &found {
                println!(
                    "  {}: {} [{}]",
                    result.entry.title, result.entry.description, result.entry.target,
                );
            }
        }
    }
}

fn run_ask(
    config: &Config,
    prefs: &PreferenceStore,
    ui_language: Language,
    question: &str,
) -> Result<()> {
    let chat_language = prefs.get().chat_language.unwrap_or(ui_language);
    let mut transport = Client::new(config.api_base_url(), config.api_timeout()?)?;
    let mut session = ChatSession::new(chat_language);

    let exchange = match session.ask(&mut transport, question) {
        Ok(exchange) => exchange,
        Err(error) => bail!("cannot send question: {error}"),
    };

    println!("[{}] {}", mode_label(&exchange.mode), exchange.answer);
    if !exchange.sources.is_empty() {
        println!("sources: {}", exchange.sources.join(", "));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    demo: bool,
    check_only: bool,
    month: Option<usize>,
    language: Option<Language>,
    ask: Option<String>,
    search: Option<String>,
    export_csv: bool,
    print_config_path: bool,
    print_example: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        demo: false,
        check_only: false,
        month: None,
        language: None,
        ask: None,
        search: None,
        export_csv: false,
        print_config_path: false,
        print_example: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--month" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--month requires an index (0 is the oldest month)"))?;
                let index: usize = value.as_ref().parse().map_err(|_| {
                    anyhow::anyhow!("--month expects a number, got {:?}", value.as_ref())
                })?;
                options.month = Some(index);
            }
            "--lang" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--lang requires \"en\" or \"hi\""))?;
                let language = Language::parse(value.as_ref()).ok_or_else(|| {
                    anyhow::anyhow!("--lang must be \"en\" or \"hi\", got {:?}", value.as_ref())
                })?;
                options.language = Some(language);
            }
            "--ask" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--ask requires a question"))?;
                options.ask = Some(value.as_ref().to_owned());
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--search requires a query"))?;
                options.search = Some(value.as_ref().to_owned());
            }
            "--export-csv" => {
                options.export_csv = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("shiksha (VSK dashboard CLI)");
    println!("  --config <path>          Use a specific config path");
    println!("  --demo                   Render the bundled sample dataset, no backend needed");
    println!("  --check                  Verify the analytics backend is reachable");
    println!("  --month <index>          Select a month (0 is the oldest)");
    println!("  --lang <en|hi>           Set the interface language (persisted)");
    println!("  --ask <question>         Ask the assistant a question");
    println!("  --search <query>         Search the dashboard index");
    println!("  --export-csv             Print monthly figures as CSV");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --help                   Show this help");
}
