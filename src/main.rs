// Main entry point
use clap::Parser;
use colored::Colorize;
use dolmetscher::application;
use dolmetscher::domain::error::TranslateError;
use dolmetscher::domain::model::AppMode;
use dolmetscher::infrastructure::config::{self, load_config, Config};
use dolmetscher::infrastructure::storage::db;
use dolmetscher::interfaces::cli::Cli;
use dolmetscher::presentation::output::{
    clear_screen, format_header, format_translation, print_with_pager,
};
use dolmetscher::presentation::theme::Theme;
use dolmetscher::state::AppState;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{IsTerminal, Read, Write};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup graceful shutdown handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            eprintln!("\nInterrupted, shutting down...");
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let mut config = load_config()?;
    apply_overrides(&mut config, &cli);

    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.edit_config {
        if let Some(config_path) = config::get_config_path() {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            tokio::task::spawn_blocking(move || {
                std::process::Command::new(editor).arg(&config_path).status()
            })
            .await??;
        } else {
            eprintln!("{}", "Config file not found".red());
        }
        return Ok(());
    }

    // Cache database (in memory when caching is off)
    let db_conn = if config.cache {
        let db_path = config::get_database_path();
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        db::init_database(&db_path).await?
    } else {
        db::init_memory_database().await?
    };

    let theme_name = cli.theme.clone().unwrap_or_else(|| config.theme.clone());
    let theme = Theme::from_name(&theme_name);
    let state = AppState::new(db_conn, config)?;

    if cli.status {
        print_status(&state).await?;
        return Ok(());
    }
    if cli.clear_cache {
        let removed = db::clear_cache(&state.db).await?;
        state.cache.clear();
        println!("Removed {} cached translations", removed);
        return Ok(());
    }

    let outcome = tokio::select! {
        result = run(&state, &cli, &theme) => result,
        _ = shutdown_rx => {
            eprintln!("Translation interrupted");
            return Ok(());
        }
    };

    if let Err(e) = outcome {
        match e.downcast_ref::<TranslateError>() {
            Some(err) => eprintln!("{}", (theme.error)(&err.user_message())),
            None => eprintln!("{}", (theme.error)(&e.to_string())),
        }
        std::process::exit(1);
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.gemini.model = model.clone();
    }
    if let Some(debounce) = cli.debounce {
        config.debounce_ms = debounce;
    }
    if cli.nocache {
        config.cache = false;
    }
}

async fn run(state: &AppState, cli: &Cli, theme: &Theme) -> anyhow::Result<()> {
    if cli.live {
        let reader = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        if std::io::stdin().is_terminal() {
            eprintln!(
                "{}",
                (theme.hint)("Type German text. :clear, :copy, :log, :quit")
            );
        }
        application::live::run_live(state, reader, &mut stdout, theme).await?;
        return Ok(());
    }

    if let Some(path) = &cli.file {
        return run_document(state, cli, theme, path).await;
    }

    run_text(state, cli, theme).await
}

async fn run_text(state: &AppState, cli: &Cli, theme: &Theme) -> anyhow::Result<()> {
    let text = if cli.text.is_empty() {
        read_stdin()?
    } else {
        cli.text.join(" ")
    };
    if text.trim().is_empty() {
        eprintln!("{}", "Please provide text to translate".red());
        std::process::exit(1);
    }

    let (clear, enable_emoji) = {
        let config = state.config.read().await;
        (config.clear_screen, config.enable_emoji)
    };

    if cli.json {
        let translation =
            application::translate::translate_text(state, &text, cli.nocache, None).await?;
        println!("{}", serde_json::to_string_pretty(&translation)?);
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    if clear {
        clear_screen(&mut stdout);
    }
    print!(
        "{}",
        format_header(
            theme,
            AppMode::Text,
            state.translator.model(),
            None,
            None,
            enable_emoji
        )
    );
    let mut relay = |chunk: &str| {
        print!("{}", (theme.body)(chunk));
        std::io::stdout().flush().ok();
    };
    application::translate::translate_text(state, &text, cli.nocache, Some(&mut relay)).await?;
    println!();
    Ok(())
}

async fn run_document(
    state: &AppState,
    cli: &Cli,
    theme: &Theme,
    path: &std::path::Path,
) -> anyhow::Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Processing {}...", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = application::document::translate_document(state, path, cli.nocache).await;
    spinner.finish_and_clear();
    let (doc, translation) = result?;

    if let Some(output) = &cli.output {
        application::document::save_translation(output, &translation.output).await?;
        println!("Saved translation to {}", output.display());
        return Ok(());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let config = state.config.read().await;
    let output = format_translation(
        &translation,
        theme,
        doc.file_name.as_deref(),
        config.enable_emoji,
    );
    if config.clear_screen {
        clear_screen(&mut std::io::stdout());
    }
    if config.paging && std::io::stdout().is_terminal() {
        print_with_pager(&output, &config.pager_command)?;
    } else {
        print!("{}", output);
    }
    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut text = String::new();
    stdin.read_to_string(&mut text)?;
    Ok(text)
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn print_status(state: &AppState) -> anyhow::Result<()> {
    println!("{}", "dolmetscher Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = state.config.read().await;

    if config.cache {
        let count = db::count_entries(&state.db).await?;
        println!(
            "Cache: {} ({} translations)",
            config::get_database_path().display(),
            count
        );
    } else {
        println!("Cache: disabled");
    }
    println!("Memory Cache: {} entries", state.cache.len());

    println!(
        "Config: {}",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );
    println!("Model: {}", config.gemini.model);
    println!("Debounce: {} ms", config.debounce_ms);

    if config.gemini.resolve_api_key().is_some() {
        println!("Gemini API: Configured");
    } else {
        println!("Gemini API: {}", "Not configured".yellow());
    }

    Ok(())
}
