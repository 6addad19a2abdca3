use std::io::Write;

use clap::{error::ErrorKind, CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::client::{self, ClientOptions};
use crate::config::{self, ConfigFile};
use crate::console;
use crate::dex::{self, Dex, DexError, Options};
use crate::output::{self, OutputFormat};
use crate::search;
use crate::view::{self, Locale};

const INTERACTIVE_HELP: &str = "\
  <text>        search the loaded list by name, or look up an ID
  <empty line>  reload the initial list
  :open N       open the N-th card
  :back         back to the list
  :next, :prev  follow the page links
  :details      prefetch details for the whole page
  :reload       reload the initial list
  :help         show this help
  :quit         exit";

fn print_banner() {
    const BANNER: &str = r#"
   ____                      ____
  / ___| __ _ _ __ ___   ___|  _ \  _____  __
 | |  _ / _` | '_ ` _ \ / _ \ | | |/ _ \ \/ /
 | |_| | (_| | | | | | |  __/ |_| |  __/>  <
  \____|\__,_|_| |_| |_|\___|____/ \___/_/\_\
"#;
    eprintln!("{}", BANNER);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    dex: Options,
    search: Option<String>,
    open: Option<usize>,
    details: bool,
    interactive: bool,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let verbose = args.verbose;

    let api_url = args
        .api_url
        .or(cfg.api_url)
        .unwrap_or_else(|| client::DEFAULT_API_URL.to_string());
    if reqwest::Url::parse(&api_url).is_err() {
        return Err(format!("invalid api_url '{api_url}'"));
    }
    let sprite_base = args
        .sprite_base
        .or(cfg.sprite_base)
        .unwrap_or_else(|| view::DEFAULT_SPRITE_BASE.to_string());
    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(client::DEFAULT_TIMEOUT_SECONDS);
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    let limit = args.limit.or(cfg.limit).unwrap_or(dex::DEFAULT_LIMIT);
    if limit == 0 {
        return Err("invalid limit, expected positive integer".to_string());
    }
    let offset = args.offset.or(cfg.offset).unwrap_or(0);
    let max_id = args.max_id.or(cfg.max_id).unwrap_or(search::DEFAULT_MAX_ID);
    if max_id == 0 {
        return Err("invalid max_id, expected positive integer".to_string());
    }

    let locale_raw = args
        .locale
        .or(cfg.locale)
        .unwrap_or_else(|| "en".to_string());
    let locale = Locale::parse(&locale_raw)
        .ok_or_else(|| format!("invalid locale '{locale_raw}', expected en or pl"))?;

    let details = args.details.or(cfg.details).unwrap_or(false);
    let rate = args.rate.or(cfg.rate).unwrap_or(10).max(1);
    let concurrency = args.concurrency.or(cfg.concurrency).unwrap_or(5).max(1);
    let interactive = args.interactive || cfg.interactive.unwrap_or(false);

    let output = args.output.or(cfg.output).filter(|o| !o.trim().is_empty());
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output_format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        dex: Options {
            client: ClientOptions {
                api_url,
                timeout_seconds: timeout,
                proxy,
            },
            limit,
            offset,
            max_id,
            sprite_base,
            locale,
            rate,
            concurrency,
            show_progress: true,
            verbose,
        },
        search: args.search,
        open: args.open,
        details,
        interactive,
        output,
        output_format,
        no_color,
    })
}

fn print_settings(run: &RunConfig) {
    print_banner();
    let o = &run.dex;
    for (label, value) in [
        ("API", o.client.api_url.clone()),
        ("Limit", o.limit.to_string()),
        ("Offset", o.offset.to_string()),
        ("Max ID", o.max_id.to_string()),
        ("Timeout", format!("{}s", o.client.timeout_seconds)),
        ("Details", format_bool(run.details).to_string()),
        ("Output", run.output.clone().unwrap_or_else(|| "-".to_string())),
    ] {
        eprintln!("{}", console::format_kv_line(label, &value));
    }
    eprintln!();
}

/// One line per failure: the full source chain with `-v`, suggestions on a miss.
fn error_message(err: &DexError, verbose: u8) -> String {
    let mut message = if verbose > 0 {
        console::error_chain(err)
    } else {
        err.to_string()
    };
    if let DexError::NotFound { suggestions, .. } = err {
        if !suggestions.is_empty() {
            message.push_str(&format!(" (did you mean: {}?)", suggestions.join(", ")));
        }
    }
    message
}

fn write_screen<W: Write>(out: &mut W, dex: &Dex, format: OutputFormat) -> Result<(), String> {
    let bytes = output::render(&dex.screen(), format, dex.options().locale);
    out.write_all(&bytes)
        .and_then(|_| out.flush())
        .map_err(|e| format!("failed to write to stdout: {e}"))
}

fn print_screen(dex: &Dex, format: OutputFormat) -> Result<(), String> {
    write_screen(&mut std::io::stdout().lock(), dex, format)
}

async fn save_screen(dex: &Dex, path: &str, format: OutputFormat) -> Result<(), String> {
    let bytes = output::render(&dex.screen(), format, dex.options().locale);
    let path = config::expand_tilde(path);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| format!("failed to write output file '{}': {e}", path.display()))?;
    console::info(&format!("results are saved in {}", path.display()));
    Ok(())
}

async fn prefetch(dex: &mut Dex) {
    let started = Instant::now();
    let fetched = dex.prefetch_details().await;
    console::debug(&format!(
        "prefetched {} details in {}ms",
        fetched,
        started.elapsed().as_millis()
    ));
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Open(usize),
    Back,
    Next,
    Previous,
    Details,
    Reload,
    Help,
    Quit,
    Invalid(String),
}

/// Anything not starting with `:` goes to the search box.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Command::Search(trimmed.to_string());
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();
    match name.as_str() {
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "help" | "?" => Command::Help,
        "b" | "back" => Command::Back,
        "n" | "next" => Command::Next,
        "p" | "prev" | "previous" => Command::Previous,
        "r" | "reload" => Command::Reload,
        "d" | "details" => Command::Details,
        "o" | "open" => match arg.map(|a| a.parse::<usize>()) {
            Some(Ok(n)) if n > 0 => Command::Open(n),
            Some(_) => Command::Invalid("expected a card number from 1".to_string()),
            None => Command::Invalid("usage: :open N".to_string()),
        },
        other => Command::Invalid(format!("unknown command ':{other}', try :help")),
    }
}

async fn run_interactive(dex: &mut Dex, run: &RunConfig) -> Result<(), String> {
    console::info("type a name or ID to search, :help for commands");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        eprint!("> ");
        let _ = std::io::stderr().flush();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read stdin: {e}")),
        };
        let result = match parse_command(&line) {
            Command::Quit => break,
            Command::Help => {
                eprintln!("{INTERACTIVE_HELP}");
                continue;
            }
            Command::Invalid(message) => {
                console::warn(&message);
                continue;
            }
            Command::Back => {
                dex.back();
                Ok(())
            }
            Command::Details => {
                prefetch(dex).await;
                continue;
            }
            Command::Search(term) => dex.search(&term).await,
            Command::Open(n) => dex.select(n).await,
            Command::Next => dex.next_page().await,
            Command::Previous => dex.previous_page().await,
            Command::Reload => dex.load_initial().await,
        };
        match result {
            Ok(()) => {
                if run.details && dex.view() == dex::View::List {
                    prefetch(dex).await;
                }
                print_screen(dex, OutputFormat::Text)?;
            }
            Err(e) => console::error(&error_message(&e, run.dex.verbose)),
        }
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    let mut dex = Dex::new(run.dex.clone()).map_err(|e| console::error_chain(&e))?;

    dex.load_initial()
        .await
        .map_err(|e| error_message(&e, run.dex.verbose))?;
    if run.details {
        prefetch(&mut dex).await;
    }

    if run.interactive {
        print_screen(&dex, OutputFormat::Text)?;
        run_interactive(&mut dex, &run).await?;
    } else {
        let result = match (run.open, run.search.as_deref()) {
            (Some(n), _) => dex.select(n).await,
            (None, Some(term)) => dex.search(term).await,
            (None, None) => Ok(()),
        };
        result.map_err(|e| error_message(&e, run.dex.verbose))?;
        let stdout_format = if run.output.is_some() {
            OutputFormat::Text
        } else {
            run.output_format
        };
        print_screen(&dex, stdout_format)?;
    }

    if let Some(path) = run.output.as_deref() {
        save_screen(&dex, path, run.output_format).await?;
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                let mut cmd = CliArgs::command();
                print!("{}", cmd.render_long_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let explicit_config = args.config.is_some();
    let config_path = match args.config.as_deref() {
        Some(p) => Some(config::expand_tilde(p)),
        None => config::default_config_path(),
    };

    if args.init_config {
        let path = config_path.ok_or_else(|| "could not determine config path".to_string())?;
        if config::ensure_default_config_file(&path)? {
            console::info(&format!("wrote default config to {}", path.display()));
        } else {
            console::info(&format!("config already exists at {}", path.display()));
        }
        return Ok(());
    }

    let cfg = match config_path.as_ref() {
        Some(path) => config::load_config(path, !explicit_config)?,
        None => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg)?;
    if run.no_color {
        console::disable_colors();
    }
    console::set_verbosity(run.dex.verbose);
    if run.dex.verbose > 0 {
        print_settings(&run);
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
