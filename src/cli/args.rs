use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gamedex",
    version,
    about = "terminal lookup client for the PokeAPI",
    long_about = "GameDex lists PokeAPI entries page by page, opens entry details and searches the loaded list by name or by ID.\n\nExamples:\n  gamedex\n  gamedex -s pika\n  gamedex -s 25 -o pikachu.html\n  gamedex --offset 40 --open 3\n  gamedex -I --locale pl\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the final view to a file (format inferred from the extension)."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json or html."
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "locale",
        value_name = "LANG",
        help_heading = "Output",
        help = "Label language: en or pl."
    )]
    pub locale: Option<String>,

    #[arg(
        short = 's',
        long = "search",
        value_name = "TERM",
        help_heading = "Lookup",
        help = "Search the loaded list by name, falling back to a direct ID lookup."
    )]
    pub search: Option<String>,

    #[arg(
        long = "open",
        value_name = "N",
        help_heading = "Lookup",
        help = "Open the N-th card of the loaded page (1-based)."
    )]
    pub open: Option<usize>,

    #[arg(
        short = 'l',
        long = "limit",
        value_name = "N",
        help_heading = "Lookup",
        help = "Entries per page."
    )]
    pub limit: Option<u32>,

    #[arg(
        long = "offset",
        value_name = "N",
        help_heading = "Lookup",
        help = "Index of the first entry of the initial page."
    )]
    pub offset: Option<u32>,

    #[arg(
        long = "max-id",
        value_name = "N",
        help_heading = "Lookup",
        help = "Highest ID accepted by the direct ID lookup."
    )]
    pub max_id: Option<u64>,

    #[arg(
        short = 'I',
        long = "interactive",
        help_heading = "Lookup",
        help = "Read search terms and commands from stdin (:help for the list)."
    )]
    pub interactive: bool,

    #[arg(
        long = "details",
        num_args = 0..=1,
        default_missing_value = "true",
        help_heading = "Lookup",
        help = "Prefetch the details of every entry on the loaded page."
    )]
    pub details: Option<bool>,

    #[arg(
        long = "api-url",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Base URL of the API (defaults to https://pokeapi.co/api/v2)."
    )]
    pub api_url: Option<String>,

    #[arg(
        long = "sprite-base",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Base URL for card sprites."
    )]
    pub sprite_base: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'p',
        long = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Proxy URL for all requests."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'r',
        long = "rate",
        value_name = "RPS",
        help_heading = "Performance",
        help = "Request rate limit for detail prefetch (requests per second)."
    )]
    pub rate: Option<u32>,

    #[arg(
        short = 't',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance",
        help = "Concurrent requests for detail prefetch."
    )]
    pub concurrency: Option<u32>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.gamedex/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Config",
        help = "Write a default config file if none exists and exit."
    )]
    pub init_config: bool,
}
