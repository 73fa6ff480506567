use std::path::PathBuf;

use clap::Parser;
use webfuzz::config::HttpMethod;
use webfuzz::output::ReportFormat;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DelayUnit {
    /// Milliseconds
    #[default]
    Ms,
    /// Seconds
    S,
}

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Wordlist-driven web content and subdomain discovery", long_about = None)]
pub struct Cli {
    /// Base target URL or hostname (e.g. https://example.com or example.com)
    #[arg(short = 'u', long)]
    pub target: String,

    /// Wordlist file, one candidate per line
    #[arg(short = 'f', long = "wordlist", value_name = "FILE")]
    pub wordlist: PathBuf,

    /// Maximum number of requests in flight
    #[arg(short = 't', long, value_parser = clap::value_parser!(u16).range(1..), default_value_t = 10)]
    pub threads: u16,

    /// Delay before each request
    #[arg(short = 'd', long, default_value_t = 0_u64)]
    pub delay: u64,

    /// Unit of --delay
    #[arg(long, value_enum, default_value_t = DelayUnit::Ms)]
    pub delay_unit: DelayUnit,

    /// Stop the whole run after this many seconds (0 = no limit)
    #[arg(long = "time", value_name = "SECONDS", default_value_t = 0_u64)]
    pub max_time: u64,

    /// Drop matches whose body is exactly this many bytes (0 = off)
    #[arg(long, value_name = "BYTES", default_value_t = 0_u64)]
    pub exclude_length: u64,

    /// Status codes to remove from the reported set, comma separated
    #[arg(short = 'X', long, value_delimiter = ',', value_name = "CODES")]
    pub exclude_status: Vec<u16>,

    /// Only probe lines ending in one of these extensions (php,txt,html)
    #[arg(long, value_delimiter = ',', value_name = "EXTS")]
    pub extension: Vec<String>,

    /// Fuzz subdomains instead of paths
    #[arg(long, default_value_t = false)]
    pub sub: bool,

    /// HTTP method
    #[arg(short = 'm', long, value_enum, default_value_t = HttpMethod::Get)]
    pub method: HttpMethod,

    /// Follow redirects instead of reporting the first 3xx
    #[arg(long, default_value_t = false)]
    pub follow_redirects: bool,

    /// Request timeout in seconds (default: 10)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..), default_value_t = 10_u64)]
    pub timeout: u64,

    /// Append findings to this file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Format of the --output file
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// On Ctrl-C or --time, finish in-flight requests and print the summary
    #[arg(long, default_value_t = false)]
    pub graceful: bool,

    /// Disable colored output
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Enable detailed debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
