use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use unilist::core::card::CardVariant;
use unilist::core::config::{self, CliOverrides, UnilistConfig};
use unilist::core::dataset::load_items;
use unilist::core::pagination::VecPageSource;
use unilist::core::state::App;
use unilist::core::theme::{ColorScheme, ThemeType};

#[derive(Parser)]
#[command(name = "unilist", about = "Browse a JSON array as a searchable, paginated card list")]
struct Args {
    /// JSON file holding an array of items
    data: PathBuf,

    /// Items per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Fields to search, comma separated
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    #[arg(long, value_enum)]
    theme: Option<ThemeType>,

    #[arg(long, value_enum)]
    scheme: Option<ColorScheme>,

    /// Card style
    #[arg(long, value_enum)]
    card: Option<CardVariant>,

    /// Simulated delay for every page fetch
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Mark matches in card text
    #[arg(long)]
    highlight: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to unilist.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("unilist.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Unilist starting up with {}", args.data.display());

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        UnilistConfig::default()
    });
    let cli = CliOverrides {
        page_size: args.page_size,
        fields: args.fields,
        theme: args.theme,
        scheme: args.scheme,
        card: args.card,
        highlight: args.highlight,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::debug!("Resolved config: {:?}", resolved);

    let items = load_items(&args.data).map_err(|e| {
        log::error!("Failed to load {}: {}", args.data.display(), e);
        std::io::Error::other(e)
    })?;

    let source = VecPageSource::new(items, resolved.page_size)
        .with_latency(Duration::from_millis(args.latency_ms));
    let app = App::from_config(Arc::new(source), &resolved);

    unilist::tui::run(app)
}
