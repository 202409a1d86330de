use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "traitforge", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate (or resume) the collection: images, metadata and state file.
    Generate(GenerateArgs),
    /// Count every legal combination the asset folders allow.
    Count(CountArgs),
    /// Print the per-kind split for a collection size.
    Allocate(AllocateArgs),
    /// Re-index a finished collection from 0 for the upload tool.
    Prepare(PrepareArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Collection config JSON (defaults apply to omitted fields).
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<traitforge::CollectionConfig> {
        Ok(match &self.config {
            Some(path) => traitforge::CollectionConfig::from_path(path)?,
            None => traitforge::CollectionConfig::default(),
        })
    }
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Asset root with Background/Clothing/Expression/Text/Rare/SecretRare folders.
    #[arg(long, default_value = "Assets")]
    assets: PathBuf,

    /// Output directory.
    #[arg(long, default_value = "output")]
    out: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,

    /// Collection size (overrides config).
    #[arg(long)]
    total: Option<u64>,

    /// Secret rare count (overrides config).
    #[arg(long)]
    secret_rare: Option<u64>,

    /// RNG seed for a reproducible run (overrides config).
    #[arg(long)]
    seed: Option<u64>,

    /// Save progress every N items instead of after each one.
    #[arg(long)]
    checkpoint_every: Option<u32>,
}

#[derive(Parser, Debug)]
struct CountArgs {
    /// Asset root.
    #[arg(long, default_value = "Assets")]
    assets: PathBuf,

    /// Print the counts as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct AllocateArgs {
    /// Collection size.
    #[arg(long)]
    total: u64,

    /// Secret rare count.
    #[arg(long, default_value_t = traitforge::FULL_SECRET_RARE)]
    secret_rare: u64,
}

#[derive(Parser, Debug)]
struct PrepareArgs {
    /// Generator output directory.
    #[arg(long = "in", default_value = "output")]
    in_dir: PathBuf,

    /// Upload directory.
    #[arg(long, default_value = "assets")]
    out: PathBuf,

    /// Number of items to re-index (defaults to the configured total).
    #[arg(long)]
    count: Option<u64>,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Count(args) => cmd_count(args),
        Command::Allocate(args) => cmd_allocate(args),
        Command::Prepare(args) => cmd_prepare(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = args.config.load()?;
    if let Some(total) = args.total {
        config.total = total;
    }
    if let Some(secret) = args.secret_rare {
        config.secret_rare = secret;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(n) = args.checkpoint_every {
        config.checkpoint = traitforge::CheckpointPolicy::Batched(n);
    }

    let opts = traitforge::RunOptions {
        assets_dir: args.assets,
        output_dir: args.out,
        config,
    };
    let summary = traitforge::run(&opts, &traitforge::ImageCompositor)
        .with_context(|| "generation run failed")?;

    eprintln!(
        "generated {} items ({} normal, {} rare, {} secret rare); last id #{} (seed {})",
        summary.produced.total(),
        summary.produced.normal,
        summary.produced.rare,
        summary.produced.secret_rare,
        summary.last_id,
        summary.seed,
    );
    if summary.state_write_failures > 0 {
        eprintln!(
            "warning: {} checkpoint(s) could not be saved; resuming may repeat work",
            summary.state_write_failures
        );
    }
    Ok(())
}

fn cmd_count(args: CountArgs) -> anyhow::Result<()> {
    let catalog = traitforge::AssetCatalog::load(&args.assets)?;
    let counts = traitforge::count_combinations(&catalog);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!("Rare combinations:");
    for (name, r) in &counts.rare {
        println!(
            "  {name}: {} without text, {} with text, {} total",
            r.without_text,
            r.with_text,
            r.total()
        );
    }
    println!("Normal without text:   {}", counts.normal_without_text);
    println!("Normal with text:      {}", counts.normal_with_text);
    println!("Rare total:            {}", counts.rare_total());
    println!("Unique combinations:   {}", counts.total());
    println!(
        "Assets: {} backgrounds, {} clothing, {} expressions, {} text, {} rare, {} secret rare",
        catalog.backgrounds.len(),
        catalog.clothing.len(),
        catalog.expressions.len(),
        catalog.text.len(),
        catalog.rare.len(),
        catalog.secret_rare.len(),
    );
    println!("Maximum rare share:    {:.2}%", counts.max_rare_percentage());
    Ok(())
}

fn cmd_allocate(args: AllocateArgs) -> anyhow::Result<()> {
    let q = traitforge::allocate(args.total, args.secret_rare)?;
    let pct = |n: u64| n as f64 / args.total.max(1) as f64 * 100.0;
    println!("Normal:      {} ({:.2}%)", q.normal, pct(q.normal));
    println!("Rare:        {} ({:.2}%)", q.rare, pct(q.rare));
    println!("Secret rare: {} ({:.2}%)", q.secret_rare, pct(q.secret_rare));
    println!("Total:       {}", q.total());
    Ok(())
}

fn cmd_prepare(args: PrepareArgs) -> anyhow::Result<()> {
    let config = args.config.load()?;
    config.validate()?;
    let count = args.count.unwrap_or(config.total);
    let summary = traitforge::prepare_upload(&args.in_dir, &args.out, count, &config)?;
    eprintln!(
        "prepared {} images and {} metadata files in {} ({} missing)",
        summary.images,
        summary.metadata,
        args.out.display(),
        summary.missing
    );
    Ok(())
}
