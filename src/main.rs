use clap::{Parser, Subcommand};
use image_props::{config, hash, output, props, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-props")]
#[command(about = "Split responsive image props and fingerprint them for artifact caching")]
#[command(long_about = "\
Split responsive image props and fingerprint them for artifact caching

A responsive image component takes one flat set of props. This tool routes
each prop to the stage that consumes it and computes the cache key of the
artifacts it produces.

Element directory layout (for `scan`):

  elements/
  ├── config.toml           # Scan config (optional, see `gen-config`)
  ├── home/
  │   └── hero.json         # One static element per file
  └── blog/
      └── cover.json

Element file:

  {
    \"element\": \"StaticImage\",
    \"attributes\": {
      \"src\": { \"literal\": \"images/hero.jpg\" },
      \"fluid\": \"flag\",
      \"maxWidth\": { \"literal\": 1200 },
      \"onLoad\": { \"expression\": \"trackLoad\" }
    }
  }

Only image attributes are extracted; attributes written as expressions
cannot be resolved at build time and are dropped (or fail with
`[attributes] strict = true`).")]
#[command(version)]
struct Cli {
    /// Log debug events to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan an element directory into a manifest
    Scan {
        /// Element directory
        #[arg(long, default_value = "elements")]
        source: PathBuf,
        /// Manifest path (defaults to <source>/manifest.json)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Split a JSON object of merged props into option groups
    Split {
        /// File holding the props object
        file: PathBuf,
        /// Print the option groups as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Variant used when neither `fixed` nor `fluid` decides
        #[arg(long, value_enum, default_value_t = VariantArg::Fixed)]
        default_variant: VariantArg,
    },
    /// Print the fingerprint of any JSON value
    Hash {
        /// File holding the options value
        file: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum VariantArg {
    Fixed,
    Fluid,
}

impl From<VariantArg> for props::Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Fixed => Self::Fixed,
            VariantArg::Fluid => Self::Fluid,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scan { source, manifest } => {
            let manifest_path = manifest.unwrap_or_else(|| source.join(scan::MANIFEST_FILENAME));
            let manifest = scan::scan(&source)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest, scan::has_config(&source));
            println!("==> Manifest written to {}", manifest_path.display());
        }
        Command::Split {
            file,
            json,
            default_variant,
        } => {
            let merged: props::MergedProps = serde_json::from_str(&read_input(&file)?)?;
            let split = props::split_props_with(merged, default_variant.into());
            if json {
                println!("{}", serde_json::to_string_pretty(&split)?);
            } else {
                output::print_split_output(&split);
                println!("Cache key: {}", split.cache_key()?);
            }
        }
        Command::Hash { file } => {
            let options: serde_json::Value = serde_json::from_str(&read_input(&file)?)?;
            println!("{}", hash::hash_options(&options)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read an input file; `-` reads stdin.
fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
}
