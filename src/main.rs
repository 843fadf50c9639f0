pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod render;
pub mod sequence;
pub mod server;
pub mod types;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the discovered year attributes and scaling diagnostics
    Inspect {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Serve the interactive proportional-symbol map
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Inspect { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let (places, attributes, scaling) = prepare(&app_config)?;
            inspect(&places, &attributes, &scaling);
        }
        Commands::Serve { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let (places, attributes, scaling) = prepare(&app_config)?;

            let bounds = types::GeoBounds::of(&places);
            let sequencer = sequence::Sequencer::new(
                places,
                attributes,
                scaling,
                app_config.symbols.value_label.clone(),
            )?;

            server::start_server(app_config, sequencer, bounds).await?;
        }
    }

    Ok(())
}

/// Startup pipeline shared by both subcommands. Everything downstream of the
/// load runs strictly after it succeeds; any failure aborts before a single
/// symbol exists.
fn prepare(
    config: &config::AppConfig,
) -> anyhow::Result<(Vec<types::Place>, Vec<String>, render::SymbolScaling)> {
    // 1. Load data
    let places = data::load_places(&config.input.geojson, &config.input.name_property)?;

    // 2. Discover year attributes
    let attributes = processing::discover_attributes(&places);
    if attributes.is_empty() {
        return Err(error::DataError::NoYearAttributes.into());
    }

    // 3. Global minimum for Flannery scaling across all years
    let min_value = processing::global_minimum(&places, &attributes)?;

    // 4. Scaling law, validated before first render
    let scaling = render::SymbolScaling::new(min_value, config.symbols.base_radius)?;

    Ok((places, attributes, scaling))
}

fn inspect(places: &[types::Place], attributes: &[String], scaling: &render::SymbolScaling) {
    println!("Features: {}", places.len());
    println!("Year attributes: {:?}", attributes);
    println!("Global minimum: {}", scaling.min_value());

    for attribute in attributes {
        let values: Vec<f64> = places
            .iter()
            .filter_map(|p| p.numeric_value(attribute))
            .collect();

        if values.is_empty() {
            println!("  {}: no numeric values", attribute);
            continue;
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "  {}: {} values, {:.1}..{:.1} -> radius {:.2}..{:.2}",
            attribute,
            values.len(),
            min,
            max,
            scaling.radius(min),
            scaling.radius(max)
        );
    }
}
