use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use duoqr::helper::{generate_dual_data_uri, generate_dual_png, generate_dual_svg, parse_hex_color};
use duoqr::qrcode::QrCodeEcc;
use duoqr::render::RenderConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Png,
    Svg,
    DataUri,
}

/// Overlay two QR codes into one diagonally split image.
#[derive(Parser, Debug)]
#[command(name = "duoqr", version, about)]
struct Cli {
    /// Text for the first code (upper-right half of split cells)
    first: String,

    /// Text for the second code (lower-left half of split cells)
    second: String,

    /// Output file, ignored for data-uri
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Png)]
    format: Format,

    /// Error correction level: L, M, Q or H
    #[arg(long, default_value = "H")]
    ecc: QrCodeEcc,

    /// Pixels per module
    #[arg(long, default_value_t = 8)]
    cell_size: u32,

    /// Quiet zone width in modules
    #[arg(long, default_value_t = 4)]
    margin: u32,

    /// Dark module color as RRGGBB
    #[arg(long, default_value = "000000")]
    dark: String,

    /// Light module color as RRGGBB
    #[arg(long, default_value = "ffffff")]
    light: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RenderConfig::default()
        .with_cell_size(cli.cell_size)
        .with_margin_cells(cli.margin)
        .with_colors(parse_hex_color(&cli.dark)?, parse_hex_color(&cli.light)?);
    tracing::debug!(?config, ecc = %cli.ecc, "resolved render configuration");

    match cli.format {
        Format::DataUri => {
            println!("{}", generate_dual_data_uri(&cli.first, &cli.second, cli.ecc, &config)?);
        }
        Format::Png => {
            let path = cli.output.unwrap_or_else(|| PathBuf::from("dual_qr.png"));
            let png = generate_dual_png(&cli.first, &cli.second, cli.ecc, &config)?;
            std::fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote composite PNG");
        }
        Format::Svg => {
            let path = cli.output.unwrap_or_else(|| PathBuf::from("dual_qr.svg"));
            let svg = generate_dual_svg(&cli.first, &cli.second, cli.ecc, &config)?;
            std::fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote composite SVG");
        }
    }
    Ok(())
}
