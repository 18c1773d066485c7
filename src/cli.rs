use crate::config::{load_config, Config};
use crate::ir::LayoutRequest;
use crate::layout::{compute_layout, LayoutResult};
use crate::layout_dump::{write_layout_dump, LayoutSummary};
use crate::text_metrics::{FallbackMeasurer, FontMeasurer, TextMeasure};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "nmr-labels",
    version,
    about = "Label layout for NMR spectrum plots (peak stacks, label strips, leader links)"
)]
pub struct Args {
    /// Request file (.json) or '-' for stdin. A JSON array runs several requests.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout JSON. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (JSON5): theme, font and layout constants
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Skip system font lookup and use estimated glyph widths
    #[arg(long = "fast-text")]
    pub fast_text: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    run_with_args(&args)
}

pub fn run_with_args(args: &Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.fast_text {
        config.layout.fast_text_metrics = true;
    }

    let input = read_input(args.input.as_deref())?;
    let requests = LayoutRequest::batch_from_json(&input).context("invalid layout request")?;
    if requests.is_empty() {
        return Err(anyhow::anyhow!("No layout requests found in input"));
    }

    let results = if config.layout.fast_text_metrics {
        layout_all(&requests, &config, &mut FallbackMeasurer)
    } else {
        layout_all(&requests, &config, &mut FontMeasurer::new())
    };
    write_layout_dump(args.output.as_deref(), &results)
}

/// Shares one measurer across the batch so font faces load once.
fn layout_all<M: TextMeasure + ?Sized>(
    requests: &[LayoutRequest],
    config: &Config,
    measurer: &mut M,
) -> Vec<LayoutResult> {
    requests
        .iter()
        .enumerate()
        .map(|(idx, request)| {
            let result = compute_layout(request, config, &mut *measurer);
            let summary = LayoutSummary::from_result(&result);
            log::info!(
                "request {}: {} with {} items ({} affected)",
                idx + 1,
                summary.kind,
                summary.items,
                summary.affected
            );
            result
        })
        .collect()
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
