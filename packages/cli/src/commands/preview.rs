use super::{read_body, write_output};
use crate::config::Config;
use anyhow::{anyhow, Result};
use autoletter_preview::{render_page, render_preview, PageOptions};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Saved message body
    pub file: PathBuf,

    /// Sample value override, e.g. --var firstName=Ada
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Render a full page with headers instead of the body alone
    #[arg(long)]
    pub page: bool,

    /// Subject line for --page
    #[arg(long)]
    pub subject: Option<String>,

    /// Inbox snippet for --page
    #[arg(long)]
    pub preview_text: Option<String>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got `{}`", raw)),
    }
}

pub fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let samples = config.samples().with_overrides(args.vars);

    // Report markup errors against the file as written
    let (source, _) = read_body(&args.file)?;

    let output = if args.page {
        let envelope = config.envelope(args.subject, args.preview_text);
        render_page(&envelope, &source, &samples, PageOptions::default())
    } else {
        render_preview(&source, &samples)
    }
    .map_err(|e| anyhow!("{}: {}", args.file.display(), e))?;

    write_output(args.out.as_deref(), &output)?;
    if let Some(out) = &args.out {
        println!("  {} {} → {}", "✓".green(), args.file.display(), out.display());
    }

    Ok(())
}
