use super::read_body;
use anyhow::{anyhow, Result};
use autoletter_common::{collect_tokens, TokenRef};
use autoletter_parser::Fragment;
use autoletter_preview::{sanitize, UNSUBSCRIBE_URL};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Saved message body
    pub file: PathBuf,
}

/// Tokens naming neither a merge variable nor a system value
pub fn unknown_tokens(fragment: &Fragment) -> Vec<TokenRef> {
    collect_tokens(fragment)
        .into_iter()
        .filter(|token| !token.is_known() && token.name != UNSUBSCRIBE_URL)
        .collect()
}

pub fn check(args: CheckArgs, _cwd: &str) -> Result<()> {
    println!("🔍 {} {}", "Checking".green().bold(), args.file.display());

    let (_, fragment) = read_body(&args.file)?;
    println!("  {} Markup parses", "✓".green());

    let tokens = collect_tokens(&fragment);
    for token in &tokens {
        if token.is_known() || token.name == UNSUBSCRIBE_URL {
            println!("  {} {{{{{}}}}}", "✓".green(), token.name);
        } else {
            println!(
                "  {} {{{{{}}}}} {}",
                "✗".red(),
                token.name,
                "is not a merge variable".red()
            );
        }
    }

    let mut preview = fragment.clone();
    let report = sanitize(&mut preview);
    if !report.is_clean() {
        println!(
            "  {} Preview strips {} elements and {} attributes",
            "⚠️".yellow(),
            report.dropped_elements + report.unwrapped_elements,
            report.dropped_attributes
        );
    }

    let unknown = unknown_tokens(&fragment);
    println!();
    if unknown.is_empty() {
        println!("{} {} tokens, all known", "✅".green(), tokens.len());
        Ok(())
    } else {
        Err(anyhow!("{} unknown merge variable(s)", unknown.len()))
    }
}
