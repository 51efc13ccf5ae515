use super::{read_body, write_output};
use anyhow::{anyhow, Result};
use autoletter_editor::{Document, EditorError, Mutation, Selection};
use clap::Args;
use colored::Colorize;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Saved message body
    pub file: PathBuf,

    /// JSON array of steps: `{ "selection": { "start", "end" } | null, "mutation": {...} }`
    #[arg(short, long)]
    pub script: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Stop at the first failing step
    #[arg(long)]
    pub strict: bool,
}

/// Flat text offsets into the document as it stands before the step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub selection: Option<TextRange>,
    pub mutation: Mutation,
}

#[derive(Debug)]
pub struct StepFailure {
    pub index: usize,
    pub mutation: &'static str,
    pub error: EditorError,
}

/// Apply steps in order. A failed step leaves the document as it was; in
/// strict mode it also ends the run.
pub fn replay(document: &mut Document, steps: &[Step], strict: bool) -> Result<Vec<StepFailure>> {
    let mut failures = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        let selection = step
            .selection
            .map(|range| Selection::from_text_offsets(document.fragment(), range.start, range.end));

        match document.apply(&step.mutation, selection.as_ref()) {
            Ok(edit) => {
                debug!(step = index + 1, mutation = step.mutation.name(), cursor = ?edit.cursor.text_offsets(&edit.fragment), "applied");
            }
            Err(error) if strict => {
                return Err(anyhow!("step {} ({}) failed: {}", index + 1, step.mutation.name(), error));
            }
            Err(error) => failures.push(StepFailure {
                index,
                mutation: step.mutation.name(),
                error,
            }),
        }
    }

    Ok(failures)
}

pub fn edit(args: EditArgs, _cwd: &str) -> Result<()> {
    let (source, _) = read_body(&args.file)?;
    let mut document = Document::from_html(&source)?;

    let script = fs::read_to_string(&args.script)
        .map_err(|e| anyhow!("Cannot read {}: {}", args.script.display(), e))?;
    let steps: Vec<Step> =
        serde_json::from_str(&script).map_err(|e| anyhow!("Invalid script {}: {}", args.script.display(), e))?;

    let failures = replay(&mut document, &steps, args.strict)?;
    for failure in &failures {
        eprintln!(
            "  {} step {} ({}) - {}",
            "✗".red(),
            failure.index + 1,
            failure.mutation,
            failure.error.to_string().red()
        );
    }

    write_output(args.out.as_deref(), document.html())?;

    if let Some(out) = &args.out {
        let applied = steps.len() - failures.len();
        if failures.is_empty() {
            println!("{} Applied {} steps → {}", "✅".green(), applied, out.display());
        } else {
            println!(
                "{} Applied {} steps, {} failed → {}",
                "⚠️".yellow(),
                applied,
                failures.len(),
                out.display()
            );
        }
    }

    Ok(())
}
