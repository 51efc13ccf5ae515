use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use autoletter_preview::SampleValues;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

pub const EXAMPLE_BODY_NAME: &str = "message.html";

const EXAMPLE_BODY: &str = concat!(
    "<p>Hi {{firstName}},</p>",
    "<p>I noticed <strong>{{company}}</strong> was last active {{lastSeen}}. ",
    "Here is what changed since then:</p>",
    "<ul><li>Faster previews</li><li>Saved selections</li></ul>",
    r#"<p><a href="{{unsubscribeUrl}}">Unsubscribe</a></p>"#
);

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub path: String,

    /// Sender name shown in previews
    #[arg(long, default_value = "Your Name")]
    pub from_name: String,

    /// Sender address shown in previews
    #[arg(long, default_value = "you@example.com")]
    pub from_email: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let root = PathBuf::from(cwd).join(&args.path);
    let config_path = root.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing autoletter...".bright_blue().bold());

    if !root.exists() {
        fs::create_dir_all(&root)?;
        println!("  {} Created {}/", "✓".green(), args.path);
    }

    let example_file = root.join(EXAMPLE_BODY_NAME);
    if !example_file.exists() {
        fs::write(&example_file, EXAMPLE_BODY)?;
        println!("  {} Created {}", "✓".green(), EXAMPLE_BODY_NAME);
    }

    let config = Config {
        sample_values: SampleValues::default()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        from_name: args.from_name,
        from_email: args.from_email,
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Ready!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", EXAMPLE_BODY_NAME);
    println!("  2. Run: autoletter check {}", EXAMPLE_BODY_NAME);
    println!("  3. Run: autoletter preview {} --page", EXAMPLE_BODY_NAME);

    Ok(())
}
