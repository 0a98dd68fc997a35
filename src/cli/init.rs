use dialoguer::{Input, theme::ColorfulTheme};
use owo_colors::OwoColorize;
use soundnest::config::Config;
use soundnest::user::UserStore;
use std::error::Error;

pub fn handle_init(name: Option<&str>) -> Result<(), Box<dyn Error>> {
    let store = UserStore::open_default()?;

    if let Some(existing) = store.load()? {
        return Err(format!(
            "SoundNest is already set up for {}. Run 'nest home' to get started.",
            existing.name
        )
        .into());
    }

    let name = match name {
        Some(n) => n.to_string(),
        None => Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("What should we call you?")
            .allow_empty(true)
            .interact_text()?,
    };

    let user = store.create(&name)?;

    // First run also writes the default configuration
    if !Config::exists()? {
        Config::new().save()?;
    }

    println!("{} Welcome, {}!", "✓".green().bold(), user.name.cyan());
    println!();
    println!("Drop your sound files into {}", Config::load()?.sounds_path().display());
    println!(
        "then run {} to browse or {} to start listening.",
        "nest home".cyan(),
        "nest play Rain".cyan()
    );

    Ok(())
}
