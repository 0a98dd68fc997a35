use owo_colors::OwoColorize;
use soundnest::config::{Config, KEYS};
use std::error::Error;
use std::process::Command;

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("{}", "Current SoundNest configuration:".bold());
    println!("  sounds_dir: {}", config.sounds_dir);
    println!("  default_volume: {:.2}", config.default_volume);
    println!("  log_level: {}", config.log_level);
    println!("  log_file: {}", config.log_file);
    println!();
    println!("  (stored in {})", Config::config_path()?.display());

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("{} Configuration updated: {key} = {value}", "✓".green().bold());

    Ok(())
}

pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    if !Config::exists()? {
        Config::new().save()?;
    }

    let config_path = Config::config_path()?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    println!("Opening {} in {}", config_path.display(), editor);

    let status = Command::new(&editor).arg(&config_path).status();
    match status {
        Ok(status) if status.success() => {}
        Ok(_) => return Err(format!("Editor '{editor}' exited with error").into()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(format!("Editor '{editor}' not found. Set $EDITOR to a valid editor path.").into());
        }
        Err(e) => return Err(format!("Failed to launch editor '{editor}': {e}").into()),
    }

    // Re-read so typos surface now rather than when the player starts
    if let Err(e) = Config::load() {
        return Err(format!(
            "{} is not valid: {e}\nKnown keys: {}. Fix it with 'nest config edit' or 'nest config set'.",
            config_path.display(),
            KEYS.join(", ")
        )
        .into());
    }
    println!("{} Configuration saved", "✓".green().bold());

    Ok(())
}
