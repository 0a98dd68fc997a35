use soundnest::session::TimerDuration;
use std::error::Error;

pub fn handle_play(
    sound: &str,
    volume: Option<f32>,
    timer: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    if let Some(v) = volume
        && v.is_nan()
    {
        return Err("Volume must be a number between 0 and 1".into());
    }
    let timer = timer.map(str::parse::<TimerDuration>).transpose()?;

    #[cfg(feature = "player")]
    {
        soundnest::player::run(sound, volume, timer)
    }

    #[cfg(not(feature = "player"))]
    {
        let _ = (sound, timer);
        use owo_colors::OwoColorize;
        println!("{} {}", "🌙".cyan(), "SoundNest Player".bold());
        println!();
        println!(
            "{} The player requires the 'player' feature to be enabled.",
            "Note:".yellow()
        );
        println!();
        println!("To enable it, install with:");
        println!("  {}", "cargo install soundnest --features player".cyan());
        println!();
        println!("Or if building from source:");
        println!("  {}", "cargo build --release --features player".cyan());

        Ok(())
    }
}
