use chrono::{Local, Timelike};
use owo_colors::OwoColorize;
use soundnest::catalog::{Catalog, Category, CategoryFilter};
use soundnest::user::UserStore;
use std::error::Error;

/// Greeting for the hour of the day (0-23).
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good Morning",
        12..=17 => "Good Afternoon",
        18..=23 => "Good Evening",
        _ => "Good Day",
    }
}

pub fn handle_home(category: Option<&str>) -> Result<(), Box<dyn Error>> {
    let filter = match category {
        Some(c) => c.parse::<CategoryFilter>()?,
        None => CategoryFilter::All,
    };

    let store = UserStore::open_default()?;
    let Some(user) = store.load()? else {
        return Err("SoundNest is not set up yet. Run 'nest init' first.".into());
    };

    let catalog = Catalog::builtin();

    println!("{}", format!("Hey, {}", user.name).bold());
    println!("{}", greeting(Local::now().hour()).dimmed());
    println!();

    if let Some(entry) = user.recent.and_then(|i| catalog.get(i)) {
        println!("{}", "Recently Played".yellow().bold());
        println!("  {} {}", entry.category.icon(), entry.title.cyan());
        println!();
    }

    let sections: Vec<Category> = match filter {
        CategoryFilter::All => Category::ALL.to_vec(),
        CategoryFilter::Only(c) => vec![c],
    };

    for category in sections {
        let entries = catalog.by_category(CategoryFilter::Only(category));
        if entries.is_empty() {
            continue;
        }
        println!("{} {}", category.icon(), category.as_str().yellow().bold());
        for (_, entry) in entries {
            println!("  {}", entry.title);
        }
        println!();
    }

    println!("Play one with {}", "nest play <SOUND>".cyan());

    Ok(())
}
