//! The sound catalog.
//!
//! A fixed, ordered list of ambient loops. Position in the list matters: the
//! user record stores the index of the last played entry, so reordering the
//! built-in table changes what "recently played" points at.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Historical display names that route parameters may still carry.
const LEGACY_ALIASES: &[(&str, &str)] = &[("Bonfire", "Fire")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ambient,
    Beach,
    Sunset,
    Forest,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Ambient,
        Category::Forest,
        Category::Beach,
        Category::Sunset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ambient => "ambient",
            Category::Beach => "beach",
            Category::Sunset => "sunset",
            Category::Forest => "forest",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Ambient => "🧘",
            Category::Beach => "🐚",
            Category::Sunset => "🌅",
            Category::Forest => "🌳",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selector used by the home screen. `All` shows every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(CategoryFilter::All),
            "ambient" => Ok(CategoryFilter::Only(Category::Ambient)),
            "beach" => Ok(CategoryFilter::Only(Category::Beach)),
            "sunset" => Ok(CategoryFilter::Only(Category::Sunset)),
            "forest" => Ok(CategoryFilter::Only(Category::Forest)),
            other => Err(format!("Unknown category: {other}")),
        }
    }
}

/// Reference to an audio asset, relative to the configured sounds directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioRef(pub PathBuf);

/// Reference to the animation shown behind the player controls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisualRef(pub PathBuf);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
    pub mini_width: u32,
    pub mini_height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundEntry {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub audio_ref: AudioRef,
    pub visual_ref: VisualRef,
    pub display_size: DisplaySize,
}

impl SoundEntry {
    fn builtin(
        id: &str,
        title: &str,
        category: Category,
        stem: &str,
        (width, mini): (u32, u32),
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            category,
            audio_ref: AudioRef(PathBuf::from(format!("{stem}.mp3"))),
            visual_ref: VisualRef(PathBuf::from(format!("lottie/{stem}.json"))),
            display_size: DisplaySize {
                width,
                height: width,
                mini_width: mini,
                mini_height: mini,
            },
        }
    }
}

/// Map a legacy display name to its canonical catalog title. Unknown names
/// pass through unchanged.
pub fn canonical_title(name: &str) -> &str {
    LEGACY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<SoundEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        use Category::*;
        Self {
            entries: vec![
                SoundEntry::builtin("blue", "Blue", Ambient, "blue", (400, 125)),
                SoundEntry::builtin("brown", "Brown", Ambient, "brown", (400, 125)),
                SoundEntry::builtin("pink", "Pink", Ambient, "pink", (400, 125)),
                SoundEntry::builtin("white", "White", Ambient, "white", (400, 125)),
                SoundEntry::builtin("waves", "Waves", Beach, "waves", (400, 150)),
                SoundEntry::builtin("crickets", "Crickets", Sunset, "crickets", (400, 150)),
                SoundEntry::builtin("fire", "Fire", Sunset, "fire", (600, 150)),
                SoundEntry::builtin("rain", "Rain", Forest, "rain", (400, 100)),
                SoundEntry::builtin("birds", "Birds", Forest, "birds", (1200, 500)),
            ],
        }
    }

    /// Build a catalog from explicit entries. Later duplicates of a title are
    /// dropped so lookups stay unambiguous.
    pub fn from_entries(entries: Vec<SoundEntry>) -> Self {
        let mut unique: Vec<SoundEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if unique.iter().any(|e| e.title == entry.title) {
                log::warn!("Duplicate catalog title dropped: {}", entry.title);
                continue;
            }
            unique.push(entry);
        }
        Self { entries: unique }
    }

    pub fn all(&self) -> &[SoundEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&SoundEntry> {
        self.entries.get(index)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&SoundEntry> {
        self.entries.iter().find(|e| e.title == title)
    }

    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.title == title)
    }

    /// Resolve a route parameter: normalize legacy aliases, then look the
    /// title up. Returns the catalog index alongside the entry.
    pub fn resolve(&self, route_param: &str) -> Option<(usize, &SoundEntry)> {
        let title = canonical_title(route_param.trim());
        self.index_of(title).map(|i| (i, &self.entries[i]))
    }

    pub fn by_category(&self, filter: CategoryFilter) -> Vec<(usize, &SoundEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.matches(e.category))
            .collect()
    }

    /// Closest title to an unresolvable name, for "did you mean" hints.
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let matcher = SkimMatcherV2::default().ignore_case();
        self.entries
            .iter()
            .filter_map(|e| {
                matcher
                    .fuzzy_match(&e.title, name)
                    .map(|score| (score, e.title.as_str()))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, title)| title)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
