//! Built-in fallback word bank.
//!
//! Guarantees the game stays playable even without an API key or when the
//! model keeps producing invalid words. Words are grouped by tier and
//! category; selection is uniform over the tier's stocked categories.

use rand::seq::SliceRandom;

use crate::domain::{DifficultyTier, WordCategory};

/// Stocked categories and their word lists for one tier. Every category
/// listed here also appears in the tier's `DifficultyConfig`.
pub fn bank(tier: DifficultyTier) -> &'static [(WordCategory, &'static [&'static str])] {
  match tier {
    DifficultyTier::Cet4 => &[
      (WordCategory::Animals, &[
        "cat", "dog", "bird", "fish", "bear", "lion", "wolf", "deer", "frog", "duck",
      ]),
      (WordCategory::Food, &[
        "apple", "bread", "cake", "milk", "rice", "meat", "soup", "pizza", "pasta", "salad",
      ]),
      (WordCategory::Objects, &[
        "chair", "table", "phone", "book", "clock", "lamp", "door", "window", "car", "bike",
      ]),
    ],
    DifficultyTier::Cet6 => &[
      (WordCategory::Countries, &[
        "france", "brazil", "canada", "mexico", "poland", "turkey", "greece", "norway",
        "sweden", "ireland",
      ]),
      (WordCategory::Nature, &[
        "forest", "mountain", "ocean", "desert", "valley", "river", "island", "canyon",
        "meadow", "glacier",
      ]),
      (WordCategory::Sports, &[
        "soccer", "tennis", "hockey", "boxing", "rugby", "cricket", "skiing", "surfing",
        "cycling", "baseball",
      ]),
      (WordCategory::General, &[
        "computer", "kitchen", "garden", "library", "hospital", "school", "office", "market",
        "theater", "museum",
      ]),
    ],
    DifficultyTier::Toefl => &[
      (WordCategory::Science, &[
        "biology", "physics", "chemistry", "astronomy", "geology", "botany", "zoology",
        "genetics", "ecology", "neurology",
      ]),
      (WordCategory::Technology, &[
        "computer", "software", "hardware", "network", "database", "protocol", "interface",
        "framework", "algorithm", "programming",
      ]),
      (WordCategory::Nature, &[
        "environment", "ecosystem", "biodiversity", "conservation", "pollution", "renewable",
        "sustainable", "atmosphere", "geography", "landscape",
      ]),
      (WordCategory::General, &[
        "education", "literature", "philosophy", "psychology", "sociology", "economics",
        "politics", "culture", "society", "community",
      ]),
    ],
    DifficultyTier::Gre => &[
      (WordCategory::Science, &[
        "chemistry", "astronomy", "genetics", "neurology", "biochemistry", "microbiology",
        "psychology", "anthropology", "paleontology", "meteorology",
      ]),
      (WordCategory::Technology, &[
        "algorithm", "database", "software", "hardware", "protocol", "encryption",
        "interface", "framework", "architecture", "programming",
      ]),
    ],
  }
}

/// Pick a random word for the tier, uppercased for the game board.
pub fn fallback_word(tier: DifficultyTier) -> String {
  let mut rng = rand::thread_rng();
  let word = bank(tier)
    .choose(&mut rng)
    .and_then(|(_, words)| words.choose(&mut rng))
    .copied()
    .unwrap_or("cat");
  word.to_uppercase()
}
