//! Reconciles free-form artist genres with Spotify's seed genres.
//!
//! Spotify tags artists with thousands of fine-grained genres ("taiwanese
//! indie", "bedroom pop", ...), while searches work best with the short seed
//! vocabulary ("indie-pop", "mandopop", ...). A raw genre is mapped by, in
//! order: exact match, the alias table, then substring containment.

use crate::{spotify::SpotifyApi, utils};

/// Seeds used when the provider's seed list cannot be fetched.
pub const FALLBACK_SEEDS: [&str; 5] = ["pop", "rock", "hip-hop", "electronic", "indie"];

/// Maximum number of genres handed to the recommendation engine.
pub const MAX_MATCHED_GENRES: usize = 5;

/// Known compound and regional genre phrases and the seed they stand for.
const GENRE_ALIASES: &[(&str, &str)] = &[
    ("dance pop", "dance"),
    ("pop dance", "dance"),
    ("indie pop", "indie-pop"),
    ("synth pop", "synth-pop"),
    ("country pop", "country"),
    ("pop rock", "pop"),
    ("electro pop", "electro"),
    ("dream pop", "indie-pop"),
    ("bedroom pop", "indie-pop"),
    ("art pop", "indie-pop"),
    ("power pop", "power-pop"),
    ("latin pop", "latin"),
    ("taiwanese pop", "mandopop"),
    ("c-pop", "mandopop"),
    ("cpop", "mandopop"),
    ("indie rock", "indie-pop"),
    ("alt rock", "alt-rock"),
    ("alternative rock", "alternative"),
    ("hard rock", "hard-rock"),
    ("punk rock", "punk-rock"),
    ("j rock", "j-rock"),
    ("psychedelic rock", "psych-rock"),
    ("garage rock", "garage"),
    ("hip hop", "hip-hop"),
    ("rap", "hip-hop"),
    ("trap", "hip-hop"),
    ("k-rap", "k-pop"),
    ("chinese hip hop", "hip-hop"),
    ("mandarin hip hop", "hip-hop"),
    ("cantonese hip hop", "hip-hop"),
    ("taiwanese hip hop", "hip-hop"),
    ("r&b", "r-n-b"),
    ("rnb", "r-n-b"),
    ("rhythm and blues", "r-n-b"),
    ("chinese r&b", "r-n-b"),
    ("mandarin r&b", "r-n-b"),
    ("taiwanese r&b", "r-n-b"),
    ("k-r&b", "r-n-b"),
    ("kr&b", "r-n-b"),
    ("indie", "indie-pop"),
    ("indie folk", "folk"),
    ("chinese indie", "indie-pop"),
    ("taiwanese indie", "indie-pop"),
    ("mandarin indie", "indie-pop"),
    ("k-pop", "k-pop"),
    ("kpop", "k-pop"),
    ("korean pop", "k-pop"),
    ("j-pop", "j-pop"),
    ("jpop", "j-pop"),
    ("japanese pop", "j-pop"),
    ("j-rock", "j-rock"),
    ("jrock", "j-rock"),
    ("mandopop", "mandopop"),
    ("mando-pop", "mandopop"),
    ("cantopop", "cantopop"),
    ("canto-pop", "cantopop"),
    ("electronic dance music", "edm"),
    ("electronic", "electronic"),
    ("edm", "edm"),
    ("house music", "house"),
    ("deep house", "deep-house"),
    ("heavy metal", "heavy-metal"),
    ("death metal", "death-metal"),
    ("singer songwriter", "singer-songwriter"),
    ("acoustic pop", "acoustic"),
    ("soul music", "soul"),
    ("disco music", "disco"),
];

pub fn alias_for(genre: &str) -> Option<&'static str> {
    GENRE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == genre)
        .map(|(_, target)| *target)
}

/// Matcher over one snapshot of the valid seed genres.
///
/// Seeds are lowercased, trimmed, de-duplicated and sorted on construction,
/// so the substring fallback picks the same seed no matter in which order
/// the provider listed them.
#[derive(Debug, Clone)]
pub struct GenreNormalizer {
    seeds: Vec<String>,
}

impl GenreNormalizer {
    pub fn new<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seeds: Vec<String> = seeds
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        seeds.sort();
        seeds.dedup();
        Self { seeds }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_SEEDS)
    }

    /// Fetches the current seed list, falling back to [`FALLBACK_SEEDS`].
    pub async fn from_provider(api: &dyn SpotifyApi) -> Self {
        match api.genre_seeds().await {
            Ok(seeds) if !seeds.is_empty() => Self::new(seeds),
            Ok(_) => {
                tracing::warn!("provider returned no genre seeds, using fallback list");
                Self::fallback()
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not fetch genre seeds, using fallback list");
                Self::fallback()
            }
        }
    }

    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    fn contains(&self, genre: &str) -> bool {
        self.seeds.binary_search_by(|s| s.as_str().cmp(genre)).is_ok()
    }

    /// Maps a raw genre onto a valid seed, or `None` when nothing fits.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let genre = raw.trim().to_lowercase();
        // an empty string is a substring of every seed
        if genre.is_empty() {
            return None;
        }

        if self.contains(&genre) {
            return Some(genre);
        }

        if let Some(target) = alias_for(&genre) {
            if self.contains(target) {
                return Some(target.to_string());
            }
        }

        self.seeds
            .iter()
            .find(|seed| genre.contains(seed.as_str()) || seed.contains(&genre))
            .cloned()
    }

    /// Normalizes every genre, dropping misses and repeats, keeping at most
    /// [`MAX_MATCHED_GENRES`] in first-seen order.
    pub fn match_genres(&self, raw: &[String]) -> Vec<String> {
        let matched: Vec<String> = raw
            .iter()
            .filter_map(|genre| {
                let matched = self.normalize(genre);
                match &matched {
                    Some(seed) => tracing::debug!(genre = %genre, seed = %seed, "genre matched"),
                    None => tracing::debug!(genre = %genre, "genre has no match"),
                }
                matched
            })
            .collect();

        let mut unique = utils::dedup_preserving_order(matched);
        unique.truncate(MAX_MATCHED_GENRES);
        unique
    }
}
