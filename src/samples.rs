//! The fixed prompt samples every style is exercised with, plus the
//! filename helpers that tie a (style, sample) pair to its asset on disk.

/// (label, prompt text) pairs, in report column order. Static for the
/// process lifetime; labels double as filename components.
pub const PROMPT_SAMPLES: &[(&str, &str)] = &[
    ("dragon", "a dragon"),
    ("lanterns", "people releasing paper lanterns into the night sky"),
    ("skyscraper", "a skyscraper wrapped in morning fog"),
    ("Godzilla", "Godzilla"),
    ("zodiac", "Chinese zodiac"),
    ("cherrytree", "a blossoming cherry tree"),
    ("catgirl", "a cute catgirl wearing a qipao"),
    ("pagoda", "an ancient pagoda on a mountainside"),
    ("garden", "a beautiful garden, cherry trees, lotus flowers, chrysanthemums"),
    ("noodles", "a bowl of noodles"),
];

/// Filesystem-safe form of a style name: every character outside
/// `[A-Za-z0-9]` becomes `_`, and the result is lowercased.
///
/// Idempotent on already-safe names. Two distinct style names may collide
/// after slugging; that ambiguity is accepted, not guarded against.
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Asset filename for a (style slug, prompt label) pair.
pub fn preview_filename(slug: &str, label: &str) -> String {
    format!("{}_{}.webp", slug, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Fantasy Art"), "fantasy_art");
        assert_eq!(slugify("SDXL 1.0"), "sdxl_1_0");
    }

    #[test]
    fn test_slugify_idempotent() {
        let once = slugify("Anime Portrait (v2)");
        assert_eq!(slugify(&once), once);
        assert_eq!(slugify("already_safe_name"), "already_safe_name");
    }

    #[test]
    fn test_slugify_non_ascii() {
        // Multibyte chars are single characters, so each maps to one underscore.
        assert_eq!(slugify("café"), "caf_");
    }

    #[test]
    fn test_preview_filename() {
        assert_eq!(
            preview_filename(&slugify("Fantasy Art"), "dragon"),
            "fantasy_art_dragon.webp"
        );
    }

    #[test]
    fn test_sample_order_starts_with_dragon() {
        assert_eq!(PROMPT_SAMPLES[0], ("dragon", "a dragon"));
        assert_eq!(PROMPT_SAMPLES.len(), 10);
    }
}
