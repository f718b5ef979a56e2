use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct MarkerColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Palette and geometry for the position markers. One theme covers all three
/// marker families; the discs differ only in color.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct MarkerTheme {
    pub detective: MarkerColor,
    pub barrage: MarkerColor,
    pub candidate: MarkerColor,
    pub radius: u32,
    pub alpha: u8,
}

static THEME: Lazy<MarkerTheme> = Lazy::new(load_theme);

fn load_theme() -> MarkerTheme {
    let content = std::env::var("NYCHASE_MARKER_THEME")
        .ok()
        .and_then(|path| match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(_) => {
                eprintln!("Failed to read marker theme {path}; falling back to default");
                None
            }
        });
    theme_from_override(content.as_deref())
}

/// Resolves an optional JSON override; anything unusable falls back to the
/// default palette.
fn theme_from_override(content: Option<&str>) -> MarkerTheme {
    match content {
        Some(text) => serde_json::from_str(text).unwrap_or_else(|_| {
            eprintln!("Failed to parse marker theme; falling back to default");
            MarkerTheme::default_palette()
        }),
        None => MarkerTheme::default_palette(),
    }
}

impl MarkerTheme {
    /// The classic table palette: blue detectives, green barrages, red
    /// possibility markers, half transparent.
    pub const fn default_palette() -> Self {
        Self {
            detective: MarkerColor {
                red: 0,
                green: 0,
                blue: 255,
            },
            barrage: MarkerColor {
                red: 0,
                green: 255,
                blue: 0,
            },
            candidate: MarkerColor {
                red: 255,
                green: 0,
                blue: 0,
            },
            radius: 50,
            alpha: 128,
        }
    }

    pub fn current() -> &'static MarkerTheme {
        &THEME
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerTheme, theme_from_override};

    #[test]
    fn default_palette_uses_primary_colors() {
        let theme = MarkerTheme::default_palette();
        assert_eq!(theme.detective.blue, 255);
        assert_eq!(theme.barrage.green, 255);
        assert_eq!(theme.candidate.red, 255);
        assert_eq!(theme.radius, 50);
        assert_eq!(theme.alpha, 128);
    }

    #[test]
    fn theme_parses_from_json() {
        let json = r#"{
            "detective": { "red": 10, "green": 20, "blue": 30 },
            "barrage": { "red": 40, "green": 50, "blue": 60 },
            "candidate": { "red": 70, "green": 80, "blue": 90 },
            "radius": 12,
            "alpha": 200
        }"#;
        let theme: MarkerTheme = serde_json::from_str(json).unwrap();
        assert_eq!(theme.radius, 12);
        assert_eq!(theme.candidate.red, 70);
    }

    #[test]
    fn current_theme_is_usable() {
        let theme = MarkerTheme::current();
        assert!(theme.radius > 0);
    }

    #[test]
    fn valid_override_replaces_the_palette() {
        let json = r#"{
            "detective": { "red": 1, "green": 2, "blue": 3 },
            "barrage": { "red": 4, "green": 5, "blue": 6 },
            "candidate": { "red": 7, "green": 8, "blue": 9 },
            "radius": 25,
            "alpha": 64
        }"#;
        let theme = theme_from_override(Some(json));
        assert_eq!(theme.radius, 25);
        assert_eq!(theme.detective.red, 1);
        assert_eq!(theme.candidate.blue, 9);
    }

    #[test]
    fn missing_override_keeps_the_default_palette() {
        assert_eq!(theme_from_override(None), MarkerTheme::default_palette());
    }

    #[test]
    fn malformed_override_falls_back_to_the_default_palette() {
        assert_eq!(
            theme_from_override(Some("{not a theme")),
            MarkerTheme::default_palette()
        );
        assert_eq!(
            theme_from_override(Some(r#"{ "radius": 12 }"#)),
            MarkerTheme::default_palette()
        );
    }
}
