/// Entrance animation a theme uses by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entrance {
    /// Opacity fade.
    Fade,
    /// Slide in from an edge.
    Slide,
    /// Scale up from small.
    Zoom,
    /// Character-by-character reveal.
    Typewriter,
}

/// Decorative background layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundPattern {
    /// Slowly drifting shapes.
    Floating,
    /// Static geometric grid.
    Geometric,
    /// Particle field.
    Particles,
    /// Wave bands.
    Waves,
    /// Plain background.
    None,
}

/// Visual theme steering slide generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlideTheme {
    /// Stable identifier sent to the generation service.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Default entrance animation.
    pub entrance: Entrance,
    /// Background layer.
    pub background: BackgroundPattern,
    /// Milliseconds between consecutive element reveals.
    pub element_stagger_ms: u64,
}

/// Pacing preset scaling a theme's stagger.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Pacing {
    /// Stable identifier sent to the generation service.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Multiplier applied to the theme's element stagger.
    pub timing_multiplier: f64,
}

/// Built-in themes; the first entry is the fallback for unknown ids.
pub const THEMES: [SlideTheme; 6] = [
    SlideTheme {
        id: "cosmic",
        name: "Cosmic Journey",
        entrance: Entrance::Fade,
        background: BackgroundPattern::Floating,
        element_stagger_ms: 800,
    },
    SlideTheme {
        id: "minimal",
        name: "Minimalist",
        entrance: Entrance::Slide,
        background: BackgroundPattern::None,
        element_stagger_ms: 600,
    },
    SlideTheme {
        id: "vibrant",
        name: "Vibrant Energy",
        entrance: Entrance::Zoom,
        background: BackgroundPattern::Particles,
        element_stagger_ms: 500,
    },
    SlideTheme {
        id: "corporate",
        name: "Professional",
        entrance: Entrance::Slide,
        background: BackgroundPattern::Geometric,
        element_stagger_ms: 700,
    },
    SlideTheme {
        id: "nature",
        name: "Natural",
        entrance: Entrance::Fade,
        background: BackgroundPattern::Waves,
        element_stagger_ms: 900,
    },
    SlideTheme {
        id: "dark",
        name: "Dark Mode",
        entrance: Entrance::Typewriter,
        background: BackgroundPattern::Particles,
        element_stagger_ms: 1000,
    },
];

/// Built-in pacing presets; the first entry is the fallback for unknown ids.
pub const PACINGS: [Pacing; 4] = [
    Pacing {
        id: "dynamic",
        name: "Dynamic Flow",
        timing_multiplier: 1.0,
    },
    Pacing {
        id: "rapid",
        name: "Rapid Fire",
        timing_multiplier: 0.6,
    },
    Pacing {
        id: "relaxed",
        name: "Relaxed Pace",
        timing_multiplier: 1.5,
    },
    Pacing {
        id: "dramatic",
        name: "Dramatic Reveal",
        timing_multiplier: 2.0,
    },
];

/// Look up a theme, falling back to the first one.
pub fn theme_by_id(id: &str) -> &'static SlideTheme {
    THEMES.iter().find(|t| t.id == id).unwrap_or(&THEMES[0])
}

/// Look up a pacing preset, falling back to the first one.
pub fn pacing_by_id(id: &str) -> &'static Pacing {
    PACINGS.iter().find(|p| p.id == id).unwrap_or(&PACINGS[0])
}

/// Reveal stagger for a theme/pacing pair, in milliseconds.
pub fn effective_stagger_ms(theme: &SlideTheme, pacing: &Pacing) -> u64 {
    (theme.element_stagger_ms as f64 * pacing.timing_multiplier).round() as u64
}
