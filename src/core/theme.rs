//! # Themes
//!
//! Light and dark palettes, per-scheme accent colors, and a [`ThemeManager`]
//! that owns the current theme and tells subscribers when it changes.
//!
//! There is no global instance. Whoever needs a theme owns a manager (the
//! `App` does) and passes `&Theme` down to whatever renders.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

// ============================================================================
// Colors
// ============================================================================

/// An opaque RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `self` drawn at `alpha` opacity over `backdrop`.
    pub fn blend(self, backdrop: HexColor, alpha: f32) -> HexColor {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha)).round() as u8
        };
        HexColor::rgb(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColorError(String);

impl fmt::Display for HexColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color {:?}, expected #RRGGBB", self.0)
    }
}

impl std::error::Error for HexColorError {}

impl FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HexColorError(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(HexColor::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for HexColor {
    type Error = HexColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

const fn hex(value: u32) -> HexColor {
    HexColor::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

// ============================================================================
// Theme Types
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeType {
    #[default]
    Light,
    Dark,
    /// Follows the light palette; there is no system appearance to follow in a terminal.
    Auto,
    Custom,
}

impl ThemeType {
    pub fn label(self) -> &'static str {
        match self {
            ThemeType::Light => "light",
            ThemeType::Dark => "dark",
            ThemeType::Auto => "auto",
            ThemeType::Custom => "custom",
        }
    }
}

impl FromStr for ThemeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeType::Light),
            "dark" => Ok(ThemeType::Dark),
            "auto" => Ok(ThemeType::Auto),
            "custom" => Ok(ThemeType::Custom),
            other => Err(format!("unknown theme type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Custom,
}

/// The colors a scheme overrides on top of the base palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeAccents {
    pub primary: HexColor,
    pub secondary: HexColor,
    pub success: HexColor,
    pub warning: HexColor,
    pub error: HexColor,
    pub info: HexColor,
}

impl ColorScheme {
    pub fn accents(self) -> SchemeAccents {
        let (primary, secondary) = match self {
            ColorScheme::Blue | ColorScheme::Custom => (hex(0x007AFF), hex(0x5856D6)),
            ColorScheme::Green => (hex(0x34C759), hex(0x30D158)),
            ColorScheme::Purple => (hex(0xAF52DE), hex(0x5856D6)),
            ColorScheme::Orange => (hex(0xFF9500), hex(0xFF6B35)),
            ColorScheme::Red => (hex(0xFF3B30), hex(0xFF6B6B)),
        };
        SchemeAccents {
            primary,
            secondary,
            success: hex(0x34C759),
            warning: hex(0xFF9500),
            error: hex(0xFF3B30),
            info: hex(0x5AC8FA),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: HexColor,
    pub secondary: HexColor,
    pub background: HexColor,
    pub surface: HexColor,
    pub text: HexColor,
    pub text_secondary: HexColor,
    pub border: HexColor,
    pub shadow: HexColor,
    pub success: HexColor,
    pub warning: HexColor,
    pub error: HexColor,
    pub info: HexColor,
}

pub const LIGHT_COLORS: ThemeColors = ThemeColors {
    primary: hex(0x007AFF),
    secondary: hex(0x5856D6),
    background: hex(0xFFFFFF),
    surface: hex(0xF8F9FA),
    text: hex(0x1A1A1A),
    text_secondary: hex(0x666666),
    border: hex(0xE1E5E9),
    shadow: hex(0x000000),
    success: hex(0x34C759),
    warning: hex(0xFF9500),
    error: hex(0xFF3B30),
    info: hex(0x5AC8FA),
};

pub const DARK_COLORS: ThemeColors = ThemeColors {
    primary: hex(0x0A84FF),
    secondary: hex(0x5E5CE6),
    background: hex(0x000000),
    surface: hex(0x1C1C1E),
    text: hex(0xFFFFFF),
    text_secondary: hex(0x8E8E93),
    border: hex(0x38383A),
    shadow: hex(0x000000),
    success: hex(0x30D158),
    warning: hex(0xFF9F0A),
    error: hex(0xFF453A),
    info: hex(0x64D2FF),
};

impl ThemeColors {
    fn with_accents(mut self, accents: SchemeAccents) -> Self {
        self.primary = accents.primary;
        self.secondary = accents.secondary;
        self.success = accents.success;
        self.warning = accents.warning;
        self.error = accents.error;
        self.info = accents.info;
        self
    }

    /// Copies every color set in `overrides` over this palette.
    pub fn apply(mut self, overrides: &ThemeColorOverrides) -> Self {
        let slots = [
            (&mut self.primary, overrides.primary),
            (&mut self.secondary, overrides.secondary),
            (&mut self.background, overrides.background),
            (&mut self.surface, overrides.surface),
            (&mut self.text, overrides.text),
            (&mut self.text_secondary, overrides.text_secondary),
            (&mut self.border, overrides.border),
            (&mut self.shadow, overrides.shadow),
            (&mut self.success, overrides.success),
            (&mut self.warning, overrides.warning),
            (&mut self.error, overrides.error),
            (&mut self.info, overrides.info),
        ];
        for (slot, value) in slots {
            if let Some(color) = value {
                *slot = color;
            }
        }
        self
    }
}

/// A sparse set of colors, as read from the `[theme.colors]` config table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    pub primary: Option<HexColor>,
    pub secondary: Option<HexColor>,
    pub background: Option<HexColor>,
    pub surface: Option<HexColor>,
    pub text: Option<HexColor>,
    pub text_secondary: Option<HexColor>,
    pub border: Option<HexColor>,
    pub shadow: Option<HexColor>,
    pub success: Option<HexColor>,
    pub warning: Option<HexColor>,
    pub error: Option<HexColor>,
    pub info: Option<HexColor>,
}

impl ThemeColorOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub kind: ThemeType,
    pub colors: ThemeColors,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            kind: ThemeType::Light,
            colors: LIGHT_COLORS,
        }
    }

    pub fn dark() -> Self {
        Self {
            kind: ThemeType::Dark,
            colors: DARK_COLORS,
        }
    }

    /// Base palette for `kind` with `scheme`'s accents laid over it.
    pub fn build(kind: ThemeType, scheme: ColorScheme) -> Self {
        let base = match kind {
            ThemeType::Dark => DARK_COLORS,
            ThemeType::Light | ThemeType::Auto | ThemeType::Custom => LIGHT_COLORS,
        };
        Self {
            kind,
            colors: base.with_accents(scheme.accents()),
        }
    }
}

// ============================================================================
// Theme Manager
// ============================================================================

/// Identifies a listener registered with [`ThemeManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ThemeListener = Box<dyn Fn(&Theme) + Send + Sync>;

pub struct ThemeManager {
    theme: Theme,
    scheme: ColorScheme,
    listeners: Vec<(SubscriptionId, ThemeListener)>,
    next_id: u64,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            scheme: ColorScheme::default(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// The scheme last passed to `set_theme_type`.
    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.notify();
    }

    pub fn set_theme_type(&mut self, kind: ThemeType, scheme: ColorScheme) {
        self.scheme = scheme;
        self.set_theme(Theme::build(kind, scheme));
    }

    /// Overlays `overrides` on the current colors and marks the theme custom.
    pub fn set_custom_colors(&mut self, overrides: &ThemeColorOverrides) {
        let theme = Theme {
            kind: ThemeType::Custom,
            colors: self.theme.colors.apply(overrides),
        };
        self.set_theme(theme);
    }

    /// Registers `listener` to be called with the new theme after every change.
    pub fn subscribe(&mut self, listener: impl Fn(&Theme) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&self) {
        debug!(
            "Theme changed to {} (notifying {} listeners)",
            self.theme.kind.label(),
            self.listeners.len()
        );
        for (_, listener) in &self.listeners {
            listener(&self.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_hex_color_parse_and_display() {
        let color: HexColor = "#0a84ff".parse().unwrap();
        assert_eq!(color, HexColor::rgb(0x0A, 0x84, 0xFF));
        assert_eq!(color.to_string(), "#0A84FF");
    }

    #[test]
    fn test_hex_color_rejects_bad_input() {
        assert!("0A84FF".parse::<HexColor>().is_err());
        assert!("#0A84F".parse::<HexColor>().is_err());
        assert!("#GGGGGG".parse::<HexColor>().is_err());
        assert!("#ÄÄÄ".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_hex_color_blend() {
        let white = HexColor::rgb(255, 255, 255);
        let black = HexColor::rgb(0, 0, 0);
        assert_eq!(white.blend(black, 1.0), white);
        assert_eq!(white.blend(black, 0.0), black);
        assert_eq!(white.blend(black, 0.5), HexColor::rgb(128, 128, 128));
    }

    #[test]
    fn test_overrides_deserialize_from_toml() {
        let overrides: ThemeColorOverrides = toml::from_str(
            r##"
primary = "#FF00FF"
text = "#101010"
"##,
        )
        .unwrap();
        assert_eq!(overrides.primary, Some(HexColor::rgb(0xFF, 0x00, 0xFF)));
        assert_eq!(overrides.text, Some(HexColor::rgb(0x10, 0x10, 0x10)));
        assert!(overrides.surface.is_none());
        assert!(!overrides.is_empty());
    }

    #[test]
    fn test_build_dark_with_scheme_accents() {
        let theme = Theme::build(ThemeType::Dark, ColorScheme::Purple);
        assert_eq!(theme.kind, ThemeType::Dark);
        assert_eq!(theme.colors.primary, hex(0xAF52DE));
        assert_eq!(theme.colors.background, DARK_COLORS.background);
        // Scheme accents replace the dark palette's own status colors
        assert_eq!(theme.colors.success, hex(0x34C759));
    }

    #[test]
    fn test_auto_uses_light_palette() {
        let theme = Theme::build(ThemeType::Auto, ColorScheme::Blue);
        assert_eq!(theme.kind, ThemeType::Auto);
        assert_eq!(theme.colors, LIGHT_COLORS);
    }

    #[test]
    fn test_custom_colors_keep_the_rest() {
        let mut manager = ThemeManager::new(Theme::dark());
        manager.set_custom_colors(&ThemeColorOverrides {
            primary: Some(hex(0x123456)),
            ..Default::default()
        });

        let theme = manager.theme();
        assert_eq!(theme.kind, ThemeType::Custom);
        assert_eq!(theme.colors.primary, hex(0x123456));
        assert_eq!(theme.colors.background, DARK_COLORS.background);
    }

    #[test]
    fn test_subscribers_are_notified_until_unsubscribed() {
        let mut manager = ThemeManager::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let id = manager.subscribe(move |theme| seen_clone.lock().unwrap().push(theme.kind));

        manager.set_theme_type(ThemeType::Dark, ColorScheme::Green);
        manager.set_theme(Theme::light());
        assert!(manager.unsubscribe(id));
        manager.set_theme_type(ThemeType::Dark, ColorScheme::Blue);

        assert_eq!(*seen.lock().unwrap(), vec![ThemeType::Dark, ThemeType::Light]);
        assert!(!manager.unsubscribe(id));
        assert_eq!(manager.listener_count(), 0);
        assert_eq!(manager.scheme(), ColorScheme::Blue);
    }

    #[test]
    fn test_theme_type_from_str() {
        assert_eq!(" Dark ".parse::<ThemeType>(), Ok(ThemeType::Dark));
        assert!("sepia".parse::<ThemeType>().is_err());
    }
}
