//! # Cards
//!
//! One configuration struct for every card flavour. The variant only
//! changes the visual parameters computed by [`appearance`]; content and
//! behaviour are identical.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::theme::{HexColor, Theme};

pub const DEFAULT_ELEVATION: u8 = 5;
const GLASS_OPACITY: f32 = 0.6;
const SHADOW_OPACITY: f32 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CardVariant {
    #[default]
    Elevated,
    Outlined,
    Filled,
    Gradient,
    Glass,
}

impl CardVariant {
    pub fn label(self) -> &'static str {
        match self {
            CardVariant::Elevated => "elevated",
            CardVariant::Outlined => "outlined",
            CardVariant::Filled => "filled",
            CardVariant::Gradient => "gradient",
            CardVariant::Glass => "glass",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    pub variant: CardVariant,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Replaces the variant's default background (not used by gradient or glass).
    pub background: Option<HexColor>,
    pub elevation: u8,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            variant: CardVariant::default(),
            title: None,
            subtitle: None,
            background: None,
            elevation: DEFAULT_ELEVATION,
        }
    }
}

impl CardConfig {
    pub fn with_text(&self, title: Option<String>, subtitle: Option<String>) -> Self {
        Self {
            title,
            subtitle,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub color: HexColor,
    pub width: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: HexColor,
    pub radius: u8,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub from: HexColor,
    pub to: HexColor,
}

/// Everything a renderer needs to draw a card's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardAppearance {
    pub background: HexColor,
    pub border: Option<Border>,
    pub shadow: Option<Shadow>,
    pub gradient: Option<Gradient>,
    /// Opacity of `background`; below 1.0 the backdrop shows through.
    pub opacity: f32,
}

impl CardAppearance {
    /// The background as it ends up on screen over `backdrop`.
    pub fn effective_background(&self, backdrop: HexColor) -> HexColor {
        self.background.blend(backdrop, self.opacity)
    }
}

pub fn appearance(config: &CardConfig, theme: &Theme) -> CardAppearance {
    let colors = &theme.colors;
    let shadow = (config.elevation > 0).then_some(Shadow {
        color: colors.shadow,
        radius: config.elevation,
        opacity: SHADOW_OPACITY,
    });
    let outline = Some(Border {
        color: colors.border,
        width: 1,
    });

    match config.variant {
        CardVariant::Elevated => CardAppearance {
            background: config.background.unwrap_or(colors.surface),
            border: None,
            shadow,
            gradient: None,
            opacity: 1.0,
        },
        CardVariant::Outlined => CardAppearance {
            background: config.background.unwrap_or(colors.background),
            border: outline,
            shadow: None,
            gradient: None,
            opacity: 1.0,
        },
        CardVariant::Filled => CardAppearance {
            background: config.background.unwrap_or(colors.surface),
            border: None,
            shadow: None,
            gradient: None,
            opacity: 1.0,
        },
        CardVariant::Gradient => CardAppearance {
            background: colors.primary,
            border: None,
            shadow,
            gradient: Some(Gradient {
                from: colors.primary,
                to: colors.secondary,
            }),
            opacity: 1.0,
        },
        CardVariant::Glass => CardAppearance {
            background: colors.surface,
            border: outline,
            shadow: None,
            gradient: None,
            opacity: GLASS_OPACITY,
        },
    }
}
