use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub cards: CardConfig,
    #[serde(default)]
    pub direction: DirectionConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub navbar: NavbarConfig,
    #[serde(default)]
    pub parallax: ParallaxConfig,
    #[serde(default)]
    pub glitch: GlitchConfig,
    #[serde(default)]
    pub startup: StartupConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

/// Scroll-reveal animations for section content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Elements matching any of these selectors are observed
    #[serde(default = "default_reveal_selectors")]
    pub selectors: Vec<String>,
    /// Ratio above which an intersecting element is shown
    #[serde(default = "default_show_ratio")]
    pub show_ratio: f64,
    /// Ratio below which an element is hidden
    #[serde(default = "default_hide_ratio")]
    pub hide_ratio: f64,
    #[serde(default = "default_show_delay")]
    pub show_delay_ms: u64,
    #[serde(default = "default_hide_delay")]
    pub hide_delay_ms: u64,
    /// Vertical margin added to the viewport before intersecting
    #[serde(default = "default_reveal_margin")]
    pub root_margin_px: f64,
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: default_reveal_selectors(),
            show_ratio: default_show_ratio(),
            hide_ratio: default_hide_ratio(),
            show_delay_ms: default_show_delay(),
            hide_delay_ms: default_hide_delay(),
            root_margin_px: default_reveal_margin(),
            thresholds: default_thresholds(),
        }
    }
}

/// Staggered reveal for certificate cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(default = "default_card_selector")]
    pub selector: String,
    /// Show delay for the first card of a batch
    #[serde(default = "default_card_base_delay")]
    pub base_delay_ms: u64,
    /// Extra show delay per position in the batch
    #[serde(default = "default_card_stagger")]
    pub stagger_ms: u64,
    #[serde(default = "default_card_hide_delay")]
    pub hide_delay_ms: u64,
    #[serde(default = "default_card_margin")]
    pub root_margin_px: f64,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            selector: default_card_selector(),
            base_delay_ms: default_card_base_delay(),
            stagger_ms: default_card_stagger(),
            hide_delay_ms: default_card_hide_delay(),
            root_margin_px: default_card_margin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionConfig {
    /// Quiet period before the scroll direction is recomputed
    #[serde(default = "default_direction_debounce")]
    pub debounce_ms: u64,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_direction_debounce(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Periodic rescan interval
    #[serde(default = "default_overlay_interval")]
    pub interval_ms: u64,
    /// Delay after a structural change before rescanning
    #[serde(default = "default_overlay_settle")]
    pub settle_ms: u64,
    /// Selectors to hide
    #[serde(default = "default_overlay_selectors")]
    pub selectors: Vec<String>,
    /// Attributes removed rather than hidden when a selector is exactly
    /// `[name]` or `*[name]` for one of them
    #[serde(default = "default_strip_attributes")]
    pub strip_attributes: Vec<String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_overlay_interval(),
            settle_ms: default_overlay_settle(),
            selectors: default_overlay_selectors(),
            strip_attributes: default_strip_attributes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavbarConfig {
    #[serde(default = "default_navbar_selector")]
    pub selector: String,
    /// Scroll offset past which the scrolled style applies
    #[serde(default = "default_navbar_threshold")]
    pub threshold_px: f64,
    #[serde(default = "default_navbar_scrolled_background")]
    pub scrolled_background: String,
    #[serde(default = "default_navbar_scrolled_border")]
    pub scrolled_border: String,
    #[serde(default = "default_navbar_top_background")]
    pub top_background: String,
    #[serde(default = "default_navbar_top_border")]
    pub top_border: String,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            selector: default_navbar_selector(),
            threshold_px: default_navbar_threshold(),
            scrolled_background: default_navbar_scrolled_background(),
            scrolled_border: default_navbar_scrolled_border(),
            top_background: default_navbar_top_background(),
            top_border: default_navbar_top_border(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxConfig {
    #[serde(default = "default_parallax_selector")]
    pub selector: String,
    /// Speed increment per shape index
    #[serde(default = "default_speed_step")]
    pub speed_step: f64,
    /// Degrees of rotation per pixel of horizontal offset
    #[serde(default = "default_rotate_factor")]
    pub rotate_factor: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            selector: default_parallax_selector(),
            speed_step: default_speed_step(),
            rotate_factor: default_rotate_factor(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlitchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_glitch_selector")]
    pub selector: String,
    #[serde(default = "default_glitch_interval")]
    pub interval_ms: u64,
    /// How long the glitched shadow stays before it is reset
    #[serde(default = "default_glitch_reset")]
    pub reset_ms: u64,
    #[serde(default = "default_glitch_offset")]
    pub max_offset_px: f64,
    /// Fixed RNG seed; random when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            selector: default_glitch_selector(),
            interval_ms: default_glitch_interval(),
            reset_ms: default_glitch_reset(),
            max_offset_px: default_glitch_offset(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupConfig {
    /// Delay before the body fades in
    #[serde(default = "default_fade_delay")]
    pub fade_delay_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            fade_delay_ms: default_fade_delay(),
        }
    }
}

/// Easing curve used by smooth anchor scrolling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate anchor navigation instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Frames per second while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("neonfolio")
}

fn default_true() -> bool {
    true
}

fn default_reveal_selectors() -> Vec<String> {
    [".fade-in", ".slide-in-left", ".slide-in-right", ".scale-in"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_show_ratio() -> f64 {
    0.2
}

fn default_hide_ratio() -> f64 {
    0.05
}

fn default_show_delay() -> u64 {
    50
}

fn default_hide_delay() -> u64 {
    100
}

fn default_reveal_margin() -> f64 {
    100.0
}

fn default_thresholds() -> Vec<f64> {
    vec![0.0, 0.05, 0.1, 0.2, 0.3, 0.5]
}

fn default_card_selector() -> String {
    ".cert-card".to_string()
}

fn default_card_base_delay() -> u64 {
    100
}

fn default_card_stagger() -> u64 {
    150
}

fn default_card_hide_delay() -> u64 {
    150
}

fn default_card_margin() -> f64 {
    80.0
}

fn default_direction_debounce() -> u64 {
    10
}

fn default_overlay_interval() -> u64 {
    1000
}

fn default_overlay_settle() -> u64 {
    100
}

fn default_overlay_selectors() -> Vec<String> {
    [
        "[role=\"tooltip\"]",
        "[data-tooltip]",
        ".tooltip",
        ".shortcut-overlay",
        ".accessibility-overlay",
        ".browser-shortcut",
        "*[title]",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_strip_attributes() -> Vec<String> {
    vec!["title".to_string()]
}

fn default_navbar_selector() -> String {
    ".navbar".to_string()
}

fn default_navbar_threshold() -> f64 {
    50.0
}

fn default_navbar_scrolled_background() -> String {
    "rgba(10, 10, 10, 0.98)".to_string()
}

fn default_navbar_scrolled_border() -> String {
    "2px solid var(--primary-neon)".to_string()
}

fn default_navbar_top_background() -> String {
    "rgba(10, 10, 10, 0.95)".to_string()
}

fn default_navbar_top_border() -> String {
    "1px solid var(--border-glow)".to_string()
}

fn default_parallax_selector() -> String {
    ".floating-shapes .shape".to_string()
}

fn default_speed_step() -> f64 {
    0.01
}

fn default_rotate_factor() -> f64 {
    0.1
}

fn default_glitch_selector() -> String {
    ".hero-content h1".to_string()
}

fn default_glitch_interval() -> u64 {
    3000
}

fn default_glitch_reset() -> u64 {
    100
}

fn default_glitch_offset() -> f64 {
    10.0
}

fn default_fade_delay() -> u64 {
    100
}

fn default_animation_duration() -> u64 {
    600
}

fn default_animation_fps() -> u32 {
    60
}

fn default_tick_rate() -> u64 {
    100
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate a configuration file at an explicit path
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Render the configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/neonfolio/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("neonfolio")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Reject settings that would break the reveal hysteresis or stall timers
    pub fn validate(&self) -> crate::Result<()> {
        let ratios = [self.reveal.show_ratio, self.reveal.hide_ratio];
        if ratios.iter().any(|r| !(0.0..=1.0).contains(r)) {
            return Err(crate::Error::Config(
                "reveal ratios must be within [0, 1]".to_string(),
            ));
        }
        if self.reveal.hide_ratio >= self.reveal.show_ratio {
            return Err(crate::Error::Config(format!(
                "reveal.hide_ratio ({}) must be below reveal.show_ratio ({})",
                self.reveal.hide_ratio, self.reveal.show_ratio
            )));
        }
        let lengths = [
            ("reveal.root_margin_px", self.reveal.root_margin_px),
            ("cards.root_margin_px", self.cards.root_margin_px),
            ("glitch.max_offset_px", self.glitch.max_offset_px),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::Error::Config(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }
        if self
            .reveal
            .thresholds
            .iter()
            .any(|t| !t.is_finite() || !(0.0..=1.0).contains(t))
        {
            return Err(crate::Error::Config(
                "reveal.thresholds must be within [0, 1]".to_string(),
            ));
        }
        if self.overlay.interval_ms == 0 {
            return Err(crate::Error::Config(
                "overlay.interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.glitch.enabled && self.glitch.interval_ms == 0 {
            return Err(crate::Error::Config(
                "glitch.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
