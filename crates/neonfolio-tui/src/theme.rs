use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Neon palette, mirroring the page's CSS variables
    pub primary_neon: Color,
    pub secondary_neon: Color,
    pub accent_neon: Color,
    pub border_glow: Color,

    // Semantic colors
    pub visible: Color,
    pub hidden: Color,
    pub pending: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::cyber()
    }
}

impl Theme {
    /// Dark background with cyan/magenta neon
    pub fn cyber() -> Self {
        Self {
            bg0: Color::Rgb(0x0a, 0x0a, 0x0a),
            bg1: Color::Rgb(0x12, 0x12, 0x1a),
            bg2: Color::Rgb(0x1e, 0x1e, 0x2a),
            fg0: Color::Rgb(0xe0, 0xe0, 0xe0),
            fg1: Color::Rgb(0xff, 0xff, 0xff),
            grey0: Color::Rgb(0x55, 0x55, 0x66),
            grey1: Color::Rgb(0x88, 0x88, 0x99),
            primary_neon: Color::Rgb(0x00, 0xff, 0xff),
            secondary_neon: Color::Rgb(0xff, 0x00, 0xff),
            accent_neon: Color::Rgb(0x39, 0xff, 0x14),
            border_glow: Color::Rgb(0x00, 0x80, 0x80),
            visible: Color::Rgb(0x39, 0xff, 0x14),
            hidden: Color::Rgb(0x55, 0x55, 0x66),
            pending: Color::Rgb(0xff, 0xd7, 0x00),
            error: Color::Rgb(0xff, 0x33, 0x66),
            success: Color::Rgb(0x39, 0xff, 0x14),
            warning: Color::Rgb(0xff, 0xa5, 0x00),
            info: Color::Rgb(0x00, 0xbf, 0xff),
        }
    }
}
