use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Publication color scheme
// ---------------------------------------------------------------------------
// The figures use a fixed set of named web colors; values are the CSS ones.

pub const BLACK: Color32 = Color32::from_rgb(0, 0, 0);
pub const ORANGE: Color32 = Color32::from_rgb(255, 165, 0);
pub const YELLOW: Color32 = Color32::from_rgb(255, 255, 0);
pub const LIGHT_GREEN: Color32 = Color32::from_rgb(144, 238, 144);
pub const DARK_BLUE: Color32 = Color32::from_rgb(0, 0, 139);
pub const MEDIUM_TURQUOISE: Color32 = Color32::from_rgb(72, 209, 204);
pub const CORNFLOWER_BLUE: Color32 = Color32::from_rgb(100, 149, 237);
pub const RED: Color32 = Color32::from_rgb(255, 0, 0);
pub const MEDIUM_SEA_GREEN: Color32 = Color32::from_rgb(60, 179, 113);

/// Translucent version of a line color, used to shade quantile and
/// confidence bands.
pub fn band_fill(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 60)
}
