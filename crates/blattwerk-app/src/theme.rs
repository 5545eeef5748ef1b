// SPDX-License-Identifier: MIT
//
// Presentation-only colour palettes for the light and dark themes.

/// Colours used by the conversion form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub page_bg: &'static str,
    pub card_bg: &'static str,
    pub text: &'static str,
    pub subtext: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub drop_bg: &'static str,
    pub drop_active_bg: &'static str,
    pub tile_bg: &'static str,
    pub bar_track: &'static str,
}

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                page_bg: "#111827",
                card_bg: "#1f2937",
                text: "#f9fafb",
                subtext: "#d1d5db",
                border: "#4b5563",
                accent: "#2563eb",
                drop_bg: "#374151",
                drop_active_bg: "#1e3a8a",
                tile_bg: "#374151",
                bar_track: "#374151",
            }
        } else {
            Self {
                page_bg: "#f3f4f6",
                card_bg: "#ffffff",
                text: "#1f2937",
                subtext: "#4b5563",
                border: "#d1d5db",
                accent: "#3b82f6",
                drop_bg: "#ffffff",
                drop_active_bg: "#eff6ff",
                tile_bg: "#f3f4f6",
                bar_track: "#e5e7eb",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_differ() {
        assert_ne!(Palette::for_mode(true), Palette::for_mode(false));
    }
}
