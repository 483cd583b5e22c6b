//! Named color schemes used by `color_mode = "scheme"`.

use crate::foundation::core::Rgb8;

const fn c(r: u8, g: u8, b: u8) -> Rgb8 {
    Rgb8::new(r, g, b)
}

static SCHEMES: &[(&str, &[Rgb8])] = &[
    (
        "pastel",
        &[
            c(255, 179, 186),
            c(255, 223, 186),
            c(255, 255, 186),
            c(186, 255, 201),
            c(186, 225, 255),
        ],
    ),
    (
        "neon",
        &[
            c(255, 0, 255),
            c(0, 255, 255),
            c(57, 255, 20),
            c(255, 255, 0),
            c(255, 20, 147),
        ],
    ),
    (
        "earth",
        &[
            c(139, 69, 19),
            c(160, 82, 45),
            c(205, 133, 63),
            c(222, 184, 135),
            c(85, 107, 47),
        ],
    ),
    (
        "ocean",
        &[
            c(0, 105, 148),
            c(0, 154, 206),
            c(72, 202, 228),
            c(144, 224, 239),
            c(202, 240, 248),
        ],
    ),
    (
        "sunset",
        &[
            c(255, 94, 77),
            c(255, 154, 0),
            c(255, 206, 84),
            c(237, 117, 57),
            c(95, 39, 205),
        ],
    ),
    (
        "forest",
        &[
            c(34, 139, 34),
            c(0, 100, 0),
            c(107, 142, 35),
            c(85, 107, 47),
            c(143, 188, 143),
        ],
    ),
    (
        "monochrome",
        &[
            c(0, 0, 0),
            c(64, 64, 64),
            c(128, 128, 128),
            c(192, 192, 192),
            c(240, 240, 240),
        ],
    ),
    (
        "retro",
        &[
            c(239, 71, 111),
            c(255, 209, 102),
            c(6, 214, 160),
            c(17, 138, 178),
            c(7, 59, 76),
        ],
    ),
];

/// Single-entry palette used when a scheme name is unknown.
pub static FALLBACK_SCHEME: &[Rgb8] = &[Rgb8::MID_GRAY];

/// Colors of the named scheme (case-insensitive), or `None` when unknown.
pub fn scheme(name: &str) -> Option<&'static [Rgb8]> {
    let name = name.trim();
    SCHEMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, colors)| *colors)
}

/// Colors of the named scheme, or [`FALLBACK_SCHEME`] (mid-gray) when unknown.
pub fn scheme_or_gray(name: &str) -> &'static [Rgb8] {
    scheme(name).unwrap_or_else(|| {
        tracing::warn!(scheme = name, "unknown color scheme, using mid-gray");
        FALLBACK_SCHEME
    })
}

pub fn scheme_names() -> impl Iterator<Item = &'static str> {
    SCHEMES.iter().map(|(n, _)| *n)
}

#[cfg(test)]
#[path = "../../tests/unit/resources/palette.rs"]
mod tests;
