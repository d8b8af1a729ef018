//! Embroidery thread catalogs and nearest-thread matching.

use std::sync::LazyLock;

use serde::Serialize;

use crate::color::Color;
use crate::error::{PatternError, Result};

/// One thread in a catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub name: String,
    pub code: String,
    #[serde(rename = "hex")]
    pub color: Color,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, code: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            color,
        }
    }

    /// `"310 (Black)"`, the form shown next to a stitched cell.
    pub fn label(&self) -> String {
        format!("{} ({})", self.code, self.name)
    }
}

/// (name, code, hex) for the built-in DMC floss catalog, in display order.
const DMC_COLORS: &[(&str, &str, &str)] = &[
    ("White", "B5200", "#FFFFFF"),
    ("Snow White", "Blanc", "#F8F8F0"),
    ("Black", "310", "#000000"),
    ("Dark Brown", "3371", "#3F2D24"),
    ("Red", "321", "#C41E3A"),
    ("Dark Red", "498", "#8B1B1B"),
    ("Very Light Yellow", "3078", "#FFFFC2"),
    ("Yellow", "444", "#FFF200"),
    ("Light Orange", "3824", "#FFB07C"),
    ("Orange", "740", "#FF8000"),
    ("Dark Orange", "947", "#FC6C3F"),
    ("Light Peach", "948", "#FFE0C0"),
    ("Medium Peach", "754", "#FFD2B2"),
    ("Coral", "351", "#FE5A50"),
    ("Light Pink", "818", "#FFDDEE"),
    ("Pink", "604", "#FFB7D5"),
    ("Dark Pink", "602", "#E55B92"),
    ("Lavender", "554", "#BBA1D6"),
    ("Purple", "550", "#68377C"),
    ("Light Purple", "553", "#A767A0"),
    ("Sky Blue", "3843", "#00BFFF"),
    ("Very Light Blue", "775", "#BFDFFF"),
    ("Baby Blue", "3325", "#6EC8E5"),
    ("Blue", "797", "#003366"),
    ("Royal Blue", "796", "#232F65"),
    ("Navy", "939", "#252850"),
    ("Light Teal", "3846", "#00B2A9"),
    ("Teal", "959", "#4FC7B6"),
    ("Pale Aqua", "964", "#B9E6DF"),
    ("Green", "699", "#006442"),
    ("Light Green", "703", "#53B781"),
    ("Emerald Green", "910", "#007A3D"),
    ("Lime Green", "704", "#C4DF8A"),
    ("Light Olive Green", "3348", "#A3C586"),
    ("Olive Green", "936", "#455B23"),
    ("Light Brown", "437", "#BFA178"),
    ("Brown", "801", "#643A14"),
    ("Light Tan", "3770", "#FBE8D3"),
    ("Tan", "436", "#CDA36A"),
    ("Very Light Gray", "762", "#D9D9D9"),
    ("Light Gray", "415", "#B4B4B4"),
    ("Gray", "318", "#A0A0A0"),
    ("Dark Gray", "317", "#666666"),
    ("Ecru", "Ecru", "#F9F6ED"),
    ("Mustard", "3822", "#F2D471"),
    ("Light Gold", "728", "#FFD37F"),
    ("Dark Gold", "782", "#BB8E36"),
    ("Light Beige", "3866", "#E1D3C0"),
    ("Pale Peach", "3771", "#FFD1BB"),
    ("Rose", "335", "#D04B72"),
];

static DMC: LazyLock<Palette> = LazyLock::new(|| {
    let entries = DMC_COLORS
        .iter()
        .map(|&(name, code, hex)| {
            let color = Color::from_hex(hex).expect("built-in DMC hex values are valid");
            PaletteEntry::new(name, code, color)
        })
        .collect();
    Palette { entries }
});

/// A fixed, ordered, non-empty thread catalog.
///
/// Declaration order matters: [`Palette::nearest`] breaks distance ties in
/// favour of the earlier entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(PatternError::EmptyPalette);
        }
        Ok(Self { entries })
    }

    /// The built-in DMC catalog, decoded once per process.
    pub fn dmc() -> &'static Palette {
        &DMC
    }

    /// Build a palette from bare hex strings. Each entry's code is its hex.
    pub fn from_hex_list<S: AsRef<str>>(hex: &[S]) -> Result<Self> {
        let entries = hex
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let color = Color::from_hex(s.as_ref())?;
                Ok(PaletteEntry::new(format!("Custom {}", i + 1), color.to_hex(), color))
            })
            .collect::<Result<Vec<_>>>()?;
        Palette::new(entries)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Closest entry by Euclidean RGB distance; the first entry wins a tie.
    pub fn nearest(&self, sample: Color) -> &PaletteEntry {
        let mut best = &self.entries[0];
        let mut best_dist = u32::MAX;
        for entry in &self.entries {
            let d = sample.distance_sq(entry.color);
            if d < best_dist {
                best_dist = d;
                best = entry;
                if d == 0 {
                    break;
                }
            }
        }
        best
    }

    pub fn find_by_color(&self, color: Color) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.color == color)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.code.eq_ignore_ascii_case(code))
    }
}
