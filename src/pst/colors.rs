//! Colour naming for generated documents
//!
//! Every colour written into a document is referenced by name. Colours equal
//! to a PSTricks or `dvipsnames` colour use that name; any other colour gets a
//! minted `colourN` name and a `\definecolor` line in the picture preamble.

use crate::log::debug;
use crate::types::{fmt_num, Color};

/// PSTricks base colours.
const BASE_COLORS: &[(&str, Color)] = &[
    ("black", Color::BLACK),
    ("white", Color::WHITE),
    ("red", Color::RED),
    ("green", Color::GREEN),
    ("blue", Color::BLUE),
    ("cyan", Color::CYAN),
    ("magenta", Color::MAGENTA),
    ("yellow", Color::YELLOW),
    ("gray", Color::GRAY),
    ("lightgray", Color::LIGHT_GRAY),
    ("darkgray", Color::DARK_GRAY),
];

/// `dvipsnames` colours as CMYK, without the entries that repeat a base colour.
#[rustfmt::skip]
const DVIPS_COLORS: &[(&str, [f64; 4])] = &[
    ("GreenYellow",    [0.15, 0.0,  0.69, 0.0]),
    ("Goldenrod",      [0.0,  0.10, 0.84, 0.0]),
    ("Dandelion",      [0.0,  0.29, 0.84, 0.0]),
    ("Apricot",        [0.0,  0.32, 0.52, 0.0]),
    ("Peach",          [0.0,  0.50, 0.70, 0.0]),
    ("Melon",          [0.0,  0.46, 0.50, 0.0]),
    ("YellowOrange",   [0.0,  0.42, 1.0,  0.0]),
    ("Orange",         [0.0,  0.61, 0.87, 0.0]),
    ("BurntOrange",    [0.0,  0.51, 1.0,  0.0]),
    ("Bittersweet",    [0.0,  0.75, 1.0,  0.24]),
    ("RedOrange",      [0.0,  0.77, 0.87, 0.0]),
    ("Mahogany",       [0.0,  0.85, 0.87, 0.35]),
    ("Maroon",         [0.0,  0.87, 0.68, 0.32]),
    ("BrickRed",       [0.0,  0.89, 0.94, 0.28]),
    ("OrangeRed",      [0.0,  1.0,  0.50, 0.0]),
    ("RubineRed",      [0.0,  1.0,  0.13, 0.0]),
    ("WildStrawberry", [0.0,  0.96, 0.39, 0.0]),
    ("Salmon",         [0.0,  0.53, 0.38, 0.0]),
    ("CarnationPink",  [0.0,  0.63, 0.0,  0.0]),
    ("VioletRed",      [0.0,  0.81, 0.0,  0.0]),
    ("Rhodamine",      [0.0,  0.82, 0.0,  0.0]),
    ("Mulberry",       [0.34, 0.90, 0.0,  0.02]),
    ("RedViolet",      [0.07, 0.90, 0.0,  0.34]),
    ("Fuchsia",        [0.47, 0.91, 0.0,  0.08]),
    ("Lavender",       [0.0,  0.48, 0.0,  0.0]),
    ("Thistle",        [0.12, 0.59, 0.0,  0.0]),
    ("Orchid",         [0.32, 0.64, 0.0,  0.0]),
    ("DarkOrchid",     [0.40, 0.80, 0.20, 0.0]),
    ("Purple",         [0.45, 0.86, 0.0,  0.0]),
    ("Plum",           [0.50, 1.0,  0.0,  0.0]),
    ("Violet",         [0.79, 0.88, 0.0,  0.0]),
    ("RoyalPurple",    [0.75, 0.90, 0.0,  0.0]),
    ("BlueViolet",     [0.86, 0.91, 0.0,  0.04]),
    ("Periwinkle",     [0.57, 0.55, 0.0,  0.0]),
    ("CadetBlue",      [0.62, 0.57, 0.23, 0.0]),
    ("CornflowerBlue", [0.65, 0.13, 0.0,  0.0]),
    ("MidnightBlue",   [0.98, 0.13, 0.0,  0.43]),
    ("NavyBlue",       [0.94, 0.54, 0.0,  0.0]),
    ("RoyalBlue",      [1.0,  0.50, 0.0,  0.0]),
    ("Cerulean",       [0.94, 0.11, 0.0,  0.0]),
    ("ProcessBlue",    [0.96, 0.0,  0.0,  0.0]),
    ("SkyBlue",        [0.62, 0.0,  0.12, 0.0]),
    ("Turquoise",      [0.85, 0.0,  0.20, 0.0]),
    ("TealBlue",       [0.86, 0.0,  0.34, 0.02]),
    ("Aquamarine",     [0.82, 0.0,  0.30, 0.0]),
    ("BlueGreen",      [0.85, 0.0,  0.33, 0.0]),
    ("Emerald",        [1.0,  0.0,  0.50, 0.0]),
    ("JungleGreen",    [0.99, 0.0,  0.52, 0.0]),
    ("SeaGreen",       [0.69, 0.0,  0.50, 0.0]),
    ("ForestGreen",    [0.91, 0.0,  0.88, 0.12]),
    ("PineGreen",      [0.92, 0.0,  0.59, 0.25]),
    ("LimeGreen",      [0.50, 0.0,  1.0,  0.0]),
    ("YellowGreen",    [0.44, 0.0,  0.74, 0.0]),
    ("SpringGreen",    [0.26, 0.0,  0.76, 0.0]),
    ("OliveGreen",     [0.64, 0.0,  0.95, 0.40]),
    ("RawSienna",      [0.0,  0.72, 1.0,  0.45]),
    ("Sepia",          [0.0,  0.83, 1.0,  0.70]),
    ("Brown",          [0.0,  0.81, 1.0,  0.60]),
    ("Tan",            [0.14, 0.42, 0.56, 0.0]),
];

/// Prefix of minted colour names.
const USER_PREFIX: &str = "colour";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOrigin {
    /// Known to PSTricks, never defined in the document
    Predefined,
    /// Defined with `\definecolor` when used
    User,
}

/// A named colour. Stored opaque: opacity is emitted as a separate parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    pub name: String,
    pub color: Color,
    pub origin: ColorOrigin,
}

/// Maps colours to stable document names and tracks which names a generation
/// pass used.
#[derive(Debug, Clone)]
pub struct ColorRegistry {
    predefined: Vec<ColorEntry>,
    user: Vec<ColorEntry>,
    /// Names used since the last reset, in first-use order
    used: Vec<String>,
    counter: u32,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorRegistry {
    pub fn new() -> Self {
        let base = BASE_COLORS.iter().map(|&(name, color)| (name, color));
        let dvips = DVIPS_COLORS
            .iter()
            .map(|&(name, [c, m, y, k])| (name, Color::from_cmyk(c, m, y, k)));
        let predefined = base
            .chain(dvips)
            .map(|(name, color)| ColorEntry {
                name: name.to_string(),
                color,
                origin: ColorOrigin::Predefined,
            })
            .collect();

        Self { predefined, user: Vec::new(), used: Vec::new(), counter: 0 }
    }

    /// Name of `color` for this pass, minting a user colour if needed.
    ///
    /// Only RGB takes part in the lookup: colours differing only in alpha
    /// share a name, and distinct names always mean distinct RGB values.
    /// Opacity is written as its own parameter.
    pub fn resolve_name(&mut self, color: Color) -> String {
        let name = match self.lookup(color) {
            Some(entry) => entry.name.clone(),
            None => self.mint(color),
        };
        if !self.used.contains(&name) {
            self.used.push(name.clone());
        }
        name
    }

    /// Register a user colour under a chosen name.
    ///
    /// Returns `false` when the name is already taken.
    pub fn add_user_color(&mut self, name: &str, color: Color) -> bool {
        if self.is_taken(name) {
            return false;
        }
        self.user.push(ColorEntry {
            name: name.to_string(),
            color: color.opaque(),
            origin: ColorOrigin::User,
        });
        true
    }

    /// Start a new pass: forget which names were used. Colours persist.
    pub fn reset(&mut self) {
        self.used.clear();
    }

    pub fn used_names(&self) -> &[String] {
        &self.used
    }

    pub fn is_predefined(&self, name: &str) -> bool {
        self.predefined.iter().any(|e| e.name == name)
    }

    pub fn user_colors(&self) -> &[ColorEntry] {
        &self.user
    }

    /// `\definecolor` lines for the user colours used in this pass.
    pub fn definitions(&self) -> String {
        let mut out = String::new();
        for name in &self.used {
            if let Some(entry) = self.user.iter().find(|e| &e.name == name) {
                let [r, g, b] = entry.color.rgb_unit();
                out.push_str(&format!(
                    "\\definecolor{{{}}}{{rgb}}{{{},{},{}}}\n",
                    entry.name,
                    fmt_num(r),
                    fmt_num(g),
                    fmt_num(b)
                ));
            }
        }
        out
    }

    fn lookup(&self, color: Color) -> Option<&ColorEntry> {
        let color = color.opaque();
        self.predefined
            .iter()
            .chain(self.user.iter())
            .find(|e| e.color == color)
    }

    fn is_taken(&self, name: &str) -> bool {
        self.predefined.iter().chain(self.user.iter()).any(|e| e.name == name)
    }

    fn mint(&mut self, color: Color) -> String {
        let name = loop {
            self.counter += 1;
            let candidate = format!("{}{}", USER_PREFIX, self.counter);
            if !self.is_taken(&candidate) {
                break candidate;
            }
        };
        debug!(name = %name, color = %color, "new user colour");
        self.user.push(ColorEntry {
            name: name.clone(),
            color: color.opaque(),
            origin: ColorOrigin::User,
        });
        name
    }
}
