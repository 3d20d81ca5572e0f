//! The 24-key harmonic wheel.
//!
//! Every key is reachable by four notations: standard (`Amin`), short (`Am`),
//! Camelot (`8A`) and Open Key (`1m`). Two keys mix well when they are equal,
//! relative (same wheel position, opposite mode), or one step apart on the
//! wheel.
//!
//! ```
//! use autotracks::key;
//!
//! let a_minor = key::lookup("8A")?;
//! assert_eq!(a_minor, key::lookup("Am")?);
//! assert!(key::is_neighbour(&a_minor, &key::lookup("Cmaj")?));
//! # Ok::<(), autotracks::error::InvalidNotation>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InvalidNotation;

/// One point on the harmonic wheel.
///
/// Keys are static data: copy them freely, compare them by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub standard: &'static str,
    pub short: &'static str,
    pub camelot: &'static str,
    pub open_key: &'static str,
    relative: usize,
    previous: usize,
    next: usize,
}

impl Key {
    const fn new(
        standard: &'static str,
        short: &'static str,
        camelot: &'static str,
        open_key: &'static str,
        links: (usize, usize, usize),
    ) -> Self {
        Self {
            standard,
            short,
            camelot,
            open_key,
            relative: links.0,
            previous: links.1,
            next: links.2,
        }
    }

    /// Same wheel position, opposite mode.
    #[must_use]
    pub fn relative(&self) -> Key {
        KEYS[self.relative]
    }

    /// One step counter-clockwise (wraps 1 -> 12).
    #[must_use]
    pub fn previous(&self) -> Key {
        KEYS[self.previous]
    }

    /// One step clockwise (wraps 12 -> 1).
    #[must_use]
    pub fn next(&self) -> Key {
        KEYS[self.next]
    }

    /// All four notations, in standard/short/Camelot/Open Key order.
    #[must_use]
    pub const fn notations(&self) -> [&'static str; 4] {
        [self.standard, self.short, self.camelot, self.open_key]
    }

    #[must_use]
    pub fn is_minor(&self) -> bool {
        self.camelot.ends_with('A')
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.standard)
    }
}

impl FromStr for Key {
    type Err = InvalidNotation;

    fn from_str(notation: &str) -> Result<Self, Self::Err> {
        lookup(notation)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.standard)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let notation = String::deserialize(deserializer)?;
        lookup(&notation).map_err(serde::de::Error::custom)
    }
}

// Wheel indices into `KEYS`.
const AMIN: usize = 0;
const EMIN: usize = 1;
const BMIN: usize = 2;
const FSMIN: usize = 3;
const CSMIN: usize = 4;
const GSMIN: usize = 5;
const DSMIN: usize = 6;
const ASMIN: usize = 7;
const FMIN: usize = 8;
const CMIN: usize = 9;
const GMIN: usize = 10;
const DMIN: usize = 11;
const CMAJ: usize = 12;
const GMAJ: usize = 13;
const DMAJ: usize = 14;
const AMAJ: usize = 15;
const EMAJ: usize = 16;
const BMAJ: usize = 17;
const FSMAJ: usize = 18;
const CSMAJ: usize = 19;
const GSMAJ: usize = 20;
const DSMAJ: usize = 21;
const ASMAJ: usize = 22;
const FMAJ: usize = 23;

/// All 24 keys. Links are `(relative, previous, next)`; adjacent positions
/// are a perfect fifth apart. The Camelot/Open Key numbering is convention,
/// so the table is written out rather than computed.
pub const KEYS: [Key; 24] = [
    // Minor keys
    Key::new("Amin", "Am", "8A", "1m", (CMAJ, DMIN, EMIN)),
    Key::new("Emin", "Em", "9A", "2m", (GMAJ, AMIN, BMIN)),
    Key::new("Bmin", "Bm", "10A", "3m", (DMAJ, EMIN, FSMIN)),
    Key::new("F#min", "F#m", "11A", "4m", (AMAJ, BMIN, CSMIN)),
    Key::new("C#min", "C#m", "12A", "5m", (EMAJ, FSMIN, GSMIN)),
    Key::new("G#min", "G#m", "1A", "6m", (BMAJ, CSMIN, DSMIN)),
    Key::new("D#min", "D#m", "2A", "7m", (FSMAJ, GSMIN, ASMIN)),
    Key::new("A#min", "A#m", "3A", "8m", (CSMAJ, DSMIN, FMIN)),
    Key::new("Fmin", "Fm", "4A", "9m", (GSMAJ, ASMIN, CMIN)),
    Key::new("Cmin", "Cm", "5A", "10m", (DSMAJ, FMIN, GMIN)),
    Key::new("Gmin", "Gm", "6A", "11m", (ASMAJ, CMIN, DMIN)),
    Key::new("Dmin", "Dm", "7A", "12m", (FMAJ, GMIN, AMIN)),
    // Major keys
    Key::new("Cmaj", "C", "8B", "1d", (AMIN, FMAJ, GMAJ)),
    Key::new("Gmaj", "G", "9B", "2d", (EMIN, CMAJ, DMAJ)),
    Key::new("Dmaj", "D", "10B", "3d", (BMIN, GMAJ, AMAJ)),
    Key::new("Amaj", "A", "11B", "4d", (FSMIN, DMAJ, EMAJ)),
    Key::new("Emaj", "E", "12B", "5d", (CSMIN, AMAJ, BMAJ)),
    Key::new("Bmaj", "B", "1B", "6d", (GSMIN, EMAJ, FSMAJ)),
    Key::new("F#maj", "F#", "2B", "7d", (DSMIN, BMAJ, CSMAJ)),
    Key::new("C#maj", "C#", "3B", "8d", (ASMIN, FSMAJ, GSMAJ)),
    Key::new("G#maj", "G#", "4B", "9d", (FMIN, CSMAJ, DSMAJ)),
    Key::new("D#maj", "D#", "5B", "10d", (CMIN, GSMAJ, ASMAJ)),
    Key::new("A#maj", "A#", "6B", "11d", (GMIN, DSMAJ, FMAJ)),
    Key::new("Fmaj", "F", "7B", "12d", (DMIN, ASMAJ, CMAJ)),
];

/// Root spellings tried when a notation misses the table, in order.
/// The first matching prefix is replaced once.
const ENHARMONIC_EQUIVALENTS: [(&str, &str); 10] = [
    // Flats to sharps
    ("Gb", "F#"),
    ("Db", "C#"),
    ("Ab", "G#"),
    ("Eb", "D#"),
    ("Bb", "A#"),
    // Sharps to flats
    ("F#", "Gb"),
    ("C#", "Db"),
    ("G#", "Ab"),
    ("D#", "Eb"),
    ("A#", "Bb"),
];

lazy_static::lazy_static! {
    /// Every notation of every key, 4 x 24 entries.
    static ref KEY_LOOKUP: HashMap<&'static str, Key> = KEYS
        .iter()
        .flat_map(|key| key.notations().map(|notation| (notation, *key)))
        .collect();
}

/// Respell the root of `notation` with its enharmonic equivalent, if any.
fn respell(notation: &str) -> Option<String> {
    ENHARMONIC_EQUIVALENTS
        .iter()
        .find(|(original, _)| notation.starts_with(*original))
        .map(|(original, equivalent)| notation.replacen(*original, equivalent, 1))
}

/// Look up a key by any supported notation.
///
/// The literal spelling is tried first, then its enharmonic respelling, so
/// `Bbmin`, `A#min`, `A#m`, `3A` and `8m` all resolve to the same key.
///
/// # Errors
///
/// Returns [`InvalidNotation`] when neither spelling is in the table.
pub fn lookup(notation: &str) -> Result<Key, InvalidNotation> {
    if let Some(key) = KEY_LOOKUP.get(notation) {
        return Ok(*key);
    }

    respell(notation)
        .and_then(|respelled| KEY_LOOKUP.get(respelled.as_str()).copied())
        .ok_or_else(|| InvalidNotation(notation.to_string()))
}

#[must_use]
pub fn is_valid_notation(notation: &str) -> bool {
    lookup(notation).is_ok()
}

/// The three keys that mix with `key`: `(relative, previous, next)`.
#[must_use]
pub fn compatible_keys(key: &Key) -> (Key, Key, Key) {
    (key.relative(), key.previous(), key.next())
}

/// True when `b` equals `a` or is one of its compatible keys.
///
/// Symmetric: previous/next are inverse across adjacent positions and the
/// relative link is its own inverse.
#[must_use]
pub fn is_neighbour(a: &Key, b: &Key) -> bool {
    let (relative, previous, next) = compatible_keys(a);
    a == b || *b == relative || *b == previous || *b == next
}

/// Neighbour test on raw notations. An unrecognised notation on either side
/// is never a neighbour.
#[must_use]
pub fn are_compatible(a: &str, b: &str) -> bool {
    match (lookup(a), lookup(b)) {
        (Ok(a), Ok(b)) => is_neighbour(&a, &b),
        _ => false,
    }
}
