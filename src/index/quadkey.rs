use crate::error::MercatorError;
use crate::index::constants::MAX_ZOOM_LEVEL;
use crate::index::types::TileIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Converts between TMS and Google/XYZ tile rows.
///
/// The row origin moves between the bottom-left (TMS) and the top-left
/// (Google, OSM, Bing) of the world; the column is unchanged. Applying the
/// conversion twice returns the original tile.
///
/// # Example
/// ```
/// use mercator_tiles::{TileIndex, google_tile};
///
/// # fn main() -> Result<(), mercator_tiles::MercatorError> {
/// let tms = TileIndex::new(68, 85, 7)?;
/// let google = google_tile(tms);
/// assert_eq!((google.tx(), google.ty()), (68, 42));
/// assert_eq!(google_tile(google), tms);
/// # Ok(())
/// # }
/// ```
pub fn google_tile(tile: TileIndex) -> TileIndex {
    TileIndex {
        tx: tile.tx,
        ty: flip_row(tile.ty, tile.zoom),
        zoom: tile.zoom,
    }
}

// Callers guarantee `zoom <= MAX_ZOOM_LEVEL` and `ty < 2^zoom`.
fn flip_row(ty: u32, zoom: u8) -> u32 {
    (1u32 << zoom) - 1 - ty
}

/// Encodes a TMS tile as a Microsoft quadkey.
///
/// One digit per zoom level, most significant first. Each digit is
/// `x_bit + 2 * y_bit`, taken from the column and the Google (top-left
/// origin) row. Zoom 0 encodes as the empty string.
///
/// # Example
/// ```
/// use mercator_tiles::{TileIndex, quad_key};
///
/// # fn main() -> Result<(), mercator_tiles::MercatorError> {
/// assert_eq!(quad_key(TileIndex::new(68, 85, 7)?), "1202120");
/// # Ok(())
/// # }
/// ```
pub fn quad_key(tile: TileIndex) -> String {
    let ty = flip_row(tile.ty, tile.zoom);
    let mut key = String::with_capacity(tile.zoom as usize);

    for i in (1..=tile.zoom).rev() {
        let mask = 1u32 << (i - 1);
        let mut digit = 0u8;
        if tile.tx & mask != 0 {
            digit += 1;
        }
        if ty & mask != 0 {
            digit += 2;
        }
        key.push(char::from(b'0' + digit));
    }
    key
}

/// Decodes a quadkey back to its TMS tile; the zoom is the key length.
///
/// # Errors
///
/// - [`MercatorError::InvalidQuadKey`] - a character outside '0'-'3', or a
///   key longer than `MAX_ZOOM_LEVEL`
pub fn quad_key_to_tile(quad_key: &str) -> Result<TileIndex, MercatorError> {
    let len = quad_key.len();
    if len > MAX_ZOOM_LEVEL as usize {
        return Err(MercatorError::InvalidQuadKey(quad_key.to_string()));
    }
    let zoom = len as u8;

    let mut tx = 0u32;
    let mut ty = 0u32;
    for (i, c) in quad_key.bytes().enumerate() {
        let mask = 1u32 << (len - 1 - i);
        match c {
            b'0' => {}
            b'1' => tx |= mask,
            b'2' => ty |= mask,
            b'3' => {
                tx |= mask;
                ty |= mask;
            }
            _ => return Err(MercatorError::InvalidQuadKey(quad_key.to_string())),
        }
    }

    TileIndex::new(tx, flip_row(ty, zoom), zoom)
}

/// A validated quadkey string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuadKey(String);

impl QuadKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn zoom(&self) -> u8 {
        self.0.len() as u8
    }

    pub fn to_tile(&self) -> Result<TileIndex, MercatorError> {
        quad_key_to_tile(&self.0)
    }

    /// The quadkey of the enclosing tile one level up, `None` at zoom 0.
    pub fn parent(&self) -> Option<QuadKey> {
        if self.0.is_empty() {
            return None;
        }
        Some(QuadKey(self.0[..self.0.len() - 1].to_string()))
    }

    /// True when `other` lies inside this key's tile (or is the same tile).
    pub fn contains(&self, other: &QuadKey) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl From<TileIndex> for QuadKey {
    fn from(tile: TileIndex) -> Self {
        QuadKey(quad_key(tile))
    }
}

impl FromStr for QuadKey {
    type Err = MercatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        quad_key_to_tile(s)?;
        Ok(QuadKey(s.to_string()))
    }
}

impl TryFrom<String> for QuadKey {
    type Error = MercatorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        quad_key_to_tile(&s)?;
        Ok(QuadKey(s))
    }
}

impl From<QuadKey> for String {
    fn from(key: QuadKey) -> Self {
        key.0
    }
}

impl fmt::Display for QuadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
