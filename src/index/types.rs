use crate::coord::GeoPoint;
use crate::error::MercatorError;
use crate::geom::bounds_to_polygon;
use crate::index::constants::MAX_ZOOM_LEVEL;
use geo_types::{Polygon, Rect, coord};
use serde::{Deserialize, Serialize};

/// A tile in the TMS pyramid (origin at the bottom-left of the world).
///
/// Google/XYZ indices share this type; see [`crate::google_tile`].
///
/// Every value satisfies `zoom <= MAX_ZOOM_LEVEL` and `tx, ty < 2^zoom`; the
/// fields are read through accessors and deserialization goes through
/// [`TileIndex::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTileIndex")]
pub struct TileIndex {
    pub(crate) tx: u32,
    pub(crate) ty: u32,
    pub(crate) zoom: u8,
}

#[derive(Deserialize)]
struct RawTileIndex {
    tx: u32,
    ty: u32,
    zoom: u8,
}

impl TryFrom<RawTileIndex> for TileIndex {
    type Error = MercatorError;

    fn try_from(raw: RawTileIndex) -> Result<Self, Self::Error> {
        TileIndex::new(raw.tx, raw.ty, raw.zoom)
    }
}

impl TileIndex {
    /// Creates a tile index, checking `zoom <= MAX_ZOOM_LEVEL` and `tx, ty < 2^zoom`.
    ///
    /// # Example
    /// ```
    /// use mercator_tiles::TileIndex;
    ///
    /// assert!(TileIndex::new(68, 85, 7).is_ok());
    /// assert!(TileIndex::new(128, 0, 7).is_err());
    /// ```
    pub fn new(tx: u32, ty: u32, zoom: u8) -> Result<Self, MercatorError> {
        let side = tiles_per_side(zoom)?;
        if tx as u64 >= side || ty as u64 >= side {
            return Err(MercatorError::TileOutOfRange {
                tx: tx as i64,
                ty: ty as i64,
                zoom,
            });
        }
        Ok(Self { tx, ty, zoom })
    }

    /// Column, counted from the west edge.
    pub fn tx(&self) -> u32 {
        self.tx
    }

    /// Row, counted from the south edge (TMS).
    pub fn ty(&self) -> u32 {
        self.ty
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The tile one level up that contains this one, `None` at zoom 0.
    pub fn parent(&self) -> Option<Self> {
        if self.zoom == 0 {
            return None;
        }
        Some(Self {
            tx: self.tx >> 1,
            ty: self.ty >> 1,
            zoom: self.zoom - 1,
        })
    }

    /// The four tiles one level down, in quadkey digit order.
    pub fn children(&self) -> Result<[Self; 4], MercatorError> {
        let zoom = self.zoom + 1;
        if zoom > MAX_ZOOM_LEVEL {
            return Err(MercatorError::InvalidZoomLevel(zoom));
        }
        let (x, y) = (self.tx << 1, self.ty << 1);
        // TMS rows grow northwards, quadkey rows southwards
        Ok([
            Self { tx: x, ty: y + 1, zoom },
            Self { tx: x + 1, ty: y + 1, zoom },
            Self { tx: x, ty: y, zoom },
            Self { tx: x + 1, ty: y, zoom },
        ])
    }
}

/// Number of tiles along one axis at `zoom`.
pub(crate) fn tiles_per_side(zoom: u8) -> Result<u64, MercatorError> {
    if zoom > MAX_ZOOM_LEVEL {
        return Err(MercatorError::InvalidZoomLevel(zoom));
    }
    Ok(1u64 << zoom)
}

/// Bounding box in Spherical Mercator meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsMeters {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl BoundsMeters {
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self {
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.minx, y: self.miny },
            coord! { x: self.maxx, y: self.maxy },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        bounds_to_polygon(self.minx, self.miny, self.maxx, self.maxy)
    }
}

/// Bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsGeo {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundsGeo {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    pub fn from_rect(rect: &Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        bounds_to_polygon(self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lon >= self.min_lon
            && point.lon <= self.max_lon
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }
}

/// Result of fitting an extent into a viewport.
///
/// `zoom` is fractional; [`ZoomAndCenter::zoom_level`] gives the tile zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomAndCenter {
    pub zoom: f64,
    pub center: GeoPoint,
}

impl ZoomAndCenter {
    /// Deepest whole zoom level at which the extent still fits, clamped to
    /// `0..=MAX_ZOOM_LEVEL`.
    pub fn zoom_level(&self) -> u8 {
        if self.zoom.is_nan() {
            return 0;
        }
        self.zoom.floor().clamp(0.0, MAX_ZOOM_LEVEL as f64) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_range() {
        assert!(TileIndex::new(0, 0, 0).is_ok());
        assert!(TileIndex::new(1, 1, 1).is_ok());
        assert!(matches!(
            TileIndex::new(2, 0, 1),
            Err(MercatorError::TileOutOfRange { tx: 2, ty: 0, zoom: 1 })
        ));
        assert!(matches!(
            TileIndex::new(0, 0, 31),
            Err(MercatorError::InvalidZoomLevel(31))
        ));
    }

    #[test]
    fn test_max_zoom_corner() -> Result<(), MercatorError> {
        let last = (1u32 << MAX_ZOOM_LEVEL) - 1;
        let tile = TileIndex::new(last, last, MAX_ZOOM_LEVEL)?;
        assert_eq!((tile.tx(), tile.ty(), tile.zoom()), (last, last, MAX_ZOOM_LEVEL));
        Ok(())
    }

    #[test]
    fn test_deserialize_checks_range() -> Result<(), MercatorError> {
        let valid: TileIndex = serde_json::from_str(r#"{"tx":1,"ty":1,"zoom":1}"#)
            .map_err(|e| MercatorError::IoError(e.to_string()))?;
        assert_eq!(valid, TileIndex::new(1, 1, 1)?);

        for json in [
            r#"{"tx":2,"ty":5,"zoom":1}"#,
            r#"{"tx":0,"ty":1,"zoom":0}"#,
            r#"{"tx":0,"ty":0,"zoom":31}"#,
        ] {
            assert!(serde_json::from_str::<TileIndex>(json).is_err(), "{} should be rejected", json);
        }
        Ok(())
    }

    #[test]
    fn test_serialize_roundtrip() -> Result<(), MercatorError> {
        let tile = TileIndex::new(68, 85, 7)?;
        let json = serde_json::to_string(&tile).map_err(|e| MercatorError::IoError(e.to_string()))?;
        assert_eq!(json, r#"{"tx":68,"ty":85,"zoom":7}"#);

        let back: TileIndex =
            serde_json::from_str(&json).map_err(|e| MercatorError::IoError(e.to_string()))?;
        assert_eq!(back, tile);
        Ok(())
    }

    #[test]
    fn test_zoom_level_is_clamped() {
        let center = GeoPoint::new(52.31, 13.24);
        let fit = |zoom: f64| ZoomAndCenter { zoom, center }.zoom_level();

        assert_eq!(fit(10.52), 10);
        assert_eq!(fit(6.999999999999988), 6);
        assert_eq!(fit(-3.2), 0);
        assert_eq!(fit(45.0), MAX_ZOOM_LEVEL);
        assert_eq!(fit(f64::NAN), 0);
    }

    #[test]
    fn test_parent() -> Result<(), MercatorError> {
        let tile = TileIndex::new(17589, 21990, 15)?;
        let parent = tile.parent();
        assert_eq!(parent, Some(TileIndex::new(8794, 10995, 14)?));
        assert_eq!(TileIndex::new(0, 0, 0)?.parent(), None);
        Ok(())
    }

    #[test]
    fn test_children_share_parent() -> Result<(), MercatorError> {
        let tile = TileIndex::new(68, 85, 7)?;
        for child in tile.children()? {
            assert_eq!(child.zoom(), 8);
            assert_eq!(child.parent(), Some(tile));
        }
        Ok(())
    }

    #[test]
    fn test_children_above_max_zoom() -> Result<(), MercatorError> {
        let tile = TileIndex::new(0, 0, MAX_ZOOM_LEVEL)?;
        assert!(tile.children().is_err());
        Ok(())
    }

    #[test]
    fn test_bounds_geo_rect_roundtrip() {
        let bounds = BoundsGeo::new(13.0, 52.0, 14.0, 53.0);
        assert_eq!(BoundsGeo::from_rect(&bounds.to_rect()), bounds);
        assert!(bounds.contains(&GeoPoint::new(52.31, 13.24)));
        assert!(!bounds.contains(&GeoPoint::new(51.0, 13.24)));
    }

    #[test]
    fn test_bounds_polygon_is_closed() {
        let polygon = BoundsMeters::new(0.0, 0.0, 10.0, 20.0).to_polygon();
        let exterior = polygon.exterior();
        assert_eq!(exterior.coords().count(), 5);
        assert_eq!(exterior.0[0], exterior.0[4]);
    }
}
