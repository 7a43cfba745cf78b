use mercator_tiles::{
    BoundsGeo, GlobalMercator, MercatorError, Tile, TileGrid, google_tile, quad_key,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_json<T: Serialize>(label: &str, value: &T) -> Result<(), MercatorError> {
    let json = serde_json::to_string(value).map_err(|e| MercatorError::IoError(e.to_string()))?;
    println!("{}: {}", label, json);
    Ok(())
}

fn main() -> Result<(), MercatorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let lat = 52.31;
    let lon = 13.24;
    let mercator = GlobalMercator::default();

    let meters = mercator.lat_lon_to_meters(lat, lon)?;
    print_json("Meters", &meters)?;

    for zoom in [1u8, 7, 11, 15] {
        let pixels = mercator.meters_to_pixels(meters, zoom);
        let tile = mercator.pixels_to_tile(pixels)?;

        info!(zoom, quadkey = %quad_key(tile), "Converted");
        print_json("Pixels", &pixels)?;
        print_json("TMS tile", &tile)?;
        print_json("Google tile", &google_tile(tile))?;
        print_json("Bounds", &mercator.tile_lat_lon_bounds(tile))?;
    }

    let tile = Tile::from_wgs84(&mercator, &(lon, lat), 15)?;
    print_json("Tile", &tile)?;

    let berlin = BoundsGeo::new(13.08, 52.33, 13.77, 52.68);
    let fit = mercator.extent_to_zoom_and_center(berlin, 800, 600)?;
    print_json("Fit 800x600", &fit)?;

    let grid = TileGrid::from_geo_bounds(&mercator, berlin, fit.zoom_level())?;
    println!("Grid: {} tiles at zoom {}", grid.len(), grid.zoom_level());

    Ok(())
}
