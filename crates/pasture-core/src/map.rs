//! Where the vendor map should look, computed from the vendors it will show.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoBounds, GeoPoint};
use crate::vendor::Vendor;

/// Geographic center of the contiguous United States.
pub const US_CENTER: GeoPoint = GeoPoint {
    lat: 39.8283,
    lng: -98.5795,
};

const NATIONWIDE_ZOOM: f64 = 4.0;
const NATIONWIDE_MAX_ZOOM: f64 = 4.0;
const NATIONWIDE_PADDING: u32 = 200;
const LOCAL_CENTER_ZOOM: f64 = 6.0;
const LOCAL_SINGLE_MAX_ZOOM: f64 = 9.0;
const LOCAL_MULTI_MAX_ZOOM: f64 = 7.0;
const LOCAL_PADDING: u32 = 50;
const SEARCHED_EMPTY_ZOOM: f64 = 11.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapViewMode {
    #[default]
    Nationwide,
    Local,
}

impl std::str::FromStr for MapViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nationwide" | "us" => Ok(MapViewMode::Nationwide),
            "local" => Ok(MapViewMode::Local),
            other => Err(format!("unknown map view: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    Center {
        center: GeoPoint,
        zoom: f64,
    },
    FitBounds {
        bounds: GeoBounds,
        max_zoom: f64,
        padding: u32,
    },
}

/// Plan the initial camera for a map of `vendors`.
///
/// Vendors without usable coordinates are ignored. `searched` is the location
/// the visitor searched for, if any.
#[must_use]
pub fn plan_viewport(mode: MapViewMode, searched: Option<GeoPoint>, vendors: &[Vendor]) -> Viewport {
    let points: Vec<GeoPoint> = vendors.iter().filter_map(Vendor::coordinates).collect();
    let searched = searched.filter(GeoPoint::is_valid);
    let bounds = GeoBounds::enclosing(points.iter().copied());

    match (mode, bounds) {
        (MapViewMode::Nationwide, Some(bounds)) => Viewport::FitBounds {
            bounds,
            max_zoom: NATIONWIDE_MAX_ZOOM,
            padding: NATIONWIDE_PADDING,
        },
        (MapViewMode::Local, Some(bounds)) => match searched {
            Some(center) => Viewport::Center {
                center,
                zoom: LOCAL_CENTER_ZOOM,
            },
            None => Viewport::FitBounds {
                bounds,
                max_zoom: if points.len() == 1 {
                    LOCAL_SINGLE_MAX_ZOOM
                } else {
                    LOCAL_MULTI_MAX_ZOOM
                },
                padding: LOCAL_PADDING,
            },
        },
        (MapViewMode::Local, None) => match searched {
            Some(center) => Viewport::Center {
                center,
                zoom: SEARCHED_EMPTY_ZOOM,
            },
            None => us_view(),
        },
        (MapViewMode::Nationwide, None) => us_view(),
    }
}

fn us_view() -> Viewport {
    Viewport::Center {
        center: US_CENTER,
        zoom: NATIONWIDE_ZOOM,
    }
}
