use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Range substituted for a zero-width axis, in degrees.
pub const MIN_RANGE_DEG: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Drawing area the path is fitted into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            padding: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let seed = Bounds {
            min_lat: first.lat(),
            max_lat: first.lat(),
            min_lng: first.lng(),
            max_lng: first.lng(),
        };
        Some(rest.iter().fold(seed, |b, p| Bounds {
            min_lat: b.min_lat.min(p.lat()),
            max_lat: b.max_lat.max(p.lat()),
            min_lng: b.min_lng.min(p.lng()),
            max_lng: b.max_lng.max(p.lng()),
        }))
    }

    pub fn lat_range(&self) -> f64 {
        non_zero_range(self.max_lat - self.min_lat)
    }

    pub fn lng_range(&self) -> f64 {
        non_zero_range(self.max_lng - self.min_lng)
    }
}

fn non_zero_range(range: f64) -> f64 {
    if range == 0.0 { MIN_RANGE_DEG } else { range }
}

/// Fit `points` into a `width` x `height` canvas, keeping `padding` pixels
/// clear on every side.
///
/// Longitude grows to the right, latitude grows upward (so `y` is inverted).
/// A single uniform scale is used for both axes so the shape is never
/// stretched. Fewer than two points yields nothing to draw.
///
/// Bounds are recomputed from the full sequence on every call.
pub fn project(points: &[GeoPoint], width: f64, height: f64, padding: f64) -> Vec<PixelPoint> {
    if points.len() < 2 {
        return Vec::new();
    }
    let Some(bounds) = Bounds::from_points(points) else {
        return Vec::new();
    };

    let scale_x = (width - padding * 2.0) / bounds.lng_range();
    let scale_y = (height - padding * 2.0) / bounds.lat_range();
    let scale = scale_x.min(scale_y);

    points
        .iter()
        .map(|p| PixelPoint {
            x: (p.lng() - bounds.min_lng) * scale + padding,
            y: (bounds.max_lat - p.lat()) * scale + padding,
        })
        .collect()
}

/// [`project`] with the drawing area bundled in a [`CanvasSize`].
pub fn project_onto(points: &[GeoPoint], canvas: CanvasSize) -> Vec<PixelPoint> {
    project(points, canvas.width, canvas.height, canvas.padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).expect("valid point")
    }

    fn assert_within(pixels: &[PixelPoint], canvas: CanvasSize) {
        for p in pixels {
            let (min_x, max_x) = (canvas.padding, canvas.width - canvas.padding);
            let (min_y, max_y) = (canvas.padding, canvas.height - canvas.padding);
            assert!(p.x >= min_x - TOLERANCE && p.x <= max_x + TOLERANCE, "x out of bounds: {p:?}");
            assert!(p.y >= min_y - TOLERANCE && p.y <= max_y + TOLERANCE, "y out of bounds: {p:?}");
        }
    }

    #[test]
    fn test_project_too_few_points() {
        assert!(project(&[], 400.0, 400.0, 20.0).is_empty());
        assert!(project(&[point(28.6, 77.2)], 400.0, 400.0, 20.0).is_empty());
    }

    #[test]
    fn test_project_keeps_order_and_count() {
        let path = [point(0.0, 0.0), point(0.0, 1.0), point(1.0, 1.0)];
        let pixels = project(&path, 400.0, 400.0, 20.0);
        assert_eq!(pixels.len(), 3);
        // (0,0) is bottom-left, (0,1) bottom-right, (1,1) top-right.
        assert_eq!(pixels[0], PixelPoint { x: 20.0, y: 380.0 });
        assert_eq!(pixels[1], PixelPoint { x: 380.0, y: 380.0 });
        assert_eq!(pixels[2], PixelPoint { x: 380.0, y: 20.0 });
    }

    #[test]
    fn test_project_uniform_scale_on_wide_canvas() {
        let path = [point(0.0, 0.0), point(1.0, 1.0)];
        let canvas = CanvasSize {
            width: 800.0,
            height: 400.0,
            padding: 20.0,
        };
        let pixels = project_onto(&path, canvas);
        // Height limits the scale: 360 px per degree on both axes.
        assert_eq!(pixels[0], PixelPoint { x: 20.0, y: 380.0 });
        assert_eq!(pixels[1], PixelPoint { x: 380.0, y: 20.0 });
        assert_within(&pixels, canvas);
    }

    #[test]
    fn test_project_same_latitude_does_not_collapse() {
        let path = [point(10.0, 1.0), point(10.0, 1.5), point(10.0, 2.0)];
        let pixels = project(&path, 400.0, 400.0, 20.0);
        assert!(pixels[0].x < pixels[1].x && pixels[1].x < pixels[2].x);
        assert!(pixels.iter().all(|p| (p.y - pixels[0].y).abs() < TOLERANCE));
    }

    #[test]
    fn test_project_same_longitude_does_not_collapse() {
        let path = [point(10.0, 1.0), point(10.5, 1.0), point(11.0, 1.0)];
        let pixels = project(&path, 400.0, 400.0, 20.0);
        assert!(pixels[0].y > pixels[1].y && pixels[1].y > pixels[2].y);
        assert!(pixels.iter().all(|p| (p.x - pixels[0].x).abs() < TOLERANCE));
    }

    #[test]
    fn test_project_identical_points() {
        let p = point(28.6139, 77.2090);
        let pixels = project(&[p, p], 400.0, 400.0, 20.0);
        assert_eq!(pixels, vec![PixelPoint { x: 20.0, y: 20.0 }; 2]);
    }

    #[test]
    fn test_project_is_idempotent() {
        let path = [point(28.6139, 77.2090), point(28.6140, 77.2091), point(28.6150, 77.2085)];
        assert_eq!(project(&path, 400.0, 300.0, 20.0), project(&path, 400.0, 300.0, 20.0));
    }

    #[test]
    fn test_bounds_from_points() {
        assert_eq!(Bounds::from_points(&[]), None);
        let bounds =
            Bounds::from_points(&[point(1.0, 5.0), point(-2.0, 7.0), point(0.5, 6.0)]).unwrap();
        assert_eq!(
            bounds,
            Bounds {
                min_lat: -2.0,
                max_lat: 1.0,
                min_lng: 5.0,
                max_lng: 7.0
            }
        );
        assert_eq!(bounds.lat_range(), 3.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_point() -> impl Strategy<Value = GeoPoint> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lng)| point(lat, lng))
        }

        fn canvas() -> impl Strategy<Value = CanvasSize> {
            (50.0..2000.0, 50.0..2000.0, 0.0..20.0).prop_map(|(width, height, padding)| CanvasSize {
                width,
                height,
                padding,
            })
        }

        proptest! {
            #[test]
            fn prop_projection_fits_canvas(
                path in prop::collection::vec(valid_point(), 2..50),
                canvas in canvas()
            ) {
                let pixels = project_onto(&path, canvas);
                prop_assert_eq!(pixels.len(), path.len());
                for p in &pixels {
                    prop_assert!(p.x >= canvas.padding - TOLERANCE);
                    prop_assert!(p.x <= canvas.width - canvas.padding + TOLERANCE);
                    prop_assert!(p.y >= canvas.padding - TOLERANCE);
                    prop_assert!(p.y <= canvas.height - canvas.padding + TOLERANCE);
                }
            }

            #[test]
            fn prop_projection_is_pure(
                path in prop::collection::vec(valid_point(), 0..20),
                canvas in canvas()
            ) {
                prop_assert_eq!(project_onto(&path, canvas), project_onto(&path, canvas));
            }
        }
    }
}
