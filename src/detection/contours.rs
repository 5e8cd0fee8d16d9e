use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::arc_length;
use imageproc::point::Point;

use crate::models::{BoundingBox, Region};

/// Find external boundaries in a binary mask and keep those enclosing
/// strictly more than `min_area` pixels.
///
/// Holes and anything nested inside a hole are skipped.
pub fn find_regions(mask: &GrayImage, min_area: f64) -> Vec<Region> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|c| Region::from_boundary(c.points))
        .filter(|r| r.area > min_area)
        .collect()
}

/// The region with maximal enclosed area; the first one wins a tie
pub fn largest_region(regions: &[Region]) -> Option<&Region> {
    regions.iter().fold(None, |best, region| match best {
        Some(b) if b.area >= region.area => Some(b),
        _ => Some(region),
    })
}

/// Enclosed area of a closed polygon (shoelace formula)
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice_area: i64 = 0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }

    (twice_area as f64 / 2.0).abs()
}

/// Length of the closed boundary
pub fn perimeter(points: &[Point<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    arc_length(points, true)
}

/// Smallest upright rectangle containing every boundary point.
/// Width and height count pixels, so a single point is 1x1.
pub fn bounding_rect(points: &[Point<i32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for p in points.iter().skip(1) {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let min_x = min_x.max(0);
    let min_y = min_y.max(0);

    Some(BoundingBox {
        x: min_x as u32,
        y: min_y as u32,
        width: (max_x - min_x + 1).max(0) as u32,
        height: (max_y - min_y + 1).max(0) as u32,
    })
}
