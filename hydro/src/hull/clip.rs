//! Clips a hull triangle against the local water height.
//!
//! A vertex is submerged when it lies strictly below the water sample.
//! The clipper walks the triangle edges in order and keeps submerged
//! vertices plus edge crossings, so the polygon keeps the triangle's
//! winding and its first three points still give the face orientation.
//!
//! ```text
//!        v3                      v3
//!        /\        water        /\
//!  -----x--x-----   ===>       x--x   dropped
//!      /    \
//!    v1------v2                v1--v2 kept: quad (v1, v2, x23, x31)
//! ```

use bevy::math::Vec3;

use super::geometry::Triangle;
use crate::water::WaterSample;

/// Upper bound on clipped polygon size.
pub const MAX_POLYGON_POINTS: usize = 4;

/// Submerged part of one triangle: empty, a triangle or a quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmergedPolygon {
    points: [Vec3; MAX_POLYGON_POINTS],
    len: usize,
    /// Approximate surface normal, taken from the water sample
    pub normal: Vec3,
    pub area: f32,
    pub centroid: Vec3,
}

impl SubmergedPolygon {
    pub const EMPTY: Self = Self {
        points: [Vec3::ZERO; MAX_POLYGON_POINTS],
        len: 0,
        normal: Vec3::ZERO,
        area: 0.0,
        centroid: Vec3::ZERO,
    };

    /// Polygon from explicit points. Anything other than 3 or 4 points
    /// yields the empty polygon.
    pub fn from_points(points: &[Vec3], normal: Vec3) -> Self {
        let mut polygon = Self::EMPTY;
        if !matches!(points.len(), 3 | 4) {
            return polygon;
        }
        for &point in points {
            polygon.push(point);
        }
        polygon.normal = normal;
        polygon.finish()
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Unnormalised `cross(p1 - p0, p2 - p0)`. Points into the hull for
    /// inward-wound meshes.
    #[inline]
    pub fn face_cross(&self) -> Vec3 {
        if self.len < 3 {
            return Vec3::ZERO;
        }
        let [p0, p1, p2, _] = self.points;
        (p1 - p0).cross(p2 - p0)
    }

    #[inline]
    fn push(&mut self, point: Vec3) {
        if self.len < MAX_POLYGON_POINTS {
            self.points[self.len] = point;
        }
        self.len += 1;
    }

    /// Second pass: area and centroid once the points are known.
    fn finish(mut self) -> Self {
        debug_assert!(
            matches!(self.len, 0 | 3 | 4),
            "Submerged polygon with {} points",
            self.len
        );

        match self.len {
            0 => self,
            3 => {
                let [p0, p1, p2, _] = self.points;
                self.area = triangle_area(p0, p1, p2);
                self.centroid = (p0 + p1 + p2) / 3.0;
                self
            }
            4 => {
                let [p0, p1, p2, p3] = self.points;
                self.area = triangle_area(p0, p1, p2) + triangle_area(p0, p2, p3);
                // plain vertex mean, not area weighted
                self.centroid = (p0 + p1 + p2 + p3) / 4.0;
                self
            }
            _ => Self::EMPTY,
        }
    }
}

impl Default for SubmergedPolygon {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[inline]
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    0.5 * (b - a).cross(c - a).length()
}

/// Submerged part of `triangle` below `sample`. Invalid samples and fully
/// emerged triangles give the empty polygon.
pub fn clip_triangle(triangle: &Triangle, sample: &WaterSample) -> SubmergedPolygon {
    debug_assert!(!triangle.is_degenerate(), "Degenerate hull triangle {triangle:?}");
    if !sample.valid || triangle.is_degenerate() {
        return SubmergedPolygon::EMPTY;
    }

    let water_z = sample.height();
    let vertices = triangle.vertices();
    let submerged = vertices.map(|v| v.z < water_z);

    let mut polygon = SubmergedPolygon::EMPTY;
    match submerged.iter().filter(|&&s| s).count() {
        0 => return polygon,
        3 => vertices.iter().for_each(|&v| polygon.push(v)),
        _ => {
            for i in 0..3 {
                let j = (i + 1) % 3;
                let (current, next) = (vertices[i], vertices[j]);
                if submerged[i] {
                    polygon.push(current);
                }
                match (submerged[i], submerged[j]) {
                    (true, false) => polygon.push(crossing(next, current, water_z)),
                    (false, true) => polygon.push(crossing(current, next, water_z)),
                    _ => {}
                }
            }
        }
    }

    polygon.normal = sample.normal;
    polygon.finish()
}

/// Point where the edge from `above` to `below` meets the water.
#[inline]
fn crossing(above: Vec3, below: Vec3, water_z: f32) -> Vec3 {
    let t = (water_z - above.z) / (below.z - above.z);
    let mut point = above + (below - above) * t;
    point.z = water_z;
    point
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn water(z: f32) -> WaterSample {
        WaterSample {
            position: Vec3::new(0.0, 0.0, z),
            normal: Vec3::Z,
            valid: true,
        }
    }

    fn unit_right() -> Triangle {
        Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y)
    }

    #[test]
    fn test_fully_submerged_unit_triangle() {
        let polygon = clip_triangle(&unit_right(), &water(1.0));
        assert_eq!(polygon.len(), 3);
        assert_relative_eq!(polygon.area, 0.5);
        assert_eq!(polygon.centroid, Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
    }

    #[test]
    fn test_fully_above_is_empty() {
        let triangle = Triangle::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 0.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
        );
        assert!(clip_triangle(&triangle, &water(0.0)).is_empty());
    }

    #[test]
    fn test_vertex_on_water_is_not_submerged() {
        assert!(clip_triangle(&unit_right(), &water(0.0)).is_empty());
    }

    #[test]
    fn test_invalid_sample_is_empty() {
        let polygon = clip_triangle(&unit_right(), &WaterSample::INVALID);
        assert!(polygon.is_empty());
    }

    #[test]
    fn test_one_vertex_submerged() {
        let triangle = Triangle::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(0.0, 2.0, 1.0),
        );
        let polygon = clip_triangle(&triangle, &water(0.0));
        assert_eq!(polygon.len(), 3);

        for point in &polygon.points()[1..] {
            assert_relative_eq!(point.z, 0.0);
        }
        // halfway along both edges leaving v1
        assert_relative_eq!(polygon.points()[1].x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(polygon.points()[2].y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(polygon.area, 0.5 * 3f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_two_vertices_submerged() {
        let triangle = Triangle::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(2.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let polygon = clip_triangle(&triangle, &water(0.0));
        assert_eq!(polygon.len(), 4);

        let points = polygon.points();
        assert_eq!(points[0], triangle.v1);
        assert_eq!(points[1], triangle.v2);
        assert_relative_eq!(points[2].z, 0.0);
        assert_relative_eq!(points[3].z, 0.0);

        // full triangle area 2, emerged tip area 0.5
        assert_relative_eq!(polygon.area, 1.5, epsilon = 1e-5);
        let mean = points.iter().copied().sum::<Vec3>() / 4.0;
        assert_eq!(polygon.centroid, mean);
    }

    #[test]
    fn test_clip_preserves_winding() {
        let triangle = Triangle::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 2.0, 1.0),
            Vec3::new(2.0, 0.0, -1.0),
        );
        let polygon = clip_triangle(&triangle, &water(0.0));
        let original = (triangle.v2 - triangle.v1).cross(triangle.v3 - triangle.v1);
        assert!(polygon.face_cross().dot(original) > 0.0);
    }

    #[test]
    fn test_from_points_rejects_bad_counts() {
        assert!(SubmergedPolygon::from_points(&[Vec3::ZERO, Vec3::X], Vec3::Z).is_empty());
        let quad = SubmergedPolygon::from_points(
            &[Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            Vec3::Z,
        );
        assert_relative_eq!(quad.area, 1.0);
    }

    #[test]
    fn test_random_clipping_invariants() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..2000 {
            let mut vertex = || {
                Vec3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                )
            };
            let triangle = Triangle::new(vertex(), vertex(), vertex());
            let water_z = rng.gen_range(-12.0..12.0);
            let polygon = clip_triangle(&triangle, &water(water_z));

            let below = triangle.vertices().iter().filter(|v| v.z < water_z).count();
            let expected = match below {
                0 => 0,
                1 | 3 => 3,
                _ => 4,
            };
            assert_eq!(polygon.len(), expected);

            let full = triangle_area(triangle.v1, triangle.v2, triangle.v3);
            assert!(polygon.area <= full * (1.0 + 1e-4) + 1e-4);
            for point in polygon.points() {
                assert!(point.z <= water_z + 1e-4);
            }
            assert_crossings_on_edges(&triangle, water_z, &polygon);
        }
    }

    /// Every edge that straddles the water contributes one point strictly
    /// between its emerged and submerged ends.
    fn assert_crossings_on_edges(triangle: &Triangle, water_z: f32, polygon: &SubmergedPolygon) {
        let vertices = triangle.vertices();
        let mut crossings = 0;

        for i in 0..3 {
            let (a, b) = (vertices[i], vertices[(i + 1) % 3]);
            if (a.z < water_z) == (b.z < water_z) {
                continue;
            }
            crossings += 1;
            let (above, below) = if a.z < water_z { (b, a) } else { (a, b) };

            let t = (water_z - above.z) / (below.z - above.z);
            assert!((0.0..1.0).contains(&t), "t = {t} on {above:?} -> {below:?}");
            if above.z > water_z {
                assert!(t > 0.0);
            }

            let expected = above + (below - above) * t;
            let point = polygon
                .points()
                .iter()
                .copied()
                .min_by(|p, q| {
                    (*p - expected)
                        .length()
                        .total_cmp(&(*q - expected).length())
                })
                .unwrap();
            assert!((point - expected).length() < 1e-3, "No crossing near {expected:?} in {polygon:?}");

            assert_relative_eq!(point.z, water_z);
            assert_ne!(point, below);
            if above.z != water_z {
                assert_ne!(point, above);
            }
            // on the segment: same distance along it as t says
            let along = (point - above).dot(below - above) / (below - above).length_squared();
            assert_relative_eq!(along, t, epsilon = 1e-3);
        }

        let kept = vertices.iter().filter(|v| v.z < water_z).count();
        if kept < 3 {
            assert_eq!(polygon.len(), kept + crossings);
        }
    }
}
