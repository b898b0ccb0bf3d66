// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integer polygons traced from edge masks

use blueprint_rooms_core::{Error, PixelBox, Result};
use nalgebra::{Point2, Vector2};

/// Closed polygon with integer pixel vertices. The closing edge from the
/// last vertex back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<Point2<i32>>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2<i32>>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2<i32>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Enclosed area using the shoelace formula
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }

        let mut twice_area: i64 = 0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        }

        (twice_area as f64 / 2.0).abs()
    }

    /// Perimeter of the closed outline
    pub fn arc_length(&self) -> f64 {
        let n = self.vertices.len();
        if n < 2 {
            return 0.0;
        }

        (0..n)
            .map(|i| {
                nalgebra::distance(
                    &to_f64(self.vertices[i]),
                    &to_f64(self.vertices[(i + 1) % n]),
                )
            })
            .sum()
    }

    /// True when every turn goes the same way. Collinear vertices are
    /// allowed; fewer than three vertices is never convex.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut orientation = 0i64;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];

            let ab = Vector2::new((b.x - a.x) as i64, (b.y - a.y) as i64);
            let bc = Vector2::new((c.x - b.x) as i64, (c.y - b.y) as i64);
            let turn = ab.perp(&bc).signum();

            if turn == 0 {
                continue;
            }
            if orientation == 0 {
                orientation = turn;
            } else if turn != orientation {
                return false;
            }
        }

        orientation != 0
    }

    /// Bounding rectangle with exclusive upper bounds.
    ///
    /// Fails on an empty polygon or one with negative coordinates, neither
    /// of which a contour traced inside an image can produce.
    pub fn bounding_box(&self) -> Result<PixelBox> {
        let first = self
            .vertices
            .first()
            .ok_or_else(|| Error::Internal("bounding box of an empty polygon".into()))?;

        let (mut x_min, mut y_min, mut x_max, mut y_max) = (first.x, first.y, first.x, first.y);
        for p in &self.vertices[1..] {
            x_min = x_min.min(p.x);
            y_min = y_min.min(p.y);
            x_max = x_max.max(p.x);
            y_max = y_max.max(p.y);
        }

        if x_min < 0 || y_min < 0 {
            return Err(Error::Internal(format!(
                "polygon vertex outside the image at ({}, {})",
                x_min, y_min
            )));
        }

        Ok(PixelBox::new(
            x_min as u32,
            y_min as u32,
            x_max as u32 + 1,
            y_max as u32 + 1,
        ))
    }

    /// Douglas-Peucker simplification of the closed outline.
    ///
    /// The outline is split at the vertex farthest from the first one and
    /// each half is simplified as an open curve, so the result does not
    /// depend on a chord between two neighbouring points.
    pub fn simplify(&self, epsilon: f64) -> Polygon {
        let n = self.vertices.len();
        if n < 3 {
            return self.clone();
        }

        let points: Vec<Point2<f64>> = self.vertices.iter().copied().map(to_f64).collect();
        let start = points[0];
        let far = (1..n)
            .max_by(|&i, &j| {
                nalgebra::distance_squared(&start, &points[i])
                    .total_cmp(&nalgebra::distance_squared(&start, &points[j]))
                    // first maximum wins
                    .then(j.cmp(&i))
            })
            .unwrap_or(0);

        if far == 0 {
            return Polygon::new(vec![self.vertices[0]]);
        }

        // Indices of the two halves; the second wraps back to the start
        let first_half: Vec<usize> = (0..=far).collect();
        let second_half: Vec<usize> = (far..n).chain(std::iter::once(0)).collect();

        let mut keep = douglas_peucker(&points, &first_half, epsilon);
        let second = douglas_peucker(&points, &second_half, epsilon);
        // Drop the shared split vertex and the repeated start
        keep.extend_from_slice(&second[1..second.len() - 1]);

        Polygon::new(keep.into_iter().map(|i| self.vertices[i]).collect())
    }
}

fn to_f64(p: Point2<i32>) -> Point2<f64> {
    Point2::new(p.x as f64, p.y as f64)
}

/// Douglas-Peucker over the open curve `points[path[0]] .. points[path[last]]`,
/// returning the indices of the kept points (both endpoints included)
fn douglas_peucker(points: &[Point2<f64>], path: &[usize], epsilon: f64) -> Vec<usize> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let first = &points[path[0]];
    let last = &points[path[path.len() - 1]];

    let mut max_dist = 0.0;
    let mut max_idx = 0;

    for (i, &idx) in path.iter().enumerate().skip(1).take(path.len() - 2) {
        let dist = perpendicular_distance(&points[idx], first, last);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        let left = douglas_peucker(points, &path[..=max_idx], epsilon);
        let right = douglas_peucker(points, &path[max_idx..], epsilon);

        let mut result = left;
        result.extend_from_slice(&right[1..]);
        result
    } else {
        vec![path[0], path[path.len() - 1]]
    }
}

/// Perpendicular distance from a point to the line through two others
fn perpendicular_distance(
    point: &Point2<f64>,
    line_start: &Point2<f64>,
    line_end: &Point2<f64>,
) -> f64 {
    let direction = line_end - line_start;
    let length = direction.norm();

    if length < 1e-10 {
        return nalgebra::distance(point, line_start);
    }

    direction.perp(&(point - line_start)).abs() / length
}
