//! Flat 2D brush strokes: points, triangles and circles on a painting canvas.

use std::f32::consts::TAU;

use glam::Vec2;
use thiserror::Error;

pub type Rgba = [f32; 4];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    #[error("circle radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("circle needs at least 3 segments, got {0}")]
    TooFewSegments(u32),
}

/// What a shape needs from whoever puts it on screen.
pub trait ShapeContext {
    fn draw_point(&mut self, position: Vec2, size: f32, color: Rgba);
    fn draw_triangle(&mut self, vertices: [Vec2; 3], color: Rgba);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Vec2,
    pub size: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec2; 3],
    pub color: Rgba,
}

impl Triangle {
    /// Upward-pointing triangle with its base centred under `center`.
    pub fn centered(center: Vec2, size: f32, color: Rgba) -> Self {
        let d = size / 2.0;
        Self {
            vertices: [
                Vec2::new(center.x - d, center.y - d),
                Vec2::new(center.x + d, center.y - d),
                Vec2::new(center.x, center.y + d),
            ],
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Vec2,
    radius: f32,
    segments: u32,
    color: Rgba,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32, segments: u32, color: Rgba) -> Result<Self, ShapeError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(ShapeError::NonPositiveRadius(radius));
        }
        if segments < 3 {
            return Err(ShapeError::TooFewSegments(segments));
        }
        Ok(Self { center, radius, segments, color })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Triangle fan around the centre, one triangle per segment.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        let step = TAU / self.segments as f32;
        (0..self.segments).map(move |i| {
            let a = i as f32 * step;
            let b = (i + 1) as f32 * step;
            [
                self.center,
                self.center + Vec2::new(a.cos(), a.sin()) * self.radius,
                self.center + Vec2::new(b.cos(), b.sin()) * self.radius,
            ]
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Point(Point),
    Triangle(Triangle),
    Circle(Circle),
}

impl Shape {
    pub fn render(&self, ctx: &mut impl ShapeContext) {
        match self {
            Shape::Point(p) => ctx.draw_point(p.position, p.size, p.color),
            Shape::Triangle(t) => ctx.draw_triangle(t.vertices, t.color),
            Shape::Circle(c) => {
                for tri in c.triangles() {
                    ctx.draw_triangle(tri, c.color);
                }
            }
        }
    }
}

/// Ordered list of strokes, drawn oldest first.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    shapes: Vec<Shape>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn undo(&mut self) -> Option<Shape> {
        self.shapes.pop()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn render(&self, ctx: &mut impl ShapeContext) {
        for shape in &self.shapes {
            shape.render(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [1.0, 0.0, 0.0, 1.0];

    #[derive(Default)]
    struct Recorder {
        points: usize,
        triangles: Vec<[Vec2; 3]>,
    }

    impl ShapeContext for Recorder {
        fn draw_point(&mut self, _position: Vec2, _size: f32, _color: Rgba) {
            self.points += 1;
        }

        fn draw_triangle(&mut self, vertices: [Vec2; 3], _color: Rgba) {
            self.triangles.push(vertices);
        }
    }

    #[test]
    fn circle_rejects_bad_parameters() {
        assert_eq!(Circle::new(Vec2::ZERO, 0.0, 8, RED), Err(ShapeError::NonPositiveRadius(0.0)));
        assert_eq!(Circle::new(Vec2::ZERO, -1.0, 8, RED), Err(ShapeError::NonPositiveRadius(-1.0)));
        assert_eq!(Circle::new(Vec2::ZERO, 1.0, 2, RED), Err(ShapeError::TooFewSegments(2)));
        assert!(Circle::new(Vec2::ZERO, f32::NAN, 8, RED).is_err());
    }

    #[test]
    fn circle_fan_closes_on_the_rim() {
        let circle = Circle::new(Vec2::new(1.0, 1.0), 0.5, 12, RED).unwrap();
        let tris: Vec<_> = circle.triangles().collect();
        assert_eq!(tris.len(), 12);

        for tri in &tris {
            assert_eq!(tri[0], Vec2::new(1.0, 1.0));
            assert!(((tri[1] - tri[0]).length() - 0.5).abs() < 1e-5);
        }
        assert!((tris[11][2] - tris[0][1]).length() < 1e-5);
    }

    #[test]
    fn canvas_renders_each_variant() {
        let mut canvas = Canvas::new();
        canvas.push(Shape::Point(Point { position: Vec2::ZERO, size: 10.0, color: RED }));
        canvas.push(Shape::Triangle(Triangle::centered(Vec2::ZERO, 0.2, RED)));
        canvas.push(Shape::Circle(Circle::new(Vec2::ZERO, 0.3, 8, RED).unwrap()));

        let mut recorder = Recorder::default();
        canvas.render(&mut recorder);
        assert_eq!(recorder.points, 1);
        assert_eq!(recorder.triangles.len(), 1 + 8);
    }

    #[test]
    fn undo_drops_the_latest_stroke() {
        let mut canvas = Canvas::new();
        let point = Shape::Point(Point { position: Vec2::ONE, size: 5.0, color: RED });
        let tri = Shape::Triangle(Triangle::centered(Vec2::ZERO, 1.0, RED));
        canvas.push(point);
        canvas.push(tri);

        assert_eq!(canvas.undo(), Some(tri));
        assert_eq!(canvas.len(), 1);
        canvas.clear();
        assert!(canvas.is_empty());
        assert_eq!(canvas.undo(), None);
    }
}
