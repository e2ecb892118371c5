//! Recorded drawing surface.
//!
//! Renderers draw into a [`Canvas`] in canvas coordinates (origin top-left,
//! y grows downward). The canvas records [`DrawCommand`]s which the frontend
//! replays onto a real surface.

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` along `angle` (radians, clockwise on screen)
    pub fn polar(self, radius: f32, angle: f32) -> Self {
        Self::new(self.x + angle.cos() * radius, self.y + angle.sin() * radius)
    }
}

/// Color plus opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub alpha: f32,
}

impl Paint {
    pub fn opaque(color: impl Into<Color>) -> Self {
        Self {
            color: color.into(),
            alpha: 1.0,
        }
    }

    pub fn with_alpha(color: impl Into<Color>, alpha: f32) -> Self {
        Self {
            color: color.into(),
            alpha,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { paint: Paint },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        paint: Paint,
    },
    /// Open stroked path
    Polyline {
        points: Vec<Point>,
        weight: f32,
        paint: Paint,
    },
    Line {
        start: Point,
        end: Point,
        weight: f32,
        paint: Paint,
    },
    /// Filled annular sector between two radii
    Wedge {
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
        paint: Paint,
    },
    FillCircle {
        center: Point,
        radius: f32,
        paint: Paint,
    },
    StrokeCircle {
        center: Point,
        radius: f32,
        weight: f32,
        paint: Paint,
    },
}

/// Command recorder with known dimensions
pub struct Canvas {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn clear(&mut self, paint: Paint) {
        self.commands.push(DrawCommand::Clear { paint });
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, paint });
    }

    pub fn polyline(&mut self, points: Vec<Point>, weight: f32, paint: Paint) {
        self.commands.push(DrawCommand::Polyline {
            points,
            weight,
            paint,
        });
    }

    pub fn line(&mut self, start: Point, end: Point, weight: f32, paint: Paint) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            weight,
            paint,
        });
    }

    pub fn wedge(
        &mut self,
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
        paint: Paint,
    ) {
        self.commands.push(DrawCommand::Wedge {
            center,
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
            paint,
        });
    }

    pub fn circle(&mut self, center: Point, radius: f32, paint: Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint,
        });
    }

    pub fn ring(&mut self, center: Point, radius: f32, weight: f32, paint: Paint) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            weight,
            paint,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}
