//! Replays core draw commands onto a nannou `Draw`.
//!
//! Commands arrive in canvas space (origin top-left, y down); nannou draws
//! in world space centred on the window with y up.

use beatscope_core::{Color, DrawCommand, Paint, Point};
use nannou::color::{hsla, srgba, IntoLinSrgba, LinSrgba};
use nannou::prelude::*;

/// Maximum angle covered by one segment of a wedge arc, in radians
const ARC_SEGMENT: f32 = 0.05;

/// Canvas coordinates to world coordinates within `bounds`
pub fn to_world(p: Point, bounds: Rect) -> Vec2 {
    vec2(bounds.left() + p.x, bounds.top() - p.y)
}

fn to_color(paint: Paint) -> LinSrgba {
    let alpha = paint.alpha.clamp(0.0, 1.0);
    match paint.color {
        Color::Rgb(rgb) => srgba(
            rgb.r as f32 / 255.0,
            rgb.g as f32 / 255.0,
            rgb.b as f32 / 255.0,
            alpha,
        )
        .into_lin_srgba(),
        Color::Hsl {
            hue,
            saturation,
            lightness,
        } => hsla(hue.rem_euclid(360.0) / 360.0, saturation, lightness, alpha).into_lin_srgba(),
    }
}

/// Outline of an annular sector in canvas space: outer arc forward, inner
/// arc back.
pub fn wedge_outline(
    center: Point,
    inner_radius: f32,
    outer_radius: f32,
    start_angle: f32,
    end_angle: f32,
) -> Vec<Point> {
    let sweep = end_angle - start_angle;
    let segments = ((sweep.abs() / ARC_SEGMENT).ceil() as usize).max(1);

    let arc = |radius: f32| {
        (0..=segments).map(move |i| {
            let angle = start_angle + sweep * i as f32 / segments as f32;
            center.polar(radius, angle)
        })
    };

    arc(outer_radius)
        .chain(arc(inner_radius).collect::<Vec<_>>().into_iter().rev())
        .collect()
}

/// Draw every command in order
pub fn paint(draw: &Draw, bounds: Rect, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::Clear { paint } => {
                draw.background().color(to_color(*paint));
            }
            DrawCommand::FillRect { x, y, w, h, paint } => {
                if *w <= 0.0 || *h <= 0.0 {
                    continue;
                }
                let centre = to_world(Point::new(x + w / 2.0, y + h / 2.0), bounds);
                draw.rect()
                    .xy(centre)
                    .w_h(*w, *h)
                    .color(to_color(*paint));
            }
            DrawCommand::Polyline {
                points,
                weight,
                paint,
            } => {
                draw.polyline()
                    .weight(*weight)
                    .points(points.iter().map(|p| to_world(*p, bounds)))
                    .color(to_color(*paint));
            }
            DrawCommand::Line {
                start,
                end,
                weight,
                paint,
            } => {
                draw.line()
                    .start(to_world(*start, bounds))
                    .end(to_world(*end, bounds))
                    .weight(*weight)
                    .color(to_color(*paint));
            }
            DrawCommand::Wedge {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                end_angle,
                paint,
            } => {
                // Zero-height bars have no area to fill
                if outer_radius <= inner_radius {
                    continue;
                }
                let outline =
                    wedge_outline(*center, *inner_radius, *outer_radius, *start_angle, *end_angle);
                draw.polygon()
                    .points(outline.into_iter().map(|p| to_world(p, bounds)))
                    .color(to_color(*paint));
            }
            DrawCommand::FillCircle {
                center,
                radius,
                paint,
            } => {
                draw.ellipse()
                    .xy(to_world(*center, bounds))
                    .radius(*radius)
                    .color(to_color(*paint));
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                weight,
                paint,
            } => {
                draw.ellipse()
                    .xy(to_world(*center, bounds))
                    .radius(*radius)
                    .no_fill()
                    .stroke_weight(*weight)
                    .stroke(to_color(*paint));
            }
        }
    }
}
