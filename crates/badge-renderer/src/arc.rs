//! Capped progress arcs.
//!
//! Angles are in degrees, screen space: 0° points right, 90° points down,
//! 180° points left. Arcs sweep clockwise (increasing angle) from
//! `start_deg` to `end_deg`. The stroke lies inside the circle: its outer
//! edge is at `radius` and its inner edge at `radius - stroke_width`.
//!
//! The band is a tiny-skia stroke along the centerline with butt ends; the
//! round caps are filled discs of diameter `stroke_width` at both ends.

use image::{Pixel, Rgba, RgbaImage};
use rayon::prelude::*;
use tiny_skia::*;

/// Angle at which every progress arc starts (left).
pub const ARC_START_DEG: f32 = 180.0;

/// Sweep of a full progress arc (left, over the top, to the right).
pub const ARC_SWEEP_DEG: f32 = 180.0;

/// A stroked circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpec {
    pub center_x: f32,
    pub center_y: f32,
    /// Outer edge of the stroke.
    pub radius: f32,
    pub start_deg: f32,
    pub end_deg: f32,
    pub stroke_width: f32,
    pub color: Rgba<u8>,
}

impl ArcSpec {
    /// Full-span track arc from 180° to 360°.
    pub fn track(center: (f32, f32), radius: f32, stroke_width: f32, color: Rgba<u8>) -> Self {
        Self::progress(center, radius, stroke_width, color, 1.0)
    }

    /// Arc from 180° covering `progress` of the track. `progress` is clamped to [0, 1].
    pub fn progress(
        center: (f32, f32),
        radius: f32,
        stroke_width: f32,
        color: Rgba<u8>,
        progress: f64,
    ) -> Self {
        Self {
            center_x: center.0,
            center_y: center.1,
            radius,
            start_deg: ARC_START_DEG,
            end_deg: progress_end_angle(progress),
            stroke_width,
            color,
        }
    }

    /// Radius of the stroke's centerline.
    pub fn centerline_radius(&self) -> f32 {
        centerline_radius(self.radius, self.stroke_width)
    }

    /// Clockwise sweep in degrees, in [0, 360].
    pub fn sweep_deg(&self) -> f32 {
        let sweep = self.end_deg - self.start_deg;
        if sweep >= 360.0 {
            360.0
        } else {
            sweep.rem_euclid(360.0)
        }
    }

    /// Point on the stroke centerline at `angle_deg`.
    pub fn centerline_point(&self, angle_deg: f32) -> (f32, f32) {
        point_on_circle(
            (self.center_x, self.center_y),
            self.centerline_radius(),
            angle_deg,
        )
    }
}

/// End angle for a progress fraction: `180 + 180 × p`, with `p` clamped to [0, 1].
pub fn progress_end_angle(progress: f64) -> f32 {
    let p = progress.clamp(0.0, 1.0) as f32;
    ARC_START_DEG + ARC_SWEEP_DEG * p
}

/// Centerline of a stroke drawn inward from `radius`.
pub fn centerline_radius(radius: f32, stroke_width: f32) -> f32 {
    radius - stroke_width / 2.0
}

pub fn point_on_circle(center: (f32, f32), radius: f32, angle_deg: f32) -> (f32, f32) {
    let rad = angle_deg.to_radians();
    (center.0 + radius * rad.cos(), center.1 + radius * rad.sin())
}

/// Centerline of the sweep as cubic Bézier segments of at most 90° each.
///
/// Returns `None` for an empty sweep or a non-positive centerline radius.
pub fn arc_path(spec: &ArcSpec) -> Option<Path> {
    let sweep = spec.sweep_deg();
    let r = spec.centerline_radius();
    if sweep <= 0.0 || r <= 0.0 {
        return None;
    }

    let segments = (sweep / 90.0).ceil().max(1.0) as usize;
    let step = (sweep / segments as f32).to_radians();
    // Control arm length for a circular arc of `step` radians
    let k = 4.0 / 3.0 * (step / 4.0).tan() * r;
    let (cx, cy) = (spec.center_x, spec.center_y);
    let start = spec.start_deg.to_radians();

    let mut pb = PathBuilder::new();
    let (x, y) = spec.centerline_point(spec.start_deg);
    pb.move_to(x, y);
    for i in 0..segments {
        let a0 = start + step * i as f32;
        let a1 = a0 + step;
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();
        let (x0, y0) = (cx + r * c0, cy + r * s0);
        let (x1, y1) = (cx + r * c1, cy + r * s1);
        pb.cubic_to(x0 - k * s0, y0 + k * c0, x1 + k * s1, y1 - k * c1, x1, y1);
    }
    pb.finish()
}

/// Draw the arc band and a round cap at both ends.
///
/// Callers skip zero-progress foreground arcs entirely; a zero sweep here
/// would still draw the caps.
pub fn draw_capped_arc(canvas: &mut RgbaImage, spec: &ArcSpec) {
    paint_arc(canvas, spec, true);
}

/// Stroke the band between `radius - stroke_width` and `radius`, without caps.
pub fn draw_arc_band(canvas: &mut RgbaImage, spec: &ArcSpec) {
    paint_arc(canvas, spec, false);
}

fn paint_arc(canvas: &mut RgbaImage, spec: &ArcSpec, caps: bool) {
    if spec.stroke_width <= 0.0 {
        return;
    }

    // Pixmap covers the circle's bounding box, clipped to the canvas.
    let reach = spec.radius + 1.0;
    let x0 = (spec.center_x - reach).floor().max(0.0) as u32;
    let y0 = (spec.center_y - reach).floor().max(0.0) as u32;
    let x1 = ((spec.center_x + reach).ceil().max(0.0) as u32).min(canvas.width());
    let y1 = ((spec.center_y + reach).ceil().max(0.0) as u32).min(canvas.height());
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    let Some(mut pixmap) = Pixmap::new(x1 - x0, y1 - y0) else {
        return;
    };
    pixmap.fill(Color::TRANSPARENT);

    let [r, g, b, a] = spec.color.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    let transform = Transform::from_translate(-(x0 as f32), -(y0 as f32));

    if let Some(path) = arc_path(spec) {
        let stroke = Stroke {
            width: spec.stroke_width,
            line_cap: LineCap::Butt,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }

    if caps {
        let cap_radius = spec.stroke_width / 2.0;
        for angle in [spec.start_deg, spec.end_deg] {
            let (x, y) = spec.centerline_point(angle);
            if let Some(disc) = PathBuilder::from_circle(x, y, cap_radius) {
                pixmap.fill_path(&disc, &paint, FillRule::Winding, transform, None);
            }
        }
    }

    composite_pixmap(canvas, &pixmap, (x0, y0));
}

/// Source-over a premultiplied pixmap onto the canvas at `origin`.
///
/// The pixmap must lie inside the canvas.
fn composite_pixmap(canvas: &mut RgbaImage, pixmap: &Pixmap, origin: (u32, u32)) {
    let stride = canvas.width() as usize * 4;
    let ox = origin.0 as usize;
    let src_width = pixmap.width() as usize;
    let src = pixmap.pixels();

    canvas
        .par_chunks_exact_mut(stride)
        .skip(origin.1 as usize)
        .take(pixmap.height() as usize)
        .enumerate()
        .for_each(|(row_idx, row)| {
            let src_row = &src[row_idx * src_width..(row_idx + 1) * src_width];
            for (i, px) in src_row.iter().enumerate() {
                if px.alpha() == 0 {
                    continue;
                }
                let c = px.demultiply();
                let color = [c.red(), c.green(), c.blue(), c.alpha()];
                let start = (ox + i) * 4;
                let dst = &mut row[start..start + 4];
                if color[3] == 255 {
                    dst.copy_from_slice(&color);
                } else {
                    let mut under = Rgba([dst[0], dst[1], dst[2], dst[3]]);
                    under.blend(&Rgba(color));
                    dst.copy_from_slice(&under.0);
                }
            }
        });
}
