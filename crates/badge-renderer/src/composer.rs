//! Badge composition.
//!
//! Builds the status badge top to bottom on a supersampled canvas. A vertical
//! cursor is threaded through every block: each block is placed at the
//! cursor, and its measured height plus a fixed gap moves the cursor down.
//!
//! Drawing order:
//! 1. background (or flat color), 2. tier tint, 3. tier name,
//! 4. reward points, 5. discount, 6. track and progress arcs,
//! 7. endpoint icons, 8. next-tier line, 9. card, 10. two stats rows,
//! 11. downsample and encode.

use image::{Rgba, RgbaImage};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use badge_common::request::{format_thousands, progress_fraction};
use badge_common::{BadgeConfig, BadgeRequest, BadgeResult, Rgb, TierAssets, TierPolicy};

use crate::arc::{draw_capped_arc, ArcSpec};
use crate::assets::AssetProvider;
use crate::canvas::SupersampledCanvas;
use crate::png::encode_png;
use crate::text::{centered_x, draw_bold, measure, resolve_face, BadgeFont, FaceSource, FontFace};

/// Axis-aligned rectangle in output (target) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// True when the two rectangles share interior area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    fn scaled_down(x: f32, y: f32, width: f32, height: f32, scale: f32) -> Self {
        Self::new(x / scale, y / scale, width / scale, height / scale)
    }
}

/// One progress ring.
#[derive(Debug, Clone, PartialEq)]
pub struct RingLayout {
    /// Outer edge of the stroke, target pixels.
    pub radius: f32,
    pub stroke_width: f32,
    pub progress: f64,
    /// `None` when progress is zero and no foreground arc was drawn.
    pub end_angle_deg: Option<f32>,
    /// Center of the endpoint icon, target pixels.
    pub icon_anchor: Option<(f32, f32)>,
}

impl RingLayout {
    /// Degrees swept by the foreground arc.
    pub fn sweep_deg(&self) -> f32 {
        self.end_angle_deg.map(|end| end - 180.0).unwrap_or(0.0)
    }
}

/// Icon, value and label of one stats row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRowLayout {
    pub icon: Rect,
    pub value: Rect,
    pub label: Rect,
    pub value_text: String,
    pub label_text: String,
}

impl StatsRowLayout {
    /// Bounding box of the whole icon + value + label unit.
    pub fn bounds(&self) -> Rect {
        let top = self.icon.y.min(self.value.y).min(self.label.y);
        let bottom = self
            .icon
            .bottom()
            .max(self.value.bottom())
            .max(self.label.bottom());
        Rect::new(self.icon.x, top, self.label.right() - self.icon.x, bottom - top)
    }

    /// The row's text, e.g. `7,000 / 14,000 Status points`.
    pub fn text(&self) -> String {
        format!("{} {}", self.value_text, self.label_text)
    }
}

/// Where everything landed, in target pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeLayout {
    pub width: u32,
    pub height: u32,
    pub scale_factor: u32,
    pub tint_color: Rgb,
    pub tier_text: String,
    pub tier_rect: Rect,
    pub reward_text: String,
    pub reward_rect: Rect,
    pub discount_text: String,
    pub discount_rect: Rect,
    pub arc_center: (f32, f32),
    pub points_ring: RingLayout,
    pub nights_ring: RingLayout,
    pub next_tier_text: String,
    pub next_tier_rect: Rect,
    pub card_rect: Rect,
    /// True when the card asset was missing and its space was only reserved.
    pub card_reserved: bool,
    pub stats_rows: Vec<StatsRowLayout>,
    /// Bottom of the last block; content past `height` is clipped.
    pub content_bottom: f32,
    /// Asset names that could not be loaded.
    pub missing_assets: Vec<String>,
}

/// A downsampled badge ready to serve.
#[derive(Debug, Clone)]
pub struct RenderedBadge {
    pub png: Vec<u8>,
    pub layout: BadgeLayout,
}

/// Text faces for one render.
struct Faces {
    regular: FontFace,
    bold: FontFace,
}

/// Running vertical offset in canvas pixels.
#[derive(Debug, Clone, Copy)]
struct LayoutCursor {
    y: f32,
}

impl LayoutCursor {
    fn advance(&mut self, height: f32, padding: f32) {
        self.y += height + padding;
    }
}

/// Composes badges from a configuration and an asset provider.
pub struct BadgeComposer {
    config: BadgeConfig,
    policy: TierPolicy,
    assets: Arc<dyn AssetProvider>,
}

impl BadgeComposer {
    pub fn new(config: BadgeConfig, assets: Arc<dyn AssetProvider>) -> BadgeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            policy: TierPolicy,
            assets,
        })
    }

    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    /// Render and encode a badge as PNG.
    #[instrument(skip(self, request), fields(tier = %request.tier_input))]
    pub fn render_png(&self, request: &BadgeRequest) -> BadgeResult<RenderedBadge> {
        let start = Instant::now();
        let (image, layout) = self.render_image(request)?;
        let png = encode_png(&image)?;
        info!(
            bytes = png.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            missing_assets = layout.missing_assets.len(),
            "Rendered status badge"
        );
        Ok(RenderedBadge { png, layout })
    }

    /// Compose and downsample to the target size.
    pub fn render_image(&self, request: &BadgeRequest) -> BadgeResult<(RgbaImage, BadgeLayout)> {
        let (canvas, layout) = self.compose(request)?;
        Ok((canvas.downsample(), layout))
    }

    /// Compose on the supersampled canvas without downsampling.
    pub fn compose(&self, request: &BadgeRequest) -> BadgeResult<(SupersampledCanvas, BadgeLayout)> {
        let cfg = &self.config;
        let layout_cfg = &cfg.layout;
        let colors = &cfg.colors;
        let tier = self.policy.resolve_tier(request.tier);
        let mut missing = Vec::new();

        let faces = self.load_faces(&mut missing);

        // 1. Background, 2. tint
        let background = self.load_asset(&cfg.assets.background, &mut missing);
        let mut canvas =
            SupersampledCanvas::new(&cfg.canvas, background.as_ref(), colors.background)?;
        canvas.apply_tint(tier.tint_color, colors.tint_alpha);

        let scale = canvas.scale() as f32;
        let text_color = Rgba(colors.text.opaque());
        let mut cursor = LayoutCursor {
            y: canvas.px(layout_cfg.top_padding),
        };

        // 3. Tier name
        let tier_text = request.tier_display();
        let tier_font = BadgeFont::new(faces.bold.clone(), canvas.px(layout_cfg.tier_font_size));
        let tier_rect = self.draw_centered(
            &mut canvas,
            &mut cursor,
            &tier_text,
            &tier_font,
            text_color,
            layout_cfg.tier_stroke,
            layout_cfg.tier_letter_spacing,
            layout_cfg.text_gap,
        );

        // 4. Reward points
        let reward_text = request.reward_points_text();
        let reward_font =
            BadgeFont::new(faces.bold.clone(), canvas.px(layout_cfg.reward_font_size));
        let reward_rect = self.draw_centered(
            &mut canvas,
            &mut cursor,
            &reward_text,
            &reward_font,
            text_color,
            layout_cfg.reward_stroke,
            0.0,
            layout_cfg.text_gap,
        );

        // 5. Discount
        let discount_text = request.discount_text();
        let discount_font =
            BadgeFont::new(faces.regular.clone(), canvas.px(layout_cfg.discount_font_size));
        let discount_rect = self.draw_centered(
            &mut canvas,
            &mut cursor,
            &discount_text,
            &discount_font,
            text_color,
            0.0,
            0.0,
            layout_cfg.arc_gap,
        );

        // 6. Arcs
        let outer_radius = canvas.px(layout_cfg.outer_radius);
        let inner_radius = canvas.px(layout_cfg.inner_radius);
        let stroke = canvas.px(layout_cfg.arc_stroke);
        let center = (canvas.width() as f32 / 2.0, cursor.y + outer_radius);
        debug!(center_x = center.0, center_y = center.1, "Arc center");

        let points_progress = progress_fraction(request.status_points, cfg.limits.max_points);
        let nights_progress = progress_fraction(request.nights, cfg.limits.max_nights);

        let tracks = [
            ArcSpec::track(center, outer_radius, stroke, Rgba(colors.points_track.opaque())),
            ArcSpec::track(center, inner_radius, stroke, Rgba(colors.nights_track.opaque())),
        ];
        for track in &tracks {
            draw_capped_arc(canvas.image_mut(), track);
        }

        let fills = [
            (
                ArcSpec::progress(
                    center,
                    outer_radius,
                    stroke,
                    Rgba(colors.points_fill.opaque()),
                    points_progress,
                ),
                points_progress,
            ),
            (
                ArcSpec::progress(
                    center,
                    inner_radius,
                    stroke,
                    Rgba(colors.nights_fill.opaque()),
                    nights_progress,
                ),
                nights_progress,
            ),
        ];
        for (fill, progress) in &fills {
            if *progress > 0.0 {
                draw_capped_arc(canvas.image_mut(), fill);
            }
        }

        // 7. Endpoint icons
        let points_icon = self.load_asset(&cfg.assets.points_icon, &mut missing);
        let nights_icon = self.load_asset(&cfg.assets.nights_icon, &mut missing);
        let arc_icon_backing = canvas.px(layout_cfg.arc_icon_backing);
        let arc_icon_size = canvas.px(layout_cfg.arc_icon_size);
        let mut anchors = [None, None];
        for (i, ((fill, progress), icon)) in fills
            .iter()
            .zip([points_icon.as_ref(), nights_icon.as_ref()])
            .enumerate()
        {
            if *progress <= 0.0 {
                continue;
            }
            let anchor = fill.centerline_point(fill.end_deg);
            canvas.paste_icon_badge(anchor, arc_icon_backing, colors.icon_backing, icon, arc_icon_size);
            anchors[i] = Some((anchor.0 / scale, anchor.1 / scale));
        }

        let ring = |spec: &ArcSpec, progress: f64, anchor: Option<(f32, f32)>| RingLayout {
            radius: spec.radius / scale,
            stroke_width: spec.stroke_width / scale,
            progress,
            end_angle_deg: (progress > 0.0).then_some(spec.end_deg),
            icon_anchor: anchor,
        };
        let points_ring = ring(&fills[0].0, points_progress, anchors[0]);
        let nights_ring = ring(&fills[1].0, nights_progress, anchors[1]);

        // 8. Next tier line, inside the inner ring
        let mut inner_cursor = LayoutCursor {
            y: center.1 - (inner_radius - stroke) + canvas.px(layout_cfg.next_tier_offset),
        };
        let next_tier_text = format!("To achieve {} Status", tier.next_tier_label);
        let next_tier_font =
            BadgeFont::new(faces.regular.clone(), canvas.px(layout_cfg.next_tier_font_size));
        let next_tier_rect = self.draw_centered(
            &mut canvas,
            &mut inner_cursor,
            &next_tier_text,
            &next_tier_font,
            text_color,
            0.0,
            0.0,
            layout_cfg.card_gap,
        );

        // 9. Card
        let (card_rect, card_reserved) =
            self.place_card(&mut canvas, &tier, inner_cursor.y, &mut missing);
        inner_cursor.y = card_rect.bottom() * scale;

        // Stats start below whichever is lower: the card or the arcs' end caps.
        cursor.y = inner_cursor.y.max(center.1 + stroke / 2.0);
        cursor.advance(0.0, canvas.px(layout_cfg.stats_gap));
        debug!(cursor_y = cursor.y, "Stats rows start");

        // 10. Stats rows
        let rows = [
            (
                format!(
                    "{} / {}",
                    format_thousands(request.status_points),
                    format_thousands(cfg.limits.max_points)
                ),
                "Status points".to_string(),
                points_icon.as_ref(),
            ),
            (
                format!("{} / {}", request.nights, cfg.limits.max_nights),
                "nights".to_string(),
                nights_icon.as_ref(),
            ),
        ];
        let value_font = BadgeFont::new(faces.bold.clone(), canvas.px(layout_cfg.stats_font_size));
        let label_font =
            BadgeFont::new(faces.regular.clone(), canvas.px(layout_cfg.stats_font_size));
        let mut stats_rows = Vec::with_capacity(rows.len());
        for (value_text, label_text, icon) in rows {
            let row = self.draw_stats_row(
                &mut canvas,
                &mut cursor,
                value_text,
                label_text,
                icon,
                &value_font,
                &label_font,
                text_color,
            );
            stats_rows.push(row);
        }

        let content_bottom = cursor.y / scale;
        if content_bottom > cfg.canvas.target_height as f32 {
            warn!(
                content_bottom,
                height = cfg.canvas.target_height,
                "Badge content extends past the canvas"
            );
        }

        let layout = BadgeLayout {
            width: cfg.canvas.target_width,
            height: cfg.canvas.target_height,
            scale_factor: canvas.scale(),
            tint_color: tier.tint_color,
            tier_text,
            tier_rect,
            reward_text,
            reward_rect,
            discount_text,
            discount_rect,
            arc_center: (center.0 / scale, center.1 / scale),
            points_ring,
            nights_ring,
            next_tier_text,
            next_tier_rect,
            card_rect,
            card_reserved,
            stats_rows,
            content_bottom,
            missing_assets: missing,
        };

        Ok((canvas, layout))
    }

    fn load_asset(&self, name: &str, missing: &mut Vec<String>) -> Option<RgbaImage> {
        let asset = self.assets.load(name);
        if asset.is_none() {
            missing.push(name.to_string());
        }
        asset
    }

    fn load_faces(&self, missing: &mut Vec<String>) -> Faces {
        let names = &self.config.assets;
        let (regular, source) =
            resolve_face(&*self.assets, &[names.font.as_str()], &names.system_fonts);
        if source != FaceSource::Asset(0) {
            missing.push(names.font.clone());
        }

        // Bold text falls back to the regular face.
        let bold = match self.assets.load_font_face(&names.bold_font) {
            Some(face) => face,
            None => {
                missing.push(names.bold_font.clone());
                regular.clone()
            }
        };

        Faces { regular, bold }
    }

    /// Draw one centered text block at the cursor and advance past it.
    #[allow(clippy::too_many_arguments)]
    fn draw_centered(
        &self,
        canvas: &mut SupersampledCanvas,
        cursor: &mut LayoutCursor,
        text: &str,
        font: &BadgeFont,
        color: Rgba<u8>,
        stroke: f32,
        letter_spacing: f32,
        gap: f32,
    ) -> Rect {
        let scale = canvas.scale() as f32;
        let spacing = canvas.px(letter_spacing);
        let stroke_px = canvas.px(stroke).round() as u32;
        let (width, height) = measure(text, font, spacing);
        let x = centered_x(canvas.width(), width);
        let y = cursor.y.round() as i32;
        draw_bold(
            canvas.image_mut(),
            (x, y),
            text,
            font,
            color,
            stroke_px,
            spacing,
        );
        cursor.advance(height as f32, canvas.px(gap));
        Rect::scaled_down(x as f32, y as f32, width as f32, height as f32, scale)
    }

    /// Paste the tier card below the next-tier line, or reserve its space.
    fn place_card(
        &self,
        canvas: &mut SupersampledCanvas,
        tier: &TierAssets,
        y: f32,
        missing: &mut Vec<String>,
    ) -> (Rect, bool) {
        let layout_cfg = &self.config.layout;
        let scale = canvas.scale() as f32;
        let width = canvas.px(layout_cfg.card_width).round() as u32;
        let x = (canvas.width() as f32 - width as f32) / 2.0;

        match self.load_asset(tier.card_asset_name, missing) {
            Some(card) => {
                let height = canvas.paste_centered_width(&card, width, y.round() as i64);
                (
                    Rect::scaled_down(x, y.round(), width as f32, height as f32, scale),
                    false,
                )
            }
            None => {
                let height = width as f32 / layout_cfg.card_default_aspect;
                (
                    Rect::scaled_down(x, y.round(), width as f32, height.round(), scale),
                    true,
                )
            }
        }
    }

    /// Draw icon, value and label as one horizontally centered unit.
    #[allow(clippy::too_many_arguments)]
    fn draw_stats_row(
        &self,
        canvas: &mut SupersampledCanvas,
        cursor: &mut LayoutCursor,
        value_text: String,
        label_text: String,
        icon: Option<&RgbaImage>,
        value_font: &BadgeFont,
        label_font: &BadgeFont,
        color: Rgba<u8>,
    ) -> StatsRowLayout {
        let layout_cfg = &self.config.layout;
        let scale = canvas.scale() as f32;
        let backing = canvas.px(layout_cfg.stats_icon_backing);
        let icon_gap = canvas.px(layout_cfg.stats_icon_gap);
        let label_gap = canvas.px(layout_cfg.stats_label_gap);
        let icon_size = canvas.px(layout_cfg.stats_icon_size);
        let value_stroke = canvas.px(layout_cfg.stats_value_stroke).round() as u32;

        let (value_w, value_h) = measure(&value_text, value_font, 0.0);
        let (label_w, label_h) = measure(&label_text, label_font, 0.0);
        let unit_width = backing + icon_gap + value_w as f32 + label_gap + label_w as f32;
        let row_height = backing.max(value_h as f32).max(label_h as f32);

        let x0 = ((canvas.width() as f32 - unit_width) / 2.0).round();
        let row_y = cursor.y.round();

        let icon_center = (x0 + backing / 2.0, row_y + row_height / 2.0);
        canvas.paste_icon_badge(
            icon_center,
            backing,
            self.config.colors.icon_backing,
            icon,
            icon_size,
        );

        let value_x = x0 + backing + icon_gap;
        let value_y = row_y + ((row_height - value_h as f32) / 2.0).round();
        draw_bold(
            canvas.image_mut(),
            (value_x.round() as i32, value_y as i32),
            &value_text,
            value_font,
            color,
            value_stroke,
            0.0,
        );

        let label_x = value_x + value_w as f32 + label_gap;
        let label_y = row_y + ((row_height - label_h as f32) / 2.0).round();
        draw_bold(
            canvas.image_mut(),
            (label_x.round() as i32, label_y as i32),
            &label_text,
            label_font,
            color,
            0,
            0.0,
        );

        cursor.advance(row_height, canvas.px(layout_cfg.stats_row_padding));

        StatsRowLayout {
            icon: Rect::scaled_down(x0, row_y, backing, backing.max(row_height), scale),
            value: Rect::scaled_down(value_x, value_y, value_w as f32, value_h as f32, scale),
            label: Rect::scaled_down(label_x, label_y, label_w as f32, label_h as f32, scale),
            value_text,
            label_text,
        }
    }
}
