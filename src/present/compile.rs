use crate::{
    foundation::core::{Affine, Millis, Point, Vec2},
    guide::pose::Pose,
    trail::sim::TrailFrame,
};

/// CSS-style `hsla()` color; `s` and `l` are percentages, `a` is in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn lighten(self, by: f64) -> Self {
        Self {
            l: (self.l + by).min(100.0),
            ..self
        }
    }
}

/// How trail particles and links are painted.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrailStyle {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    /// Added to `lightness` for the particle core.
    pub core_lightness_boost: f64,
    /// Glow radius as a multiple of the particle size.
    pub glow_radius_factor: f64,
    pub link_alpha: f64,
    pub link_width_px: f64,
}

impl Default for TrailStyle {
    fn default() -> Self {
        Self {
            hue: 190.0,
            saturation: 95.0,
            lightness: 50.0,
            core_lightness_boost: 20.0,
            glow_radius_factor: 4.0,
            link_alpha: 0.1,
            link_width_px: 1.0,
        }
    }
}

impl TrailStyle {
    fn base(&self) -> Hsla {
        Hsla {
            h: self.hue,
            s: self.saturation,
            l: self.lightness,
            a: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Hsla,
}

/// Draw operation emitted by [`compile_frame`]. Coordinates are viewport pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// The guide glyph, placed by `transform`.
    Glyph { transform: Affine, opacity: f64 },
    RadialGlow {
        center: Point,
        radius: f64,
        stops: [GradientStop; 3],
    },
    Disc {
        center: Point,
        radius: f64,
        color: Hsla,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Hsla,
    },
    /// Horizontal bar scaled from its left edge.
    ProgressBar { scale_x: f64 },
}

/// Everything the stage wants on screen for one frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct StageFrame {
    pub time: Millis,
    /// Raw scroll progress for the bar; `None` once the capability gate is off.
    pub progress: Option<f64>,
    pub guide: Option<Pose>,
    pub trail: Option<TrailFrame>,
}

/// One frame's draw operations, back to front.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct DisplayList {
    pub frame: u64,
    pub time_ms: u64,
    pub ops: Vec<DrawOp>,
}

pub fn compile_frame(index: u64, frame: &StageFrame, style: &TrailStyle) -> DisplayList {
    let mut ops = Vec::new();

    if let Some(trail) = &frame.trail {
        compile_trail(trail, style, &mut ops);
    }

    if let Some(pose) = frame.guide
        && pose.opacity > 0.0
    {
        ops.push(DrawOp::Glyph {
            transform: pose.to_affine(),
            opacity: pose.opacity,
        });
    }

    if let Some(scale_x) = frame.progress {
        ops.push(DrawOp::ProgressBar { scale_x });
    }

    DisplayList {
        frame: index,
        time_ms: frame.time.0,
        ops,
    }
}

fn compile_trail(trail: &TrailFrame, style: &TrailStyle, ops: &mut Vec<DrawOp>) {
    let base = style.base();
    let scroll = Vec2::new(0.0, trail.viewport_top);

    for dot in &trail.dots {
        let center = dot.center - scroll;
        ops.push(DrawOp::RadialGlow {
            center,
            radius: dot.size * style.glow_radius_factor,
            stops: [
                GradientStop {
                    offset: 0.0,
                    color: base.with_alpha(dot.opacity),
                },
                GradientStop {
                    offset: 0.5,
                    color: base.with_alpha(dot.opacity * 0.3),
                },
                GradientStop {
                    offset: 1.0,
                    color: base.with_alpha(0.0),
                },
            ],
        });
        ops.push(DrawOp::Disc {
            center,
            radius: dot.size,
            color: base
                .lighten(style.core_lightness_boost)
                .with_alpha(dot.opacity),
        });
    }

    let link = base.with_alpha(style.link_alpha);
    for (from, to) in &trail.links {
        ops.push(DrawOp::Line {
            from: *from - scroll,
            to: *to - scroll,
            width: style.link_width_px,
            color: link,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/compile.rs"]
mod tests;
