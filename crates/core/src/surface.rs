//! The drawing target the renderer writes to.
//!
//! Coordinates are logical (CSS) pixels. A backend with a denser backing
//! store applies the device pixel ratio itself, the same way a 2D canvas
//! context does after `setTransform(dpr, 0, 0, dpr, 0, 0)`.
//!
//! [`DrawList`] records calls instead of drawing them. It backs the CLI's
//! frame dump and the render tests.

use glam::DVec2;
use serde::Serialize;

use crate::color::Rgba;

/// Immediate-mode 2D drawing primitives needed by the node field.
pub trait Surface {
    /// Erases everything drawn so far.
    fn clear(&mut self);

    /// Straight stroke from `from` to `to`.
    fn line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba);

    /// Disc filled with a radial gradient: `color` at the center fading
    /// linearly to fully transparent at `radius`.
    fn radial_glow(&mut self, center: DVec2, radius: f64, color: Rgba);

    /// Solid filled disc.
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);
}

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Rgba,
    },
    Glow {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
    Circle {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
}

/// A [`Surface`] that keeps the calls made on it.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn glows(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Glow { .. }))
    }
}

impl Surface for DrawList {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn radial_glow(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Glow {
            center,
            radius,
            color,
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}
