//! Terminal renderers for planned routes.

use std::io::{self, Write};

use clearpath_core::geo::path_length;
use clearpath_core::{compass_text, format_distance, MapRenderer, RouteOverlay};

/// Human-readable turn list.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_overlay(&mut self, overlay: &RouteOverlay) -> io::Result<()> {
        writeln!(
            self.out,
            "Route: {} points, {}",
            overlay.route.len(),
            format_distance(path_length(&overlay.route))
        )?;

        if overlay.turns.is_empty() {
            writeln!(self.out, "No turns, walk straight to the destination.")?;
        }
        for (i, turn) in overlay.turns.iter().enumerate() {
            writeln!(
                self.out,
                "  {}. {} at ({:.6}, {:.6}), then head {}",
                i + 1,
                turn.instruction.label(),
                turn.point.lat,
                turn.point.lng,
                compass_text(turn.bearing_deg)
            )?;
        }

        for zone in &overlay.obstacles {
            writeln!(
                self.out,
                "  avoid ({:.6}, {:.6}) within {}",
                zone.center.lat,
                zone.center.lng,
                format_distance(zone.radius_m)
            )?;
        }
        Ok(())
    }
}

impl<W: Write> MapRenderer for TextRenderer<W> {
    fn render_route(&mut self, overlay: &RouteOverlay) {
        if let Err(e) = self.write_overlay(overlay) {
            tracing::warn!("Failed to render route: {}", e);
        }
    }

    fn clear_route(&mut self) {
        if let Err(e) = writeln!(self.out, "No route.") {
            tracing::warn!("Failed to render route: {}", e);
        }
    }
}

/// Overlay as pretty-printed JSON.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MapRenderer for JsonRenderer<W> {
    fn render_route(&mut self, overlay: &RouteOverlay) {
        let written = serde_json::to_writer_pretty(&mut self.out, overlay)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(self.out));
        if let Err(e) = written {
            tracing::warn!("Failed to render route: {}", e);
        }
    }
}
