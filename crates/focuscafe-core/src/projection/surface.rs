use std::convert::Infallible;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn covering(size: SurfaceSize) -> Self {
        Self {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Monospace,
    SansSerif,
}

/// Bold text of a given pixel size, centered on its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub size_px: u32,
    pub family: FontFamily,
}

/// A 2D drawable that can be mirrored elsewhere.
///
/// Rendering issues fills and centered text; what a "pixel" is belongs to
/// the implementation (an RGBA buffer, a terminal, a recorder in tests).
pub trait Surface {
    type Error;

    fn size(&self) -> SurfaceSize;
    fn fill(&mut self, rect: Rect, color: Rgb) -> Result<(), Self::Error>;
    fn text(
        &mut self,
        text: &str,
        center: (u32, u32),
        style: TextStyle,
        color: Rgb,
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Fill {
        rect: Rect,
        color: Rgb,
    },
    Text {
        text: String,
        center: (u32, u32),
        style: TextStyle,
        color: Rgb,
    },
}

/// In-memory surface recording the ops of the current frame.
///
/// A fill covering the whole surface starts a new frame, so the list stays
/// bounded no matter how often it is redrawn.
#[derive(Debug, Clone)]
pub struct DisplayList {
    size: SurfaceSize,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text drawn in the current frame, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Fill { .. } => None,
            })
            .collect()
    }
}

impl Surface for DisplayList {
    type Error = Infallible;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill(&mut self, rect: Rect, color: Rgb) -> Result<(), Self::Error> {
        if rect == Rect::covering(self.size) {
            self.ops.clear();
        }
        self.ops.push(DrawOp::Fill { rect, color });
        Ok(())
    }

    fn text(
        &mut self,
        text: &str,
        center: (u32, u32),
        style: TextStyle,
        color: Rgb,
    ) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            center,
            style,
            color,
        });
        Ok(())
    }
}
