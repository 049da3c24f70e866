//! Composite rendering of two module matrices into one raster.
//!
//! Cells where both codes agree are painted solid. Cells where they disagree are split
//! along the diagonal from the top-left to the bottom-right corner: the first code owns
//! the upper-right triangle, the second code the lower-left one. The orientation never
//! changes within an image.
use image::{ImageBuffer, Rgb, RgbImage};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::qrcode::ModuleMatrix;

/// Pure black, the default dark module color.
pub const BLACK: [u8; 3] = [0, 0, 0];
/// Pure white, the default light module and background color.
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Rendering options for composite images.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RenderConfig {
    /// Pixel edge length of one module. Must be positive.
    pub cell_size: u32,
    /// Quiet zone width, in modules.
    pub margin_cells: u32,
    /// RGB color of dark modules.
    pub dark_color: [u8; 3],
    /// RGB color of light modules and the background.
    pub light_color: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: 8,
            margin_cells: 4,
            dark_color: BLACK,
            light_color: WHITE,
        }
    }
}

impl RenderConfig {
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_margin_cells(mut self, margin_cells: u32) -> Self {
        self.margin_cells = margin_cells;
        self
    }

    pub fn with_colors(mut self, dark: [u8; 3], light: [u8; 3]) -> Self {
        self.dark_color = dark;
        self.light_color = light;
        self
    }

    /// Quiet zone width in pixels.
    pub fn margin_px(&self) -> Result<u32> {
        self.margin_cells
            .checked_mul(self.cell_size)
            .ok_or_else(|| Error::InvalidConfig("margin overflows pixel range".into()))
    }

    /// Edge length in pixels of the canvas for an `n × n` matrix:
    /// `n * cell_size + 2 * margin_cells * cell_size`.
    ///
    /// Fails unless the RGB pixel buffer for that edge is addressable in memory.
    pub fn canvas_edge(&self, n: usize) -> Result<u32> {
        if self.cell_size == 0 {
            return Err(Error::InvalidConfig("cell size must be positive".into()));
        }
        let overflow = || Error::InvalidConfig(format!("canvas for a {}x{} matrix is too large", n, n));
        let n = u32::try_from(n).map_err(|_| overflow())?;
        let edge = n
            .checked_mul(self.cell_size)
            .and_then(|grid| self.margin_px().ok()?.checked_mul(2)?.checked_add(grid))
            .ok_or_else(overflow)?;
        u64::from(edge)
            .checked_mul(u64::from(edge))
            .and_then(|px| px.checked_mul(3))
            .and_then(|bytes| usize::try_from(bytes).ok())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(overflow)?;
        Ok(edge)
    }

    fn color(&self, dark: bool) -> Rgb<u8> {
        Rgb(if dark { self.dark_color } else { self.light_color })
    }
}

/// How a single cell is painted, derived from the pair of modules at one coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellKind {
    /// Both codes agree; the whole cell takes this color (`true` = dark).
    Solid(bool),
    /// The codes disagree; `upper` is the first code's module, `lower` the second's.
    Split { upper: bool, lower: bool },
}

impl CellKind {
    pub fn classify(a: bool, b: bool) -> Self {
        if a == b {
            CellKind::Solid(a)
        } else {
            CellKind::Split { upper: a, lower: b }
        }
    }

    /// Whether the local pixel `(dx, dy)` of a cell is dark.
    ///
    /// Pixels strictly above the diagonal (`dx > dy`) form the upper-right triangle.
    /// The diagonal itself goes to the lower-left triangle.
    pub fn is_dark_at(self, dx: u32, dy: u32) -> bool {
        match self {
            CellKind::Solid(dark) => dark,
            CellKind::Split { upper, lower } => {
                if dx > dy {
                    upper
                } else {
                    lower
                }
            }
        }
    }
}

fn check_dimensions(a: &ModuleMatrix, b: &ModuleMatrix) -> Result<usize> {
    if a.size() != b.size() {
        return Err(Error::DimensionMismatch {
            left: a.size(),
            right: b.size(),
        });
    }
    Ok(a.size())
}

/// Renders two module matrices into a single composite image.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if the matrices are not the same size. No image is produced.
/// - [`Error::InvalidConfig`] if the cell size is zero or the canvas would not fit in `u32`.
///
/// # Example
///
/// ```rust
/// use duoqr::qrcode::{encode_text, QrCodeEcc};
/// use duoqr::render::{render, RenderConfig};
///
/// let a = encode_text("https://example.com/a", QrCodeEcc::High).unwrap();
/// let b = encode_text("https://example.com/b", QrCodeEcc::High).unwrap();
/// let img = render(&a, &b, &RenderConfig::default()).unwrap();
/// assert_eq!(img.width(), (a.size() as u32 + 8) * 8);
/// ```
pub fn render(a: &ModuleMatrix, b: &ModuleMatrix, config: &RenderConfig) -> Result<RgbImage> {
    let n = check_dimensions(a, b)?;
    paint(n, config, |row, col| CellKind::classify(a.get(row, col), b.get(row, col)))
}

/// Renders a single matrix with the same geometry as [`render`].
pub fn render_single(matrix: &ModuleMatrix, config: &RenderConfig) -> Result<RgbImage> {
    paint(matrix.size(), config, |row, col| CellKind::Solid(matrix.get(row, col)))
}

/// Number of cells that will be drawn with a diagonal split.
pub fn conflict_count(a: &ModuleMatrix, b: &ModuleMatrix) -> Result<usize> {
    let n = check_dimensions(a, b)?;
    let mut count = 0;
    for row in 0..n {
        for col in 0..n {
            if a.get(row, col) != b.get(row, col) {
                count += 1;
            }
        }
    }
    Ok(count)
}

fn paint<F>(n: usize, config: &RenderConfig, cell: F) -> Result<RgbImage>
where
    F: Fn(usize, usize) -> CellKind,
{
    let edge = config.canvas_edge(n)?;
    let margin = config.margin_px()?;
    let cs = config.cell_size;
    let mut img: RgbImage = ImageBuffer::from_pixel(edge, edge, config.color(false));
    debug!(modules = n, cell_size = cs, margin, edge, "rendering composite canvas");

    let mut splits = 0usize;
    for row in 0..n {
        for col in 0..n {
            let kind = cell(row, col);
            if let CellKind::Split { .. } = kind {
                splits += 1;
            }
            // Both fit in u32 since canvas_edge succeeded.
            let x = col as u32 * cs + margin;
            let y = row as u32 * cs + margin;
            for dy in 0..cs {
                for dx in 0..cs {
                    img.put_pixel(x + dx, y + dy, config.color(kind.is_dark_at(dx, dy)));
                }
            }
        }
    }
    trace!(splits, "painted all cells");
    Ok(img)
}
