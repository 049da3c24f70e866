//! Encoder adapter.
//!
//! Turns text into a square grid of dark/light modules. The actual QR Code Model 2
//! encoding (segment selection, Reed–Solomon codewords, masking) is delegated to the
//! [`qrcode`](https://docs.rs/qrcode) crate; this module only fixes the error correction
//! level and hands back a plain boolean matrix for the compositor.
use std::fmt;
use std::str::FromStr;

use ::qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

use crate::error::{Error, Result};

/// The error correction level in a QR Code symbol.
///
/// Higher levels tolerate more damage at the cost of capacity. For dual codes the
/// redundancy also raises the share of cells where the two payloads agree.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum QrCodeEcc {
    /// The QR Code can tolerate about  7% erroneous codewords.
    Low,
    /// The QR Code can tolerate about 15% erroneous codewords.
    Medium,
    /// The QR Code can tolerate about 25% erroneous codewords.
    Quartile,
    /// The QR Code can tolerate about 30% erroneous codewords.
    #[default]
    High,
}

impl QrCodeEcc {
    /// Returns the single-letter name used in the QR standard.
    pub fn letter(self) -> char {
        match self {
            QrCodeEcc::Low => 'L',
            QrCodeEcc::Medium => 'M',
            QrCodeEcc::Quartile => 'Q',
            QrCodeEcc::High => 'H',
        }
    }

    fn ec_level(self) -> EcLevel {
        match self {
            QrCodeEcc::Low => EcLevel::L,
            QrCodeEcc::Medium => EcLevel::M,
            QrCodeEcc::Quartile => EcLevel::Q,
            QrCodeEcc::High => EcLevel::H,
        }
    }
}

impl fmt::Display for QrCodeEcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for QrCodeEcc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(QrCodeEcc::Low),
            "m" | "medium" => Ok(QrCodeEcc::Medium),
            "q" | "quartile" => Ok(QrCodeEcc::Quartile),
            "h" | "high" => Ok(QrCodeEcc::High),
            other => Err(Error::InvalidConfig(format!(
                "unknown error correction level '{}', expected one of L, M, Q, H",
                other
            ))),
        }
    }
}

/// A square grid of QR modules, `true` meaning dark.
///
/// Immutable once built. Cells are stored row-major.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Builds a matrix from a flat row-major vector of `size * size` modules.
    pub fn from_modules(size: usize, modules: Vec<bool>) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig("module matrix must not be empty".into()));
        }
        if size.checked_mul(size) != Some(modules.len()) {
            return Err(Error::InvalidConfig(format!(
                "expected {} modules for a {}x{} matrix, got {}",
                size.saturating_mul(size),
                size,
                size,
                modules.len()
            )));
        }
        Ok(Self { size, modules })
    }

    /// Builds a matrix from explicit rows. Every row must be as long as there are rows.
    ///
    /// # Example
    ///
    /// ```rust
    /// use duoqr::qrcode::ModuleMatrix;
    ///
    /// let m = ModuleMatrix::from_rows(&[vec![true, false], vec![false, true]]).unwrap();
    /// assert_eq!(m.size(), 2);
    /// assert!(m.get(1, 1));
    /// ```
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let size = rows.len();
        let mut modules = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(Error::InvalidConfig(format!(
                    "row {} has {} modules, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            modules.extend_from_slice(row);
        }
        Self::from_modules(size, modules)
    }

    /// The width and height of this matrix, measured in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the module at the given row and column, `true` for dark.
    ///
    /// Panics if either coordinate is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.size && col < self.size, "module coordinate out of bounds");
        self.modules[row * self.size + col]
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }
}

/// Encodes a text string into a module matrix at the given error correction level.
///
/// The smallest QR version that can hold the data is chosen by the encoder, so texts of
/// very different lengths may yield matrices of different sizes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] when the text does not fit in any QR version at `ecc`.
///
/// # Example
///
/// ```rust
/// use duoqr::qrcode::{encode_text, QrCodeEcc};
///
/// let m = encode_text("A", QrCodeEcc::High).unwrap();
/// assert_eq!(m.size(), 21);
/// ```
pub fn encode_text(text: &str, ecc: QrCodeEcc) -> Result<ModuleMatrix> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), ecc.ec_level())?;
    let size = code.width();
    let modules = code
        .to_colors()
        .into_iter()
        .map(|c| c == Color::Dark)
        .collect();
    let matrix = ModuleMatrix::from_modules(size, modules)?;
    debug!(bytes = text.len(), size, dark = matrix.dark_count(), ecc = %ecc, "encoded QR module matrix");
    Ok(matrix)
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_short_text_is_version_one() {
        let m = encode_text("A", QrCodeEcc::High).unwrap();
        assert_eq!(m.size(), 21);
        // Top-left finder pattern corner is always dark, the separator next to it light.
        assert!(m.get(0, 0));
        assert!(!m.get(7, 7));
        assert!(m.dark_count() > 0 && m.dark_count() < 21 * 21);
    }

    #[test]
    fn test_longer_text_grows_version() {
        let short = encode_text("A", QrCodeEcc::High).unwrap();
        let long = encode_text(&"x".repeat(200), QrCodeEcc::High).unwrap();
        assert!(long.size() > short.size());
        assert_eq!((long.size() - 17) % 4, 0);
    }

    #[test]
    fn test_too_long_text_is_encoding_error() {
        let err = encode_text(&"x".repeat(4000), QrCodeEcc::High).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = ModuleMatrix::from_rows(&[vec![true, false], vec![true]]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(ModuleMatrix::from_rows::<Vec<bool>>(&[]).is_err());
    }

    #[test]
    fn test_parse_ecc() {
        assert_eq!("h".parse::<QrCodeEcc>().unwrap(), QrCodeEcc::High);
        assert_eq!("Quartile".parse::<QrCodeEcc>().unwrap(), QrCodeEcc::Quartile);
        assert!("X".parse::<QrCodeEcc>().is_err());
        assert_eq!(QrCodeEcc::default(), QrCodeEcc::High);
        assert_eq!(QrCodeEcc::Medium.to_string(), "M");
    }
}
