//! # duoqr
//!
//! A Rust library for overlaying two QR codes into a single composite image.
//!
//! Each text is encoded as an ordinary QR code. The two module grids are then merged cell by
//! cell: where they agree the cell is painted solid, where they disagree the cell is split along
//! its top-left to bottom-right diagonal, the first code taking the upper-right triangle and the
//! second code the lower-left one. Depending on scanning angle and decoder tolerance either
//! payload can be recovered.
//!
//! ## Features
//!
//! - Four error correction levels, defaulting to High to maximize agreeing cells.
//! - Configurable cell size, quiet zone and colors.
//! - Output as in-memory image buffers, PNG bytes, base64 data URIs, files or SVG.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! duoqr = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Generate a composite image and save it:
//!
//! ```no_run
//! use duoqr::helper::{generate_dual_image, save_image};
//! use duoqr::qrcode::QrCodeEcc;
//! use duoqr::render::RenderConfig;
//!
//! fn main() -> duoqr::Result<()> {
//!     let img = generate_dual_image(
//!         "https://example.com/first",
//!         "https://example.com/second",
//!         QrCodeEcc::High,
//!         &RenderConfig::default(),
//!     )?;
//!     save_image(&img, Some("output"), Some("dual_qr"))?;
//!     Ok(())
//! }
//! ```
//!
//! Merge two matrices you already have:
//!
//! ```rust
//! use duoqr::qrcode::ModuleMatrix;
//! use duoqr::render::{render, RenderConfig};
//!
//! let a = ModuleMatrix::from_rows(&[[true, true], [false, false]]).unwrap();
//! let b = ModuleMatrix::from_rows(&[[true, false], [false, true]]).unwrap();
//! let img = render(&a, &b, &RenderConfig::default()).unwrap();
//! assert_eq!(img.dimensions(), (80, 80));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Encoding text into module matrices.
//! - [`render`]: The composite renderer.
//! - [`helper`]: PNG, data URI, file and SVG output, plus the two-text entry points.

#![forbid(unsafe_code)]

pub mod error;
pub mod helper;
pub mod qrcode;
pub mod render;

pub use error::{Error, Result};
