use crate::error::{Error, Result};
use crate::qrcode::{encode_text, ModuleMatrix, QrCodeEcc};
use crate::render::{render, CellKind, RenderConfig};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{ImageFormat, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/*---- Utilities ----*/

/// Encodes a rendered image as PNG bytes.
pub fn to_png_bytes(img: &RgbImage) -> Result<Vec<u8>> {
	let mut buf = Vec::new();
	img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
	Ok(buf)
}

/// Encodes a rendered image as a `data:image/png;base64,...` URI, ready for an `<img src>`.
pub fn to_data_uri(img: &RgbImage) -> Result<String> {
	let png = to_png_bytes(img)?;
	Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

/// Saves a rendered image as a PNG file.
///
/// # Arguments
///
/// * `img` - The composite image to save.
/// * `directory_path` - Optional. The directory where the image will be saved. Defaults to "generated".
/// * `filename` - Optional. The file name, with or without the `.png` suffix. Defaults to a millisecond timestamp.
///
/// # Returns
///
/// The path of the written file. The directory is created if it does not exist.
///
/// # Example
///
/// ```no_run
/// use duoqr::helper::{generate_dual_image, save_image};
/// use duoqr::qrcode::QrCodeEcc;
/// use duoqr::render::RenderConfig;
///
/// let img = generate_dual_image("https://a.example", "https://b.example",
///     QrCodeEcc::High, &RenderConfig::default()).unwrap();
/// save_image(&img, Some("images"), Some("dual_qr")).unwrap();
/// ```
pub fn save_image(img: &RgbImage, directory_path: Option<&str>, filename: Option<&str>) -> Result<PathBuf> {
	let directory_path = directory_path.unwrap_or("generated");
	let filename = match filename {
		Some(name) if name.ends_with(".png") => name.to_string(),
		Some(name) => format!("{}.png", name),
		None => {
			let millis = SystemTime::now()
				.duration_since(UNIX_EPOCH)
				.map(|d| d.as_millis())
				.unwrap_or_default();
			format!("{}.png", millis)
		}
	};

	// Check if the directory exists, create it if it doesn't
	if !Path::new(directory_path).exists() {
		fs::create_dir_all(directory_path)?;
	}

	let file_path = Path::new(directory_path).join(filename);
	fs::write(&file_path, to_png_bytes(img)?)?;
	info!(path = %file_path.display(), "saved composite QR image");
	Ok(file_path)
}

fn hex(color: [u8; 3]) -> String {
	format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Parses an `RRGGBB` color, with or without a leading `#`.
pub fn parse_hex_color(s: &str) -> Result<[u8; 3]> {
	let digits = s.trim().trim_start_matches('#');
	if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
		return Err(Error::InvalidConfig(format!("invalid color '{}', expected RRGGBB", s)));
	}
	let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16)
		.map_err(|e| Error::InvalidConfig(e.to_string()));
	Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Returns a string of SVG code depicting the composite of two module matrices.
///
/// Coordinates are in module units with a border of `config.margin_cells`. Agreeing dark
/// cells are unit squares; each split cell contributes the one dark triangle it has.
/// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(a: &ModuleMatrix, b: &ModuleMatrix, config: &RenderConfig) -> Result<String> {
	if a.size() != b.size() {
		return Err(Error::DimensionMismatch { left: a.size(), right: b.size() });
	}
	let border = config.margin_cells as usize;
	let dimension = a.size() + 2 * border;
	let mut result = String::new();
	result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
	result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
	result += &format!(
		"<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n", dimension);
	result += &format!("\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n", hex(config.light_color));

	let mut parts = Vec::new();
	for row in 0..a.size() {
		for col in 0..a.size() {
			let (x, y) = (col + border, row + border);
			match CellKind::classify(a.get(row, col), b.get(row, col)) {
				CellKind::Solid(true) => parts.push(format!("M{},{}h1v1h-1z", x, y)),
				CellKind::Solid(false) => {}
				// Upper-right triangle: top-left, top-right, bottom-right.
				CellKind::Split { upper: true, .. } => parts.push(format!("M{},{}h1v1z", x, y)),
				// Lower-left triangle: top-left, bottom-left, bottom-right.
				CellKind::Split { .. } => parts.push(format!("M{},{}v1h1z", x, y)),
			}
		}
	}
	result += &format!("\t<path d=\"{}\" fill=\"{}\"/>\n", parts.join(" "), hex(config.dark_color));
	result += "</svg>\n";
	Ok(result)
}

/*---- Dual QR generation ----*/

fn encode_pair(first: &str, second: &str, ecc: QrCodeEcc) -> Result<(ModuleMatrix, ModuleMatrix)> {
	if first.is_empty() {
		return Err(Error::EmptyInput { which: "first" });
	}
	if second.is_empty() {
		return Err(Error::EmptyInput { which: "second" });
	}
	let a = encode_text(first, ecc)?;
	let b = encode_text(second, ecc)?;
	debug!(first = a.size(), second = b.size(), "encoded both payloads");
	Ok((a, b))
}

/// Generates a composite QR image buffer from two texts.
///
/// # Arguments
///
/// * `first` - Text for the code owning the upper-right half of split cells.
/// * `second` - Text for the code owning the lower-left half of split cells.
/// * `ecc` - Error correction level used for both codes.
/// * `config` - Cell size, margin and colors.
///
/// # Errors
///
/// [`Error::EmptyInput`] if either text is empty, [`Error::Encoding`] if a text does not
/// fit, [`Error::DimensionMismatch`] if the two texts need different QR versions.
///
/// # Example
///
/// ```
/// use duoqr::helper::generate_dual_image;
/// use duoqr::qrcode::QrCodeEcc;
/// use duoqr::render::RenderConfig;
///
/// let img = generate_dual_image("A", "BBBBBBBBBB", QrCodeEcc::High, &RenderConfig::default()).unwrap();
/// assert_eq!(img.dimensions(), (232, 232));
/// ```
pub fn generate_dual_image(first: &str, second: &str, ecc: QrCodeEcc, config: &RenderConfig) -> Result<RgbImage> {
	let (a, b) = encode_pair(first, second, ecc)?;
	render(&a, &b, config)
}

/// Same as [`generate_dual_image`], encoded as PNG bytes.
pub fn generate_dual_png(first: &str, second: &str, ecc: QrCodeEcc, config: &RenderConfig) -> Result<Vec<u8>> {
	to_png_bytes(&generate_dual_image(first, second, ecc, config)?)
}

/// Same as [`generate_dual_image`], encoded as a PNG data URI.
pub fn generate_dual_data_uri(first: &str, second: &str, ecc: QrCodeEcc, config: &RenderConfig) -> Result<String> {
	to_data_uri(&generate_dual_image(first, second, ecc, config)?)
}

/// Same as [`generate_dual_image`], rendered as SVG.
pub fn generate_dual_svg(first: &str, second: &str, ecc: QrCodeEcc, config: &RenderConfig) -> Result<String> {
	let (a, b) = encode_pair(first, second, ecc)?;
	to_svg_string(&a, &b, config)
}

// Tests
#[cfg(test)]
mod tests {
	use super::*;
	use crate::render::{BLACK, WHITE};

	fn matrix(rows: &[&str]) -> ModuleMatrix {
		let rows: Vec<Vec<bool>> = rows.iter().map(|r| r.chars().map(|c| c == '#').collect()).collect();
		ModuleMatrix::from_rows(&rows).unwrap()
	}

	#[test]
	fn test_to_svg_string() {
		let a = matrix(&["##", ".."]);
		let b = matrix(&["#.", ".#"]);
		let svg = to_svg_string(&a, &b, &RenderConfig::default()).unwrap();

		assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
		assert!(svg.contains("viewBox=\"0 0 10 10\""));
		assert!(svg.contains("M4,4h1v1h-1z"));
		assert!(svg.contains("M5,4h1v1z"));
		assert!(svg.contains("M5,5v1h1z"));
		assert_eq!(svg.matches('M').count(), 3);
	}

	#[test]
	fn test_data_uri() {
		let img = generate_dual_image("A", "B", QrCodeEcc::High, &RenderConfig::default()).unwrap();
		let uri = to_data_uri(&img).unwrap();
		let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
		let png = BASE64.decode(payload).unwrap();
		assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
		assert_eq!(png, to_png_bytes(&img).unwrap());
	}

	#[test]
	fn test_empty_input_rejected() {
		let config = RenderConfig::default();
		let err = generate_dual_image("", "B", QrCodeEcc::High, &config).unwrap_err();
		assert!(matches!(err, Error::EmptyInput { which: "first" }));
		let err = generate_dual_png("A", "", QrCodeEcc::High, &config).unwrap_err();
		assert!(matches!(err, Error::EmptyInput { which: "second" }));
	}

	#[test]
	fn test_whitespace_is_a_valid_payload() {
		let img = generate_dual_image("A", "   ", QrCodeEcc::High, &RenderConfig::default()).unwrap();
		assert_eq!(img.dimensions(), (232, 232));
	}

	#[test]
	fn test_parse_hex_color() {
		assert_eq!(parse_hex_color("#000000").unwrap(), BLACK);
		assert_eq!(parse_hex_color("ffffff").unwrap(), WHITE);
		assert_eq!(parse_hex_color("FFA500").unwrap(), [255, 165, 0]);
		assert!(parse_hex_color("#fff").is_err());
		assert!(parse_hex_color("zzzzzz").is_err());
	}

	#[test]
	fn test_save_image() {
		let dir = tempfile::tempdir().unwrap();
		let out = dir.path().join("nested");
		let img = generate_dual_image("A", "B", QrCodeEcc::High, &RenderConfig::default()).unwrap();
		let path = save_image(&img, out.to_str(), Some("dual")).unwrap();
		assert_eq!(path, out.join("dual.png"));
		let reread = image::open(&path).unwrap().to_rgb8();
		assert_eq!(reread, img);
	}
}
