use anyhow::Error;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::RgbImage;

const DATA_URI_SCHEME: &str = "data:image/";
const DATA_URI_MARKER: &str = ";base64,";

// Browsers commonly submit captures as `data:image/<subtype>;base64,<payload>`.
fn strip_data_uri_prefix(image_b64: &str) -> &str {
    if let Some(rest) = image_b64.strip_prefix(DATA_URI_SCHEME) {
        if let Some(idx) = rest.find(DATA_URI_MARKER) {
            return &rest[idx + DATA_URI_MARKER.len()..];
        }
    }
    image_b64
}

/// Decodes a base64 payload, bare or data-URI wrapped, into an 8-bit RGB
/// pixel buffer.
pub fn decode_base64_image(image_b64: &str) -> Result<RgbImage, Error> {

    // Decode base64 to raw bytes
    let image_data = match BASE64.decode(strip_data_uri_prefix(image_b64)) {
        Ok(image_data) => image_data,
        Err(e) => {
            return Err(Error::from(e))
        }
    };

    // Decode the image and force 3-channel RGB
    let decoded = match image::load_from_memory(&image_data) {
        Ok(decoded) => decoded,
        Err(e) => {
            return Err(Error::from(e))
        }
    };

    Ok(decoded.to_rgb8())
}
