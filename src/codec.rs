use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

use crate::error::AnalysisError;

/// Everything up to and including this marker is a media-type prefix
pub const DATA_URL_MARKER: &str = "base64,";
pub const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Drop a `data:<type>;base64,` prefix if present
pub fn strip_data_url_prefix(payload: &str) -> &str {
    match payload.split_once(DATA_URL_MARKER) {
        Some((_, data)) => data,
        None => payload,
    }
}

/// Decode a transport-encoded photo into an RGB buffer.
pub fn decode_image(payload: &str) -> Result<RgbImage, AnalysisError> {
    let data: String = strip_data_url_prefix(payload)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if data.is_empty() {
        return Err(AnalysisError::EmptyPayload);
    }

    let bytes = STANDARD
        .decode(data.as_bytes())
        .map_err(|e| AnalysisError::Decode(e.to_string()))?;
    let img = image::load_from_memory(&bytes).map_err(|e| AnalysisError::Decode(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(AnalysisError::Decode("image has no pixels".to_string()));
    }

    Ok(img.to_rgb8())
}

/// Encode as JPEG and wrap in a data URL
pub fn encode_jpeg_data_url(img: &RgbImage, quality: u8) -> Result<String, AnalysisError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(img)
        .map_err(|e| AnalysisError::Encode(e.to_string()))?;

    Ok(format!("{}{}", JPEG_DATA_URL_PREFIX, STANDARD.encode(&bytes)))
}
