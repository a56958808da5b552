use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use floodrisk_core::{ImageInput, ImageMime, ValidationError};

/// `data:<mime>;base64,<payload>`
pub fn encode_data_url(image: &ImageInput) -> String {
    format!(
        "data:{};base64,{}",
        image.mime().as_str(),
        STANDARD.encode(image.bytes())
    )
}

/// Parse a base64 data URL back into a validated image.
pub fn decode_data_url(url: &str) -> Result<ImageInput, ValidationError> {
    let mime = ImageMime::from_data_url(url)?;
    let payload = url
        .split_once(',')
        .map(|(_, payload)| payload)
        .ok_or(ValidationError::EmptyImage)?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ValidationError::NotAnImage(format!("invalid base64 payload: {e}")))?;
    ImageInput::new(bytes, mime)
}
