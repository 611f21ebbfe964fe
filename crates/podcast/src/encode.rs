use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::PodcastError;

/// Wrap audio bytes in a `data:` URI
///
/// Refuses empty audio and content types outside `audio/*`, neither of
/// which a browser could play.
pub fn encode_data_uri(audio: &[u8], content_type: &str) -> Result<String, PodcastError> {
    if audio.is_empty() {
        return Err(PodcastError::Encoding("provider returned no audio".to_owned()));
    }

    let mime = content_type.trim();
    let is_audio = mime
        .split_once('/')
        .is_some_and(|(kind, subtype)| kind.eq_ignore_ascii_case("audio") && !subtype.is_empty());

    if !is_audio || mime.contains([';', ',']) {
        return Err(PodcastError::Encoding(format!(
            "unexpected content type '{content_type}'"
        )));
    }

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(audio)))
}

/// Split a `data:<mime>;base64,<payload>` URI back into mime type and bytes
pub fn decode_data_uri(uri: &str) -> Option<(&str, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let audio = STANDARD.decode(payload).ok()?;

    Some((mime, audio))
}
