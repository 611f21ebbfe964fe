use std::str::FromStr;

use tts::Voice;

use crate::types::{SynthesisForm, SynthesisRequest};

/// Minimum length, in characters, of the description and prompt
pub const MIN_TEXT_CHARS: usize = 10;

/// Longest prompt the speech API accepts, in characters
pub const MAX_PROMPT_CHARS: usize = 4096;

/// Check a raw submission and build the typed request
///
/// Every failing field is reported, in form order, joined into one message.
pub fn validate(form: SynthesisForm) -> Result<SynthesisRequest, String> {
    let mut problems = Vec::new();

    let title = form.title.trim();
    if title.is_empty() {
        problems.push("Title is required.".to_owned());
    }

    if form.description.chars().count() < MIN_TEXT_CHARS {
        problems.push(format!("Description must be at least {MIN_TEXT_CHARS} characters."));
    }

    let voice = if form.voice_type.is_empty() {
        problems.push("Voice type is required.".to_owned());
        None
    } else {
        Voice::from_str(&form.voice_type)
            .inspect_err(|_| problems.push(format!("Unknown voice type '{}'.", form.voice_type)))
            .ok()
    };

    let prompt_chars = form.prompt.chars().count();
    if prompt_chars < MIN_TEXT_CHARS {
        problems.push(format!("Prompt must be at least {MIN_TEXT_CHARS} characters."));
    } else if prompt_chars > MAX_PROMPT_CHARS {
        problems.push(format!("Prompt must be at most {MAX_PROMPT_CHARS} characters."));
    }

    match voice {
        Some(voice) if problems.is_empty() => Ok(SynthesisRequest {
            title: title.to_owned(),
            description: form.description,
            voice,
            prompt: form.prompt,
        }),
        _ => Err(problems.join(" ")),
    }
}
