//! Reply text prepared for read-aloud playback.
//!
//! The web page speaks each model answer with the browser's speech engine.
//! Markdown marks would otherwise be read out literally, so the text goes
//! through [`speakable_text`] first.

/// Language tag replies are spoken in.
pub const SPEECH_LANG: &str = "id-ID";

/// Strip markup a speech engine would read literally.
///
/// `*` and `#` are dropped, `-` becomes a space, and runs of whitespace
/// (including line breaks) collapse to one space.
pub fn speakable_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '*' | '#'))
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
