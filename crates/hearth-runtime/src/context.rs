//! Synthesis context assembly.

use hearth_core::Document;

/// The marker used when retrieval produced no candidates.
///
/// The synthesizer always receives a non-empty context; with nothing
/// retrieved it is told so explicitly instead of being handed silence.
pub const NO_MATCH_MARKER: &str =
    "No devices matched. If the user wants to control a device, guess from context.";

/// Assemble the textual context handed to command generation.
///
/// Candidate contents are truncated to `snippet_max_chars` characters each.
/// A music URI, when present, leads the context so the model uses it rather
/// than inventing one.
pub fn build_context(
    music_uri: Option<&str>,
    docs: &[Document],
    snippet_max_chars: usize,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(uri) = music_uri {
        parts.push(format!(
            "The user wants music, play it on a media player using this URI => {uri}"
        ));
    }

    if docs.is_empty() {
        parts.push(NO_MATCH_MARKER.to_string());
    } else {
        for doc in docs {
            parts.push(truncate_chars(&doc.content, snippet_max_chars));
        }
    }

    parts.join("\n\n")
}

/// Truncate on a character boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
