//! Renders a processed recording into the final Markdown note.

use chrono::{DateTime, Local, SecondsFormat};

use crate::domain::{Summary, Transcript};

/// Fixed categorization tag applied to every note
const NOTE_TAG: &str = "voice-note";

/// Heading that delimits the appended raw transcript
const TRANSCRIPT_HEADING: &str = "## Transcript";

/// Render the note text: front-matter (back-reference to the archived audio
/// file, escaped headline, RFC 3339 timestamp with local offset, fixed tag),
/// then the summary body verbatim, then optionally the full transcript under
/// a delimited heading.
///
/// Pure and deterministic given its inputs.
pub fn render(
    summary: &Summary,
    transcript: &Transcript,
    audio_file_name: &str,
    created: &DateTime<Local>,
    append_transcript: bool,
) -> String {
    let mut note = format!(
        "---\n\
         source: \"[[{}]]\"\n\
         headline: \"{}\"\n\
         created: {}\n\
         tags: [{}]\n\
         ---\n\
         \n\
         {}\n",
        audio_file_name,
        escape_quoted(&summary.headline),
        created.to_rfc3339_opts(SecondsFormat::Secs, false),
        NOTE_TAG,
        summary.body,
    );

    if append_transcript {
        note.push('\n');
        note.push_str(TRANSCRIPT_HEADING);
        note.push_str("\n\n");
        note.push_str(&transcript.text);
        note.push('\n');
    }

    note
}

/// Escape a value so it stays valid inside double-quoted front-matter
fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
