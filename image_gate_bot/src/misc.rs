use std::borrow::Cow;

/// Discord refuses embed descriptions longer than this many characters.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Cut `text` down to at most `max` characters, marking the cut with an ellipsis.
/// Works on characters, not bytes, so it never splits one in half.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> Cow<'_, str> {
    let Some((cut_at, _)) = text.char_indices().nth(max) else {
        // Fits already.
        return Cow::Borrowed(text);
    };

    if max == 0 {
        return Cow::Borrowed("");
    }

    // Find where the `max - 1`th character starts, to leave room for the ellipsis.
    let keep = text
        .char_indices()
        .nth(max - 1)
        .map_or(cut_at, |(index, _)| index);

    let mut truncated = String::with_capacity(keep + '…'.len_utf8());
    truncated.push_str(&text[..keep]);
    truncated.push('…');
    Cow::Owned(truncated)
}
