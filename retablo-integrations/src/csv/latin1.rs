//! ISO-8859-1 maps every byte to the code point of the same value

/// Decodes latin-1 bytes. Never fails.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Encodes text as latin-1, replacing anything outside of it with `?`
///
/// Returns the bytes and the number of replaced characters.
pub fn encode(text: &str) -> (Vec<u8>, usize) {
    let mut replaced = 0;
    let bytes = text
        .chars()
        .map(|c| {
            u8::try_from(u32::from(c)).unwrap_or_else(|_| {
                replaced += 1;
                b'?'
            })
        })
        .collect();

    (bytes, replaced)
}
