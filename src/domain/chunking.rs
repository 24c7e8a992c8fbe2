/// Default fragment size, in characters of encoded text.
/// Kept stable so previously stored attachments keep their layout.
pub const DEFAULT_CHUNK_SIZE: usize = 800 * 1024;

/// Number of fragments `split_into_chunks` produces for a payload of
/// `payload_len` characters.
pub fn chunk_count(payload_len: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    payload_len.div_ceil(chunk_size)
}

/// Slices `payload` into consecutive windows of `chunk_size` characters.
/// The final fragment may be shorter. An empty payload yields no fragments.
pub fn split_into_chunks(payload: &str, chunk_size: usize) -> Vec<String> {
    if chunk_size == 0 || payload.is_empty() {
        return Vec::new();
    }

    // Encoded payloads are ASCII, so byte windows are character windows.
    if payload.is_ascii() {
        return payload
            .as_bytes()
            .chunks(chunk_size)
            .map(|window| String::from_utf8_lossy(window).into_owned())
            .collect();
    }

    let mut chunks = Vec::with_capacity(chunk_count(payload.chars().count(), chunk_size));
    let mut current = String::new();
    let mut in_current = 0;
    for c in payload.chars() {
        current.push(c);
        in_current += 1;
        if in_current == chunk_size {
            chunks.push(std::mem::take(&mut current));
            in_current = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Concatenates fragments in the order given.
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    let total: usize = chunks.iter().map(|c| c.as_ref().len()).sum();
    let mut out = String::with_capacity(total);
    for chunk in chunks {
        out.push_str(chunk.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_million_characters_split_into_three_fragments() {
        let payload = "A".repeat(2_000_000);
        let chunks = split_into_chunks(&payload, 800_000);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 800_000);
        assert_eq!(chunks[1].len(), 800_000);
        assert_eq!(chunks[2].len(), 400_000);
        assert_eq!(join_chunks(&chunks), payload);
    }

    #[test]
    fn fragment_count_matches_ceiling_division() {
        let payload: String = (0..1_000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        for chunk_size in [1, 2, 3, 7, 64, 999, 1_000, 1_001, 4_096] {
            for len in [0, 1, 2, 63, 64, 65, 500, 999, 1_000] {
                let slice = &payload[..len];
                let chunks = split_into_chunks(slice, chunk_size);
                assert_eq!(chunks.len(), chunk_count(len, chunk_size));
                assert_eq!(chunks.len(), len.div_ceil(chunk_size));
                assert_eq!(join_chunks(&chunks), slice);
            }
        }
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_fragment() {
        let chunks = split_into_chunks("abcdef", 3);
        assert_eq!(chunks, vec!["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn empty_payload_yields_no_fragments() {
        assert!(split_into_chunks("", 10).is_empty());
        assert_eq!(chunk_count(0, 10), 0);
    }

    #[test]
    fn windows_count_characters_not_bytes() {
        let payload = "ééééé";
        let chunks = split_into_chunks(payload, 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
        assert_eq!(join_chunks(&chunks), payload);
    }
}
