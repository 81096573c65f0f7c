//! Splitting long messages for transports with a length cap.

/// Splits `text` into sequential chunks of at most `max_chars` characters.
///
/// Chunks break after a newline whenever possible; a single line longer than
/// the cap is split mid-line. Concatenating the chunks yields `text` again.
/// A cap of zero means unlimited.
pub fn chunk_message(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_chars {
            for ch in line.chars() {
                if current_len == max_chars {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push(ch);
                current_len += 1;
            }
        } else {
            current.push_str(line);
            current_len += line_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_one_chunk() {
        assert_eq!(chunk_message("hello\n", 100), vec!["hello\n"]);
    }

    #[test]
    fn zero_cap_is_unlimited() {
        let text = "a\n".repeat(500);
        assert_eq!(chunk_message(&text, 0), vec![text]);
    }

    #[test]
    fn splits_on_line_boundaries() {
        let text = "-Foo-\n---S01E01 - Pilot\n---S01E02 - Second\n";
        let chunks = chunk_message(text, 25);
        assert_eq!(
            chunks,
            vec!["-Foo-\n---S01E01 - Pilot\n", "---S01E02 - Second\n"]
        );
    }

    #[test]
    fn overlong_line_is_hard_split() {
        let chunks = chunk_message("abcdefghij\nxy", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij\n", "xy"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "ピカチュウ\nピカ";
        let chunks = chunk_message(text, 6);
        assert_eq!(chunks, vec!["ピカチュウ\n", "ピカ"]);
    }

    #[test]
    fn chunks_respect_cap_and_rejoin() {
        let text = (1..=60)
            .map(|n| format!("---S01E{n:02} - Episode number {n}\n"))
            .collect::<String>();
        let chunks = chunk_message(&text, 100);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 100));
        assert_eq!(chunks.concat(), text);
    }
}
