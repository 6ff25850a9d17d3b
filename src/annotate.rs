//! Extraction of a salient emoji from inference output text.

use unicode_properties::UnicodeEmoji;
use unicode_segmentation::UnicodeSegmentation;

/// Cap on the returned annotation, in `char`s. Truncation can split a long
/// ZWJ sequence mid-cluster; that quirk is intentional and kept.
const MAX_ANNOTATION_CHARS: usize = 8;

/// Returns the first emoji found in `text`, or `None`.
///
/// The text is split into whitespace-delimited tokens. In the first token
/// containing an emoji-classified character, the contiguous run of emoji
/// grapheme clusters starting at that character is returned whole, so
/// skin-tone modifiers, variation selectors and ZWJ compositions survive
/// intact. Runs longer than eight chars are cut to the first eight. If no
/// token matches, the whole text is rescanned cluster by cluster as a
/// fallback.
pub fn extract_first_emoji(text: &str) -> Option<String> {
    for token in text.split_whitespace() {
        if let Some(run) = leading_emoji_run(token) {
            return Some(clamp_chars(&run, MAX_ANNOTATION_CHARS));
        }
    }

    text.graphemes(true)
        .find(|cluster| cluster.chars().any(|c| c.is_emoji_char()))
        .map(|cluster| clamp_chars(cluster, MAX_ANNOTATION_CHARS))
}

/// Contiguous emoji clusters starting at the first emoji in `token`.
fn leading_emoji_run(token: &str) -> Option<String> {
    let mut run = String::new();
    for cluster in token.graphemes(true) {
        if cluster.chars().any(|c| c.is_emoji_char()) {
            run.push_str(cluster);
        } else if !run.is_empty() {
            break;
        }
    }

    if run.is_empty() {
        None
    } else {
        Some(run)
    }
}

fn clamp_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_emoji_out_of_mixed_cjk_token() {
        assert_eq!(extract_first_emoji("今天🌞天气不错"), Some("🌞".to_string()));
    }

    #[test]
    fn no_match_on_plain_text() {
        assert_eq!(extract_first_emoji("no emoji here"), None);
        assert_eq!(extract_first_emoji(""), None);
    }

    #[test]
    fn keeps_zwj_composition_as_one_unit() {
        assert_eq!(
            extract_first_emoji("合照 👨‍👩‍👧‍👦 很温馨"),
            Some("👨‍👩‍👧‍👦".to_string())
        );
    }

    #[test]
    fn keeps_skin_tone_modifier() {
        assert_eq!(extract_first_emoji("nice 👍🏽 work"), Some("👍🏽".to_string()));
    }

    #[test]
    fn truncates_twelve_char_emoji_token_to_eight_chars() {
        // One token, 12 emoji chars, starts with an emoji.
        let token = "🌞🌛🌞🌛🌞🌛🌞🌛🌞🌛🌞🌛";
        assert_eq!(token.chars().count(), 12);

        let got = extract_first_emoji(token).unwrap();
        assert_eq!(got.chars().count(), 8);
        assert_eq!(got, "🌞🌛🌞🌛🌞🌛🌞🌛");
    }

    #[test]
    fn first_matching_token_wins() {
        assert_eq!(
            extract_first_emoji("阳光 很好 🌞 心情 🎈"),
            Some("🌞".to_string())
        );
    }
}
