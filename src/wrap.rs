//! Greedy word-wrap for fixed-width receipt text.

/// Wrap `text` to at most `line_width` characters per line.
///
/// Words are whitespace-separated runs. A line starts with its first word;
/// each following word is appended as `" " + word` when it fits, otherwise
/// it opens a new line. A single word longer than `line_width` is never
/// split and produces an over-length line; the print head clips it, which
/// beats corrupting the word.
///
/// Input that already contains line breaks is wrapped per source line and
/// the break points are preserved. Empty input yields no lines.
pub fn wrap(text: &str, line_width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw in text.lines() {
        let mut words = raw.split_whitespace();
        let first = match words.next() {
            Some(w) => w,
            None => {
                // blank source line, keep the break
                out.push(String::new());
                continue;
            }
        };
        let mut line = String::from(first);
        let mut space_left = line_width.saturating_sub(first.len());
        for word in words {
            if word.len() + 1 > space_left {
                out.push(line);
                line = String::from(word);
                space_left = line_width.saturating_sub(word.len());
            } else {
                line.push(' ');
                line.push_str(word);
                space_left -= word.len() + 1;
            }
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(wrap("", 1).is_empty());
        assert!(wrap("", 40).is_empty());
    }

    #[test]
    fn lines_stay_within_width() {
        let text = "the quick brown fox jumps over the lazy dog";
        for width in 1..=20 {
            for line in wrap(text, width) {
                // every word above fits, so the bound is unconditional here
                assert!(
                    line.len() <= width || !line.contains(' '),
                    "line {:?} exceeds width {}",
                    line,
                    width
                );
            }
        }
    }

    #[test]
    fn overlong_word_is_not_split() {
        let lines = wrap("a extraordinarily b", 5);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn acars_header_fits_on_one_line() {
        let lines = wrap("A/C ID   DATE   GMT   FLTN     CITY PAIR", 40);
        assert_eq!(lines, vec!["A/C ID DATE GMT FLTN CITY PAIR"]);
        assert!(lines[0].len() <= 40);
    }

    #[test]
    fn no_characters_are_lost() {
        let text = "EBBR DEP ATIS S 0850Z   ULLI 272030Z 00000MPS 4500\n0600NE PRFG BR SCT025 06/05 Q1031";
        let rejoined = wrap(text, 12).join("\n");
        let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        assert_eq!(squash(&rejoined), squash(text));
    }

    #[test]
    fn break_points_are_preserved() {
        let lines = wrap("first line\n\nsecond line", 40);
        assert_eq!(lines, vec!["first line", "", "second line"]);
    }

    #[test]
    fn greedy_fill_counts_the_separator() {
        // "aa bb" is 5 chars: fits at width 5, wraps at width 4
        assert_eq!(wrap("aa bb", 5), vec!["aa bb"]);
        assert_eq!(wrap("aa bb", 4), vec!["aa", "bb"]);
    }
}
