/// Splits a comma separated field into at most `max_tokens` tokens.
///
/// Empty segments (from leading, trailing or adjacent commas) never become tokens. A segment
/// holding only whitespace is kept and trims to an empty token, which callers parsing numbers
/// then reject. When the text holds fewer tokens than `max_tokens` the returned list is
/// simply shorter; callers needing a minimum count must compare `len()` themselves.
pub fn split(text: &str, max_tokens: usize) -> Vec<String> {
    text.split(',')
        .filter(|segment| !segment.is_empty())
        .take(max_tokens)
        .map(|segment| segment.trim().to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exact_count() {
        let tokens = split("a,b,c", 3);
        assert_eq!(tokens, vec!["a", "b", "c"]);
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_split_never_pads() {
        let tokens = split("a,b", 5);
        assert_eq!(tokens, vec!["a", "b"]);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_split_truncates_to_max() {
        assert_eq!(split("8,13,24,32", 2), vec!["8", "13"]);
        assert!(split("8,13", 0).is_empty());
    }

    #[test]
    fn test_split_skips_empty_segments() {
        assert_eq!(split("a,,b", 10), vec!["a", "b"]);
        assert_eq!(split(",a,b,", 10), vec!["a", "b"]);
        assert_eq!(split(",,,", 10), Vec::<String>::new());
        assert!(split("", 4).is_empty());
    }

    #[test]
    fn test_split_keeps_blank_segments() {
        assert_eq!(split("8, ,13", 3), vec!["8", "", "13"]);
        assert_eq!(split("8,  ,13", 2), vec!["8", ""]);
    }

    #[test]
    fn test_split_trims_whitespace() {
        assert_eq!(
            split(" GeForce GTX 1080 , Tesla K40c", 2),
            vec!["GeForce GTX 1080", "Tesla K40c"]
        );
    }
}
