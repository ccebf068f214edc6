/// Maps raw text to the canonical form the classifier was trained on.
///
/// Steps run in this order:
/// 1. lowercase every character
/// 2. drop ASCII punctuation
/// 3. drop ASCII digits
/// 4. trim leading and trailing whitespace, counting the ASCII separators
///    U+001C..U+001F as whitespace
///
/// Internal whitespace is kept as-is, so `"a  b"` stays `"a  b"`.
///
/// # Example
/// ```
/// use intent_service::normalize;
///
/// assert_eq!(normalize("Hello, World! 123"), "hello world");
/// ```
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .filter(|c| !c.is_ascii_digit())
        .collect();
    stripped.trim_matches(is_trimmed).to_string()
}

fn is_trimmed(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!.,42"), "");
    }

    #[test]
    fn test_punctuation_digits_and_case() {
        assert_eq!(normalize("Hello, World! 123"), "hello world");
        assert_eq!(normalize("What is 7 plus 8?"), "what is  plus");
        assert_eq!(normalize("Send an e-mail to HR."), "send an email to hr");
    }

    #[test]
    fn test_internal_whitespace_preserved() {
        assert_eq!(normalize("  book\ta   meeting \n"), "book\ta   meeting");
    }

    #[test]
    fn test_order_of_steps() {
        // Trimming runs last, so whitespace exposed by stripping is removed too.
        assert_eq!(normalize("  (42) call mom!!  "), "call mom");
        assert_eq!(normalize("#1 priority"), "priority");
    }

    #[test]
    fn test_separator_controls_are_trimmed() {
        assert_eq!(normalize("\x1fhello"), "hello");
        assert_eq!(normalize("\x1c Send mail \x1d\x1e"), "send mail");
        // Only trimmed at the ends.
        assert_eq!(normalize("a\x1fb"), "a\x1fb");
    }

    #[test]
    fn test_non_ascii_is_kept() {
        assert_eq!(normalize("Café ÜBER «quote»"), "café über «quote»");
        // Non-ASCII digits are not part of the stripped set.
        assert_eq!(normalize("٣ apples"), "٣ apples");
    }

    #[test]
    fn test_output_properties() {
        let inputs = [
            "",
            "Hello, World! 123",
            "  Can you book a meeting with the client next week?  ",
            "~`!@#$%^&*()_-+={[}]|\\:;\"'<,>.?/",
            "0123456789",
            "MiXeD CaSe\twith\ttabs ",
            "İstanbul 2024!",
        ];
        for input in inputs {
            let out = normalize(input);
            assert!(!out.chars().any(|c| c.is_ascii_punctuation()), "{out:?}");
            assert!(!out.chars().any(|c| c.is_ascii_digit()), "{out:?}");
            assert_eq!(out, out.trim_matches(is_trimmed), "{out:?}");
            assert_eq!(normalize(&out), out, "not idempotent for {input:?}");
        }
    }
}
