//! String reversal tool.

/// Fixed diagnostic for blank or missing input.
pub const INVALID_INPUT_MESSAGE: &str = "Please provide a valid text string to reverse.";

/// Reverse the characters in a text.
///
/// Blank input gets the fixed invalid-input message rather than an error,
/// so the agent always receives a usable observation.
pub fn reverse_text(input: &str) -> String {
    if input.trim().is_empty() {
        return INVALID_INPUT_MESSAGE.to_string();
    }

    let reversed: String = input.chars().rev().collect();
    format!("The reversed text is: {}", reversed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reversed_payload(input: &str) -> String {
        reverse_text(input)
            .strip_prefix("The reversed text is: ")
            .expect("missing prefix")
            .to_string()
    }

    #[test]
    fn test_reverse_round_trip() {
        for s in ["hello", "a b c", "racecar", "Rust 2021!"] {
            let once = reversed_payload(s);
            assert_eq!(reversed_payload(&once), s);
        }
    }

    #[test]
    fn test_reverse_simple() {
        assert_eq!(reverse_text("abc"), "The reversed text is: cba");
    }

    #[test]
    fn test_reverse_multibyte() {
        assert_eq!(reversed_payload("åbc"), "cbå");
    }

    #[test]
    fn test_blank_input_gets_fixed_message() {
        assert_eq!(reverse_text(""), INVALID_INPUT_MESSAGE);
        assert_eq!(reverse_text("   "), INVALID_INPUT_MESSAGE);
    }
}
