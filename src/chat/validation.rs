//! Shape checks for inbound chat requests.
//!
//! Validation runs on raw JSON so every problem can be reported at once,
//! including fields with the wrong type.

use serde_json::Value;

use super::language::SUPPORTED_CODES;

/// Longest accepted message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;
/// Largest accepted history.
pub const MAX_HISTORY_TURNS: usize = 10;

/// Check a chat request body. An empty result means the request is valid.
#[must_use]
pub fn validate(request: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    match request.get("message").and_then(Value::as_str) {
        Some(message) if !message.trim().is_empty() => {
            if message.chars().count() > MAX_MESSAGE_CHARS {
                errors.push(format!(
                    "Message must be less than {MAX_MESSAGE_CHARS} characters"
                ));
            }
        }
        _ => errors.push("Message is required and must be a non-empty string".to_string()),
    }

    match request.get("language") {
        None | Some(Value::Null) => {}
        Some(Value::String(code)) if SUPPORTED_CODES.contains(&code.as_str()) => {}
        Some(_) => errors.push(format!(
            "Language must be one of: {}",
            SUPPORTED_CODES.join(", ")
        )),
    }

    match request.get("history") {
        None | Some(Value::Null) => {}
        Some(Value::Array(turns)) if turns.len() <= MAX_HISTORY_TURNS => {
            for (i, turn) in turns.iter().enumerate() {
                validate_turn(i, turn, &mut errors);
            }
        }
        Some(_) => errors.push(format!(
            "History must be an array with maximum {MAX_HISTORY_TURNS} entries"
        )),
    }

    errors
}

fn validate_turn(index: usize, turn: &Value, errors: &mut Vec<String>) {
    let role = turn.get("role").and_then(Value::as_str);
    if !matches!(role, Some("user" | "assistant")) {
        errors.push(format!(
            "History item {index} must have role 'user' or 'assistant'"
        ));
    }
    if !turn.get("content").is_some_and(Value::is_string) {
        errors.push(format!("History item {index} must have content as string"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn has(errors: &[String], needle: &str) -> bool {
        errors.iter().any(|e| e == needle)
    }

    #[test]
    fn test_valid_request() {
        let errors = validate(&json!({
            "message": "hi",
            "language": "ar",
            "history": [
                {"role": "user", "content": "hello"},
                {"role": "assistant", "content": "hey"}
            ]
        }));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_missing_message() {
        let errors = validate(&json!({}));
        assert!(has(&errors, "Message is required and must be a non-empty string"));

        let errors = validate(&json!({"message": "   "}));
        assert!(has(&errors, "Message is required and must be a non-empty string"));

        let errors = validate(&json!({"message": 12}));
        assert!(has(&errors, "Message is required and must be a non-empty string"));
    }

    #[test]
    fn test_message_too_long() {
        let errors = validate(&json!({"message": "a".repeat(1001)}));
        assert_eq!(errors, vec!["Message must be less than 1000 characters".to_string()]);

        assert!(validate(&json!({"message": "a".repeat(1000)})).is_empty());
    }

    #[test]
    fn test_message_length_counts_characters() {
        assert!(validate(&json!({"message": "ب".repeat(1000)})).is_empty());
    }

    #[test]
    fn test_bad_language() {
        let errors = validate(&json!({"message": "hi", "language": "xx"}));
        assert!(has(&errors, "Language must be one of: en, ar, ckb"));

        let errors = validate(&json!({"message": "hi", "language": 5}));
        assert!(has(&errors, "Language must be one of: en, ar, ckb"));

        assert!(validate(&json!({"message": "hi", "language": null})).is_empty());
    }

    #[test]
    fn test_history_too_long_or_wrong_type() {
        let turns: Vec<Value> = (0..11)
            .map(|_| json!({"role": "user", "content": "x"}))
            .collect();
        let errors = validate(&json!({"message": "hi", "history": turns}));
        assert!(has(&errors, "History must be an array with maximum 10 entries"));

        let errors = validate(&json!({"message": "hi", "history": "nope"}));
        assert!(has(&errors, "History must be an array with maximum 10 entries"));
    }

    #[test]
    fn test_history_items_collect_every_error() {
        let errors = validate(&json!({
            "message": "hi",
            "history": [
                {"role": "system", "content": "x"},
                {"role": "user", "content": 3},
                42
            ]
        }));
        assert_eq!(
            errors,
            vec![
                "History item 0 must have role 'user' or 'assistant'".to_string(),
                "History item 1 must have content as string".to_string(),
                "History item 2 must have role 'user' or 'assistant'".to_string(),
                "History item 2 must have content as string".to_string(),
            ]
        );
    }

    #[test]
    fn test_errors_are_not_short_circuited() {
        let errors = validate(&json!({"language": "xx", "history": {}}));
        assert_eq!(errors.len(), 3);
    }
}
