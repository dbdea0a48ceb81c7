//! Output formatting for CLI commands

use serde::Serialize;

/// Pretty JSON, falls back to `{}` when the value cannot be serialized
pub fn format_output<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_output_pretty() {
        let out = format_output(&serde_json::json!({"type": "FeishuAlert"}));
        assert_eq!(out, "{\n  \"type\": \"FeishuAlert\"\n}");
    }
}
