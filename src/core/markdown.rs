use regex::Regex;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:\w+)?\s*([\s\S]*?)\s*```").expect("code fence pattern is valid")
});

/// Strips markdown code fences from a model reply.
///
/// When the reply contains fenced blocks, their trimmed bodies are returned
/// joined by a blank line and any prose around them is dropped. Otherwise the
/// trimmed reply comes back as-is.
pub fn clean_markdown(text: Option<&str>) -> String {
    let trimmed = match text {
        Some(t) => t.trim(),
        None => return String::new(),
    };

    let blocks: Vec<&str> = CODE_FENCE
        .captures_iter(trimmed)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .collect();

    if blocks.is_empty() {
        trimmed.to_string()
    } else {
        blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_and_empty() {
        assert_eq!(clean_markdown(None), "");
        assert_eq!(clean_markdown(Some("")), "");
        assert_eq!(clean_markdown(Some("  \n ")), "");
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(clean_markdown(Some("\n  SELECT 1;  \n")), "SELECT 1;");
    }

    #[test]
    fn test_single_fenced_block_with_language() {
        let reply = "```typescript\ninterface User {\n  id: number;\n}\n```";
        assert_eq!(
            clean_markdown(Some(reply)),
            "interface User {\n  id: number;\n}"
        );
    }

    #[test]
    fn test_fence_without_language() {
        assert_eq!(clean_markdown(Some("```\nfoo()\n```")), "foo()");
    }

    #[test]
    fn test_prose_around_block_is_dropped() {
        let reply = "Here is your code:\n```js\nconst x = 1;\n```\nHope this helps!";
        assert_eq!(clean_markdown(Some(reply)), "const x = 1;");
    }

    #[test]
    fn test_multiple_blocks_are_joined() {
        let reply = "```sql\nCREATE TABLE a;\n```\ntext\n```sql\nCREATE TABLE b;\n```";
        assert_eq!(
            clean_markdown(Some(reply)),
            "CREATE TABLE a;\n\nCREATE TABLE b;"
        );
    }

    #[test]
    fn test_unterminated_fence_is_left_alone() {
        assert_eq!(clean_markdown(Some("```js\nconst x = 1;")), "```js\nconst x = 1;");
    }
}
