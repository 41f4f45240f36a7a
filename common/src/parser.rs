//! AI 响应解析
//!
//! 从 claude / codex / gemini 等 CLI 的输出中提取 JSON，
//! 并解析为分类提示。

use crate::error::{Error, Result};
use crate::types::AiHint;

/// 从响应中提取 JSON 部分
///
/// 提取优先级:
/// 1. ```json ... ``` 代码块
/// 2. 最先出现的 `{...}` 对象或 `[...]` 数组
/// 3. 错误
///
/// # Examples
/// ```
/// use sfx_renamer_common::extract_json;
///
/// let response = "result: {\"catId\": \"DOORWood\"}";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    let object = response.find('{').zip(response.rfind('}'));
    let array = response.find('[').zip(response.rfind(']'));

    let candidates = [object, array];
    let best = candidates
        .iter()
        .flatten()
        .filter(|(start, end)| end > start)
        .min_by_key(|(start, _)| *start);

    match best {
        Some(&(start, end)) => Ok(&response[start..=end]),
        None => Err(Error::Parse("响应中未找到 JSON".into())),
    }
}

/// 分类提示解析
///
/// 对象或数组（取第一个元素）均可。
pub fn parse_ai_hint(response: &str) -> Result<AiHint> {
    let json_str = extract_json(response)?;
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("AI 提示 JSON 解析错误: {}", e)))?;

    let object = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| Error::Parse("AI 提示数组为空".into()))?,
        other => other,
    };

    let hint: AiHint = serde_json::from_value(object)
        .map_err(|e| Error::Parse(format!("AI 提示字段错误: {}", e)))?;
    if hint.cat_id.trim().is_empty() {
        return Err(Error::Parse("AI 提示缺少 catID".into()));
    }
    Ok(hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Here is the classification:
```json
{"catId": "FOL001", "confidence": 0.9}
```
Done."#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, r#"{"catId": "FOL001", "confidence": 0.9}"#);
    }

    #[test]
    fn test_extract_json_object_with_surrounding_text() {
        let response = r#"Result: {"CatID": "DOORWood"} end."#;
        assert_eq!(extract_json(response).unwrap(), r#"{"CatID": "DOORWood"}"#);
    }

    #[test]
    fn test_extract_json_array_first() {
        let response = r#"[{"catId": "A"}]"#;
        assert_eq!(extract_json(response).unwrap(), response);
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("No JSON here.");
        assert!(matches!(result, Err(Error::Parse(_))));
        assert!(extract_json("").is_err());
    }

    #[test]
    fn test_parse_ai_hint_object() {
        let hint = parse_ai_hint(
            r#"```json
{"CatID": "FOL001", "category": "Foley", "confidence": 0.75, "reasoning": "footsteps"}
```"#,
        )
        .unwrap();
        assert_eq!(hint.cat_id, "FOL001");
        assert_eq!(hint.category, "Foley");
        assert_eq!(hint.confidence, Some(0.75));
    }

    #[test]
    fn test_parse_ai_hint_array() {
        let hint = parse_ai_hint(r#"[{"cat_id": "WINDGust"}, {"cat_id": "X"}]"#).unwrap();
        assert_eq!(hint.cat_id, "WINDGust");
    }

    #[test]
    fn test_parse_ai_hint_missing_cat_id() {
        assert!(parse_ai_hint(r#"{"category": "Foley"}"#).is_err());
        assert!(parse_ai_hint("[]").is_err());
    }

    #[test]
    fn test_parse_ai_hint_invalid_json() {
        let result = parse_ai_hint("{not json}");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
