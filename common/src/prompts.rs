//! AI 分类提示词生成
//!
//! 把文件名和词表中的候选分类一起交给外部 AI，
//! 要求只从候选中选择一个 catID 并以 JSON 返回。

use crate::catalogue::TermCatalogue;

/// 提示词中列出的候选分类上限
pub const MAX_PROMPT_TERMS: usize = 400;

/// 候选分类一览（`catID | 子分类 | 中文名 | 分类`）
fn term_lines(catalogue: &TermCatalogue, limit: usize) -> String {
    catalogue
        .terms()
        .iter()
        .take(limit)
        .map(|t| format!("{} | {} | {} | {}", t.cat_id, t.source, t.target, t.category))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 分类提示词
///
/// # Arguments
/// * `filename` - 原文件名（不含扩展名）
/// * `translated` - 译文（可选）
/// * `catalogue` - 词表
pub fn build_ai_classification_prompt(
    filename: &str,
    translated: Option<&str>,
    catalogue: &TermCatalogue,
) -> String {
    let terms = term_lines(catalogue, MAX_PROMPT_TERMS);
    let translated_line = translated
        .filter(|t| !t.trim().is_empty())
        .map(|t| format!("\n译文: {}", t))
        .unwrap_or_default();

    format!(
        r#"你是音效库管理员。请根据音效文件名判断它属于哪个子分类。

## 候选子分类（catID | 子分类 | 中文名 | 分类）
{terms}

## 输出格式（严格按此 JSON 输出）
{{
  "catId": "从候选中选择的 catID",
  "category": "对应的分类名",
  "confidence": 0.0到1.0之间的数值,
  "reasoning": "判断依据（一句话）"
}}

## 注意
- catId 只能从候选列表中选择，不要编造
- 文件名中的编号（01、take2、v3 等）与分类无关
- 无法判断时 confidence 设为 0
- 只输出 JSON，不需要其他说明

文件名: {filename}{translated_line}"#
    )
}
