//! 交互式分类选择
//!
//! 每个文件显示候选一览，输入编号选择。回车保持首选。

use crate::pipeline::AlternativeChooser;
use dialoguer::Input;
use sfx_renamer_common::{ClassificationResult, MatchResult};

/// 输入解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// 保持首选
    Keep,
    /// 候选下标（0 起）
    Pick(usize),
}

/// `1` 起的编号 → 候选下标；空输入、`s`、范围外均保持首选
pub fn parse_choice(input: &str, count: usize) -> Choice {
    match input.trim() {
        "" | "s" | "S" => Choice::Keep,
        text => match text.parse::<usize>() {
            Ok(n) if n >= 1 && n <= count => Choice::Pick(n - 1),
            _ => Choice::Keep,
        },
    }
}

/// 候选显示行
pub fn alternative_label(index: usize, alt: &MatchResult) -> String {
    format!(
        "{:>2}) {} | {} / {} | {} ({:.2}, {})",
        index + 1,
        alt.cat_id,
        alt.term.source,
        alt.term.target,
        alt.term.category,
        alt.score,
        alt.match_type
    )
}

/// dialoguer 输入
#[derive(Debug, Clone, Default)]
pub struct PromptChooser;

impl AlternativeChooser for PromptChooser {
    fn choose(&self, file_name: &str, result: &ClassificationResult) -> Option<usize> {
        println!("\n🎧 {}", file_name);
        for (i, alt) in result.alternatives.iter().enumerate() {
            println!("  {}", alternative_label(i, alt));
        }

        let input: String = match Input::new()
            .with_prompt(format!("编号 [1-{}] (回车: 首选)", result.alternatives.len()))
            .allow_empty(true)
            .interact_text()
        {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(error = %e, "输入读取失败，保持首选");
                return None;
            }
        };

        match parse_choice(&input, result.alternatives.len()) {
            Choice::Keep => None,
            Choice::Pick(index) => Some(index),
        }
    }
}
