//! 单词 × 术语 的打分
//!
//! | 词的文字 | 比较对象 | 规则 | 得分 |
//! |---|---|---|---|
//! | 中文 | target / synonymsZh / 含中文的 source | 完全一致 | 1.0 |
//! | 中文 | 同上 | 词首或词尾一致 | 0.8 × 长度比 |
//! | 英文 | source / synonyms / 非中文 target | 完全一致 | 1.0 |
//! | 英文 | 同上 | 单词边界 | 0.9 |
//! | 英文 | 同上 | 包含（双向，≥3 字） | 0.5 + 0.2 × 长度比 |
//! | 英文 | 字段内各单词 | 前缀/后缀部分一致 | 0.8 × 共同长度比 |
//!
//! 中文一侧不做任意位置包含，避免单字误匹配。

use crate::text::{contains_cjk, split_latin_words};
use crate::types::TermRecord;
use regex::Regex;

const SCORE_EXACT: f64 = 1.0;
const SCORE_BOUNDARY: f64 = 0.9;
const SCORE_CJK_BOUNDARY: f64 = 0.8;
const SCORE_CONTAINS_BASE: f64 = 0.5;
const SCORE_CONTAINS_RANGE: f64 = 0.2;
const SCORE_PARTIAL: f64 = 0.8;
/// 正则构建失败时的包含匹配得分
const SCORE_FALLBACK: f64 = 0.5;

const MIN_CONTAINS_LEN: usize = 3;
const MIN_PARTIAL_LEN: usize = 4;
const MIN_PARTIAL_RATIO: f64 = 0.6;

/// 单词对某术语的命中
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordHit {
    pub score: f64,
    /// 与 source 或 target 完全一致
    pub exact_term: bool,
}

/// 查询词（正则只编译一次）
#[derive(Debug)]
pub struct WordPattern {
    lower: String,
    cjk: bool,
    boundary: Option<Regex>,
}

impl WordPattern {
    pub fn new(word: &str) -> Self {
        let lower = word.trim().to_lowercase();
        let cjk = contains_cjk(&lower);
        let boundary = if cjk {
            None
        } else {
            match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&lower))) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::debug!(word = %lower, error = %e, "单词边界正则构建失败，降级为包含匹配");
                    None
                }
            }
        };
        Self { lower, cjk, boundary }
    }

    pub fn is_cjk(&self) -> bool {
        self.cjk
    }

    pub fn as_str(&self) -> &str {
        &self.lower
    }

    /// 该词与术语的最佳命中（无命中为 None）
    pub fn score(&self, term: &TermRecord) -> Option<WordHit> {
        if self.lower.is_empty() {
            return None;
        }
        if self.cjk {
            self.score_cjk(term)
        } else {
            self.score_latin(term)
        }
    }

    fn score_cjk(&self, term: &TermRecord) -> Option<WordHit> {
        let mut best: Option<WordHit> = None;

        let mut primary = vec![term.target.as_str()];
        if contains_cjk(&term.source) {
            primary.push(term.source.as_str());
        }
        for field in primary {
            if let Some(score) = self.cjk_field_score(field) {
                keep_best(&mut best, score, score >= SCORE_EXACT);
            }
        }
        for synonym in term.synonym_zh_list() {
            if let Some(score) = self.cjk_field_score(synonym) {
                keep_best(&mut best, score, false);
            }
        }

        best
    }

    fn cjk_field_score(&self, field: &str) -> Option<f64> {
        let field = field.trim();
        if field.is_empty() || !contains_cjk(field) {
            return None;
        }
        if field == self.lower {
            return Some(SCORE_EXACT);
        }
        if field.starts_with(&self.lower) || field.ends_with(&self.lower) {
            let ratio = self.lower.chars().count() as f64 / field.chars().count() as f64;
            return Some(SCORE_CJK_BOUNDARY * ratio);
        }
        None
    }

    fn score_latin(&self, term: &TermRecord) -> Option<WordHit> {
        let mut best: Option<WordHit> = None;

        let mut primary = vec![term.source.as_str()];
        if !contains_cjk(&term.target) {
            primary.push(term.target.as_str());
        }
        for field in primary {
            if let Some(score) = self.latin_field_score(field) {
                keep_best(&mut best, score, score >= SCORE_EXACT);
            }
        }
        for synonym in term.synonym_list() {
            if let Some(score) = self.latin_field_score(synonym) {
                keep_best(&mut best, score, false);
            }
        }

        best
    }

    /// 完全一致 → 单词边界 → 包含 → 部分一致，先命中者为准
    fn latin_field_score(&self, field: &str) -> Option<f64> {
        let field = field.trim().to_lowercase();
        if field.is_empty() || contains_cjk(&field) {
            return None;
        }
        if field == self.lower {
            return Some(SCORE_EXACT);
        }

        match &self.boundary {
            Some(re) => {
                if re.is_match(&field) {
                    return Some(SCORE_BOUNDARY);
                }
            }
            None => {
                if field.contains(&self.lower) || self.lower.contains(&field) {
                    return Some(SCORE_FALLBACK);
                }
            }
        }

        if let Some(score) = containment_score(&self.lower, &field) {
            return Some(score);
        }

        split_latin_words(&field)
            .iter()
            .filter_map(|token| partial_score(&self.lower, &token.to_lowercase()))
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))
    }
}

fn keep_best(best: &mut Option<WordHit>, score: f64, exact_term: bool) {
    let better = match best {
        None => true,
        Some(hit) => score > hit.score || (score == hit.score && exact_term && !hit.exact_term),
    };
    if better {
        *best = Some(WordHit { score, exact_term });
    }
}

/// 双向包含（较短一方至少 3 字）
fn containment_score(word: &str, field: &str) -> Option<f64> {
    let (shorter, longer) = if word.len() <= field.len() {
        (word, field)
    } else {
        (field, word)
    };
    let shorter_len = shorter.chars().count();
    if shorter_len < MIN_CONTAINS_LEN || !longer.contains(shorter) {
        return None;
    }
    let ratio = shorter_len as f64 / longer.chars().count() as f64;
    Some(SCORE_CONTAINS_BASE + SCORE_CONTAINS_RANGE * ratio)
}

/// 前缀 / 后缀部分一致（共同部分 ≥4 字且占较长一方 60% 以上）
fn partial_score(word: &str, token: &str) -> Option<f64> {
    let a: Vec<char> = word.chars().collect();
    let b: Vec<char> = token.chars().collect();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return None;
    }

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count();
    let common = prefix.max(suffix);

    let ratio = common as f64 / max_len as f64;
    if common >= MIN_PARTIAL_LEN && ratio >= MIN_PARTIAL_RATIO {
        Some(SCORE_PARTIAL * ratio)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(source: &str, target: &str, synonyms: &str, synonyms_zh: &str) -> TermRecord {
        TermRecord {
            source: source.into(),
            target: target.into(),
            cat_id: "X".into(),
            synonyms: synonyms.into(),
            synonyms_zh: synonyms_zh.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_latin_exact_case_insensitive() {
        let hit = WordPattern::new("DOOR").score(&term("Door", "门", "", "")).unwrap();
        assert_eq!(hit.score, SCORE_EXACT);
        assert!(hit.exact_term);
    }

    #[test]
    fn test_latin_boundary() {
        let hit = WordPattern::new("door").score(&term("Door Knock", "敲门", "", "")).unwrap();
        assert_eq!(hit.score, SCORE_BOUNDARY);
        assert!(!hit.exact_term);
    }

    #[test]
    fn test_latin_containment_either_direction() {
        let footsteps = WordPattern::new("footsteps").score(&term("Footstep", "脚步声", "", "")).unwrap();
        assert!(footsteps.score > 0.5 && footsteps.score < 0.7);

        let foot = WordPattern::new("foot").score(&term("Footstep", "脚步声", "", "")).unwrap();
        assert!((foot.score - (0.5 + 0.2 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_latin_short_word_no_containment() {
        assert!(WordPattern::new("oo").score(&term("Door", "门", "", "")).is_none());
    }

    #[test]
    fn test_latin_partial_prefix() {
        // 共同前缀 "rattl"：5 / 8
        let hit = WordPattern::new("rattling").score(&term("Rattles", "摇晃声", "", "")).unwrap();
        assert!((hit.score - 0.8 * 5.0 / 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_latin_partial_too_short() {
        assert!(WordPattern::new("stepper").score(&term("Steps", "台阶", "", "")).is_none());
    }

    #[test]
    fn test_latin_synonym_not_exact_term() {
        let hit = WordPattern::new("walk").score(&term("Footstep", "脚步声", "walk, tread", "")).unwrap();
        assert_eq!(hit.score, SCORE_EXACT);
        assert!(!hit.exact_term);
    }

    #[test]
    fn test_regex_special_chars_are_escaped() {
        let hit = WordPattern::new("c++").score(&term("C++ Code", "代码", "", "")).unwrap();
        assert!(hit.score >= SCORE_CONTAINS_BASE && hit.score < SCORE_BOUNDARY);
        assert!(WordPattern::new("(((").score(&term("Door", "门", "", "")).is_none());
    }

    #[test]
    fn test_cjk_exact_and_boundary() {
        let t = term("Footstep", "脚步声", "", "步伐");
        assert_eq!(WordPattern::new("脚步声").score(&t).unwrap().score, SCORE_EXACT);

        let prefix = WordPattern::new("脚步").score(&t).unwrap();
        assert!((prefix.score - 0.8 * 2.0 / 3.0).abs() < 1e-9);

        let synonym = WordPattern::new("步伐").score(&t).unwrap();
        assert_eq!(synonym.score, SCORE_EXACT);
        assert!(!synonym.exact_term);
    }

    #[test]
    fn test_cjk_middle_substring_rejected() {
        assert!(WordPattern::new("步").score(&term("Footstep", "脚步声", "", "")).is_none());
    }

    #[test]
    fn test_cjk_word_ignores_latin_fields() {
        assert!(WordPattern::new("门").score(&term("Door", "Door", "", "")).is_none());
    }
}
