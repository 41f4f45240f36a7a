//! 术语匹配引擎
//!
//! 两种实现共享同一接口：
//! - `TokenMatcher`: 逐词打分累加（主引擎）
//! - `FuzzyMatcher`: 编辑距离相似度（0–1000 刻度）
//!
//! 无命中返回空列表 / None，不会报错。

pub mod align;
pub mod fuzzy;
pub mod token;
pub mod word_match;

pub use fuzzy::FuzzyMatcher;
pub use token::TokenMatcher;

use crate::catalogue::TermCatalogue;
use crate::settings::{EngineKind, Settings};
use crate::text::{contains_latin, is_file_numbering, is_punctuation, is_stopword};
use crate::types::{MatchResult, Pos, WordInfo};
use std::sync::Arc;

/// 匹配选项
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    /// false 时只返回第一名
    pub return_all: bool,
    /// 返回数上限（None 为不限）
    pub limit: Option<usize>,
    /// 最低得分（None 时使用引擎默认值，刻度与引擎一致）
    pub threshold: Option<f64>,
    /// 是否按词性加权
    pub pos_weighting: bool,
    /// 单语匹配的来源权重 (原文, 译文)，None 时使用设置值
    pub source_weight_ratio: Option<(f64, f64)>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            return_all: true,
            limit: None,
            threshold: None,
            pos_weighting: true,
            source_weight_ratio: None,
        }
    }
}

impl MatchOptions {
    pub fn best_only() -> Self {
        Self {
            return_all: false,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn without_pos_weighting(mut self) -> Self {
        self.pos_weighting = false;
        self
    }

    /// 实际返回数
    fn take_count(&self) -> usize {
        if !self.return_all {
            return 1;
        }
        self.limit.unwrap_or(usize::MAX)
    }
}

/// 匹配引擎接口
pub trait Matcher: Send + Sync {
    fn kind(&self) -> EngineKind;

    fn catalogue(&self) -> &TermCatalogue;

    /// 默认阈值（引擎自身刻度）
    fn default_threshold(&self, bilingual: bool) -> f64;

    /// 单语匹配，按得分降序
    fn get_all_matches(&self, words: &[WordInfo], options: &MatchOptions) -> Vec<MatchResult>;

    /// 双语匹配（原文词 + 译文词），按得分降序
    fn get_all_bilingual_matches(
        &self,
        original: &[WordInfo],
        translated: &[WordInfo],
        options: &MatchOptions,
    ) -> Vec<MatchResult>;

    fn find_match(&self, words: &[WordInfo], options: &MatchOptions) -> Option<MatchResult> {
        let options = MatchOptions {
            return_all: false,
            ..options.clone()
        };
        self.get_all_matches(words, &options).into_iter().next()
    }

    fn find_match_with_bilingual_text(
        &self,
        original: &[WordInfo],
        translated: &[WordInfo],
        options: &MatchOptions,
    ) -> Option<MatchResult> {
        let options = MatchOptions {
            return_all: false,
            ..options.clone()
        };
        self.get_all_bilingual_matches(original, translated, &options)
            .into_iter()
            .next()
    }

    /// 最佳匹配的 catID
    fn identify_category(&self, words: &[WordInfo], options: &MatchOptions) -> Option<String> {
        self.find_match(words, options).map(|m| m.cat_id)
    }
}

/// 按引擎种类构建
pub fn build_matcher(
    kind: EngineKind,
    catalogue: Arc<TermCatalogue>,
    settings: &Settings,
) -> Box<dyn Matcher> {
    match kind {
        EngineKind::Token => Box::new(TokenMatcher::new(catalogue, settings.matching.clone())),
        EngineKind::Fuzzy => Box::new(FuzzyMatcher::new(catalogue, settings.fuzzy.clone())),
    }
}

/// 参与匹配的词（排除编号、停用词、标点、非拉丁单字 Other）
pub(crate) fn is_query_word(word: &WordInfo) -> bool {
    let w = word.word.trim();
    if w.is_empty() || is_file_numbering(w) || is_stopword(w) || is_punctuation(w) {
        return false;
    }
    !(word.pos == Pos::Other && w.chars().count() == 1 && !contains_latin(w))
}

/// 阈值过滤 → 稳定降序排序 → 截取 → 设置名次
pub(crate) fn rank_results(
    mut results: Vec<MatchResult>,
    threshold: f64,
    options: &MatchOptions,
) -> Vec<MatchResult> {
    results.retain(|r| r.score >= threshold && r.score > 0.0);
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(options.take_count());
    for (rank, result) in results.iter_mut().enumerate() {
        result.rank = rank;
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TermRecord;

    fn result(cat_id: &str, score: f64) -> MatchResult {
        MatchResult {
            term: TermRecord {
                cat_id: cat_id.into(),
                ..Default::default()
            },
            cat_id: cat_id.into(),
            score,
            match_type: "english_noun".into(),
            rank: 0,
            matched_words: Vec::new(),
        }
    }

    #[test]
    fn test_query_word_filter() {
        assert!(is_query_word(&WordInfo::new("door", Pos::Noun, 1.0)));
        assert!(!is_query_word(&WordInfo::new("01", Pos::Other, 0.3)));
        assert!(!is_query_word(&WordInfo::new("A12", Pos::Noun, 1.0)));
        assert!(!is_query_word(&WordInfo::new("the", Pos::Other, 0.3)));
        assert!(!is_query_word(&WordInfo::new("!!", Pos::Other, 0.3)));
        assert!(!is_query_word(&WordInfo::new("声", Pos::Other, 0.3)));
        assert!(is_query_word(&WordInfo::new("声", Pos::Noun, 1.0)));
    }

    #[test]
    fn test_rank_results_stable_and_thresholded() {
        let results = vec![result("A", 1.0), result("B", 2.0), result("C", 1.0), result("D", 0.1)];
        let ranked = rank_results(results, 0.3, &MatchOptions::default());
        let ids: Vec<&str> = ranked.iter().map(|r| r.cat_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(ranked[2].rank, 2);
    }

    #[test]
    fn test_rank_results_limit() {
        let results = vec![result("A", 1.0), result("B", 2.0)];
        assert_eq!(rank_results(results.clone(), 0.0, &MatchOptions::best_only()).len(), 1);
        assert_eq!(rank_results(results, 0.0, &MatchOptions::default().with_limit(1)).len(), 1);
    }
}
