//! 编辑距离匹配
//!
//! 每个词对术语各字段求相似度（归一化 Levenshtein + 包含加分），
//! 取字段权重 × 相似度的最大值，再按词权重加权平均，结果放大到 0–1000。
//! 双语时两侧得分按 `1 - (1-o)(1-t)` 合成，只增不减。

use super::{is_query_word, rank_results, MatchOptions, Matcher};
use crate::catalogue::TermCatalogue;
use crate::settings::{EngineKind, FuzzySettings};
use crate::text::contains_cjk;
use crate::types::{MatchResult, MatchedWord, TermRecord, WordInfo, WordSource};
use tracing::debug;
use std::sync::Arc;

/// 内部得分放大倍率
pub const SCORE_SCALE: f64 = 1000.0;

/// 多词字段拆出的单词命中时的倍率（低于整个字段一致）
const SPLIT_WORD_FACTOR: f64 = 0.9;

/// 相似度（0.0〜1.0）
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let distance = levenshtein_distance(a, b);
    let max_len = a.chars().count().max(b.chars().count());

    1.0 - (distance as f64 / max_len as f64)
}

/// 相似度 + 包含加分（较短一方完整出现在较长一方中）
fn similarity_with_containment(word: &str, field: &str) -> f64 {
    let base = similarity(word, field);
    let (shorter, longer) = if word.chars().count() <= field.chars().count() {
        (word, field)
    } else {
        (field, word)
    };
    let shorter_len = shorter.chars().count();
    // 英文至少 3 字、中文至少 2 字才计包含
    let min_len = if contains_cjk(shorter) { 2 } else { 3 };
    if shorter_len >= min_len && longer.contains(shorter) {
        let ratio = shorter_len as f64 / longer.chars().count() as f64;
        base.max(0.6 + 0.4 * ratio)
    } else {
        base
    }
}

/// Levenshtein 距离
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // 两行滚动
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// 术语的可比较字段（小写）及其权重
#[derive(Debug)]
struct IndexedTerm {
    fields: Vec<(String, f64)>,
}

impl IndexedTerm {
    fn new(term: &TermRecord, settings: &FuzzySettings) -> Self {
        let mut fields = Vec::new();
        let mut push = |value: &str, weight: f64| {
            let value = value.trim().to_lowercase();
            if value.is_empty() {
                return;
            }
            // 多词字段同时按单词索引
            let parts: Vec<String> = value
                .split(|c: char| c.is_whitespace() || c == '_' || c == '-' || c == '/')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if parts.len() > 1 {
                fields.extend(parts.into_iter().map(|p| (p, weight * SPLIT_WORD_FACTOR)));
            }
            fields.push((value, weight));
        };

        push(&term.source, settings.source_weight);
        push(&term.target, settings.target_weight);
        push(&term.category, settings.category_weight);
        for synonym in term.synonym_list() {
            push(synonym, settings.synonyms_weight);
        }
        for synonym in term.synonym_zh_list() {
            push(synonym, settings.synonyms_zh_weight);
        }

        Self { fields }
    }

    /// 单词的最佳 (字段权重 × 相似度)
    fn best(&self, word: &str, min_similarity: f64) -> f64 {
        self.fields
            .iter()
            .map(|(field, weight)| {
                let sim = similarity_with_containment(word, field);
                if sim < min_similarity {
                    0.0
                } else {
                    sim * weight
                }
            })
            .fold(0.0, f64::max)
    }
}

/// 单侧（原文或译文）的术语得分（0–1 归一化）
struct SideScore {
    normalized: f64,
    matched_words: Vec<MatchedWord>,
    has_cjk: bool,
    has_latin: bool,
}

pub struct FuzzyMatcher {
    catalogue: Arc<TermCatalogue>,
    settings: FuzzySettings,
    index: Vec<IndexedTerm>,
}

impl FuzzyMatcher {
    pub fn new(catalogue: Arc<TermCatalogue>, settings: FuzzySettings) -> Self {
        let index = catalogue
            .terms()
            .iter()
            .map(|t| IndexedTerm::new(t, &settings))
            .collect();
        Self {
            catalogue,
            settings,
            index,
        }
    }

    /// 各术语的单侧得分（与术语顺序对应）
    fn side_scores(&self, words: &[WordInfo], options: &MatchOptions) -> Vec<Option<SideScore>> {
        let query: Vec<(&WordInfo, String, f64)> = words
            .iter()
            .filter(|w| is_query_word(w))
            .map(|w| {
                let weight = if options.pos_weighting { w.weight.max(0.0) } else { 1.0 };
                (w, w.word.trim().to_lowercase(), weight)
            })
            .collect();

        let total_weight: f64 = query.iter().map(|(_, _, weight)| weight).sum();
        if query.is_empty() || total_weight <= 0.0 {
            return self.index.iter().map(|_| None).collect();
        }

        self.index
            .iter()
            .map(|indexed| {
                let mut weighted = 0.0;
                let mut matched_words = Vec::new();
                let mut has_cjk = false;
                let mut has_latin = false;

                for (word, lower, weight) in &query {
                    let best = indexed.best(lower, self.settings.min_similarity);
                    if best <= 0.0 {
                        continue;
                    }
                    weighted += weight * best;
                    if contains_cjk(lower) {
                        has_cjk = true;
                    } else {
                        has_latin = true;
                    }
                    matched_words.push(MatchedWord {
                        word: word.word.clone(),
                        pos: word.pos,
                        source: word.source,
                    });
                }

                if matched_words.is_empty() {
                    return None;
                }
                Some(SideScore {
                    normalized: (weighted / total_weight).min(1.0),
                    matched_words,
                    has_cjk,
                    has_latin,
                })
            })
            .collect()
    }

    fn to_result(&self, index: usize, score: f64, match_type: String, matched_words: Vec<MatchedWord>) -> Option<MatchResult> {
        let term = self.catalogue.terms().get(index)?;
        Some(MatchResult {
            term: term.clone(),
            cat_id: term.cat_id.clone(),
            score,
            match_type,
            rank: 0,
            matched_words,
        })
    }
}

fn language_tag(has_cjk: bool, has_latin: bool) -> &'static str {
    match (has_cjk, has_latin) {
        (true, true) => "bilingual",
        (true, false) => "chinese",
        _ => "english",
    }
}

impl Matcher for FuzzyMatcher {
    fn kind(&self) -> EngineKind {
        EngineKind::Fuzzy
    }

    fn catalogue(&self) -> &TermCatalogue {
        &self.catalogue
    }

    /// 单语阈值同样换算到 0–1000 刻度
    fn default_threshold(&self, bilingual: bool) -> f64 {
        if bilingual {
            self.settings.bilingual_threshold
        } else {
            self.settings.threshold * SCORE_SCALE
        }
    }

    fn get_all_matches(&self, words: &[WordInfo], options: &MatchOptions) -> Vec<MatchResult> {
        if words.is_empty() || self.catalogue.is_empty() {
            return Vec::new();
        }

        let results = self
            .side_scores(words, options)
            .into_iter()
            .enumerate()
            .filter_map(|(index, side)| {
                let side = side?;
                let match_type = format!("{}_fuzzy", language_tag(side.has_cjk, side.has_latin));
                self.to_result(index, side.normalized * SCORE_SCALE, match_type, side.matched_words)
            })
            .collect();

        let threshold = options.threshold.unwrap_or(self.default_threshold(false));
        rank_results(results, threshold, options)
    }

    fn get_all_bilingual_matches(
        &self,
        original: &[WordInfo],
        translated: &[WordInfo],
        options: &MatchOptions,
    ) -> Vec<MatchResult> {
        if (original.is_empty() && translated.is_empty()) || self.catalogue.is_empty() {
            return Vec::new();
        }

        let original: Vec<WordInfo> = original
            .iter()
            .cloned()
            .map(|w| w.with_source(WordSource::Original))
            .collect();
        let translated: Vec<WordInfo> = translated
            .iter()
            .cloned()
            .map(|w| w.with_source(WordSource::Translated))
            .collect();

        let left = self.side_scores(&original, options);
        let right = self.side_scores(&translated, options);

        let results = left
            .into_iter()
            .zip(right)
            .enumerate()
            .filter_map(|(index, pair)| {
                let (score, matched_words) = match pair {
                    (None, None) => return None,
                    (Some(o), None) => (o.normalized, o.matched_words),
                    (None, Some(t)) => (t.normalized, t.matched_words),
                    (Some(o), Some(t)) => {
                        let combined = 1.0 - (1.0 - o.normalized) * (1.0 - t.normalized);
                        let mut words = o.matched_words;
                        words.extend(t.matched_words);
                        (combined, words)
                    }
                };
                self.to_result(index, score * SCORE_SCALE, "bilingual_fuzzy".to_string(), matched_words)
            })
            .collect();

        let threshold = options.threshold.unwrap_or(self.default_threshold(true));
        let ranked = rank_results(results, threshold, options);
        debug!(results = ranked.len(), "双语模糊匹配完成");
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pos;

    fn matcher() -> FuzzyMatcher {
        let catalogue = TermCatalogue::from_terms(vec![
            TermRecord {
                source: "Footstep".into(),
                target: "脚步声".into(),
                cat_id: "FOL001".into(),
                category: "Foley".into(),
                synonyms: "walk, tread".into(),
                ..Default::default()
            },
            TermRecord {
                source: "Door Slam".into(),
                target: "关门".into(),
                cat_id: "DOORSlam".into(),
                category: "Doors".into(),
                ..Default::default()
            },
        ])
        .unwrap();
        FuzzyMatcher::new(Arc::new(catalogue), FuzzySettings::default())
    }

    fn noun(word: &str) -> WordInfo {
        WordInfo::new(word, Pos::Noun, 1.0)
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("door", "door"), 1.0);
        assert_eq!(similarity("", "door"), 0.0);
        assert!((similarity("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-9);
        assert!((similarity("脚步", "脚步声") - (1.0 - 1.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_containment_bonus() {
        let s = similarity_with_containment("foot", "footstep");
        assert!((s - 0.8).abs() < 1e-9);
        assert_eq!(similarity_with_containment("oo", "door"), similarity("oo", "door"));
    }

    #[test]
    fn test_typo_matches() {
        let m = matcher();
        let best = m.find_match(&[noun("footsetp")], &MatchOptions::default()).unwrap();
        assert_eq!(best.cat_id, "FOL001");
        assert!(best.score > 200.0 && best.score <= 1000.0);
        assert_eq!(best.match_type, "english_fuzzy");
    }

    #[test]
    fn test_multi_word_field_indexed_by_word() {
        let m = matcher();
        let best = m.find_match(&[noun("slam")], &MatchOptions::default()).unwrap();
        assert_eq!(best.cat_id, "DOORSlam");
        assert!((best.score - SPLIT_WORD_FACTOR * SCORE_SCALE).abs() < 1e-6);
    }

    #[test]
    fn test_whole_field_exact_beats_split_word() {
        let catalogue = TermCatalogue::from_terms(vec![
            TermRecord {
                source: "Door Knock".into(),
                target: "敲门".into(),
                cat_id: "DOORKnck".into(),
                category: "Doors".into(),
                ..Default::default()
            },
            TermRecord {
                source: "Door".into(),
                target: "门".into(),
                cat_id: "DOORWood".into(),
                category: "Doors".into(),
                ..Default::default()
            },
        ])
        .unwrap();
        let m = FuzzyMatcher::new(Arc::new(catalogue), FuzzySettings::default());

        let all = m.get_all_matches(&[noun("door")], &MatchOptions::default());
        assert_eq!(all[0].cat_id, "DOORWood");
        assert_eq!(all[1].cat_id, "DOORKnck");
        assert!(all[0].score > all[1].score);
    }

    #[test]
    fn test_unrelated_word_below_threshold() {
        let m = matcher();
        assert!(m.find_match(&[noun("xylophone")], &MatchOptions::default()).is_none());
        assert!(m.find_match(&[], &MatchOptions::default()).is_none());
    }

    #[test]
    fn test_bilingual_combined_not_below_each_side() {
        let m = matcher();
        let options = MatchOptions::default().with_threshold(0.0);
        let original = vec![noun("脚步")];
        let translated = vec![noun("footsteps")];

        let o = m.find_match(&original, &options).unwrap();
        let t = m.find_match(&translated, &options).unwrap();
        let b = m
            .find_match_with_bilingual_text(&original, &translated, &options)
            .unwrap();

        assert_eq!(b.cat_id, "FOL001");
        assert!(b.score >= o.score);
        assert!(b.score >= t.score);
        assert_eq!(b.matched_words.len(), 2);
    }

    #[test]
    fn test_default_thresholds() {
        let m = matcher();
        assert_eq!(m.default_threshold(false), 200.0);
        assert_eq!(m.default_threshold(true), 50.0);
        assert_eq!(m.kind(), EngineKind::Fuzzy);
    }
}
