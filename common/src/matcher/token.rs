//! 逐词累加匹配（主引擎）
//!
//! 每个词对每条术语打分，得分 = 词权重 × 来源权重 × 匹配分 × 词性倍率，
//! 同一 (词, 术语) 只计一次。双语时先做对齐加权，原文词在前。

use super::align::align_bilingual;
use super::word_match::{WordHit, WordPattern};
use super::{is_query_word, rank_results, MatchOptions, Matcher};
use crate::catalogue::TermCatalogue;
use crate::settings::{EngineKind, MatchWeights};
use crate::text::contains_cjk;
use crate::types::{MatchResult, MatchedWord, Pos, WordInfo, WordSource};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// 术语单位的累计
#[derive(Debug, Default)]
struct Accumulator {
    score: f64,
    match_count: usize,
    /// 词性别得分（下标为 `Pos::index`）
    pos_scores: [f64; 5],
    has_cjk: bool,
    has_latin: bool,
    matched_words: Vec<MatchedWord>,
}

impl Accumulator {
    fn add(&mut self, word: &WordInfo, pattern: &WordPattern, contribution: f64) {
        self.score += contribution;
        self.match_count += 1;
        self.pos_scores[word.pos.index()] += contribution;
        if pattern.is_cjk() {
            self.has_cjk = true;
        } else {
            self.has_latin = true;
        }
        self.matched_words.push(MatchedWord {
            word: word.word.clone(),
            pos: word.pos,
            source: word.source,
        });
    }

    /// 语言构成 + 主导词性，例如 `bilingual_noun`
    fn match_type(&self) -> String {
        let language = match (self.has_cjk, self.has_latin) {
            (true, true) => "bilingual",
            (true, false) => "chinese",
            _ => "english",
        };
        let dominant = Pos::ALL
            .iter()
            .copied()
            .fold((Pos::Other, f64::MIN), |best, pos| {
                let s = self.pos_scores[pos.index()];
                if s > best.1 {
                    (pos, s)
                } else {
                    best
                }
            })
            .0;
        format!("{}_{}", language, dominant)
    }
}

pub struct TokenMatcher {
    catalogue: Arc<TermCatalogue>,
    weights: MatchWeights,
}

impl TokenMatcher {
    pub fn new(catalogue: Arc<TermCatalogue>, weights: MatchWeights) -> Self {
        Self { catalogue, weights }
    }

    /// 词性倍率（名词出现在分类名中时追加分类相关倍率，上限 max_multiplier）
    fn pos_multiplier(
        &self,
        word: &WordInfo,
        hit: &WordHit,
        category: &str,
        category_zh: &str,
        bilingual: bool,
        pos_weighting: bool,
    ) -> f64 {
        let w = &self.weights;
        if !pos_weighting {
            return if hit.exact_term { w.plain_exact_boost } else { 1.0 };
        }
        // 与 source / target 完全一致时取上限
        if hit.exact_term {
            return w.max_multiplier;
        }

        let multiplier = match word.pos {
            Pos::Noun => {
                let base = if bilingual { w.bilingual_noun_boost } else { w.noun_boost };
                let lower = word.word.to_lowercase();
                let in_category = category.to_lowercase().contains(&lower)
                    || (!category_zh.is_empty() && category_zh.contains(word.word.as_str()));
                if in_category {
                    base * w.category_relevance_boost
                } else {
                    base
                }
            }
            Pos::Verb => {
                if bilingual {
                    w.bilingual_verb_boost
                } else {
                    w.verb_boost
                }
            }
            Pos::Adjective => {
                if bilingual {
                    w.bilingual_adjective_boost
                } else {
                    w.adjective_boost
                }
            }
            Pos::Adverb | Pos::Other => 1.0,
        };
        multiplier.min(w.max_multiplier)
    }

    fn source_weight(&self, source: WordSource, bilingual: bool, options: &MatchOptions) -> f64 {
        let w = &self.weights;
        let (original, translated) = if bilingual {
            (w.bilingual_original_weight, w.bilingual_translated_weight)
        } else {
            options
                .source_weight_ratio
                .unwrap_or((w.original_source_weight, w.translated_source_weight))
        };
        match source {
            WordSource::Original => original,
            WordSource::Translated => translated,
        }
    }

    /// 全术语扫描并累计
    fn accumulate(&self, words: &[WordInfo], bilingual: bool, options: &MatchOptions) -> Vec<MatchResult> {
        let terms = self.catalogue.terms();
        let mut scores: HashMap<usize, Accumulator> = HashMap::new();
        // 出现顺序（同分时保持稳定）
        let mut order: Vec<usize> = Vec::new();
        let mut counted: HashSet<(String, usize)> = HashSet::new();

        for word in words.iter().filter(|w| is_query_word(w)) {
            let pattern = WordPattern::new(&word.word);
            let source_weight = self.source_weight(word.source, bilingual, options);

            for (index, term) in terms.iter().enumerate() {
                let Some(hit) = pattern.score(term) else {
                    continue;
                };
                if !counted.insert((pattern.as_str().to_string(), index)) {
                    continue;
                }

                let multiplier = self.pos_multiplier(
                    word,
                    &hit,
                    &term.category,
                    &term.category_name_zh,
                    bilingual,
                    options.pos_weighting,
                );
                let weight = if options.pos_weighting { word.weight } else { 1.0 };
                let contribution = weight * source_weight * hit.score * multiplier;

                let acc = scores.entry(index).or_insert_with(|| {
                    order.push(index);
                    Accumulator::default()
                });
                acc.add(word, &pattern, contribution);
            }
        }

        order
            .into_iter()
            .filter_map(|index| {
                let acc = scores.remove(&index)?;
                let term = terms.get(index)?;
                Some(MatchResult {
                    term: term.clone(),
                    cat_id: term.cat_id.clone(),
                    score: acc.score,
                    match_type: acc.match_type(),
                    rank: 0,
                    matched_words: acc.matched_words,
                })
            })
            .collect()
    }
}

impl Matcher for TokenMatcher {
    fn kind(&self) -> EngineKind {
        EngineKind::Token
    }

    fn catalogue(&self) -> &TermCatalogue {
        &self.catalogue
    }

    fn default_threshold(&self, bilingual: bool) -> f64 {
        if bilingual {
            self.weights.bilingual_threshold
        } else {
            self.weights.threshold
        }
    }

    fn get_all_matches(&self, words: &[WordInfo], options: &MatchOptions) -> Vec<MatchResult> {
        if words.is_empty() || self.catalogue.is_empty() {
            return Vec::new();
        }
        let threshold = options.threshold.unwrap_or(self.default_threshold(false));
        let results = rank_results(self.accumulate(words, false, options), threshold, options);
        debug!(words = words.len(), results = results.len(), "单语匹配完成");
        results
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

        let mut left: Vec<WordInfo> = original
            .iter()
            .cloned()
            .map(|w| w.with_source(WordSource::Original))
            .collect();
        let mut right: Vec<WordInfo> = translated
            .iter()
            .cloned()
            .map(|w| w.with_source(WordSource::Translated))
            .collect();

        if options.pos_weighting {
            let pairs = align_bilingual(&mut left, &mut right, &self.weights);
            debug!(pairs, "双语对齐完成");
        }

        left.extend(right);
        let threshold = options.threshold.unwrap_or(self.default_threshold(true));
        rank_results(self.accumulate(&left, true, options), threshold, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TermRecord;

    fn term(source: &str, target: &str, cat_id: &str, category: &str) -> TermRecord {
        TermRecord {
            source: source.into(),
            target: target.into(),
            cat_id: cat_id.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    fn matcher() -> TokenMatcher {
        let catalogue = TermCatalogue::from_terms(vec![
            term("Door Knock", "敲门", "DOORKnck", "Doors"),
            term("Door", "门", "DOORWood", "Doors"),
            term("Footstep", "脚步声", "FOL001", "Foley"),
            term("Wind", "风", "WINDGust", "Wind"),
        ])
        .unwrap();
        TokenMatcher::new(Arc::new(catalogue), MatchWeights::default())
    }

    fn noun(word: &str) -> WordInfo {
        WordInfo::new(word, Pos::Noun, 1.0)
    }

    #[test]
    fn test_empty_input() {
        let m = matcher();
        assert!(m.get_all_matches(&[], &MatchOptions::default()).is_empty());
        assert!(m.find_match(&[], &MatchOptions::default()).is_none());
    }

    #[test]
    fn test_all_stopwords_no_match() {
        let m = matcher();
        let words = vec![WordInfo::new("the", Pos::Other, 0.3), WordInfo::new("01", Pos::Other, 0.3)];
        assert!(m.find_match(&words, &MatchOptions::default()).is_none());
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let m = matcher();
        let best = m.find_match(&[noun("door")], &MatchOptions::default()).unwrap();
        assert_eq!(best.cat_id, "DOORWood");
        assert_eq!(best.rank, 0);
        assert_eq!(best.match_type, "english_noun");
    }

    #[test]
    fn test_exact_match_ranks_first_without_pos_weighting() {
        let m = matcher();
        let options = MatchOptions::default().without_pos_weighting();
        let best = m.find_match(&[noun("door")], &options).unwrap();
        assert_eq!(best.cat_id, "DOORWood");
    }

    #[test]
    fn test_exact_source_beats_exact_synonym_without_pos_weighting() {
        let catalogue = TermCatalogue::from_terms(vec![
            TermRecord {
                synonyms: "door".into(),
                ..term("Footstep", "脚步声", "FOL001", "Foley")
            },
            term("Door", "门", "DOORWood", "Doors"),
        ])
        .unwrap();
        let m = TokenMatcher::new(Arc::new(catalogue), MatchWeights::default());
        let options = MatchOptions::default().without_pos_weighting();

        let all = m.get_all_matches(&[noun("door")], &options);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].cat_id, "DOORWood");
        assert_eq!(all[1].cat_id, "FOL001");
        assert!(all[0].score > all[1].score);
    }

    #[test]
    fn test_get_all_matches_sorted() {
        let m = matcher();
        let all = m.get_all_matches(&[noun("door")], &MatchOptions::default());
        assert_eq!(all.len(), 2);
        assert!(all[0].score >= all[1].score);
        assert_eq!(all[1].cat_id, "DOORKnck");
        assert_eq!(all[1].rank, 1);
    }

    #[test]
    fn test_footsteps_partial_match() {
        let m = matcher();
        let words = vec![noun("footsteps"), noun("snow")];
        let best = m.find_match(&words, &MatchOptions::default()).unwrap();
        assert_eq!(best.cat_id, "FOL001");
    }

    #[test]
    fn test_chinese_match_type() {
        let m = matcher();
        let best = m.find_match(&[noun("脚步声")], &MatchOptions::default()).unwrap();
        assert_eq!(best.cat_id, "FOL001");
        assert_eq!(best.match_type, "chinese_noun");
    }

    #[test]
    fn test_same_word_counted_once() {
        let m = matcher();
        let once = m.find_match(&[noun("wind")], &MatchOptions::default()).unwrap();
        let twice = m
            .find_match(&[noun("wind"), noun("Wind")], &MatchOptions::default())
            .unwrap();
        assert!((once.score - twice.score).abs() < 1e-9);
        assert_eq!(twice.matched_words.len(), 1);
    }

    #[test]
    fn test_original_outweighs_translated() {
        let m = matcher();
        let original = m
            .find_match(&[noun("wind")], &MatchOptions::default())
            .unwrap();
        let translated = m
            .find_match(
                &[noun("wind").with_source(WordSource::Translated)],
                &MatchOptions::default(),
            )
            .unwrap();
        assert!((original.score / translated.score - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_filters() {
        let m = matcher();
        let options = MatchOptions::default().with_threshold(100.0);
        assert!(m.find_match(&[noun("door")], &options).is_none());
    }

    #[test]
    fn test_bilingual_not_below_monolingual() {
        let m = matcher();
        let options = MatchOptions::default().with_threshold(0.0);
        let original = vec![noun("脚步")];
        let translated = vec![noun("footstep")];

        let mono_original = m.find_match(&original, &options).unwrap();
        let mono_translated = m
            .find_match(
                &[noun("footstep").with_source(WordSource::Translated)],
                &options,
            )
            .unwrap();
        let bilingual = m
            .find_match_with_bilingual_text(&original, &translated, &options)
            .unwrap();

        assert_eq!(bilingual.cat_id, "FOL001");
        assert!(bilingual.score >= mono_original.score);
        assert!(bilingual.score >= mono_translated.score);
        assert_eq!(bilingual.match_type, "bilingual_noun");
    }

    #[test]
    fn test_identify_category() {
        let m = matcher();
        assert_eq!(
            m.identify_category(&[noun("风")], &MatchOptions::default()),
            Some("WINDGust".to_string())
        );
        assert_eq!(m.identify_category(&[noun("zzzz")], &MatchOptions::default()), None);
    }
}
