//! 双语对齐
//!
//! 原文与译文中同词性的词按权重降序两两配对，
//! 每个词性最多配对 `max_pairs_per_pos` 组，配对成功的词按词性奖励加权。

use crate::settings::MatchWeights;
use crate::types::{Pos, WordInfo};

/// 对齐奖励（原文, 译文）
fn bonus(pos: Pos, weights: &MatchWeights) -> Option<(f64, f64)> {
    match pos {
        Pos::Noun => Some(weights.align_noun),
        Pos::Verb => Some(weights.align_verb),
        Pos::Adjective => Some(weights.align_adjective),
        Pos::Adverb => Some(weights.align_adverb),
        Pos::Other => None,
    }
}

/// 按权重降序排列的同词性下标
fn indices_by_weight(words: &[WordInfo], pos: Pos) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..words.len()).filter(|&i| words[i].pos == pos).collect();
    indices.sort_by(|&a, &b| {
        words[b]
            .weight
            .partial_cmp(&words[a].weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// 对齐并加权，返回配对数
pub fn align_bilingual(
    original: &mut [WordInfo],
    translated: &mut [WordInfo],
    weights: &MatchWeights,
) -> usize {
    let mut pairs = 0;

    for pos in Pos::ALL {
        let Some((original_bonus, translated_bonus)) = bonus(pos, weights) else {
            continue;
        };

        let left = indices_by_weight(original, pos);
        let right = indices_by_weight(translated, pos);

        for (&i, &j) in left.iter().zip(&right).take(weights.max_pairs_per_pos) {
            original[i].weight *= original_bonus;
            translated[j].weight *= translated_bonus;
            tracing::debug!(
                original = %original[i].word,
                translated = %translated[j].word,
                pos = %pos,
                "双语对齐"
            );
            pairs += 1;
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noun_pair_boost() {
        let weights = MatchWeights::default();
        let mut original = vec![WordInfo::new("脚步", Pos::Noun, 1.0)];
        let mut translated = vec![WordInfo::new("footstep", Pos::Noun, 1.0)];

        assert_eq!(align_bilingual(&mut original, &mut translated, &weights), 1);
        assert!((original[0].weight - 2.5).abs() < 1e-9);
        assert!((translated[0].weight - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_different_pos_not_paired() {
        let weights = MatchWeights::default();
        let mut original = vec![WordInfo::new("轻轻", Pos::Adverb, 0.5)];
        let mut translated = vec![WordInfo::new("footstep", Pos::Noun, 1.0)];

        assert_eq!(align_bilingual(&mut original, &mut translated, &weights), 0);
        assert_eq!(original[0].weight, 0.5);
        assert_eq!(translated[0].weight, 1.0);
    }

    #[test]
    fn test_other_pos_never_paired() {
        let weights = MatchWeights::default();
        let mut original = vec![WordInfo::new("x", Pos::Other, 0.3)];
        let mut translated = vec![WordInfo::new("y", Pos::Other, 0.3)];
        assert_eq!(align_bilingual(&mut original, &mut translated, &weights), 0);
    }

    #[test]
    fn test_pairs_capped_and_heaviest_first() {
        let weights = MatchWeights {
            max_pairs_per_pos: 1,
            ..MatchWeights::default()
        };
        let mut original = vec![
            WordInfo::new("a", Pos::Verb, 0.5),
            WordInfo::new("b", Pos::Verb, 0.7),
        ];
        let mut translated = vec![
            WordInfo::new("c", Pos::Verb, 0.7),
            WordInfo::new("d", Pos::Verb, 0.7),
        ];

        assert_eq!(align_bilingual(&mut original, &mut translated, &weights), 1);
        assert_eq!(original[0].weight, 0.5);
        assert!((original[1].weight - 0.7 * 1.6).abs() < 1e-9);
        // 同权重时保持原顺序
        assert!((translated[0].weight - 0.7 * 1.2).abs() < 1e-9);
        assert_eq!(translated[1].weight, 0.7);
    }
}
