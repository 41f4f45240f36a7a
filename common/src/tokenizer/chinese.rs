//! 中文分词 + 词性标注
//!
//! 词典分词（jieba）→ Unicode 词边界 → 单字切分，依次回退。

use crate::settings::ChineseSegmenter;
use crate::text::{is_cjk, CHINESE_STOPWORDS};
use crate::types::Pos;
use jieba_rs::Jieba;
use lazy_static::lazy_static;
use unicode_segmentation::UnicodeSegmentation;

lazy_static! {
    /// 全局 Jieba 实例（首次使用时加载词典）
    static ref JIEBA: Jieba = {
        tracing::debug!("初始化 Jieba 分词器");
        Jieba::new()
    };
}

type Segment = fn(&str) -> Vec<(String, Pos)>;

/// 词典分词，带 jieba 词性
fn segment_dictionary(text: &str) -> Vec<(String, Pos)> {
    JIEBA
        .tag(text, true)
        .into_iter()
        .map(|t| (t.word.trim().to_string(), Pos::from_jieba_tag(t.tag)))
        .filter(|(w, _)| !w.is_empty())
        .collect()
}

/// Unicode 词边界切分（无词性信息，默认名词）
fn segment_unicode(text: &str) -> Vec<(String, Pos)> {
    text.unicode_words()
        .map(|w| (w.to_string(), Pos::Noun))
        .collect()
}

/// 单字切分
fn segment_characters(text: &str) -> Vec<(String, Pos)> {
    text.chars()
        .filter(|c| is_cjk(*c))
        .map(|c| (c.to_string(), Pos::Noun))
        .collect()
}

/// 中文文本 → (词, 词性) 列表（已排除停用词）
pub fn tag(text: &str, segmenter: ChineseSegmenter) -> Vec<(String, Pos)> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let chain: Vec<Segment> = match segmenter {
        ChineseSegmenter::Dictionary => vec![
            segment_dictionary as Segment,
            segment_unicode,
            segment_characters,
        ],
        ChineseSegmenter::Unicode => vec![segment_unicode as Segment, segment_characters],
        ChineseSegmenter::Character => vec![segment_characters as Segment],
    };

    let words = chain
        .iter()
        .map(|segment| segment(text))
        .find(|words| !words.is_empty())
        .unwrap_or_default();

    words
        .into_iter()
        .filter(|(w, _)| !CHINESE_STOPWORDS.contains(w.as_str()))
        .collect()
}
