//! 核心数据类型
//!
//! - TermRecord: 词表中的一条分类术语
//! - WordInfo: 分词 + 词性标注的输出
//! - MatchResult: 匹配引擎的输出
//! - AiHint: 外部 AI 给出的分类提示

use serde::{Deserialize, Serialize};

/// 词性
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pos {
    Noun,
    Verb,
    Adjective,
    Adverb,
    #[default]
    Other,
}

impl Pos {
    /// 所有词性（按默认权重从高到低）
    pub const ALL: [Pos; 5] = [Pos::Noun, Pos::Adjective, Pos::Verb, Pos::Adverb, Pos::Other];

    /// jieba 词性标签转换
    ///
    /// `a*`→形容词, `v*`→动词, `d`→副词, `n*`→名词。
    /// 虚词类标签（助词、介词、连词、代词、数词、量词、标点等）归为 Other，
    /// 使其按 Other 的低权重参与后置过滤；其余未知标签默认为名词。
    pub fn from_jieba_tag(tag: &str) -> Pos {
        match tag.chars().next() {
            Some('a') => Pos::Adjective,
            Some('v') => Pos::Verb,
            Some('d') => Pos::Adverb,
            Some('n') => Pos::Noun,
            Some('u' | 'p' | 'c' | 'r' | 'm' | 'q' | 'x' | 'w' | 'y' | 'e') => Pos::Other,
            _ => Pos::Noun,
        }
    }

    /// 外部服务返回的词性字符串转换（宽松匹配）
    pub fn parse_loose(value: &str) -> Pos {
        match value.trim().to_lowercase().as_str() {
            "noun" | "n" | "nn" | "nns" | "nnp" | "propn" | "名词" => Pos::Noun,
            "verb" | "v" | "vb" | "vbd" | "vbg" | "vbn" | "vbp" | "vbz" | "动词" => Pos::Verb,
            "adjective" | "adj" | "a" | "jj" | "jjr" | "jjs" | "形容词" => Pos::Adjective,
            "adverb" | "adv" | "d" | "rb" | "rbr" | "rbs" | "副词" => Pos::Adverb,
            _ => Pos::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adjective => "adjective",
            Pos::Adverb => "adverb",
            Pos::Other => "other",
        }
    }

    /// POS 累计得分数组中的下标
    pub(crate) fn index(&self) -> usize {
        match self {
            Pos::Noun => 0,
            Pos::Adjective => 1,
            Pos::Verb => 2,
            Pos::Adverb => 3,
            Pos::Other => 4,
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 词的来源语言
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordSource {
    /// 用户原始文件名
    #[default]
    Original,
    /// 机器翻译结果
    Translated,
}

/// 分词结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordInfo {
    pub word: String,
    pub pos: Pos,
    pub weight: f64,
    #[serde(default)]
    pub source: WordSource,
}

impl WordInfo {
    pub fn new(word: impl Into<String>, pos: Pos, weight: f64) -> Self {
        Self {
            word: word.into(),
            pos,
            weight,
            source: WordSource::Original,
        }
    }

    pub fn with_source(mut self, source: WordSource) -> Self {
        self.source = source;
        self
    }
}

/// 词表中的一条术语
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TermRecord {
    /// 子分类名（通常为英文）
    pub source: String,
    /// 对应译名（通常为中文）
    pub target: String,
    pub cat_id: String,
    pub cat_short: String,
    pub category: String,
    pub category_name_zh: String,
    /// 英文同义词（逗号等分隔）
    pub synonyms: String,
    /// 中文同义词
    pub synonyms_zh: String,
}

impl TermRecord {
    /// 英文同义词列表
    pub fn synonym_list(&self) -> Vec<&str> {
        split_synonyms(&self.synonyms)
    }

    /// 中文同义词列表
    pub fn synonym_zh_list(&self) -> Vec<&str> {
        split_synonyms(&self.synonyms_zh)
    }
}

/// 同义词字段拆分（`,` `;` `|` `、` `，`）
pub fn split_synonyms(value: &str) -> Vec<&str> {
    value
        .split([',', ';', '|', '、', '，', '；'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// 命中的词
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedWord {
    pub word: String,
    pub pos: Pos,
    pub source: WordSource,
}

/// 匹配结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub term: TermRecord,
    pub cat_id: String,
    /// 同一次查询内可比较；不同引擎之间不可直接比较
    pub score: f64,
    pub match_type: String,
    pub rank: usize,
    pub matched_words: Vec<MatchedWord>,
}

/// 外部 AI 分类提示
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiHint {
    #[serde(alias = "CatID", alias = "cat_id")]
    pub cat_id: String,
    pub category: String,
    pub confidence: Option<f64>,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_from_jieba_tag() {
        assert_eq!(Pos::from_jieba_tag("n"), Pos::Noun);
        assert_eq!(Pos::from_jieba_tag("nr"), Pos::Noun);
        assert_eq!(Pos::from_jieba_tag("vn"), Pos::Verb);
        assert_eq!(Pos::from_jieba_tag("a"), Pos::Adjective);
        assert_eq!(Pos::from_jieba_tag("d"), Pos::Adverb);
        assert_eq!(Pos::from_jieba_tag("uj"), Pos::Other);
        assert_eq!(Pos::from_jieba_tag("o"), Pos::Noun);
    }

    #[test]
    fn test_pos_from_jieba_function_word_tags() {
        for tag in ["u", "ul", "p", "c", "r", "m", "q", "x", "w", "y", "e"] {
            assert_eq!(Pos::from_jieba_tag(tag), Pos::Other, "tag = {}", tag);
        }
        for tag in ["o", "i", "l", "s", "t", "f", "z", ""] {
            assert_eq!(Pos::from_jieba_tag(tag), Pos::Noun, "tag = {}", tag);
        }
    }

    #[test]
    fn test_pos_parse_loose() {
        assert_eq!(Pos::parse_loose("NN"), Pos::Noun);
        assert_eq!(Pos::parse_loose("ADJ"), Pos::Adjective);
        assert_eq!(Pos::parse_loose("动词"), Pos::Verb);
        assert_eq!(Pos::parse_loose("??"), Pos::Other);
    }

    #[test]
    fn test_split_synonyms() {
        assert_eq!(split_synonyms("step, walk;tread"), vec!["step", "walk", "tread"]);
        assert_eq!(split_synonyms("脚步、步伐，走路"), vec!["脚步", "步伐", "走路"]);
        assert!(split_synonyms("  ").is_empty());
    }

    #[test]
    fn test_term_record_serialize() {
        let term = TermRecord {
            source: "Footstep".to_string(),
            cat_id: "FOL001".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&term).expect("序列化失败");
        assert!(json.contains("\"catId\":\"FOL001\""));
    }

    #[test]
    fn test_ai_hint_deserialize_aliases() {
        let hint: AiHint = serde_json::from_str(r#"{"CatID": "DOOR01", "confidence": 0.9}"#).unwrap();
        assert_eq!(hint.cat_id, "DOOR01");
        assert_eq!(hint.confidence, Some(0.9));
    }
}
