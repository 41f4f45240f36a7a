//! 文本工具
//!
//! 字符类别判定、按文字切分、停用词表

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// CJK 表意文字判定
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |
        '\u{3400}'..='\u{4DBF}' |
        '\u{F900}'..='\u{FAFF}' |
        '\u{20000}'..='\u{2A6DF}'
    )
}

pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

pub fn contains_latin(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}

/// 文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptRun<'a> {
    Cjk(&'a str),
    Other(&'a str),
}

/// 按 CJK / 非 CJK 切分成连续片段
pub fn split_script_runs(text: &str) -> Vec<ScriptRun<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let cjk = is_cjk(c);
        match current {
            Some(prev) if prev != cjk => {
                runs.push(make_run(&text[start..i], prev));
                start = i;
                current = Some(cjk);
            }
            None => current = Some(cjk),
            _ => {}
        }
    }

    if let Some(prev) = current {
        runs.push(make_run(&text[start..], prev));
    }

    runs
}

fn make_run(slice: &str, cjk: bool) -> ScriptRun<'_> {
    if cjk {
        ScriptRun::Cjk(slice)
    } else {
        ScriptRun::Other(slice)
    }
}

/// 纯数字
pub fn is_number(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit() || c == '.')
        && word.chars().any(|c| c.is_ascii_digit())
}

/// 纯标点 / 符号
pub fn is_punctuation(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| !c.is_alphanumeric())
}

lazy_static! {
    /// 文件编号类 token（`01`、`A12`、`take3`、`v2` 等）
    static ref FILE_NUMBERING: Regex =
        Regex::new(r"^(?i)(\d+|[a-z]\d+|take\d*|tk\d+|ver\d+|v\d+|copy|final|\d+(k|khz|bit|ch))$")
            .expect("valid numbering pattern");

    /// 英文停用词（含助动词、限定词、代词）
    pub static ref ENGLISH_STOPWORDS: HashSet<&'static str> = [
        "a", "an", "the", "and", "or", "but", "nor", "so", "yet",
        "of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "onto",
        "over", "under", "through", "off", "out", "up", "down", "about", "as",
        "is", "are", "was", "were", "be", "been", "being", "am",
        "do", "does", "did", "have", "has", "had",
        "will", "would", "shall", "should", "can", "could", "may", "might", "must",
        "this", "that", "these", "those", "some", "any", "each", "every", "no",
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
        "my", "your", "his", "its", "our", "their", "mine", "yours",
        "who", "whom", "which", "what", "there", "here", "then", "than",
        "not", "very", "too", "also", "just",
    ]
    .into_iter()
    .collect();

    /// 中文停用词
    pub static ref CHINESE_STOPWORDS: HashSet<&'static str> = [
        "的", "了", "和", "是", "就", "都", "而", "及", "与", "着", "或",
        "在", "到", "从", "向", "对", "把", "被", "给", "让", "使",
        "之", "以", "于", "其", "这", "那", "个", "些", "地", "得",
        "我", "你", "他", "她", "它", "我们", "你们", "他们",
        "一个", "这个", "那个", "一些", "很", "非常", "也", "还", "再", "又",
        "一", "二", "三", "四", "五", "六", "七", "八", "九", "十",
        "版", "第", "号", "次",
    ]
    .into_iter()
    .collect();
}

/// 文件编号模式
pub fn is_file_numbering(word: &str) -> bool {
    FILE_NUMBERING.is_match(word)
}

/// 停用词判定（中英文）
pub fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    ENGLISH_STOPWORDS.contains(lower.as_str()) || CHINESE_STOPWORDS.contains(word)
}

/// 英文单词拆分（空格、下划线、连字符、驼峰）
pub fn split_latin_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for chunk in text.split(|c: char| !c.is_alphanumeric() && c != '\'') {
        let chunk = chunk.trim_matches('\'');
        if chunk.is_empty() {
            continue;
        }
        words.extend(split_camel_case(chunk));
    }
    words
}

/// `DoorSlam` → `Door`, `Slam`；`ABCDoor` → `ABC`, `Door`；字母与数字之间也切开
fn split_camel_case(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut parts = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let lower_to_upper = prev.is_lowercase() && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.map(|n| n.is_lowercase()).unwrap_or(false);
            let digit_boundary = prev.is_ascii_digit() != c.is_ascii_digit();
            if (lower_to_upper || acronym_end || digit_boundary) && !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_cjk() {
        assert!(contains_cjk("脚步声"));
        assert!(contains_cjk("door 关门"));
        assert!(!contains_cjk("door slam"));
        assert!(!contains_cjk("123 !!"));
    }

    #[test]
    fn test_split_script_runs() {
        let runs = split_script_runs("关门 door slam声");
        assert_eq!(
            runs,
            vec![
                ScriptRun::Cjk("关门"),
                ScriptRun::Other(" door slam"),
                ScriptRun::Cjk("声"),
            ]
        );
        assert!(split_script_runs("").is_empty());
    }

    #[test]
    fn test_file_numbering() {
        assert!(is_file_numbering("01"));
        assert!(is_file_numbering("A12"));
        assert!(is_file_numbering("take3"));
        assert!(is_file_numbering("48k"));
        assert!(!is_file_numbering("door"));
        assert!(!is_file_numbering("mp5x"));
    }

    #[test]
    fn test_split_latin_words() {
        assert_eq!(split_latin_words("DoorSlam_heavy-01"), vec!["Door", "Slam", "heavy", "01"]);
        assert_eq!(split_latin_words("SFXDoor"), vec!["SFX", "Door"]);
        assert_eq!(split_latin_words("wind's howl"), vec!["wind's", "howl"]);
    }

    #[test]
    fn test_stopwords() {
        assert!(is_stopword("The"));
        assert!(is_stopword("的"));
        assert!(!is_stopword("door"));
    }

    #[test]
    fn test_number_and_punctuation() {
        assert!(is_number("01"));
        assert!(is_number("2.5"));
        assert!(!is_number("."));
        assert!(is_punctuation("--"));
        assert!(!is_punctuation("a-"));
    }
}
