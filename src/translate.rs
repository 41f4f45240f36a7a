//! 翻译能力
//!
//! 文件名的中英互译和英文描述的规范化。
//! 离线实现 `CatalogueTranslator` 只使用词表中的中英对照（子分类名和同义词）。
//! 翻译失败不是致命错误，调用方降级为原文。

use crate::error::{RenamerError, Result};
use futures::future::BoxFuture;
use sfx_renamer_common::text::{
    contains_cjk, is_cjk, is_file_numbering, is_number, is_stopword, split_latin_words,
};
use sfx_renamer_common::{Error, TermCatalogue};
use std::collections::HashMap;

/// 语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Zh,
}

impl Lang {
    /// 按是否包含汉字判定
    pub fn detect(text: &str) -> Self {
        if contains_cjk(text) {
            Lang::Zh
        } else {
            Lang::En
        }
    }
}

/// 翻译接口
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    fn translate<'a>(&'a self, text: &'a str, from: Lang, to: Lang) -> BoxFuture<'a, Result<String>>;

    /// 中文 → 英文
    fn reverse_translate<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String>> {
        self.translate(text, Lang::Zh, Lang::En)
    }

    /// 简短的英文描述（文件名主体）
    fn standardize<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// 英文描述规范化：去掉停用词和编号，各词首字母大写，最多 `max_words` 个
///
/// ```
/// use sfx_renamer::translate::standardize_descriptor;
///
/// assert_eq!(standardize_descriptor("footsteps on snow 01", 4), "Footsteps Snow");
/// ```
pub fn standardize_descriptor(text: &str, max_words: usize) -> String {
    let mut words: Vec<String> = Vec::new();
    for word in text.split_whitespace().flat_map(split_latin_words) {
        if is_number(&word) || is_file_numbering(&word) || is_stopword(&word) {
            continue;
        }
        if words.iter().any(|w| w.eq_ignore_ascii_case(&word)) {
            continue;
        }
        words.push(capitalize(&word));
        if words.len() >= max_words {
            break;
        }
    }
    words.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// 文件名描述的最大单词数
pub const DESCRIPTOR_MAX_WORDS: usize = 4;

/// 原文直接返回
#[derive(Debug, Clone, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn translate<'a>(&'a self, text: &'a str, _from: Lang, _to: Lang) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move { Ok(text.to_string()) })
    }

    fn standardize<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let descriptor = standardize_descriptor(text, DESCRIPTOR_MAX_WORDS);
            Ok(if descriptor.is_empty() {
                text.trim().to_string()
            } else {
                descriptor
            })
        })
    }
}

/// 词表对照翻译
///
/// 英文 → 中文：逐词查表（复数 `s` / `es` 去掉后再查）。
/// 中文 → 英文：正向最大匹配。查不到的部分丢弃，全部查不到时返回错误。
#[derive(Debug, Clone, Default)]
pub struct CatalogueTranslator {
    en_to_zh: HashMap<String, String>,
    zh_to_en: HashMap<String, String>,
    /// 中文词条的最大字数
    max_zh_len: usize,
}

impl CatalogueTranslator {
    pub fn new(catalogue: &TermCatalogue) -> Self {
        let mut translator = Self::default();

        for term in catalogue.terms() {
            if term.source != term.target {
                translator.add_pair(&term.source, &term.target);
            }
            // 同义词只和对方语言的子分类名对应
            for synonym in term.synonym_list() {
                translator.add_en(synonym, &term.target);
            }
            for synonym in term.synonym_zh_list() {
                translator.add_zh(synonym, &term.source);
            }
        }
        translator
    }

    pub fn len(&self) -> usize {
        self.en_to_zh.len() + self.zh_to_en.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn add_pair(&mut self, en: &str, zh: &str) {
        self.add_en(en, zh);
        self.add_zh(zh, en);
    }

    /// 先加入者优先
    fn add_en(&mut self, en: &str, zh: &str) {
        let key = en.trim().to_lowercase();
        if key.is_empty() || zh.trim().is_empty() || contains_cjk(&key) {
            return;
        }
        self.en_to_zh.entry(key).or_insert_with(|| zh.trim().to_string());
    }

    fn add_zh(&mut self, zh: &str, en: &str) {
        let key = zh.trim().to_string();
        if key.is_empty() || en.trim().is_empty() || !contains_cjk(&key) {
            return;
        }
        self.max_zh_len = self.max_zh_len.max(key.chars().count());
        self.zh_to_en.entry(key).or_insert_with(|| en.trim().to_string());
    }

    fn lookup_en(&self, word: &str) -> Option<&str> {
        let lower = word.to_lowercase();
        let candidates = [
            Some(lower.as_str()),
            lower.strip_suffix("es"),
            lower.strip_suffix('s'),
        ];
        let found = candidates
            .into_iter()
            .flatten()
            .filter(|c| !c.is_empty())
            .find_map(|c| self.en_to_zh.get(c).map(String::as_str));
        found
    }

    /// 英文 → 中文
    pub fn en_to_zh(&self, text: &str) -> Option<String> {
        // 多词条目（"door slam"）优先整体查
        if let Some(whole) = self.en_to_zh.get(&text.trim().to_lowercase()) {
            return Some(whole.clone());
        }

        let mut parts: Vec<&str> = Vec::new();
        for word in split_latin_words(text) {
            if is_number(&word) || is_stopword(&word) {
                continue;
            }
            if let Some(zh) = self.lookup_en(&word) {
                if !parts.contains(&zh) {
                    parts.push(zh);
                }
            }
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }

    /// 中文 → 英文（正向最大匹配）
    pub fn zh_to_en(&self, text: &str) -> Option<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut parts: Vec<&str> = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if !is_cjk(chars[i]) {
                i += 1;
                continue;
            }
            let longest = self.max_zh_len.min(chars.len() - i);
            let found = (1..=longest).rev().find_map(|len| {
                let candidate: String = chars[i..i + len].iter().collect();
                self.zh_to_en.get(&candidate).map(|en| (len, en.as_str()))
            });
            match found {
                Some((len, en)) => {
                    if !parts.contains(&en) {
                        parts.push(en);
                    }
                    i += len;
                }
                None => i += 1,
            }
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

impl Translator for CatalogueTranslator {
    fn name(&self) -> &str {
        "catalogue"
    }

    fn translate<'a>(&'a self, text: &'a str, from: Lang, to: Lang) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let translated = match (from, to) {
                (Lang::En, Lang::Zh) => self.en_to_zh(text),
                (Lang::Zh, Lang::En) => self.zh_to_en(text),
                _ => Some(text.to_string()),
            };
            translated.ok_or_else(|| {
                RenamerError::from(Error::Provider(format!("词表中没有可用的译文: {}", text)))
            })
        })
    }

    fn standardize<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let english = if contains_cjk(text) {
                self.zh_to_en(text).unwrap_or_else(|| text.to_string())
            } else {
                text.to_string()
            };
            let descriptor = standardize_descriptor(&english, DESCRIPTOR_MAX_WORDS);
            Ok(if descriptor.is_empty() {
                english.trim().to_string()
            } else {
                descriptor
            })
        })
    }
}
