//! 分词结果缓存
//!
//! 以输入原文为键缓存词性分析结果，容量满时淘汰最早写入的条目。

use crate::types::WordInfo;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
pub struct PosCache {
    capacity: usize,
    entries: HashMap<String, Vec<WordInfo>>,
    /// 写入顺序（最早在前）
    order: VecDeque<String>,
}

impl PosCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// 缓存查找
    pub fn get(&self, text: &str) -> Option<&Vec<WordInfo>> {
        self.entries.get(text)
    }

    /// 缓存写入
    pub fn insert(&mut self, text: String, words: Vec<WordInfo>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.contains_key(&text) {
            self.entries.insert(text, words);
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(text.clone());
        self.entries.insert(text, words);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
