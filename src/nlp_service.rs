//! 外部词性分析服务（HTTP）
//!
//! `POST {url}`，请求体 `{"text": "..."}`，
//! 响应为 `[{"word": "...", "pos": "noun", "weight": 1.0}]`（weight 可省略）。
//! 任何失败都以 `Error::Provider` 返回，分词器会回退到本地分析。

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use sfx_renamer_common::settings::PosWeights;
use sfx_renamer_common::{Error, Pos, PosProvider, WordInfo};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct PosRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RemoteWord {
    word: String,
    #[serde(default)]
    pos: String,
    weight: Option<f64>,
}

/// HTTP 词性服务
#[derive(Debug, Clone)]
pub struct HttpPosProvider {
    client: reqwest::Client,
    url: String,
    weights: PosWeights,
}

impl HttpPosProvider {
    pub fn new(url: impl Into<String>, timeout: Duration, weights: PosWeights) -> sfx_renamer_common::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Provider(format!("HTTP 客户端初始化失败: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
            weights,
        })
    }

    async fn request(&self, text: &str) -> sfx_renamer_common::Result<Vec<WordInfo>> {
        let response = self
            .client
            .post(&self.url)
            .json(&PosRequest { text })
            .send()
            .await
            .map_err(|e| Error::Provider(format!("词性服务请求失败: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Provider(format!("词性服务返回 {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("词性服务响应读取失败: {}", e)))?;
        debug!(url = %self.url, len = body.len(), "词性服务响应");
        parse_pos_response(&body, &self.weights)
    }
}

impl PosProvider for HttpPosProvider {
    fn name(&self) -> &str {
        "http"
    }

    fn try_analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, sfx_renamer_common::Result<Vec<WordInfo>>> {
        Box::pin(self.request(text))
    }
}

/// 响应 JSON → WordInfo 列表（weight 缺省时按词性补全）
pub fn parse_pos_response(body: &str, weights: &PosWeights) -> sfx_renamer_common::Result<Vec<WordInfo>> {
    let remote: Vec<RemoteWord> = serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("词性服务响应格式错误: {}", e)))?;

    let words = remote
        .into_iter()
        .filter(|w| !w.word.trim().is_empty())
        .map(|w| {
            let pos = Pos::parse_loose(&w.pos);
            let weight = w.weight.unwrap_or_else(|| weights.weight_for(pos));
            WordInfo::new(w.word.trim(), pos, weight)
        })
        .collect();
    Ok(words)
}
