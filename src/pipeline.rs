//! 文件处理流水线
//!
//! 一个文件的 翻译 → AI 提示 → 分类 → 命名 → 重命名 全部完成后才处理下一个。
//! 暂停标志在文件之间检查，处理中的文件不会被中断。
//! 单个文件失败只记录错误，不中断整个批次。

use crate::ai_provider::AiHintProvider;
use crate::error::{RenamerError, Result};
use crate::scanner::AudioFile;
use crate::translate::{
    standardize_descriptor, CatalogueTranslator, Lang, Translator, DESCRIPTOR_MAX_WORDS,
};
use chrono::{DateTime, Local};
use serde::Serialize;
use sfx_renamer_common::naming::extract_number;
use sfx_renamer_common::text::contains_cjk;
use sfx_renamer_common::{
    build_matcher, AiHint, CategoryTables, ClassificationResult, Classifier, ClassifyInput,
    FileRecord, NameFormatter, Settings, TermCatalogue, Tokenizer,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Success,
    Error,
}

/// 单个文件的处理结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub id: String,
    pub original: String,
    pub new_name: Option<String>,
    pub status: Status,
    pub error: Option<String>,
    pub classification: Option<ClassificationResult>,
}

impl FileOutcome {
    fn pending(file: &AudioFile) -> Self {
        Self {
            id: file.id(),
            original: file.file_name.clone(),
            new_name: None,
            status: Status::Pending,
            error: None,
            classification: None,
        }
    }

    fn success(file: &AudioFile, new_name: String, classification: Option<ClassificationResult>) -> Self {
        Self {
            new_name: Some(new_name),
            status: Status::Success,
            classification,
            ..Self::pending(file)
        }
    }

    fn failed(file: &AudioFile, error: String) -> Self {
        Self {
            status: Status::Error,
            error: Some(error),
            ..Self::pending(file)
        }
    }

    /// 名字有变化
    pub fn is_renamed(&self) -> bool {
        self.new_name.as_deref().is_some_and(|n| n != self.original)
    }
}

/// 批处理报告
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub generated_at: DateTime<Local>,
    pub dry_run: bool,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub pending: usize,
    /// `文件名: 错误` 形式
    pub errors: Vec<String>,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<FileOutcome>, dry_run: bool) -> Self {
        let count = |status: Status| outcomes.iter().filter(|o| o.status == status).count();
        let errors = outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| format!("{}: {}", o.original, e)))
            .collect();
        Self {
            generated_at: Local::now(),
            dry_run,
            total: outcomes.len(),
            success: count(Status::Success),
            failed: count(Status::Error),
            pending: count(Status::Pending),
            errors,
            outcomes,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// 从分类候选中选择（交互模式）
pub trait AlternativeChooser: Send + Sync {
    /// 返回 `result.alternatives` 的下标；None 表示保持首选
    fn choose(&self, file_name: &str, result: &ClassificationResult) -> Option<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// 只计算新名字，不改文件
    pub dry_run: bool,
    /// 第一个文件的编号
    pub start_serial: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            start_serial: 1,
        }
    }
}

/// 单个文件的命名计划
#[derive(Debug, Clone)]
pub struct FilePlan {
    pub classification: Option<ClassificationResult>,
    pub translated: String,
    pub fx_name: String,
    pub fx_name_zh: String,
    /// 新文件名（不含扩展名）
    pub base_name: String,
}

pub struct FilePipeline {
    catalogue: Arc<TermCatalogue>,
    classifier: Classifier,
    formatter: NameFormatter,
    translator: Arc<dyn Translator>,
    ai_provider: Option<Arc<dyn AiHintProvider>>,
    chooser: Option<Arc<dyn AlternativeChooser>>,
    options: PipelineOptions,
    paused: Arc<AtomicBool>,
}

impl FilePipeline {
    pub fn new(settings: &Settings, catalogue: Arc<TermCatalogue>, tables: CategoryTables) -> Self {
        let tokenizer = Tokenizer::new(settings.tokenizer.clone());
        Self::with_tokenizer(settings, catalogue, tables, tokenizer)
    }

    /// 外部词性服务注册后的分词器
    pub fn with_tokenizer(
        settings: &Settings,
        catalogue: Arc<TermCatalogue>,
        tables: CategoryTables,
        tokenizer: Tokenizer,
    ) -> Self {
        let matcher = build_matcher(settings.classifier.engine, Arc::clone(&catalogue), settings);
        let classifier = Classifier::new(
            Arc::new(tokenizer),
            Arc::from(matcher),
            settings.classifier.clone(),
        );
        let translator: Arc<dyn Translator> = Arc::new(CatalogueTranslator::new(&catalogue));

        Self {
            catalogue,
            classifier,
            formatter: NameFormatter::new(settings.naming.clone(), tables),
            translator,
            ai_provider: None,
            chooser: None,
            options: PipelineOptions::default(),
            paused: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_ai_provider(mut self, provider: Arc<dyn AiHintProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    pub fn with_chooser(mut self, chooser: Arc<dyn AlternativeChooser>) -> Self {
        self.chooser = Some(chooser);
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalogue(&self) -> &TermCatalogue {
        &self.catalogue
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// 其他线程（Ctrl-C 处理等）用的暂停标志
    pub fn pause_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.paused)
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// 按顺序处理全部文件
    ///
    /// `on_progress(完成数, 总数, 结果)` 在每个文件处理后调用。
    /// 暂停时剩余文件保持 Pending。
    pub async fn process_all<F>(&self, files: &[AudioFile], mut on_progress: F) -> BatchReport
    where
        F: FnMut(usize, usize, &FileOutcome),
    {
        let total = files.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut taken = HashSet::new();

        for (index, file) in files.iter().enumerate() {
            if self.is_paused() {
                info!(done = index, total, "已暂停，剩余文件保持未处理");
                outcomes.extend(files[index..].iter().map(FileOutcome::pending));
                break;
            }

            let serial = self.options.start_serial.saturating_add(index as u32);
            let outcome = match self.process_file(file, serial, &mut taken).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(file = %file.file_name, error = %e, "文件处理失败");
                    FileOutcome::failed(file, e.to_string())
                }
            };

            on_progress(index + 1, total, &outcome);
            outcomes.push(outcome);
        }

        let report = BatchReport::new(outcomes, self.options.dry_run);
        info!(
            total = report.total,
            success = report.success,
            failed = report.failed,
            pending = report.pending,
            "批处理完成"
        );
        report
    }

    async fn process_file(
        &self,
        file: &AudioFile,
        serial: u32,
        taken: &mut HashSet<String>,
    ) -> Result<FileOutcome> {
        let plan = self.plan_file(file, serial).await?;
        let dir = file.path.parent().unwrap_or_else(|| Path::new("."));
        let new_name = resolve_collision(dir, &plan.base_name, &file.extension, &file.file_name, taken);

        if !self.options.dry_run && new_name != file.file_name {
            let target = dir.join(&new_name);
            std::fs::rename(&file.path, &target).map_err(|e| {
                RenamerError::Rename(format!("{} → {}: {}", file.file_name, new_name, e))
            })?;
        }
        info!(from = %file.file_name, to = %new_name, dry_run = self.options.dry_run, "重命名");

        Ok(FileOutcome::success(file, new_name, plan.classification))
    }

    /// 翻译、分类、命名（不改文件）
    pub async fn plan_file(&self, file: &AudioFile, serial: u32) -> Result<FilePlan> {
        let (base, _) = extract_number(&file.stem);
        let text = if base.trim().is_empty() {
            file.stem.trim().to_string()
        } else {
            base
        };
        let lang = Lang::detect(&text);

        let translated = self.translate_or_passthrough(&text, lang).await;
        let ai_hint = self.ai_hint(&file.stem, &translated).await;

        let mut input = ClassifyInput::new(text.clone()).with_translated(translated.clone());
        if let Some(hint) = ai_hint {
            input = input.with_ai_hint(hint);
        }
        let mut classification = self.classifier.classify_with_providers(&input).await;
        if let Some(result) = classification.as_mut() {
            self.apply_choice(&file.file_name, result);
        }

        let (english, chinese) = match lang {
            Lang::Zh => (translated.clone(), text.clone()),
            Lang::En => (text.clone(), translated.clone()),
        };
        let fx_name = self.fx_name(&english).await;
        let fx_name_zh = if contains_cjk(&chinese) { chinese } else { String::new() };

        let mut record = FileRecord::new(file.stem.clone())
            .with_extension(file.extension.clone())
            .with_fx_name(fx_name.clone(), fx_name_zh.clone())
            .with_serial(serial);
        if let Some(result) = &classification {
            record = record.with_classification(result);
        }
        let base_name = self.formatter.format(&record);

        debug!(
            file = %file.file_name,
            cat_id = classification.as_ref().map(|c| c.cat_id.as_str()).unwrap_or("-"),
            base_name = %base_name,
            "命名计划"
        );

        Ok(FilePlan {
            classification,
            translated,
            fx_name,
            fx_name_zh,
            base_name,
        })
    }

    /// 翻译失败时原文作为译文
    async fn translate_or_passthrough(&self, text: &str, lang: Lang) -> String {
        let result = match lang {
            Lang::Zh => self.translator.reverse_translate(text).await,
            Lang::En => self.translator.translate(text, Lang::En, Lang::Zh).await,
        };
        match result {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => text.to_string(),
            Err(e) => {
                debug!(translator = self.translator.name(), error = %e, "翻译失败，使用原文");
                text.to_string()
            }
        }
    }

    async fn ai_hint(&self, filename: &str, translated: &str) -> Option<AiHint> {
        let provider = self.ai_provider.as_ref()?;
        match provider
            .suggest(filename, Some(translated), &self.catalogue)
            .await
        {
            Ok(hint) => Some(hint),
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "AI 提示获取失败");
                None
            }
        }
    }

    async fn fx_name(&self, english: &str) -> String {
        match self.translator.standardize(english).await {
            Ok(name) if !name.trim().is_empty() => name,
            _ => {
                let descriptor = standardize_descriptor(english, DESCRIPTOR_MAX_WORDS);
                if descriptor.is_empty() {
                    english.trim().to_string()
                } else {
                    descriptor
                }
            }
        }
    }

    fn apply_choice(&self, file_name: &str, result: &mut ClassificationResult) {
        let Some(chooser) = &self.chooser else {
            return;
        };
        if result.alternatives.len() < 2 {
            return;
        }
        let Some(index) = chooser.choose(file_name, result) else {
            return;
        };
        if let Some(alt) = result.alternatives.get(index).cloned() {
            result.cat_id = alt.cat_id;
            result.term = alt.term;
            result.score = alt.score;
            result.match_type = alt.match_type;
        }
    }
}

fn with_extension(base: &str, extension: &str) -> String {
    if extension.is_empty() {
        base.to_string()
    } else {
        format!("{}.{}", base, extension)
    }
}

/// 重名时加 `_2`, `_3`…
///
/// 同一批次内已分配的名字（不区分大小写）和磁盘上已有的其他文件都算重名。
pub fn resolve_collision(
    dir: &Path,
    base: &str,
    extension: &str,
    current: &str,
    taken: &mut HashSet<String>,
) -> String {
    let mut n = 1u32;
    loop {
        let candidate = if n == 1 {
            with_extension(base, extension)
        } else {
            with_extension(&format!("{}_{}", base, n), extension)
        };
        let key = dir.join(&candidate).display().to_string().to_lowercase();
        let is_self = candidate.eq_ignore_ascii_case(current);
        let on_disk = !is_self && dir.join(&candidate).exists();

        if !taken.contains(&key) && !on_disk {
            taken.insert(key);
            return candidate;
        }
        n += 1;
    }
}
