use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sfx_renamer::{app, cli, config, interactive, logging, scanner};
use sfx_renamer::{FileOutcome, PipelineOptions, RenamerError, Status};
use sfx_renamer_common::{parse_ai_hint, ClassificationResult, ClassifyInput, TermCatalogue};
use cli::{Cli, Commands};
use config::Config;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let mut config = Config::load()?;
    // 命令行指定只对本次运行有效
    if let Some(engine) = cli.engine {
        let classifier = config.settings.classifier.with_engine(engine.into());
        config.settings = config.settings.with_classifier(classifier);
    }
    if let Some(provider) = cli.ai_provider {
        config.ai_provider = Some(provider);
    }

    match cli.command {
        Commands::Classify { text, translated, ai_hint, all } => {
            let path = config.resolve_catalogue(cli.catalogue.as_deref())?;
            let catalogue = app::load_catalogue(&path)?;
            let pipeline = app::build_pipeline(&config, catalogue)?;

            let mut input = ClassifyInput::new(text.clone());
            if let Some(translated) = translated {
                input = input.with_translated(translated);
            }
            if let Some(json) = ai_hint {
                input = input.with_ai_hint(parse_ai_hint(&json).map_err(RenamerError::from)?);
            }

            match pipeline.classifier().classify_with_providers(&input).await {
                Some(result) => print_classification(&result, all),
                None => println!("✗ 没有匹配的分类: {}", text),
            }
        }

        Commands::Rename { folder, dry_run, recursive, report, interactive, start_serial } => {
            println!("🔊 sfx-renamer - {}\n", if dry_run { "重命名预览" } else { "重命名" });

            println!("[1/3] 扫描音效文件...");
            let files = scanner::scan_folder(&folder, recursive)?;
            if files.is_empty() {
                return Err(RenamerError::NoAudioFiles(folder.display().to_string()).into());
            }
            println!("✔ 找到 {} 个文件\n", files.len());

            println!("[2/3] 读取词表...");
            let path = config.resolve_catalogue(cli.catalogue.as_deref())?;
            let catalogue = app::load_catalogue(&path)?;
            println!("✔ {} 个子分类\n", catalogue.len());

            let mut pipeline = app::build_pipeline(&config, catalogue)?
                .with_options(PipelineOptions { dry_run, start_serial });
            if interactive {
                pipeline = pipeline.with_chooser(Arc::new(interactive::PromptChooser));
            }

            // Ctrl-C 后剩余文件保持未处理
            let pause = pipeline.pause_handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    pause.store(true, Ordering::SeqCst);
                }
            });

            println!("[3/3] 分类和命名...");
            let progress = if interactive {
                ProgressBar::hidden()
            } else {
                ProgressBar::new(files.len() as u64)
            };
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("    {bar:40.cyan/blue} {pos}/{len} ({percent}%) | {elapsed_precise} | {msg}")?
                    .progress_chars("██░"),
            );

            let batch = pipeline
                .process_all(&files, |done, _total, outcome| {
                    progress.set_position(done as u64);
                    progress.set_message(outcome.original.clone());
                })
                .await;
            progress.finish_and_clear();

            for outcome in &batch.outcomes {
                print_outcome(outcome);
            }

            if let Some(report_path) = report {
                batch.write_json(&report_path)?;
                println!("\n✔ 报告已保存: {}", report_path.display());
            }

            println!(
                "\n{} 完成: 成功 {} / 失败 {} / 未处理 {}",
                if batch.failed == 0 { "✅" } else { "⚠" },
                batch.success,
                batch.failed,
                batch.pending
            );
            for error in &batch.errors {
                println!("  ✗ {}", error);
            }
        }

        Commands::Catalogue { path, categories } => {
            let catalogue = TermCatalogue::from_path(&path).map_err(RenamerError::from)?;
            println!("词表: {}", path.display());
            println!("  子分类: {}", catalogue.len());
            println!("  分类: {}", catalogue.categories().len());

            if categories {
                print_categories(&catalogue);
            }
        }

        Commands::Config { show, set_catalogue, set_ai_provider, set_nlp_url } => {
            // 覆盖前的设置
            let mut config = Config::load()?;

            if let Some(path) = set_catalogue {
                config.set_catalogue(path)?;
                println!("✔ 已设置词表文件");
            }

            if let Some(provider) = set_ai_provider {
                config.ai_provider = Some(provider);
                config.save()?;
                println!("✔ 已设置 AI 提供者: {}", provider.command_name());
            }

            if let Some(url) = set_nlp_url {
                let url = url.trim().to_string();
                config.nlp_service_url = if url.is_empty() { None } else { Some(url) };
                config.save()?;
                println!("✔ 已设置词性服务");
            }

            if show {
                println!("设置 ({}):", Config::config_path()?.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn print_classification(result: &ClassificationResult, all: bool) {
    println!("✔ {} ({} / {})", result.cat_id, result.term.source, result.term.target);
    println!("  分类: {} {}", result.term.category, result.term.category_name_zh);
    println!("  得分: {:.3}", result.score);
    println!("  策略: {} ({})", result.strategy.as_str(), result.match_type);

    if all && !result.alternatives.is_empty() {
        println!("\n候选:");
        for (i, alt) in result.alternatives.iter().enumerate() {
            println!("  {}", interactive::alternative_label(i, alt));
        }
    }
}

fn print_outcome(outcome: &FileOutcome) {
    match outcome.status {
        Status::Success => {
            let new_name = outcome.new_name.as_deref().unwrap_or(&outcome.original);
            let cat_id = outcome
                .classification
                .as_ref()
                .map(|c| c.cat_id.as_str())
                .unwrap_or("-");
            if outcome.is_renamed() {
                println!("  {} → {} [{}]", outcome.original, new_name, cat_id);
            } else {
                println!("  {} (不变) [{}]", outcome.original, cat_id);
            }
        }
        Status::Error => println!(
            "  ✗ {}: {}",
            outcome.original,
            outcome.error.as_deref().unwrap_or("未知错误")
        ),
        Status::Pending => println!("  … {} (未处理)", outcome.original),
    }
}

fn print_categories(catalogue: &TermCatalogue) {
    println!("\n分类一览:");
    for category in catalogue.categories() {
        println!("  {} ({})", category, catalogue.terms_in_category(category).len());
    }
}
