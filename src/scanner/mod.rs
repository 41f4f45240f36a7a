use crate::error::{RenamerError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 扫描到的音效文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub path: PathBuf,
    /// 文件名（含扩展名）
    pub file_name: String,
    /// 文件名（不含扩展名）
    pub stem: String,
    /// 扩展名（原样，不含点）
    pub extension: String,
}

impl AudioFile {
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy().to_string();
        let stem = path.file_stem()?.to_string_lossy().to_string();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        Some(Self {
            path: path.to_path_buf(),
            file_name,
            stem,
            extension,
        })
    }

    /// 批处理中的 ID（路径）
    pub fn id(&self) -> String {
        self.path.display().to_string()
    }
}

const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "aif", "aiff", "ogg", "m4a"];

pub fn is_audio_extension(ext: &str) -> bool {
    let lower = ext.to_ascii_lowercase();
    AUDIO_EXTENSIONS.contains(&lower.as_str())
}

/// 文件夹扫描（`recursive` 为 false 时只看直下）
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<AudioFile>> {
    if !folder.is_dir() {
        return Err(RenamerError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let is_audio = path
            .extension()
            .map(|ext| is_audio_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if !is_audio {
            continue;
        }

        if let Some(file) = AudioFile::from_path(path) {
            files.push(file);
        }
    }

    // 路径排序（同一文件夹内即文件名顺序）
    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(files)
}
