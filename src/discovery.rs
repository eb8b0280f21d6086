//! 入力ファイル探索モジュール
//!
//! ディレクトリツリーを明示的なスタックで走査し、指定拡張子のファイルを
//! 行きがけ順で集める。各ディレクトリ内はファイル名のバイト順。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CorpusError, Result};

/// `root` 以下の `.{extension}` で終わるファイルを列挙
///
/// ディレクトリへのシンボリックリンクは辿らない（循環回避）。
/// ファイルへのシンボリックリンクは対象に含める。
pub fn discover_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{}", extension);
    let mut files = Vec::new();

    if !root.is_dir() {
        return Err(CorpusError::InputDirectory {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "ディレクトリではありません"),
        });
    }

    // 未訪問エントリのスタック（先頭が末尾に来るよう逆順で積む）
    let mut stack: Vec<(PathBuf, bool)> = vec![(root.to_path_buf(), true)];

    while let Some((path, is_dir)) = stack.pop() {
        if !is_dir {
            let matches = path
                .file_name()
                .map(|name| name.to_string_lossy().ends_with(&suffix))
                .unwrap_or(false);
            if matches {
                files.push(path);
            }
            continue;
        }

        let mut entries = read_dir_sorted(&path)?;
        entries.reverse();
        stack.extend(entries);
    }

    debug!(root = %root.display(), count = files.len(), "discovered input files");
    Ok(files)
}

/// ディレクトリ直下のエントリを (パス, ディレクトリか) で名前順に返す
fn read_dir_sorted(dir: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let to_err = |source| CorpusError::InputDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(to_err)? {
        let entry = entry.map_err(to_err)?;
        let file_type = entry.file_type().map_err(to_err)?;
        let path = entry.path();

        if file_type.is_dir() {
            entries.push((path, true));
        } else if file_type.is_file() {
            entries.push((path, false));
        } else if file_type.is_symlink() {
            // 壊れたリンクやディレクトリへのリンクは無視
            if fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
                entries.push((path, false));
            }
        }
    }

    entries.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(entries)
}
