//! レポート出力モジュール
//!
//! 集計結果を複数のテキストファイル（とオプションでJSONサマリー）に書き出す。

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::corpus::CorpusStats;
use crate::error::{CorpusError, Result};
use crate::histogram::LetterHistogram;
use crate::ngram::{sorted_entries, FrequencyTable};

/// 1-gramレポートのキー列幅
pub const UNIGRAM_WIDTH: usize = 20;
/// 2-gramレポートのキー列幅
pub const BIGRAM_WIDTH: usize = 25;
/// 3-gramレポートのキー列幅
pub const TRIGRAM_WIDTH: usize = 35;

/// 出力先パス一式
#[derive(Debug, Clone)]
pub struct ReportPaths {
    /// 単語トランスクリプト
    pub words: PathBuf,
    /// 文字カウント
    pub letters: PathBuf,
    pub unigrams: PathBuf,
    pub bigrams: PathBuf,
    pub trigrams: PathBuf,
    /// JSONサマリー（任意）
    pub summary: Option<PathBuf>,
}

impl ReportPaths {
    /// 既定のN-gram出力ファイル名で作成
    pub fn new(words: impl Into<PathBuf>, letters: impl Into<PathBuf>) -> Self {
        Self {
            words: words.into(),
            letters: letters.into(),
            unigrams: PathBuf::from("wordFreq.txt"),
            bigrams: PathBuf::from("bigramFreq.txt"),
            trigrams: PathBuf::from("trigramFreq.txt"),
            summary: None,
        }
    }
}

/// パス付きのバッファ付き出力
pub struct ReportFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ReportFile {
    /// 書き込み用に作成（既存ファイルは切り詰める）
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| CorpusError::OutputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "opened for writing");
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 書き込み処理を実行してフラッシュする
    fn write_with<F>(mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        f(&mut self.writer)
            .and_then(|()| self.writer.flush())
            .map_err(|source| CorpusError::OutputWrite {
                path: self.path.clone(),
                source,
            })
    }
}

impl Write for ReportFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// 集計後に書き出すレポート群
///
/// 走査前にすべて開いておき、書き込めない出力先があれば走査せずに失敗させる。
pub struct ReportWriter {
    letters: ReportFile,
    unigrams: ReportFile,
    bigrams: ReportFile,
    trigrams: ReportFile,
    summary: Option<ReportFile>,
}

impl ReportWriter {
    /// トランスクリプトを除く出力先をすべて開く
    pub fn create(paths: &ReportPaths) -> Result<Self> {
        Ok(Self {
            unigrams: ReportFile::create(&paths.unigrams)?,
            bigrams: ReportFile::create(&paths.bigrams)?,
            trigrams: ReportFile::create(&paths.trigrams)?,
            letters: ReportFile::create(&paths.letters)?,
            summary: paths.summary.as_deref().map(ReportFile::create).transpose()?,
        })
    }

    /// 全レポートを書き出す
    pub fn write_all(self, stats: &CorpusStats) -> Result<()> {
        let ngrams = &stats.ngrams;

        self.letters.write_with(|w| write_letter_report(w, &stats.letters))?;
        self.unigrams
            .write_with(|w| write_frequency_report(w, ngrams.unigrams(), UNIGRAM_WIDTH))?;
        self.bigrams
            .write_with(|w| write_frequency_report(w, ngrams.bigrams(), BIGRAM_WIDTH))?;
        self.trigrams
            .write_with(|w| write_frequency_report(w, ngrams.trigrams(), TRIGRAM_WIDTH))?;

        if let Some(file) = self.summary {
            let json = serde_json::to_string_pretty(&CorpusSummary::from(stats))?;
            file.write_with(|w| writeln!(w, "{}", json))?;
        }
        Ok(())
    }
}

/// 頻度表をキーの辞書順で書き出す
///
/// 行形式: キーを `width` 桁で左寄せ、続けてカウントと空白1つ。
pub fn write_frequency_report<W: Write>(w: &mut W, table: &FrequencyTable, width: usize) -> io::Result<()> {
    for (key, count) in sorted_entries(table) {
        writeln!(w, "{:<width$}{} ", key, count, width = width)?;
    }
    Ok(())
}

/// 文字カウントを `文字\tカウント` 形式で a〜z 順に書き出す
pub fn write_letter_report<W: Write>(w: &mut W, letters: &LetterHistogram) -> io::Result<()> {
    for (letter, count) in letters.iter() {
        writeln!(w, "{}\t{}", letter, count)?;
    }
    Ok(())
}

/// JSONサマリー
#[derive(Debug, Clone, Serialize)]
pub struct CorpusSummary {
    pub files_processed: usize,
    pub files_skipped: Vec<String>,
    pub total_tokens: u64,
    pub unigram_types: usize,
    pub bigram_types: usize,
    pub trigram_types: usize,
    pub total_bigrams: u64,
    pub total_trigrams: u64,
    pub total_letters: u64,
    pub letters: BTreeMap<char, u64>,
}

impl From<&CorpusStats> for CorpusSummary {
    fn from(stats: &CorpusStats) -> Self {
        Self {
            files_processed: stats.files_processed,
            files_skipped: stats
                .files_skipped
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            total_tokens: stats.total_tokens(),
            unigram_types: stats.ngrams.unigrams().len(),
            bigram_types: stats.ngrams.bigrams().len(),
            trigram_types: stats.ngrams.trigrams().len(),
            total_bigrams: stats.ngrams.total_bigrams(),
            total_trigrams: stats.ngrams.total_trigrams(),
            total_letters: stats.letters.total(),
            letters: stats.letters.iter().collect(),
        }
    }
}
