//! テキストコーパスのN-gram・文字頻度集計
//!
//! ディレクトリ以下のテキストファイルを単語に分割し、単語列・1〜3-gram頻度・
//! a〜zの文字頻度を1パスで集計する。

pub mod corpus;
pub mod discovery;
pub mod error;
pub mod histogram;
pub mod ngram;
pub mod report;
pub mod tokenizer;

use std::path::Path;

use tracing::info;

pub use crate::corpus::{CorpusDriver, CorpusStats, ScanConfig};
pub use crate::error::{CorpusError, Result};
pub use crate::histogram::LetterHistogram;
pub use crate::ngram::{FrequencyTable, NgramAccumulator};
pub use crate::report::{CorpusSummary, ReportFile, ReportPaths, ReportWriter};
pub use crate::tokenizer::tokenize;

/// コーパス全体を集計してレポートを書き出す
pub fn run(input_dir: &Path, paths: &ReportPaths, config: ScanConfig) -> Result<CorpusStats> {
    run_with_callback(input_dir, paths, config, |_, _, _| {})
}

/// コーパス全体を集計してレポートを書き出す（ファイルごとにコールバック）
///
/// コールバックには (処理済みファイル数, 全ファイル数, 現在の統計) が渡される。
pub fn run_with_callback<F>(
    input_dir: &Path,
    paths: &ReportPaths,
    config: ScanConfig,
    mut callback: F,
) -> Result<CorpusStats>
where
    F: FnMut(usize, usize, &CorpusStats),
{
    info!(path = %input_dir.display(), "input files directory");

    // 出力先は走査前にすべて開く
    let transcript = ReportFile::create(&paths.words)?;
    let reports = ReportWriter::create(paths)?;

    let files = discovery::discover_files(input_dir, &config.extension)?;
    info!(count = files.len(), "input files discovered");

    let mut driver = CorpusDriver::with_report_file(transcript, config);
    for (i, path) in files.iter().enumerate() {
        driver.process_file(path)?;
        callback(i + 1, files.len(), driver.stats());
    }

    let (stats, transcript) = driver.finish()?;
    drop(transcript);

    reports.write_all(&stats)?;
    Ok(stats)
}
