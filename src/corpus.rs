//! コーパスモジュール
//!
//! 入力ソースを順に読み、行 → トークン → ヒストグラム・N-gram集計へ流す。
//! 処理順（ファイル順・行順・行内の左から右）は集計結果に影響する。

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{CorpusError, Result};
use crate::histogram::LetterHistogram;
use crate::ngram::NgramAccumulator;
use crate::report::ReportFile;
use crate::tokenizer::tokenize;

/// コーパス統計データ
#[derive(Clone, Debug, Default)]
pub struct CorpusStats {
    /// 1〜3-gram頻度
    pub ngrams: NgramAccumulator,
    /// 文字頻度
    pub letters: LetterHistogram,
    /// 処理したファイル数
    pub files_processed: usize,
    /// 読めずにスキップしたファイル
    pub files_skipped: Vec<PathBuf>,
}

impl CorpusStats {
    /// 空のコーパス統計を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// トークンを1つ記録
    pub fn record(&mut self, token: &str) {
        self.letters.record(token);
        self.ngrams.ingest(token);
    }

    /// テキストからコーパス統計を計算
    pub fn from_text(text: &str) -> Self {
        let mut stats = Self::new();
        for line in text.lines() {
            for token in tokenize(line) {
                stats.record(&token);
            }
        }
        stats
    }

    /// 総トークン数
    pub fn total_tokens(&self) -> u64 {
        self.ngrams.position()
    }

    /// 統計情報のサマリーを表示
    pub fn summary(&self) -> String {
        format!(
            "Corpus Stats:\n  Files: {} (skipped: {})\n  Tokens: {}\n  1-gram types: {}\n  2-gram types: {}\n  3-gram types: {}\n  Letters: {}",
            self.files_processed,
            self.files_skipped.len(),
            self.total_tokens(),
            self.ngrams.unigrams().len(),
            self.ngrams.bigrams().len(),
            self.ngrams.trigrams().len(),
            self.letters.total()
        )
    }
}

/// 走査設定
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// 対象ファイルの拡張子（ドットなし）
    pub extension: String,
    /// 読めない入力ファイルを致命的エラーにせずスキップする
    pub skip_unreadable: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            skip_unreadable: false,
        }
    }
}

/// コーパス走査器
///
/// 統計を更新しつつ、各トークンをそのまま `transcript` へ1行ずつ書き出す。
pub struct CorpusDriver<W: Write> {
    stats: CorpusStats,
    transcript: W,
    transcript_path: PathBuf,
    config: ScanConfig,
}

impl CorpusDriver<ReportFile> {
    /// レポートファイルをトランスクリプトとして走査器を作成
    pub fn with_report_file(transcript: ReportFile, config: ScanConfig) -> Self {
        let path = transcript.path().to_path_buf();
        Self::new(transcript, path, config)
    }
}

impl<W: Write> CorpusDriver<W> {
    /// 新しい走査器を作成
    pub fn new(transcript: W, transcript_path: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            stats: CorpusStats::new(),
            transcript,
            transcript_path: transcript_path.into(),
            config,
        }
    }

    fn transcript_error(&self, source: io::Error) -> CorpusError {
        CorpusError::Transcript {
            path: self.transcript_path.clone(),
            source,
        }
    }

    /// 1行を処理
    pub fn process_line(&mut self, line: &str) -> Result<()> {
        for token in tokenize(line) {
            if let Err(e) = writeln!(self.transcript, "{}", token) {
                return Err(self.transcript_error(e));
            }
            self.stats.record(&token);
        }
        Ok(())
    }

    /// 行単位のリーダーを最後まで処理
    ///
    /// 不正なUTF-8は置換文字として読み、区切り扱いになる。
    pub fn process_reader<R: BufRead>(&mut self, mut reader: R, path: &Path) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| CorpusError::InputRead {
                    path: path.to_path_buf(),
                    source,
                })?;
            if n == 0 {
                return Ok(());
            }
            let line = String::from_utf8_lossy(&buf);
            self.process_line(&line)?;
        }
    }

    /// 入力ソースを1つ処理し、読み込みエラー時はスキップ設定に従う
    ///
    /// トークンを1つでも取り込んだ後の読み込みエラーは、スキップ設定に関わらず致命的。
    /// スキップされたファイルのトークンは統計にもトランスクリプトにも残らない。
    pub fn process_source<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<()> {
        let before = self.stats.total_tokens();
        match self.process_reader(reader, path) {
            Ok(()) => {
                self.stats.files_processed += 1;
                debug!(path = %path.display(), tokens = self.stats.total_tokens(), "processed source");
                Ok(())
            }
            Err(e) if self.stats.total_tokens() != before => Err(e),
            Err(e) => self.skip_or_fail(e, path),
        }
    }

    /// 入力ファイルを1つ処理
    ///
    /// ファイルハンドルは処理後（エラー時も）ただちに閉じられる。
    pub fn process_file(&mut self, path: &Path) -> Result<()> {
        match File::open(path) {
            Ok(file) => self.process_source(BufReader::new(file), path),
            Err(source) => {
                let err = CorpusError::InputOpen {
                    path: path.to_path_buf(),
                    source,
                };
                self.skip_or_fail(err, path)
            }
        }
    }

    fn skip_or_fail(&mut self, err: CorpusError, path: &Path) -> Result<()> {
        if self.config.skip_unreadable && err.is_input_source() {
            warn!(path = %path.display(), error = %err, "skipping unreadable source");
            self.stats.files_skipped.push(path.to_path_buf());
            Ok(())
        } else {
            Err(err)
        }
    }

    /// 現在の統計
    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    /// 走査を終えて、トランスクリプトをフラッシュし統計を返す
    pub fn finish(mut self) -> Result<(CorpusStats, W)> {
        if let Err(e) = self.transcript.flush() {
            return Err(self.transcript_error(e));
        }
        Ok((self.stats, self.transcript))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn driver() -> CorpusDriver<Vec<u8>> {
        CorpusDriver::new(Vec::new(), "transcript.txt", ScanConfig::default())
    }

    fn skipping_driver() -> CorpusDriver<Vec<u8>> {
        let config = ScanConfig {
            skip_unreadable: true,
            ..ScanConfig::default()
        };
        CorpusDriver::new(Vec::new(), "transcript.txt", config)
    }

    /// 最初のチャンクを返した後は読み込みエラーになるリーダー
    struct FailingReader {
        first: Option<&'static [u8]>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.first.take() {
                Some(data) => {
                    buf[..data.len()].copy_from_slice(data);
                    Ok(data.len())
                }
                None => Err(io::Error::new(io::ErrorKind::Other, "device went away")),
            }
        }
    }

    fn failing_after(first: &'static [u8]) -> BufReader<FailingReader> {
        BufReader::new(FailingReader { first: Some(first) })
    }

    /// 書き込みが常に失敗するトランスクリプト
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_from_text() {
        let stats = CorpusStats::from_text("The quick, quick fox.");

        assert_eq!(stats.total_tokens(), 4);
        assert_eq!(stats.ngrams.unigrams().len(), 3);
        assert_eq!(stats.ngrams.bigrams().len(), 3);
        assert_eq!(stats.ngrams.trigrams().len(), 2);
        assert_eq!(stats.letters.total(), 16);
    }

    #[test]
    fn test_transcript_is_token_per_line() {
        let mut d = driver();
        d.process_line("Don't STOP me-now!").unwrap();
        let (stats, transcript) = d.finish().unwrap();

        assert_eq!(String::from_utf8(transcript).unwrap(), "don\nt\nstop\nme\nnow\n");
        assert_eq!(stats.total_tokens(), 5);
    }

    #[test]
    fn test_lines_do_not_reset_window() {
        let mut d = driver();
        let input = "alpha beta\r\ngamma\n\ndelta";
        d.process_reader(Cursor::new(input), Path::new("mem")).unwrap();
        let stats = d.stats();

        assert_eq!(stats.ngrams.bigrams()["beta gamma"], 1);
        assert_eq!(stats.ngrams.trigrams()["alpha beta gamma"], 1);
        assert_eq!(stats.ngrams.trigrams()["beta gamma delta"], 1);
    }

    #[test]
    fn test_invalid_utf8_acts_as_separator() {
        let mut d = driver();
        let input: &[u8] = b"ab\xff\xfecd ef";
        d.process_reader(Cursor::new(input), Path::new("mem")).unwrap();
        let (_, transcript) = d.finish().unwrap();
        assert_eq!(String::from_utf8(transcript).unwrap(), "ab\ncd\nef\n");
    }

    #[test]
    fn test_missing_file_is_fatal_by_default() {
        let mut d = driver();
        let err = d.process_file(Path::new("/nonexistent/corpus_ngrams/none.txt")).unwrap_err();
        assert!(matches!(err, CorpusError::InputOpen { .. }));
    }

    #[test]
    fn test_missing_file_skipped_when_configured() {
        let config = ScanConfig {
            skip_unreadable: true,
            ..ScanConfig::default()
        };
        let mut d = CorpusDriver::new(Vec::new(), "transcript.txt", config);
        d.process_file(Path::new("/nonexistent/corpus_ngrams/none.txt")).unwrap();

        let (stats, _) = d.finish().unwrap();
        assert_eq!(stats.files_processed, 0);
        assert_eq!(stats.files_skipped.len(), 1);
    }

    #[test]
    fn test_read_error_after_tokens_is_fatal_even_when_skipping() {
        let mut d = skipping_driver();
        d.process_line("before").unwrap();

        let err = d
            .process_source(failing_after(b"a b\n"), Path::new("partial.txt"))
            .unwrap_err();
        assert!(matches!(err, CorpusError::InputRead { .. }));
        assert!(d.stats().files_skipped.is_empty());
    }

    #[test]
    fn test_read_error_before_any_token_is_skipped() {
        let mut d = skipping_driver();
        d.process_line("before").unwrap();
        d.process_source(failing_after(b"  12 --\n"), Path::new("blank.txt")).unwrap();
        d.process_line("after").unwrap();

        let (stats, transcript) = d.finish().unwrap();
        assert_eq!(stats.files_skipped, vec![PathBuf::from("blank.txt")]);
        assert_eq!(stats.files_processed, 0);
        assert_eq!(stats.ngrams.bigrams()["before after"], 1);
        assert_eq!(String::from_utf8(transcript).unwrap(), "before\nafter\n");
    }

    #[test]
    fn test_read_error_is_fatal_by_default() {
        let mut d = driver();
        let err = d
            .process_source(failing_after(b"\n"), Path::new("broken.txt"))
            .unwrap_err();
        match err {
            CorpusError::InputRead { path, .. } => assert_eq!(path, PathBuf::from("broken.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_transcript_error_names_path() {
        let mut d = CorpusDriver::new(FullDisk, "out/words.txt", ScanConfig::default());
        let err = d.process_line("hello").unwrap_err();

        match &err {
            CorpusError::Transcript { path, .. } => assert_eq!(path, &PathBuf::from("out/words.txt")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("out/words.txt"));
        assert_eq!(d.stats().total_tokens(), 0);
    }
}
