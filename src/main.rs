//! テキストコーパス N-gram 集計ツール
//!
//! ディレクトリ以下のテキストから単語・2-gram・3-gram・文字の頻度を集計する。

use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;

use corpus_ngrams::{ReportPaths, ScanConfig};

/// テキストコーパス N-gram 集計ツール
#[derive(Parser, Debug, Clone)]
#[command(name = "corpus_ngrams")]
#[command(about = "テキストコーパスの単語・N-gram・文字頻度を集計")]
struct Args {
    /// 入力ディレクトリ
    input_dir: PathBuf,

    /// 単語トランスクリプトの出力ファイル（1行1単語）
    words_out: PathBuf,

    /// 文字カウントの出力ファイル
    letters_out: PathBuf,

    /// 1-gram頻度の出力ファイル
    #[arg(long, default_value = "wordFreq.txt")]
    unigram_out: PathBuf,

    /// 2-gram頻度の出力ファイル
    #[arg(long, default_value = "bigramFreq.txt")]
    bigram_out: PathBuf,

    /// 3-gram頻度の出力ファイル
    #[arg(long, default_value = "trigramFreq.txt")]
    trigram_out: PathBuf,

    /// 対象ファイルの拡張子
    #[arg(long, default_value = "txt")]
    extension: String,

    /// 読めない入力ファイルをスキップ（既定はエラー終了）
    #[arg(long, default_value_t = false)]
    skip_unreadable: bool,

    /// JSONサマリーの出力ファイル
    #[arg(long)]
    summary: Option<PathBuf>,

    /// プログレスバーを表示しない
    #[arg(long, default_value_t = false)]
    no_progress: bool,

    /// 詳細ログ
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl From<&Args> for ScanConfig {
    fn from(args: &Args) -> Self {
        Self {
            extension: args.extension.clone(),
            skip_unreadable: args.skip_unreadable,
        }
    }
}

impl From<&Args> for ReportPaths {
    fn from(args: &Args) -> Self {
        Self {
            words: args.words_out.clone(),
            letters: args.letters_out.clone(),
            unigrams: args.unigram_out.clone(),
            bigrams: args.bigram_out.clone(),
            trigrams: args.trigram_out.clone(),
            summary: args.summary.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config = ScanConfig::from(&args);
    let paths = ReportPaths::from(&args);

    // プログレスバー（stderrが端末のときのみ）
    let pb = if !args.no_progress && atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (Files) | Tokens: {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let stats = corpus_ngrams::run_with_callback(&args.input_dir, &paths, config, |done, total, stats| {
        if let Some(pb) = &pb {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
            pb.set_message(stats.total_tokens().to_string());
        }
    })?;

    if let Some(pb) = &pb {
        pb.finish_with_message(stats.total_tokens().to_string());
    }

    println!("\n集計完了!");
    println!("{}", stats.summary());
    for path in &stats.files_skipped {
        println!("  スキップ: {}", path.display());
    }

    Ok(())
}
