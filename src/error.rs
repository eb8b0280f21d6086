//! エラー型モジュール
//!
//! 集計処理で発生するエラーはすべて致命的。リトライ経路は持たない。

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 集計処理のエラー
#[derive(Debug, Error)]
pub enum CorpusError {
    /// 入力ディレクトリが存在しない、または走査できない
    #[error("入力ディレクトリを走査できません: {}", path.display())]
    InputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 入力ファイルを開けない
    #[error("入力ファイルを開けません: {}", path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 入力ファイルの読み込み中に失敗
    #[error("入力ファイルの読み込みに失敗: {}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 出力ファイルを書き込み用に開けない
    #[error("出力ファイルを書き込み用に開けません: {}", path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 出力ファイルへの書き込みに失敗
    #[error("出力ファイルへの書き込みに失敗: {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 単語トランスクリプトへの書き込みに失敗（走査中）
    #[error("単語トランスクリプトへの書き込みに失敗: {}", path.display())]
    Transcript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// サマリーJSONのシリアライズに失敗
    #[error("サマリーのシリアライズに失敗")]
    Summary(#[from] serde_json::Error),
}

impl CorpusError {
    /// 入力ソースに起因するエラーか（スキップ可能な種類か）
    pub fn is_input_source(&self) -> bool {
        matches!(self, Self::InputOpen { .. } | Self::InputRead { .. })
    }
}

/// 集計処理の結果型
pub type Result<T> = std::result::Result<T, CorpusError>;
