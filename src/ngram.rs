//! N-gram集計モジュール
//!
//! トークン列を1パスで読み、1-gram・2-gram・3-gramの頻度表を更新する。
//! 直前2トークンだけを保持するので、メモリは語彙数に比例しコーパス長には依存しない。
//! ウィンドウはファイル境界・行境界でリセットしない。

use std::collections::HashMap;

/// N-gramの頻度表（キー → 出現回数）
pub type FrequencyTable = HashMap<String, u64>;

/// 直前2トークンのルックバックウィンドウ
///
/// コーパス先頭の2トークンまでは空文字列のまま。
#[derive(Clone, Debug, Default)]
pub struct LookbackWindow {
    /// 2つ前のトークン
    two_back: String,
    /// 1つ前のトークン
    one_back: String,
}

impl LookbackWindow {
    /// ウィンドウを1つ進める
    fn advance(&mut self, token: &str) {
        // 2つ前のバッファを再利用する
        std::mem::swap(&mut self.two_back, &mut self.one_back);
        self.one_back.clear();
        self.one_back.push_str(token);
    }

    pub fn two_back(&self) -> &str {
        &self.two_back
    }

    pub fn one_back(&self) -> &str {
        &self.one_back
    }
}

/// 1-gram / 2-gram / 3-gram 頻度の逐次集計器
#[derive(Clone, Debug, Default)]
pub struct NgramAccumulator {
    unigrams: FrequencyTable,
    bigrams: FrequencyTable,
    trigrams: FrequencyTable,
    window: LookbackWindow,
    /// これまでに取り込んだトークン数
    position: u64,
}

impl NgramAccumulator {
    /// 空の集計器を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// トークンを1つ取り込む（コーパス順に呼ぶこと）
    pub fn ingest(&mut self, token: &str) {
        bump(&mut self.unigrams, token);

        if self.position >= 1 {
            let prev = &self.window.one_back;
            let mut bigram = String::with_capacity(prev.len() + 1 + token.len());
            bigram.push_str(prev);
            bigram.push(' ');
            bigram.push_str(token);

            // 3-gram = 2つ前 + " " + 今回の2-gram
            if self.position >= 2 {
                let prev2 = &self.window.two_back;
                let mut trigram = String::with_capacity(prev2.len() + 1 + bigram.len());
                trigram.push_str(prev2);
                trigram.push(' ');
                trigram.push_str(&bigram);
                bump(&mut self.trigrams, &trigram);
            }

            bump(&mut self.bigrams, &bigram);
        }

        self.window.advance(token);
        self.position += 1;
    }

    /// 取り込んだトークン数
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn window(&self) -> &LookbackWindow {
        &self.window
    }

    pub fn unigrams(&self) -> &FrequencyTable {
        &self.unigrams
    }

    pub fn bigrams(&self) -> &FrequencyTable {
        &self.bigrams
    }

    pub fn trigrams(&self) -> &FrequencyTable {
        &self.trigrams
    }

    /// 総1-gram数
    pub fn total_unigrams(&self) -> u64 {
        self.unigrams.values().sum()
    }

    /// 総2-gram数
    pub fn total_bigrams(&self) -> u64 {
        self.bigrams.values().sum()
    }

    /// 総3-gram数
    pub fn total_trigrams(&self) -> u64 {
        self.trigrams.values().sum()
    }
}

/// キーの辞書順に並べたエントリ
pub fn sorted_entries(table: &FrequencyTable) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = table.iter().map(|(k, &v)| (k.as_str(), v)).collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
}

fn bump(table: &mut FrequencyTable, key: &str) {
    // 既存キーの場合はアロケーションしない
    if let Some(count) = table.get_mut(key) {
        *count += 1;
    } else {
        table.insert(key.to_owned(), 1);
    }
}
