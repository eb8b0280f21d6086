//! 文字ヒストグラムモジュール

/// アルファベットの文字数
pub const ALPHABET_LEN: usize = 26;

/// 全トークンにおける a〜z の出現回数
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LetterHistogram {
    counts: [u64; ALPHABET_LEN],
}

impl LetterHistogram {
    /// 空のヒストグラムを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// トークン内の各文字について対応するカウンタを1増やす
    ///
    /// トークンは小文字英字のみで構成される前提。それ以外の文字は数えない。
    pub fn record(&mut self, token: &str) {
        for b in token.bytes() {
            if b.is_ascii_lowercase() {
                self.counts[(b - b'a') as usize] += 1;
            }
        }
    }

    /// 指定文字のカウント
    pub fn count(&self, letter: char) -> u64 {
        if letter.is_ascii_lowercase() {
            self.counts[(letter as u8 - b'a') as usize]
        } else {
            0
        }
    }

    /// (文字, カウント) を a〜z 順に返す
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        (b'a'..=b'z').map(char::from).zip(self.counts.iter().copied())
    }

    /// 総文字数
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
