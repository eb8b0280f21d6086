//! トークナイザモジュール
//!
//! 1行のテキストから英字（a-z, A-Z）の最長連続部分を左から順に取り出し、
//! 小文字化したトークンとして返す。数字・記号・空白・アポストロフィ・
//! 非ASCII文字はすべて区切りとして捨てられる。

/// 1行分のトークン列を遅延生成するイテレータ
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    /// 行テキストからイテレータを作成
    pub fn new(line: &'a str) -> Self {
        Self {
            bytes: line.as_bytes(),
            pos: 0,
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let bytes = self.bytes;

        // 区切り文字を読み飛ばす
        while self.pos < bytes.len() && !bytes[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        if self.pos == bytes.len() {
            return None;
        }

        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }

        // UTF-8の多バイト文字は0x80以上なので、英字の連続部分は必ずASCIIのみ
        let mut token = String::with_capacity(self.pos - start);
        token.extend(bytes[start..self.pos].iter().map(|b| b.to_ascii_lowercase() as char));
        Some(token)
    }
}

/// 行をトークン化する
pub fn tokenize(line: &str) -> Tokens<'_> {
    Tokens::new(line)
}
