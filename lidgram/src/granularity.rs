use std::fmt;
use std::str::FromStr;

/// Start sentinel of [`Granularity::Byte`].
pub const BYTE_START: u8 = 0x01;

/// End sentinel of [`Granularity::Byte`]. Never appears in UTF-8 text.
pub const BYTE_END: u8 = 0xFF;

/// Start sentinel of [`Granularity::CodePoint`] (a noncharacter).
pub const CODE_POINT_START: char = '\u{10FFFE}';

/// End sentinel of [`Granularity::CodePoint`] (a noncharacter).
pub const CODE_POINT_END: char = '\u{10FFFF}';

/// Start sentinel of [`Granularity::Word`].
pub const WORD_START: &str = "<s>";

/// End sentinel of [`Granularity::Word`].
pub const WORD_END: &str = "</s>";

/// Atomic unit of tokenization.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Token<'a> {
    /// A single byte of the UTF-8 encoding.
    Byte(u8),

    /// A single Unicode scalar value.
    CodePoint(char),

    /// A whitespace-delimited word.
    Word(&'a str),
}

impl Token<'_> {
    /// Appends the canonical bytes of this token to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        match *self {
            Self::Byte(b) => buf.push(b),
            Self::CodePoint(c) => {
                let mut tmp = [0; 4];
                buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
            }
            Self::Word(w) => buf.extend_from_slice(w.as_bytes()),
        }
    }

    /// Gets the length of the canonical bytes of this token.
    pub const fn encoded_len(&self) -> usize {
        match *self {
            Self::Byte(_) => 1,
            Self::CodePoint(c) => c.len_utf8(),
            Self::Word(w) => w.len(),
        }
    }
}

/// Granularity of tokenization.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Granularity {
    /// Each byte of the UTF-8 encoding is a token.
    Byte,

    /// Each Unicode scalar value is a token.
    CodePoint,

    /// Each whitespace-delimited run is a token.
    Word,
}

impl Granularity {
    /// Splits a sentence into tokens.
    ///
    /// # Arguments
    ///
    /// * `sentence` - A sentence.
    ///
    /// # Returns
    ///
    /// Tokens in the order they appear. Multi-byte characters are split into several tokens at
    /// [`Granularity::Byte`]; leading and trailing whitespace never produce empty words.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidgram::{Granularity, Token};
    ///
    /// let toks = Granularity::Word.tokenize("  the cat ");
    /// assert_eq!(vec![Token::Word("the"), Token::Word("cat")], toks);
    /// ```
    pub fn tokenize(self, sentence: &str) -> Vec<Token<'_>> {
        match self {
            Self::Byte => sentence.bytes().map(Token::Byte).collect(),
            Self::CodePoint => sentence.chars().map(Token::CodePoint).collect(),
            Self::Word => sentence.split_whitespace().map(Token::Word).collect(),
        }
    }

    /// Gets the token placed before the sentence.
    pub const fn start_sentinel(self) -> Token<'static> {
        match self {
            Self::Byte => Token::Byte(BYTE_START),
            Self::CodePoint => Token::CodePoint(CODE_POINT_START),
            Self::Word => Token::Word(WORD_START),
        }
    }

    /// Gets the token placed after the sentence.
    pub const fn end_sentinel(self) -> Token<'static> {
        match self {
            Self::Byte => Token::Byte(BYTE_END),
            Self::CodePoint => Token::CodePoint(CODE_POINT_END),
            Self::Word => Token::Word(WORD_END),
        }
    }

    /// Converts a window of tokens into its canonical byte string.
    ///
    /// Bytes and code points are concatenated directly; words are joined with a single space.
    pub fn canonicalize(self, window: &[Token]) -> Vec<u8> {
        let sep = usize::from(self == Self::Word);
        let len = window.iter().map(Token::encoded_len).sum::<usize>()
            + sep * window.len().saturating_sub(1);
        let mut buf = Vec::with_capacity(len);
        for (i, token) in window.iter().enumerate() {
            if i != 0 && self == Self::Word {
                buf.push(b' ');
            }
            token.encode_into(&mut buf);
        }
        buf
    }

    /// Gets the name accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::CodePoint => "codepoint",
            Self::Word => "word",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "byte" => Ok(Self::Byte),
            "codepoint" | "code-point" | "char" => Ok(Self::CodePoint),
            "word" | "token" => Ok(Self::Word),
            _ => Err("Unsupported granularity. {byte, codepoint, word}"),
        }
    }
}
