use std::borrow::Cow;
use std::fmt;

use crate::mapping::LanguageMapping;

/// Reason why a training line contributes nothing to the model.
///
/// Skipped lines are reported and counted, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line has fewer than two tab-separated columns.
    MissingColumns,

    /// The sentence is empty after trimming.
    EmptySentence,

    /// The language code is absent from the mapping.
    UnknownLanguage(String),

    /// The padded sentence is shorter than the n-gram order.
    TooShort,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingColumns => write!(f, "line does not have enough columns"),
            Self::EmptySentence => write!(f, "empty sentence"),
            Self::UnknownLanguage(code) => write!(f, "language code '{code}' not in mapping"),
            Self::TooShort => write!(f, "sentence is too short to produce any n-gram"),
        }
    }
}

/// One row of the training TSV.
#[derive(Debug, PartialEq, Eq)]
pub struct CorpusRow<'a> {
    pub lang_code: &'a str,
    pub sentence: Cow<'a, str>,
}

impl<'a> CorpusRow<'a> {
    /// Parses a training line.
    ///
    /// Two columns are read as `lang<TAB>sentence`. Three or more are read as
    /// `id<TAB>lang<TAB>sentence`, where extra columns belong to the sentence and are joined with
    /// a single space.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidgram::CorpusRow;
    ///
    /// let row = CorpusRow::parse("42\tfr\tLe chat\tnoir\n").unwrap();
    /// assert_eq!("fr", row.lang_code);
    /// assert_eq!("Le chat noir", row.sentence);
    /// ```
    pub fn parse(line: &'a str) -> Result<Self, SkipReason> {
        let line = line.trim_end_matches(&['\n', '\r'][..]);
        let mut cols = line.split('\t');
        let first = cols.next().ok_or(SkipReason::MissingColumns)?;
        let second = cols.next().ok_or(SkipReason::MissingColumns)?;
        let (lang_code, sentence) = match cols.next() {
            None => (first, Cow::Borrowed(second.trim())),
            Some(third) => {
                let rest: Vec<&str> = cols.collect();
                if rest.is_empty() {
                    (second, Cow::Borrowed(third.trim()))
                } else {
                    let mut joined = third.to_string();
                    for col in rest {
                        joined.push(' ');
                        joined.push_str(col);
                    }
                    (second, Cow::Owned(joined.trim().to_string()))
                }
            }
        };
        if sentence.is_empty() {
            return Err(SkipReason::EmptySentence);
        }
        Ok(Self {
            lang_code: lang_code.trim(),
            sentence,
        })
    }
}

/// Parses a training line and resolves its class ID.
pub fn classify_line<'a>(
    mapping: &LanguageMapping,
    line: &'a str,
) -> Result<(u32, Cow<'a, str>), SkipReason> {
    let row = CorpusRow::parse(line)?;
    let class_id = mapping
        .class_id(row.lang_code)
        .ok_or_else(|| SkipReason::UnknownLanguage(row.lang_code.to_string()))?;
    Ok((class_id, row.sentence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_columns() {
        let row = CorpusRow::parse(" en \t  the cat  \n").unwrap();

        assert_eq!("en", row.lang_code);
        assert_eq!("the cat", row.sentence);
        assert!(matches!(row.sentence, Cow::Borrowed(_)));
    }

    #[test]
    fn test_parse_three_columns() {
        let row = CorpusRow::parse("17\tja\t吾輩は猫である").unwrap();

        assert_eq!("ja", row.lang_code);
        assert_eq!("吾輩は猫である", row.sentence);
    }

    #[test]
    fn test_parse_extra_columns_are_joined() {
        let row = CorpusRow::parse("1\tde\tder\tHund\t").unwrap();

        assert_eq!("de", row.lang_code);
        assert_eq!("der Hund", row.sentence);
    }

    #[test]
    fn test_parse_crlf() {
        let row = CorpusRow::parse("en\thello\r\n").unwrap();

        assert_eq!("hello", row.sentence);
    }

    #[test]
    fn test_parse_missing_columns() {
        assert_eq!(Err(SkipReason::MissingColumns), CorpusRow::parse(""));
        assert_eq!(
            Err(SkipReason::MissingColumns),
            CorpusRow::parse("en the cat")
        );
    }

    #[test]
    fn test_parse_empty_sentence() {
        assert_eq!(Err(SkipReason::EmptySentence), CorpusRow::parse("en\t   "));
        assert_eq!(Err(SkipReason::EmptySentence), CorpusRow::parse("3\ten\t"));
    }

    #[test]
    fn test_classify_line() {
        let mapping = LanguageMapping::from_json(r#"{"en": 0, "fr": 1}"#).unwrap();

        assert_eq!(
            Ok((1, Cow::Borrowed("bonjour"))),
            classify_line(&mapping, "fr\tbonjour")
        );
        assert_eq!(
            Err(SkipReason::UnknownLanguage("de".to_string())),
            classify_line(&mapping, "de\thallo")
        );
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            "language code 'xx' not in mapping",
            SkipReason::UnknownLanguage("xx".to_string()).to_string()
        );
    }
}
