// Fri Oct 16 2026 - Alex

//! Text form of byte signatures.
//!
//! A pattern is a whitespace-separated list of tokens. Each token is either
//! exactly two hex digits (`4C`, `e3`) or a wildcard (`?` or `??`) matching
//! any byte: `F3 0F 10 81 ?? ?? 00 00`.

use crate::pattern::{BytePattern, PatternByte, PatternError};

fn parse_token(token: &str, index: usize) -> Result<PatternByte, PatternError> {
    match token {
        "?" | "??" => Ok(PatternByte::Any),
        _ if token.len() == 2 && token.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u8::from_str_radix(token, 16)
                .map(PatternByte::Exact)
                .map_err(|_| PatternError::InvalidToken {
                    token: token.to_string(),
                    index,
                })
        }
        _ => Err(PatternError::InvalidToken {
            token: token.to_string(),
            index,
        }),
    }
}

pub fn compile(text: &str) -> Result<BytePattern, PatternError> {
    let elements = text
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| parse_token(token, index))
        .collect::<Result<Vec<_>, _>>()?;
    BytePattern::new(elements)
}

/// Parses a pattern that must not contain wildcards, such as replacement bytes.
pub fn compile_bytes(text: &str) -> Result<Vec<u8>, PatternError> {
    compile(text)?
        .elements()
        .iter()
        .enumerate()
        .map(|(index, element)| element.value().ok_or(PatternError::UnexpectedWildcard { index }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_mixed_tokens() {
        let pattern = compile("F6 41 ?? 01 ? 4c").unwrap();
        assert_eq!(
            pattern.elements(),
            &[
                PatternByte::Exact(0xF6),
                PatternByte::Exact(0x41),
                PatternByte::Any,
                PatternByte::Exact(0x01),
                PatternByte::Any,
                PatternByte::Exact(0x4C),
            ]
        );
    }

    #[test]
    fn test_compile_tolerates_irregular_whitespace() {
        let pattern = compile("  39\t8E\n E3   3F ").unwrap();
        assert_eq!(pattern.concrete_bytes(), Some(vec![0x39, 0x8E, 0xE3, 0x3F]));
    }

    #[test]
    fn test_compile_rejects_empty() {
        assert_eq!(compile(""), Err(PatternError::Empty));
        assert_eq!(compile("   \t "), Err(PatternError::Empty));
    }

    #[test]
    fn test_compile_rejects_malformed_tokens() {
        for (text, bad, index) in [
            ("F6 4", "4", 1),
            ("F6 411", "411", 1),
            ("GG", "GG", 0),
            ("F6 ???", "???", 1),
            ("0x41", "0x41", 0),
            ("F6 +1", "+1", 1),
            ("F6,41", "F6,41", 0),
        ] {
            let err = compile(text).unwrap_err();
            assert!(err.is_malformed(), "{text}");
            assert_eq!(
                err,
                PatternError::InvalidToken {
                    token: bad.to_string(),
                    index
                },
                "{text}"
            );
        }
    }

    #[test]
    fn test_round_trip_preserves_wildcards() {
        for text in ["DE ?? EF", "?? 00 ?? FF", "F3 0F 10 81 9C 03 00 00 0F 57 C9 0F 2F C1", "??"] {
            let pattern = compile(text).unwrap();
            let again = compile(&pattern.to_pattern_string()).unwrap();
            assert_eq!(pattern, again);
            let wild: Vec<bool> = pattern.elements().iter().map(|e| e.is_wildcard()).collect();
            let wild_again: Vec<bool> = again.elements().iter().map(|e| e.is_wildcard()).collect();
            assert_eq!(wild, wild_again);
        }
    }

    #[test]
    fn test_compile_bytes() {
        assert_eq!(compile_bytes("F6 41 2C 00").unwrap(), vec![0xF6, 0x41, 0x2C, 0x00]);
        assert_eq!(
            compile_bytes("F6 ?? 2C").unwrap_err(),
            PatternError::UnexpectedWildcard { index: 1 }
        );
    }
}
