/// 短链接码长度
pub const SHORT_CODE_LENGTH: usize = 6;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 短链接码：恰好 6 位 ASCII 字母数字
#[inline]
pub fn is_valid_short_code(code: &str) -> bool {
    code.len() == SHORT_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_uses_alphabet() {
        for _ in 0..200 {
            let code = generate_random_code(SHORT_CODE_LENGTH);
            assert_eq!(code.len(), SHORT_CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_generate_random_code_custom_length() {
        assert_eq!(generate_random_code(40).len(), 40);
        assert!(generate_random_code(0).is_empty());
    }

    #[test]
    fn test_is_valid_short_code() {
        assert!(is_valid_short_code("aB3dE9"));
        assert!(is_valid_short_code("ZZZZZZ"));
        assert!(!is_valid_short_code("aB3dE"));
        assert!(!is_valid_short_code("aB3dE9x"));
        assert!(!is_valid_short_code("aB3-E9"));
        assert!(!is_valid_short_code("ab3dé9"));
        assert!(!is_valid_short_code(""));
    }
}
