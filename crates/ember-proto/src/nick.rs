//! Nickname validation utilities.
//!
//! The accepted grammar is deliberately narrower than RFC 2812: the first
//! character must be an ASCII letter and the rest ASCII letters, digits,
//! `-` or `_`. Usernames are validated with the same rule.

/// Extension trait for checking if a string is a valid nickname.
pub trait NickExt {
    /// Check against [`DEFAULT_NICK_MAX_LEN`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ember_proto::NickExt;
    ///
    /// assert!("nick".is_valid_nick());
    /// assert!("Nick_12-x".is_valid_nick());
    ///
    /// assert!(!"123nick".is_valid_nick());  // Can't start with digit
    /// assert!(!"".is_valid_nick());          // Empty
    /// assert!(!"[cool]".is_valid_nick());    // Brackets not allowed
    /// ```
    fn is_valid_nick(&self) -> bool;

    /// Check with a custom max length, counted in bytes.
    fn is_valid_nick_len(&self, max_len: usize) -> bool;
}

/// Default maximum nickname length in bytes.
pub const DEFAULT_NICK_MAX_LEN: usize = 30;

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        self.is_valid_nick_len(DEFAULT_NICK_MAX_LEN)
    }

    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        if self.is_empty() || self.len() > max_len {
            return false;
        }

        let mut chars = self.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return false,
        };

        if !first.is_ascii_alphabetic() {
            return false;
        }

        chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl NickExt for String {
    fn is_valid_nick(&self) -> bool {
        self.as_str().is_valid_nick()
    }

    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        self.as_str().is_valid_nick_len(max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_nicks() {
        assert!("nick".is_valid_nick());
        assert!("Nick".is_valid_nick());
        assert!("nick123".is_valid_nick());
        assert!("n".is_valid_nick());
        assert!("nick-name".is_valid_nick());
        assert!("nick_name".is_valid_nick());
    }

    #[test]
    fn test_invalid_nicks() {
        assert!(!"".is_valid_nick());
        assert!(!"123nick".is_valid_nick());
        assert!(!"_nick".is_valid_nick());
        assert!(!"-nick".is_valid_nick());
        assert!(!"nick name".is_valid_nick());
        assert!(!"nick@host".is_valid_nick());
        assert!(!"nïck".is_valid_nick());
    }

    #[test]
    fn test_length_bound() {
        let max = "a".repeat(DEFAULT_NICK_MAX_LEN);
        assert!(max.is_valid_nick());
        let too_long = "a".repeat(DEFAULT_NICK_MAX_LEN + 1);
        assert!(!too_long.is_valid_nick());
        assert!("abcdefghi".is_valid_nick_len(9));
        assert!(!"abcdefghij".is_valid_nick_len(9));
    }
}
