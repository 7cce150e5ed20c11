//! Channel name utilities.

/// Default maximum channel name length in bytes, prefix included.
pub const DEFAULT_CHANNEL_MAX_LEN: usize = 50;

/// Extension trait for checking if a string is a valid channel name.
pub trait ChannelExt {
    /// Check against [`DEFAULT_CHANNEL_MAX_LEN`].
    ///
    /// Valid channel names:
    /// - Start with `#` or `&`
    /// - Contain no space, comma, colon, CR or LF
    fn is_channel_name(&self) -> bool;

    /// Check with a custom max length, counted in bytes.
    fn is_channel_name_len(&self, max_len: usize) -> bool;

    /// True when the string starts with a channel prefix, valid or not.
    fn has_channel_prefix(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        self.is_channel_name_len(DEFAULT_CHANNEL_MAX_LEN)
    }

    fn is_channel_name_len(&self, max_len: usize) -> bool {
        if !self.has_channel_prefix() || self.len() > max_len {
            return false;
        }

        !self
            .chars()
            .any(|c| matches!(c, ' ' | ',' | ':' | '\r' | '\n'))
    }

    fn has_channel_prefix(&self) -> bool {
        self.starts_with('#') || self.starts_with('&')
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }

    fn is_channel_name_len(&self, max_len: usize) -> bool {
        self.as_str().is_channel_name_len(max_len)
    }

    fn has_channel_prefix(&self) -> bool {
        self.as_str().has_channel_prefix()
    }
}
