//! Decoder configuration.
//!
//! The wire format itself has no tunable knobs; these two exist purely
//! to bound resource use against adversarial or truncated input, as
//! called out in the decoder's resource model.

/// Tunables for a [`crate::decoder::Decoder`].
///
/// # Examples
///
/// ```
/// use hessian_decoder::DecoderConfig;
///
/// let cfg = DecoderConfig {
///     max_stack_depth: 64,
///     max_string_wait_bytes: Some(1 << 20),
/// };
/// assert_eq!(cfg.max_stack_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Upper bound on nested parse frames. Guards against adversarial
    /// input driving unbounded heap growth one opener byte at a time.
    pub max_stack_depth: usize,
    /// Optional byte budget for a string/binary accumulator that never
    /// satisfies its completion condition (truncated length, or a
    /// string buffer that never becomes valid UTF-8 of the declared
    /// character count). `None` waits indefinitely, matching the
    /// spec's default behavior.
    pub max_string_wait_bytes: Option<usize>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_stack_depth: 1024,
            max_string_wait_bytes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_recommended_stack_depth() {
        let cfg = DecoderConfig::default();
        assert_eq!(cfg.max_stack_depth, 1024);
        assert_eq!(cfg.max_string_wait_bytes, None);
    }
}
