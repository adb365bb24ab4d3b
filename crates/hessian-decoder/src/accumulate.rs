//! Scalar sub-parsers (`§4.4`): accumulate the raw payload bytes of a
//! fixed-width integer/double/timestamp, or a length-delimited
//! string/binary value, across as many `feed()` calls as it takes.

use bytes::Bytes;
use hessian_core::{Error, Result, Value};

use crate::decoder::Decoder;
use crate::state::{BinaryAccum, LenPhase, State, StringAccum};

impl Decoder {
    pub(crate) fn accumulate_numeric(&mut self, byte: u8) -> Result<()> {
        let (kind, mut buf) = match self.stack.pop() {
            Some(State::Numeric { kind, buf }) => (kind, buf),
            _ => unreachable!("accumulate_numeric called without a Numeric frame on top"),
        };
        buf.push(byte);
        if buf.len() == kind.needed() {
            let value = kind.finish(&buf)?;
            self.emit(value)
        } else {
            self.stack.push(State::Numeric { kind, buf })
        }
    }

    pub(crate) fn accumulate_string(&mut self, byte: u8) -> Result<()> {
        let mut accum = match self.stack.pop() {
            Some(State::Str(accum)) => accum,
            _ => unreachable!("accumulate_string called without a Str frame on top"),
        };

        if matches!(accum.phase, LenPhase::AwaitingOpener) {
            accum.is_final = match byte {
                hessian_core::constants::STRING_CHUNK => false,
                hessian_core::constants::STRING_CHUNK_FINAL => true,
                _ => return Err(Error::InvalidChunkContinuation { byte }),
            };
            accum.phase = LenPhase::ReadingLen {
                base: 0,
                buf: Vec::new(),
                needed: 2,
            };
            return self.stack.push(State::Str(accum));
        }

        self.budget_check(accum.prefix.len(), &accum.phase)?;

        match &mut accum.phase {
            LenPhase::ReadingLen { base, buf, needed } => {
                buf.push(byte);
                if buf.len() == *needed {
                    let extra = be_value(buf);
                    let expected = *base + extra;
                    accum.phase = LenPhase::ReadingPayload {
                        expected,
                        buf: Vec::with_capacity(expected),
                    };
                }
            }
            LenPhase::ReadingPayload { buf, .. } => buf.push(byte),
            LenPhase::AwaitingOpener => unreachable!(),
        }

        self.continue_string(accum)
    }

    fn continue_string(&mut self, accum: StringAccum) -> Result<()> {
        if let LenPhase::ReadingPayload { expected, buf } = &accum.phase {
            if string_chunk_complete(buf, *expected) {
                let chunk = std::str::from_utf8(buf)
                    .expect("string_chunk_complete verified UTF-8 validity")
                    .to_string();
                let mut combined = accum.prefix;
                combined.push_str(&chunk);
                return if accum.is_final {
                    self.emit(Value::String(combined))
                } else {
                    self.stack.push(State::Str(StringAccum {
                        phase: LenPhase::AwaitingOpener,
                        prefix: combined,
                        is_final: false,
                    }))
                };
            }
        }
        self.stack.push(State::Str(accum))
    }

    pub(crate) fn accumulate_binary(&mut self, byte: u8) -> Result<()> {
        let mut accum = match self.stack.pop() {
            Some(State::Bin(accum)) => accum,
            _ => unreachable!("accumulate_binary called without a Bin frame on top"),
        };

        if matches!(accum.phase, LenPhase::AwaitingOpener) {
            accum.is_final = match byte {
                hessian_core::constants::BINARY_CHUNK => false,
                hessian_core::constants::BINARY_CHUNK_FINAL => true,
                _ => return Err(Error::InvalidChunkContinuation { byte }),
            };
            accum.phase = LenPhase::ReadingLen {
                base: 0,
                buf: Vec::new(),
                needed: 2,
            };
            return self.stack.push(State::Bin(accum));
        }

        self.budget_check(accum.prefix.len(), &accum.phase)?;

        match &mut accum.phase {
            LenPhase::ReadingLen { base, buf, needed } => {
                buf.push(byte);
                if buf.len() == *needed {
                    let extra = be_value(buf);
                    let expected = *base + extra;
                    accum.phase = LenPhase::ReadingPayload {
                        expected,
                        buf: Vec::with_capacity(expected),
                    };
                }
            }
            LenPhase::ReadingPayload { buf, .. } => buf.push(byte),
            LenPhase::AwaitingOpener => unreachable!(),
        }

        self.continue_binary(accum)
    }

    fn continue_binary(&mut self, accum: BinaryAccum) -> Result<()> {
        if let LenPhase::ReadingPayload { expected, buf } = &accum.phase {
            if buf.len() == *expected {
                let mut combined = accum.prefix;
                combined.extend_from_slice(buf);
                return if accum.is_final {
                    self.emit(Value::Binary(Bytes::from(combined)))
                } else {
                    self.stack.push(State::Bin(BinaryAccum {
                        phase: LenPhase::AwaitingOpener,
                        prefix: combined,
                        is_final: false,
                    }))
                };
            }
        }
        self.stack.push(State::Bin(accum))
    }

    /// Applies the optional `max_string_wait_bytes` budget (`§7`) to an
    /// in-progress string/binary accumulator, regardless of which
    /// chunk it is on.
    fn budget_check(&self, prefix_len: usize, phase: &LenPhase) -> Result<()> {
        let Some(max) = self.config.max_string_wait_bytes else {
            return Ok(());
        };
        let current = match phase {
            LenPhase::ReadingLen { buf, .. } | LenPhase::ReadingPayload { buf, .. } => buf.len(),
            LenPhase::AwaitingOpener => 0,
        };
        if prefix_len + current > max {
            return Err(Error::AccumulatorBudgetExceeded { max });
        }
        Ok(())
    }
}

fn be_value(buf: &[u8]) -> usize {
    buf.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize)
}

fn string_chunk_complete(buf: &[u8], expected: usize) -> bool {
    if buf.len() < expected {
        return false;
    }
    match std::str::from_utf8(buf) {
        Ok(s) => s.chars().count() == expected,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn be_value_combines_bytes_big_endian() {
        assert_eq!(be_value(&[0x01, 0x00]), 256);
        assert_eq!(be_value(&[0xff]), 255);
    }

    #[test]
    fn string_chunk_complete_counts_unicode_characters_not_bytes() {
        // "héllo" has 5 characters but 6 UTF-8 bytes ('é' is 2 bytes).
        let bytes = "héllo".as_bytes();
        assert!(!string_chunk_complete(bytes, 6));
        assert!(string_chunk_complete(bytes, 5));
    }

    #[test]
    fn string_chunk_complete_waits_on_invalid_utf8_boundary() {
        // First byte of a 2-byte UTF-8 sequence, payload not done yet.
        let partial = [0xc3u8];
        assert!(!string_chunk_complete(&partial, 1));
    }
}
