//! Decoder for type-tagged parameter entries.
//!
//! Each top-level entry is `key (u8) | tag (u8) | payload`. Sequence elements
//! are bare payloads of the sequence's element tag. Failures inside one entry
//! become an in-band [`ParameterValue::Error`] for that key; decoding only
//! stops early when the buffer runs out.

use bytestream::ByteReader;

use crate::error::{ParamError, ParamResult, ValueError};
use crate::limits::ParamLimits;
use crate::tag::TypeTag;
use crate::value::{ParameterValue, Parameters};

/// Decodes up to `count` entries from `buf`.
///
/// If the buffer runs out first, the entries decoded so far are returned
/// without any signal; use [`decode_parameters_checked`] to detect that.
/// A later entry with a duplicate key replaces the earlier one.
pub fn decode_parameters(count: u16, buf: &[u8], limits: &ParamLimits) -> Parameters {
    decode_entries(count, buf, limits).params
}

/// Decodes exactly `count` entries from `buf`.
///
/// Returns [`ParamError::Truncated`] if the buffer ends before `count`
/// entries were consumed. Value-level failures are still reported in-band.
pub fn decode_parameters_checked(
    count: u16,
    buf: &[u8],
    limits: &ParamLimits,
) -> ParamResult<Parameters> {
    let outcome = decode_entries(count, buf, limits);
    if outcome.decoded < count {
        return Err(ParamError::Truncated {
            declared: count,
            decoded: outcome.decoded,
        });
    }
    Ok(outcome.params)
}

/// Decodes the parameters of a reliable message.
pub fn decode_message(message: &wire::ReliableMessage<'_>, limits: &ParamLimits) -> Parameters {
    decode_parameters(message.parameter_count, message.data, limits)
}

struct Outcome {
    params: Parameters,
    decoded: u16,
}

fn decode_entries(count: u16, buf: &[u8], limits: &ParamLimits) -> Outcome {
    let mut reader = ByteReader::new(buf);
    let mut params = Parameters::new();
    let mut decoded = 0u16;

    while decoded < count {
        let Ok(key) = reader.read_u8() else {
            break;
        };
        let tag_offset = reader.position();
        let Ok(raw_tag) = reader.read_u8() else {
            break;
        };

        let value = match TypeTag::from_raw(raw_tag) {
            Some(tag) => decode_value(tag, &mut reader, limits),
            None => Err(ValueError::UnknownType {
                tag: raw_tag,
                offset: tag_offset,
            }),
        };
        match value {
            Ok(value) => {
                params.insert(key, value);
            }
            Err(err) if err.is_truncated() => {
                params.insert(key, ParameterValue::Error(err));
                break;
            }
            Err(err) => {
                params.insert(key, ParameterValue::Error(err));
            }
        }
        decoded += 1;
    }

    Outcome { params, decoded }
}

fn decode_value(
    tag: TypeTag,
    reader: &mut ByteReader<'_>,
    limits: &ParamLimits,
) -> Result<ParameterValue, ValueError> {
    match step(tag, reader, limits, 0)? {
        Step::Value(value) => Ok(value),
        Step::Open(frame) => decode_sequence(frame, reader, limits),
    }
}

/// Result of reading one payload: a finished value, or the header of a
/// generic sequence whose elements still have to be read.
enum Step {
    Value(ParameterValue),
    Open(Frame),
}

/// A generic sequence whose elements are being decoded.
struct Frame {
    element_type: TypeTag,
    count: usize,
    items: Vec<ParameterValue>,
}

impl Frame {
    fn is_complete(&self) -> bool {
        self.items.len() == self.count
    }

    fn into_value(self) -> ParameterValue {
        ParameterValue::GenericSequence {
            element_type: self.element_type,
            items: self.items,
        }
    }
}

/// Reads the payload of one `tag` value. `depth` is the number of sequences
/// already open around it.
fn step(
    tag: TypeTag,
    reader: &mut ByteReader<'_>,
    limits: &ParamLimits,
    depth: usize,
) -> Result<Step, ValueError> {
    let value = match tag {
        TypeTag::Int8 => ParameterValue::Int8(reader.read_i8()?),
        TypeTag::Int16 => ParameterValue::Int16(reader.read_i16()?),
        TypeTag::Int32 => ParameterValue::Int32(reader.read_i32()?),
        TypeTag::Int64 => ParameterValue::Int64(reader.read_i64()?),
        TypeTag::Float32 => ParameterValue::Float32(reader.read_f32()?),
        TypeTag::String => ParameterValue::String(reader.read_prefixed_u16()?.to_vec()),
        TypeTag::Boolean => {
            let offset = reader.position();
            match reader.read_u8()? {
                0x00 => ParameterValue::Boolean(false),
                0x01 => ParameterValue::Boolean(true),
                byte => return Err(ValueError::InvalidBoolean { byte, offset }),
            }
        }
        TypeTag::Int8Sequence => {
            let bytes = reader.read_prefixed_u32()?;
            ParameterValue::Int8Sequence(bytes.iter().map(|&b| i8::from_be_bytes([b])).collect())
        }
        TypeTag::GenericSequence => return open_sequence(reader, limits, depth).map(Step::Open),
    };
    Ok(Step::Value(value))
}

fn open_sequence(
    reader: &mut ByteReader<'_>,
    limits: &ParamLimits,
    depth: usize,
) -> Result<Frame, ValueError> {
    if depth >= limits.max_depth {
        return Err(ValueError::DepthExceeded {
            limit: limits.max_depth,
            offset: reader.position(),
        });
    }

    let count = usize::from(reader.read_u16()?);
    let tag_offset = reader.position();
    let raw_tag = reader.read_u8()?;
    let element_type = TypeTag::from_raw(raw_tag).ok_or(ValueError::UnknownType {
        tag: raw_tag,
        offset: tag_offset,
    })?;

    // Scalar elements take at least one byte each, so reserving up to the
    // remaining input is bounded. Nested sequences grow as they fill; only
    // one scalar frame is open at a time.
    let capacity = if element_type == TypeTag::GenericSequence {
        0
    } else {
        count.min(reader.remaining())
    };
    Ok(Frame {
        element_type,
        count,
        items: Vec::with_capacity(capacity),
    })
}

/// Decodes the elements of `root` and of every sequence nested in it.
///
/// Open sequences live on a heap stack, so nesting depth is bounded by the
/// input and `limits`, never by the call stack.
fn decode_sequence(
    root: Frame,
    reader: &mut ByteReader<'_>,
    limits: &ParamLimits,
) -> Result<ParameterValue, ValueError> {
    let mut parents: Vec<Frame> = Vec::new();
    let mut current = root;

    loop {
        if current.is_complete() {
            let value = current.into_value();
            match parents.pop() {
                Some(mut parent) => {
                    parent.items.push(value);
                    current = parent;
                }
                None => return Ok(value),
            }
            continue;
        }

        match step(current.element_type, reader, limits, parents.len() + 1) {
            Ok(Step::Value(item)) => current.items.push(item),
            Ok(Step::Open(child)) => parents.push(std::mem::replace(&mut current, child)),
            Err(source) => return Err(element_failure(&parents, &current, source)),
        }
    }
}

/// Wraps a failure with the index of the element being decoded at each open
/// level, outermost first.
fn element_failure(parents: &[Frame], current: &Frame, source: ValueError) -> ValueError {
    let path = parents
        .iter()
        .chain(std::iter::once(current))
        .map(|frame| frame.items.len())
        .collect();
    ValueError::Element {
        path,
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(buf: &[u8]) -> Parameters {
        decode_parameters(1, buf, &ParamLimits::default())
    }

    fn nested_sequences(levels: usize) -> Vec<u8> {
        let mut buf = vec![0x00];
        for _ in 0..levels {
            buf.extend_from_slice(&[b'y', 0x00, 0x01]);
        }
        buf.extend_from_slice(&[b'b', 0x07]);
        buf
    }

    #[test]
    fn decode_int8_negative() {
        let params = decode_one(&[0x00, b'b', 0xFF]);
        assert_eq!(params[&0], ParameterValue::Int8(-1));
    }

    #[test]
    fn decode_int64() {
        let params = decode_one(&[0x00, b'l', 0, 0, 0, 0, 0, 0, 0, 0x80]);
        assert_eq!(params[&0], ParameterValue::Int64(128));
    }

    #[test]
    fn decode_empty_string() {
        let params = decode_one(&[0x05, b's', 0x00, 0x00]);
        assert_eq!(params[&5], ParameterValue::String(Vec::new()));
    }

    #[test]
    fn decode_empty_int8_sequence() {
        let params = decode_one(&[0x00, b'x', 0, 0, 0, 0]);
        assert_eq!(params[&0], ParameterValue::Int8Sequence(Vec::new()));
    }

    #[test]
    fn decode_empty_generic_sequence_keeps_element_type() {
        let params = decode_one(&[0x00, b'y', 0x00, 0x00, b'f']);
        assert_eq!(
            params[&0],
            ParameterValue::GenericSequence {
                element_type: TypeTag::Float32,
                items: vec![],
            }
        );
    }

    #[test]
    fn decode_sequence_of_strings() {
        let params = decode_one(&[
            0x00, b'y', 0x00, 0x02, b's', 0x00, 0x01, b'a', 0x00, 0x02, b'b', b'c',
        ]);
        assert_eq!(
            params[&0],
            ParameterValue::GenericSequence {
                element_type: TypeTag::String,
                items: vec![
                    ParameterValue::String(b"a".to_vec()),
                    ParameterValue::String(b"bc".to_vec()),
                ],
            }
        );
    }

    #[test]
    fn unknown_tag_reports_offset() {
        let params = decode_one(&[64, 64, 64]);
        assert_eq!(
            params[&64],
            ParameterValue::Error(ValueError::UnknownType {
                tag: 64,
                offset: 1
            })
        );
    }

    #[test]
    fn unknown_tag_does_not_abort_siblings() {
        let buf = [0x01, 64, 0x02, b'b', 0x05];
        let params = decode_parameters(2, &buf, &ParamLimits::default());
        assert!(params[&1].is_error());
        assert_eq!(params[&2], ParameterValue::Int8(5));
    }

    #[test]
    fn invalid_boolean_consumes_byte_and_continues() {
        let buf = [0x01, b'o', 0x02, 0x02, b'o', 0x01];
        let params = decode_parameters(2, &buf, &ParamLimits::default());
        assert_eq!(
            params[&1],
            ParameterValue::Error(ValueError::InvalidBoolean {
                byte: 0x02,
                offset: 2
            })
        );
        assert_eq!(params[&2], ParameterValue::Boolean(true));
    }

    #[test]
    fn sequence_element_failure_discards_sequence() {
        let params = decode_one(&[0x00, b'y', 0x00, 0x02, b'o', 0x01, 0xFF]);
        let err = params[&0].as_error().unwrap();
        assert_eq!(
            err,
            &ValueError::Element {
                path: vec![1],
                source: Box::new(ValueError::InvalidBoolean {
                    byte: 0xFF,
                    offset: 6
                }),
            }
        );
    }

    #[test]
    fn duplicate_key_last_wins() {
        let buf = [0x01, b'b', 0x01, 0x01, b'b', 0x02];
        let params = decode_parameters(2, &buf, &ParamLimits::default());
        assert_eq!(params.len(), 1);
        assert_eq!(params[&1], ParameterValue::Int8(2));
    }

    #[test]
    fn exhausted_buffer_returns_partial() {
        let buf = [0x01, b'b', 0x01];
        let params = decode_parameters(3, &buf, &ParamLimits::default());
        assert_eq!(params.len(), 1);
        assert_eq!(params[&1], ParameterValue::Int8(1));
    }

    #[test]
    fn truncated_payload_records_error_and_stops() {
        let buf = [0x01, b's', 0x00, 0x09, b'a', b'b'];
        let params = decode_parameters(2, &buf, &ParamLimits::default());
        assert_eq!(params.len(), 1);
        assert!(params[&1].as_error().unwrap().is_truncated());
    }

    #[test]
    fn checked_reports_truncation() {
        let buf = [0x01, b'b', 0x01];
        let err = decode_parameters_checked(3, &buf, &ParamLimits::default()).unwrap_err();
        assert_eq!(
            err,
            ParamError::Truncated {
                declared: 3,
                decoded: 1
            }
        );
    }

    #[test]
    fn checked_counts_truncated_entry_as_missing() {
        let buf = [0x01, b'i', 0x00];
        let err = decode_parameters_checked(1, &buf, &ParamLimits::default()).unwrap_err();
        assert_eq!(
            err,
            ParamError::Truncated {
                declared: 1,
                decoded: 0
            }
        );
    }

    #[test]
    fn checked_accepts_value_errors() {
        let params = decode_parameters_checked(1, &[0x00, 64], &ParamLimits::default()).unwrap();
        assert!(params[&0].is_error());
    }

    #[test]
    fn count_zero_decodes_nothing() {
        let params = decode_parameters(0, &[0x00, b'b', 0x01], &ParamLimits::default());
        assert!(params.is_empty());
    }

    /// Follows the first item of each nested sequence, returning the number
    /// of levels and the innermost value.
    fn innermost(value: &ParameterValue) -> (usize, &ParameterValue) {
        let mut levels = 0;
        let mut value = value;
        while let ParameterValue::GenericSequence { items, .. } = value {
            levels += 1;
            value = &items[0];
        }
        (levels, value)
    }

    #[test]
    fn nesting_within_limit() {
        let limits = ParamLimits::for_testing();
        let params = decode_parameters(1, &nested_sequences(limits.max_depth), &limits);
        let (levels, value) = innermost(&params[&0]);
        assert_eq!(levels, limits.max_depth);
        assert_eq!(value, &ParameterValue::Int8(7));
    }

    #[test]
    fn nesting_beyond_limit_is_error() {
        let limits = ParamLimits::for_testing();
        let params = decode_parameters(1, &nested_sequences(limits.max_depth + 1), &limits);
        let err = params[&0].as_error().unwrap();
        assert!(matches!(err.root_cause(), ValueError::DepthExceeded { .. }));
        match err {
            ValueError::Element { path, .. } => assert_eq!(path, &vec![0; limits.max_depth]),
            other => panic!("expected element error, got {other:?}"),
        }
    }

    #[test]
    fn default_limits_decode_moderate_nesting() {
        let params = decode_one(&nested_sequences(65));
        let (levels, value) = innermost(&params[&0]);
        assert_eq!(levels, 65);
        assert_eq!(value, &ParameterValue::Int8(7));
    }

    #[test]
    fn deep_nesting_does_not_exhaust_the_stack() {
        for limits in [ParamLimits::default(), ParamLimits::unlimited()] {
            let params = decode_parameters(1, &nested_sequences(20_000), &limits);
            let (levels, value) = innermost(&params[&0]);
            assert_eq!(levels, 20_000);
            assert_eq!(value, &ParameterValue::Int8(7));
        }
    }

    #[test]
    fn deep_nesting_failure_reports_full_path() {
        let mut buf = nested_sequences(20_000);
        let last = buf.len() - 2;
        buf.truncate(last);
        buf.extend_from_slice(&[b'o', 0x09]);
        let params = decode_one(&buf);
        match params[&0].as_error().unwrap() {
            ValueError::Element { path, source } => {
                assert_eq!(path.len(), 20_000);
                assert!(path.iter().all(|&index| index == 0));
                assert!(matches!(**source, ValueError::InvalidBoolean { byte: 0x09, .. }));
            }
            other => panic!("expected element error, got {other:?}"),
        }
    }

    #[test]
    fn nested_sequence_completes_before_sibling() {
        // [[1, 2], [3]] of Int8.
        let buf = [
            0x00, b'y', 0x00, 0x02, b'y', 0x00, 0x02, b'b', 0x01, 0x02, 0x00, 0x01, b'b', 0x03,
        ];
        let params = decode_one(&buf);
        let inner = |items: Vec<i8>| ParameterValue::GenericSequence {
            element_type: TypeTag::Int8,
            items: items.into_iter().map(ParameterValue::Int8).collect(),
        };
        assert_eq!(
            params[&0],
            ParameterValue::GenericSequence {
                element_type: TypeTag::GenericSequence,
                items: vec![inner(vec![1, 2]), inner(vec![3])],
            }
        );
    }

    #[test]
    fn decode_message_uses_declared_count() {
        let payload = [0xF3, 0x04, 0x01, 0x00, 0x01, 0x00, b'k', 0x00, 0x80];
        let message = wire::ReliableMessage::parse(&payload).unwrap();
        let params = decode_message(&message, &ParamLimits::default());
        assert_eq!(params[&0], ParameterValue::Int16(128));
    }
}
