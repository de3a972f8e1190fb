//! Operation ids contain `/`, so callers percent-encode them into a single
//! path segment and the engine decodes them back.

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationIdError {
    #[error("Operation id is not valid UTF-8 after decoding")]
    InvalidEncoding,
    #[error("Operation id is empty")]
    Empty,
}

/// Encode an operation id for use as one URL path segment.
pub fn encode_operation_id(operation_id: &str) -> String {
    urlencoding::encode(operation_id).into_owned()
}

/// Decode a path segment produced by [`encode_operation_id`].
///
/// Decoding an already-decoded id is harmless as long as it has no `%`.
pub fn decode_operation_id(segment: &str) -> Result<String, OperationIdError> {
    let decoded: Cow<'_, str> =
        urlencoding::decode(segment).map_err(|_| OperationIdError::InvalidEncoding)?;
    let decoded = decoded.trim();
    if decoded.is_empty() {
        return Err(OperationIdError::Empty);
    }
    Ok(decoded.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "projects/veo-director-tool/locations/us-central1/publishers/google/models/veo-3.0-generate-001/operations/1a2b-3c";

    #[test]
    fn encoded_id_is_a_single_segment() {
        let encoded = encode_operation_id(NAME);
        assert!(!encoded.contains('/'));
        assert_eq!(decode_operation_id(&encoded).unwrap(), NAME);
    }

    #[test]
    fn plain_ids_pass_through() {
        assert_eq!(encode_operation_id("op-123"), "op-123");
        assert_eq!(decode_operation_id("op-123").unwrap(), "op-123");
    }

    #[test]
    fn empty_segment_is_rejected() {
        assert_eq!(decode_operation_id("%20"), Err(OperationIdError::Empty));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(
            decode_operation_id("%FF%FE"),
            Err(OperationIdError::InvalidEncoding)
        );
    }
}
