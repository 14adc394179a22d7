//! Instruction data models
//!
//! Wire types for the instruction endpoint.

use serde::{Deserialize, Serialize};

/// Response envelope of the instruction endpoint
///
/// Only `blocks` is read; any other field the server adds is ignored.
/// Every element must be a JSON integer, so `[2, "6", 7.5]` fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionEnvelope {
    /// Instruction blocks, in execution order
    pub blocks: Vec<i64>,
}

impl InstructionEnvelope {
    /// Consume the envelope and return the instruction blocks
    pub fn into_blocks(self) -> Vec<i64> {
        self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_fields_are_ignored() {
        let envelope: InstructionEnvelope =
            serde_json::from_str(r#"{"blocks": [2, 6, 7], "robot": "REF-01"}"#).unwrap();
        assert_eq!(envelope.into_blocks(), vec![2, 6, 7]);
    }

    #[test]
    fn test_missing_blocks_is_rejected() {
        let result = serde_json::from_str::<InstructionEnvelope>(r#"{"other_field": 1}"#);
        assert!(result.unwrap_err().to_string().contains("blocks"));
    }

    #[test]
    fn test_non_integer_blocks_are_rejected() {
        assert!(serde_json::from_str::<InstructionEnvelope>(r#"{"blocks": "2,6,7"}"#).is_err());
        assert!(serde_json::from_str::<InstructionEnvelope>(r#"{"blocks": [2, "6"]}"#).is_err());
        assert!(serde_json::from_str::<InstructionEnvelope>(r#"{"blocks": [2.5]}"#).is_err());
        assert!(serde_json::from_str::<InstructionEnvelope>(r#"{"blocks": null}"#).is_err());
    }
}
