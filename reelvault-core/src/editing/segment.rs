//! Time segments of a source video.

use serde::{Deserialize, Serialize};

/// One retained interval `[startTime, endTime)` of the source file.
///
/// Times are decimal seconds carried as strings, exactly as the client
/// submits them; they are forwarded to the media engine untouched, and
/// their order in the request defines concatenation order. Overlap and
/// ordering are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Start of the interval, in seconds.
    pub start_time: String,
    /// End of the interval, in seconds.
    pub end_time: String,
}

impl Segment {
    /// Creates a segment from start and end times in seconds.
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let segment: Segment =
            serde_json::from_str(r#"{"startTime":"1.5","endTime":"4"}"#).unwrap();
        assert_eq!(segment, Segment::new("1.5", "4"));

        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["startTime"], "1.5");
        assert_eq!(json["endTime"], "4");
    }
}
