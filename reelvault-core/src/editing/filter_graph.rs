//! Typed trim+concat filter graph description.
//!
//! The graph is the contract between this service and the media engine:
//! per segment `i`, the source video and audio streams are trimmed to the
//! segment's interval with presentation timestamps reset to zero and
//! labeled `v<i>`/`a<i>`; a final concat stage stitches all pairs back
//! together in segment order under the `outv`/`outa` labels. Rendering to
//! the engine's filter syntax happens in one place so the engine stays an
//! interchangeable collaborator.

use std::fmt::Write as _;

use super::segment::Segment;
use super::{EditingError, EditingResult};

/// Stream labels of the concatenated output, in `-map` order.
pub const OUTPUT_LABELS: [&str; 2] = ["outv", "outa"];

/// Trim-and-concatenate transform over an ordered segment list.
#[derive(Debug, Clone)]
pub struct TrimConcatGraph {
    segments: Vec<Segment>,
}

impl TrimConcatGraph {
    /// Builds the graph for an ordered, non-empty segment list.
    ///
    /// # Errors
    ///
    /// - `EditingError::InvalidSegments` - The segment list is empty
    ///   (a zero-input concat stage is meaningless)
    pub fn new(segments: Vec<Segment>) -> EditingResult<Self> {
        if segments.is_empty() {
            return Err(EditingError::InvalidSegments {
                reason: "segment list is empty".to_string(),
            });
        }
        Ok(Self { segments })
    }

    /// Number of segments in the graph.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The segments in concatenation order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Renders the complete `filter_complex` expression.
    pub fn filter_complex(&self) -> String {
        let mut graph = String::new();

        for (index, segment) in self.segments.iter().enumerate() {
            let start = &segment.start_time;
            let end = &segment.end_time;
            let _ = write!(
                graph,
                "[0:v]trim=start={start}:end={end},setpts=PTS-STARTPTS[v{index}];\
                 [0:a]atrim=start={start}:end={end},asetpts=PTS-STARTPTS[a{index}];"
            );
        }

        for index in 0..self.segments.len() {
            let _ = write!(graph, "[v{index}][a{index}]");
        }
        let _ = write!(
            graph,
            "concat=n={}:v=1:a=1[{}][{}]",
            self.segments.len(),
            OUTPUT_LABELS[0],
            OUTPUT_LABELS[1]
        );

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_segment_list() {
        assert!(matches!(
            TrimConcatGraph::new(vec![]),
            Err(EditingError::InvalidSegments { .. })
        ));
    }

    #[test]
    fn test_single_segment_graph() {
        let graph = TrimConcatGraph::new(vec![Segment::new("0", "5")]).unwrap();
        let rendered = graph.filter_complex();

        assert_eq!(
            rendered,
            "[0:v]trim=start=0:end=5,setpts=PTS-STARTPTS[v0];\
             [0:a]atrim=start=0:end=5,asetpts=PTS-STARTPTS[a0];\
             [v0][a0]concat=n=1:v=1:a=1[outv][outa]"
        );
    }

    #[test]
    fn test_graph_references_one_trim_pair_per_segment() {
        let segments = vec![
            Segment::new("0", "5"),
            Segment::new("10.5", "20"),
            Segment::new("30", "31.25"),
        ];
        let graph = TrimConcatGraph::new(segments).unwrap();
        let rendered = graph.filter_complex();

        assert_eq!(rendered.matches("[0:v]trim=").count(), 3);
        assert_eq!(rendered.matches("[0:a]atrim=").count(), 3);
        for index in 0..3 {
            assert!(rendered.contains(&format!("[v{index}]")));
            assert!(rendered.contains(&format!("[a{index}]")));
        }
        assert!(rendered.contains("concat=n=3:v=1:a=1[outv][outa]"));
    }

    #[test]
    fn test_concat_inputs_follow_segment_order() {
        let graph =
            TrimConcatGraph::new(vec![Segment::new("10", "20"), Segment::new("0", "5")]).unwrap();
        let rendered = graph.filter_complex();

        let concat_stage = rendered.split(";").last().unwrap();
        assert!(concat_stage.starts_with("[v0][a0][v1][a1]concat=n=2"));

        // First trim pair carries the first segment's times
        assert!(rendered.contains("trim=start=10:end=20,setpts=PTS-STARTPTS[v0]"));
        assert!(rendered.contains("trim=start=0:end=5,setpts=PTS-STARTPTS[v1]"));
    }
}
