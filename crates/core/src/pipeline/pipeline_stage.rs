use std::fmt;

/// States of one overlay request.
///
/// `ReceivedImage → Detecting → PlacementComputed → Compositing → Done`,
/// with `Failed` reachable from every non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    ReceivedImage,
    Detecting,
    PlacementComputed,
    Compositing,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReceivedImage => "received_image",
            Self::Detecting => "detecting",
            Self::PlacementComputed => "placement_computed",
            Self::Compositing => "compositing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
