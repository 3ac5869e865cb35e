use serde::{Deserialize, Serialize};

/// One camera frame handed to a classifier or detector collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Raw pixel data; layout is a contract between source and consumer.
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// True for zero-sized frames, which must never reach a classifier.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One detected obstacle in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    /// Detection score in [0, 1].
    pub score: f32,
    /// Bounding box as [x, y, width, height] in frame pixels.
    pub bbox: [f32; 4],
}
