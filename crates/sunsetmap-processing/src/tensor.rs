//! Classifier input tensor

/// Width and height the classifier expects.
pub const INPUT_SIZE: u32 = 224;
/// RGB.
pub const CHANNELS: usize = 3;

/// A normalized `[1, 224, 224, 3]` f32 tensor in HWC layout with a
/// leading batch dimension. Values are in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
}

impl ImageTensor {
    pub(crate) fn from_data(data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), Self::len());
        Self { data }
    }

    /// Total number of elements: 1 * 224 * 224 * 3.
    pub fn len() -> usize {
        (INPUT_SIZE as usize) * (INPUT_SIZE as usize) * CHANNELS
    }

    pub fn shape() -> [usize; 4] {
        [1, INPUT_SIZE as usize, INPUT_SIZE as usize, CHANNELS]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
