//! Read options

/// Options controlling how a document is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Decode layer channels on the rayon thread pool
    pub parallel: bool,
    /// Decode the merged composite at the end of the file
    pub decode_merged_image: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            decode_merged_image: true,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn decode_merged_image(mut self, decode: bool) -> Self {
        self.decode_merged_image = decode;
        self
    }
}
