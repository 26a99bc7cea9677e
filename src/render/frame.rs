use image::RgbImage;

/// One rasterized generation, ready for the assembler.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Generation label of the source snapshot.
    pub generation: String,
    /// Title text drawn on the frame.
    pub title: String,
    /// Opaque RGB8 pixels.
    pub image: RgbImage,
}

impl Frame {
    /// Pixel size `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
