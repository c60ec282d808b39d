use crate::scene_image::SceneImage;
use image::{RgbaImage, imageops::FilterType};
use ndarray::Array4;

/// Resize and normalization settings for a square-input network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preprocess {
    pub input_size: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Preprocess {
    /// Builds a `[1, 3, size, size]` tensor, one plane per RGB channel.
    pub fn to_tensor(&self, image: &SceneImage) -> Array4<f32> {
        let size = self.input_size as usize;
        let resized = resize_to_square(image.pixels(), self.input_size);
        let mut array = Array4::<f32>::zeros((1, 3, size, size));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let [r, g, b, _] = pixel.0;
            let (y, x) = (y as usize, x as usize);
            array[[0, 0, y, x]] = normalize_channel(r, self.mean[0], self.std[0]);
            array[[0, 1, y, x]] = normalize_channel(g, self.mean[1], self.std[1]);
            array[[0, 2, y, x]] = normalize_channel(b, self.mean[2], self.std[2]);
        }
        array
    }
}

fn resize_to_square(img: &RgbaImage, size: u32) -> RgbaImage {
    image::imageops::resize(img, size, size, FilterType::Triangle)
}

fn normalize_channel(value: u8, mean: f32, std: f32) -> f32 {
    let v = value as f32 / 255.0;
    (v - mean) / std
}
