/// Upscale factor for a given number of frames: `floor(sqrt(n))`, at least 1.
///
/// Each doubling of resolution needs roughly four times as many samples per
/// output pixel, so the canvas grows with the square root of the frame count.
pub fn default_upscale_factor(frame_count: usize) -> u32 {
    let mut root = (frame_count as f64).sqrt().floor() as usize;
    while root * root > frame_count {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= frame_count {
        root += 1;
    }
    root.max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_upscale_factor() {
        assert_eq!(default_upscale_factor(0), 1);
        assert_eq!(default_upscale_factor(1), 1);
        assert_eq!(default_upscale_factor(3), 1);
        assert_eq!(default_upscale_factor(4), 2);
        assert_eq!(default_upscale_factor(8), 2);
        assert_eq!(default_upscale_factor(9), 3);
        assert_eq!(default_upscale_factor(100), 10);
    }
}
