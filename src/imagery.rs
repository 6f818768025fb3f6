use crate::geometry::Point;
use crate::image::DynamicImage;
use crate::serde::Serialize;

/// Diagonal of the RGB cube, `sqrt(255² × 3)`. Distances are normalized
/// against it so the worst possible guess lands at zero.
pub const MAX_DISTANCE: f64 = 441.67;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: u8::MAX,
        g: u8::MAX,
        b: u8::MAX,
    };

    pub const BLACK: Rgb = Rgb {
        r: u8::MIN,
        g: u8::MIN,
        b: u8::MIN,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance to another color in RGB space.
    pub fn distance_to(self, other: Self) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// The `rgb(r, g, b)` form shown in the status panel.
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "#{:0>2X}{:0>2X}{:0>2X}", self.r, self.g, self.b)
    }
}

impl<T: Into<u8>> std::convert::From<(T, T, T)> for Rgb {
    fn from((r, g, b): (T, T, T)) -> Self {
        Self::new(r.into(), g.into(), b.into())
    }
}

impl std::convert::From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// How one guess fared: similarity on a 0–10 scale, plus the raw distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoundResult {
    pub score: f64,
    pub distance: f64,
}

/// Score a guessed color against the target. The score is
/// `10 × (1 − distance / MAX_DISTANCE)`, clamped to [0, 10] to absorb
/// floating-point overshoot.
pub fn score(selected: Rgb, target: Rgb) -> RoundResult {
    let distance = selected.distance_to(target);
    let normalized = distance / MAX_DISTANCE;
    let score = (10.0 * (1.0 - normalized)).clamp(0.0, 10.0);
    RoundResult { score, distance }
}

/// The fixed-size pixel surface a round is played on. A decoded photo is
/// drawn into it once per round; afterwards it only ever serves reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; (width * height) as usize],
        }
    }

    /// Draw a decoded photo into a surface of the given dimensions,
    /// stretching it to fill exactly, the way the original canvas did.
    pub fn drawn_from(img: &DynamicImage, width: u32, height: u32) -> Self {
        Self::from(&img.resize_exact(width, height, image::imageops::FilterType::Triangle))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    /// Read the color at one coordinate. The coordinate must be in bounds;
    /// callers guard with [`Raster::contains`] first.
    pub fn sample(&self, point: Point) -> Rgb {
        self[point]
    }
}

impl std::convert::From<&DynamicImage> for Raster {
    fn from(image: &DynamicImage) -> Self {
        let mut raster = Self::new(image.width(), image.height());
        image.to_rgb8().enumerate_pixels().for_each(|(x, y, p)| {
            raster[Point::new(x, y)] = Rgb::from(p.0);
        });
        raster
    }
}

impl std::ops::Index<Point> for Raster {
    type Output = Rgb;
    fn index(&self, point: Point) -> &Self::Output {
        assert!(self.contains(point), "sample out of bounds at {}", point);
        &self.pixels[(point.y * self.width + point.x) as usize]
    }
}

impl std::ops::IndexMut<Point> for Raster {
    fn index_mut(&mut self, point: Point) -> &mut Self::Output {
        assert!(self.contains(point), "sample out of bounds at {}", point);
        &mut self.pixels[(point.y * self.width + point.x) as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn c(r: u8, g: u8, b: u8) -> Rgb {
        Rgb::new(r, g, b)
    }

    #[test]
    fn test_identical_colors_score_ten() {
        let result = score(c(10, 20, 30), c(10, 20, 30));
        assert_eq!(10.0, result.score);
        assert_eq!(0.0, result.distance);
    }

    #[test]
    fn test_opposite_corners_score_zero() {
        let result = score(Rgb::BLACK, Rgb::WHITE);
        assert!(result.distance > 441.0);
        assert_eq!("0.00", format!("{:.2}", result.score));
    }

    #[test]
    fn test_score_is_always_in_range() {
        let samples = [
            (c(0, 0, 0), c(0, 0, 0)),
            (c(0, 0, 0), c(255, 255, 255)),
            (c(255, 0, 0), c(0, 255, 0)),
            (c(1, 2, 3), c(200, 100, 50)),
            (c(127, 127, 127), c(128, 128, 128)),
        ];
        for (a, b) in samples {
            let result = score(a, b);
            assert!(
                (0.0..=10.0).contains(&result.score),
                "score {} out of range for {} vs {}",
                result.score,
                a,
                b
            );
        }
    }

    #[test]
    fn test_score_is_symmetric() {
        let a = c(12, 200, 77);
        let b = c(240, 3, 128);
        assert_eq!(score(a, b).score, score(b, a).score);
        assert_eq!(score(a, b).distance, score(b, a).distance);
    }

    #[test]
    fn test_distance_matches_euclidean() {
        // 3-4-0 triangle scaled into color space
        let result = score(c(0, 0, 0), c(3, 4, 0));
        assert_eq!(5.0, result.distance);
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!("#FF0A00", c(255, 10, 0).to_string());
    }

    #[test]
    fn test_css_form() {
        assert_eq!("rgb(1, 2, 3)", c(1, 2, 3).css());
    }

    #[test]
    fn test_raster_sample_reads_what_was_drawn() {
        let mut raster = Raster::new(2, 2);
        raster[Point::new(1, 0)] = c(9, 8, 7);
        assert_eq!(c(9, 8, 7), raster.sample(Point::new(1, 0)));
        assert_eq!(Rgb::BLACK, raster.sample(Point::new(0, 1)));
    }

    #[test]
    fn test_raster_contains() {
        let raster = Raster::new(3, 2);
        assert!(raster.contains(Point::new(0, 0)));
        assert!(raster.contains(Point::new(2, 1)));
        assert!(!raster.contains(Point::new(3, 1)));
        assert!(!raster.contains(Point::new(2, 2)));
    }

    #[test]
    fn test_raster_from_image_keeps_pixels() {
        let mut img = DynamicImage::new_rgb8(2, 2).to_rgb8();
        img[(0, 0)] = image::Rgb([1, 2, 3]);
        img[(1, 1)] = image::Rgb([40, 50, 60]);
        let raster = Raster::from(&DynamicImage::ImageRgb8(img));
        assert_eq!(c(1, 2, 3), raster.sample(Point::new(0, 0)));
        assert_eq!(c(40, 50, 60), raster.sample(Point::new(1, 1)));
        assert_eq!(Rgb::BLACK, raster.sample(Point::new(1, 0)));
    }

    #[test]
    fn test_drawn_from_matches_requested_dimensions() {
        let img = DynamicImage::new_rgb8(64, 48);
        let raster = Raster::drawn_from(&img, 8, 6);
        assert_eq!(8, raster.width());
        assert_eq!(6, raster.height());
    }
}
