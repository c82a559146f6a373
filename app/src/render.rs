use image::{GrayImage, Luma, Rgb, RgbImage};
use landmap::LandMap;
use landmap::utils::normalize;
use palette::{Gradient, LinSrgb};

const GAMMA_CORRECTION: f32 = 1.2;

// Map an elevation to [0, 1] against a fixed reference height.
// Unlike normalization this keeps absolute heights comparable between runs.
pub fn brightness(value: f32, reference: f32) -> f32 {
    (value / reference).clamp(0.0, 1.0)
}

// Absolute height map: one gray pixel per sample
pub fn heightmap_image(map: &LandMap, reference: f32) -> GrayImage {
    let size = map.size() as u32;
    GrayImage::from_fn(size, size, |x, y| {
        let v = brightness(map.height(x as isize, y as isize), reference);
        Luma([(v * 255.0).round() as u8])
    })
}

// Min/max normalized grayscale, used for per-stage snapshots
pub fn normalized_image(map: &LandMap) -> GrayImage {
    let size = map.size() as u32;
    let norm = normalize(map, 1.0);
    GrayImage::from_fn(size, size, |x, y| {
        let v = norm[(x + size * y) as usize];
        Luma([(v * 255.0).round() as u8])
    })
}

// Lambertian hillshade from central differences; border cells stay unlit.
// `z_scale` adjusts vertical exaggeration.
fn hillshade(values: &[f32], size: usize, z_scale: f32) -> Vec<f32> {
    let mut shade = vec![0.0; size * size];
    let azimuth = std::f32::consts::PI / 4.0; // 45°
    let altitude = std::f32::consts::PI / 4.0; // 45°
    let (sin_alt, cos_alt) = altitude.sin_cos();
    let lx = azimuth.cos() * cos_alt;
    let ly = azimuth.sin() * cos_alt;
    let lz = sin_alt;
    let at = |x: usize, y: usize| values[x + size * y];

    for y in 1..size - 1 {
        for x in 1..size - 1 {
            let dzdx = ((at(x + 1, y) - at(x - 1, y)) / 2.0) * z_scale;
            let dzdy = ((at(x, y + 1) - at(x, y - 1)) / 2.0) * z_scale;
            let (nx, ny, nz) = (-dzdx, -dzdy, 1.0f32);
            let len = (nx * nx + ny * ny + nz * nz).sqrt();
            shade[x + size * y] = ((nx * lx + ny * ly + nz * lz) / len).max(0.0);
        }
    }
    shade
}

// Coloured, hill-shaded preview: deep water to beach to grass to rock to snow
pub fn shaded_preview(map: &LandMap) -> RgbImage {
    let size = map.size();
    let norm = normalize(map, GAMMA_CORRECTION);
    // shade on the normalized surface scaled back up to grid units
    let shade = hillshade(&norm, size, size as f32 / 8.0);

    let gradient = Gradient::with_domain(vec![
        (0.00, LinSrgb::new(0.0, 0.0, 0.5)), // deep blue
        (0.30, LinSrgb::new(0.8, 0.8, 0.5)), // sand
        (0.50, LinSrgb::new(0.1, 0.6, 0.2)), // green
        (0.75, LinSrgb::new(0.5, 0.4, 0.3)), // rock
        (1.00, LinSrgb::new(1.0, 1.0, 1.0)), // snow
    ]);

    RgbImage::from_fn(size as u32, size as u32, |x, y| {
        let i = x as usize + size * y as usize;
        let col: LinSrgb = gradient.get(norm[i]);
        let rgb = col.into_format::<u8>();
        let light = (shade[i] * 0.5 + 0.5).clamp(0.0, 1.0);
        Rgb([
            (rgb.red as f32 * light) as u8,
            (rgb.green as f32 * light) as u8,
            (rgb.blue as f32 * light) as u8,
        ])
    })
}
