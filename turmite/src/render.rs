use std::path::Path;

use egui::{Color32, Rgba, ecolor::Hsva};
use image::{ImageResult, RgbaImage};
use itertools::Itertools;

use crate::{Color, Turmite, topology::Polygon};

const BASE: [Color32; 5] = [
    Color32::BLACK,
    Color32::RED,
    Color32::GREEN,
    Color32::BLUE,
    Color32::YELLOW,
];

#[derive(Clone, Debug, PartialEq)]
pub struct Palette(Vec<Rgba>);

impl Palette {
    pub fn new(colors: usize) -> Self {
        let extra = colors.saturating_sub(BASE.len());
        let base = BASE.into_iter().map(Rgba::from);
        let hues = (0..extra)
            .map(|i| Rgba::from(Hsva::new(i as f32 / extra as f32, 0.7, 0.9, 1.)));
        Self(base.chain(hues).collect())
    }

    pub fn background(&self) -> Rgba {
        self.0[0]
    }

    pub fn get(&self, color: Color) -> Rgba {
        self.0[color as usize % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Copy)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    pub margin: f64,
    pub ant_rgba: Rgba,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            margin: 4.,
            ant_rgba: Rgba::WHITE,
        }
    }
}

struct Frame {
    min_x: f64,
    max_y: f64,
    scale: f64,
    offset: (f64, f64),
}

impl Frame {
    fn fit(points: impl Iterator<Item = (f64, f64)>, settings: Settings) -> Option<Self> {
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.unzip();
        let (min_x, max_x) = xs.into_iter().minmax_by(f64::total_cmp).into_option()?;
        let (min_y, max_y) = ys.into_iter().minmax_by(f64::total_cmp).into_option()?;
        let (w, h) = (settings.width as f64, settings.height as f64);
        let room = |pixels: f64| (pixels - 2. * settings.margin).max(1.);
        let scale = f64::min(room(w) / (max_x - min_x), room(h) / (max_y - min_y));
        let offset = (
            (w - (max_x - min_x) * scale) / 2.,
            (h - (max_y - min_y) * scale) / 2.,
        );
        Some(Self {
            min_x,
            max_y,
            scale,
            offset,
        })
    }

    fn to_pixel(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            self.offset.0 + (x - self.min_x) * self.scale,
            self.offset.1 + (self.max_y - y) * self.scale,
        )
    }
}

fn inside(polygon: &Polygon, (px, py): (f64, f64)) -> bool {
    // Convex, so inside means on the same side of every edge.
    let signs = polygon
        .iter()
        .circular_tuple_windows()
        .map(|(&(ax, ay), &(bx, by))| (bx - ax) * (py - ay) - (by - ay) * (px - ax))
        .map(f64::signum)
        .filter(|&s| s != 0.)
        .dedup()
        .count();
    signs <= 1
}

fn fill(pixels: &mut [Rgba], settings: Settings, polygon: &Polygon, rgba: Rgba) {
    let (w, h) = (settings.width, settings.height);
    let clamp = |v: f64, max: usize| (v.max(0.) as usize).min(max);
    let bounds = |axis: fn(&(f64, f64)) -> f64| {
        let values = polygon.iter().map(axis);
        values.minmax_by(f64::total_cmp).into_option().unwrap_or_default()
    };
    let ((x0, x1), (y0, y1)) = (bounds(|p| p.0), bounds(|p| p.1));
    let mut painted = false;
    for j in clamp(y0.floor(), h)..clamp(y1.ceil(), h) {
        for i in clamp(x0.floor(), w)..clamp(x1.ceil(), w) {
            if inside(polygon, (i as f64 + 0.5, j as f64 + 0.5)) {
                pixels[j * w + i] = rgba;
                painted = true;
            }
        }
    }
    // Cells smaller than a pixel still show up.
    if !painted {
        let n = polygon.len() as f64;
        let (cx, cy) = polygon
            .iter()
            .fold((0., 0.), |(x, y), p| (x + p.0 / n, y + p.1 / n));
        let (i, j) = (cx.floor(), cy.floor());
        if (0.0..w as f64).contains(&i) && (0.0..h as f64).contains(&j) {
            pixels[j as usize * w + i as usize] = rgba;
        }
    }
}

pub fn render(turmite: &Turmite, settings: Settings, palette: &Palette) -> Vec<Rgba> {
    let mut pixels = vec![palette.background(); settings.width * settings.height];
    let topology = turmite.topology();
    let ant = topology.vertices(turmite.ant().position);
    let cells = turmite
        .grid()
        .snapshot()
        .map(|(coord, color)| (topology.vertices(coord), color))
        .collect_vec();
    let points = cells
        .iter()
        .flat_map(|(p, _)| p.iter().copied())
        .chain(ant.iter().copied());
    let Some(frame) = Frame::fit(points, settings) else {
        return pixels;
    };
    let project = |polygon: &Polygon| -> Polygon {
        polygon.iter().map(|&p| frame.to_pixel(p)).collect()
    };
    for (polygon, color) in &cells {
        fill(&mut pixels, settings, &project(polygon), palette.get(*color));
    }
    fill(&mut pixels, settings, &project(&ant), settings.ant_rgba);
    pixels
}

pub fn to_image(settings: Settings, pixels: &[Rgba]) -> RgbaImage {
    let mut buffer = RgbaImage::new(settings.width as u32, settings.height as u32);
    for (i, &rgba) in pixels.iter().enumerate() {
        let (x, y) = (i % settings.width, i / settings.width);
        let pixel = image::Rgba(Color32::from(rgba).to_array());
        buffer.put_pixel(x as u32, y as u32, pixel);
    }
    buffer
}

/// The format follows the file extension (`.png`, `.ppm`, ...).
pub fn save(path: impl AsRef<Path>, settings: Settings, pixels: &[Rgba]) -> ImageResult<()> {
    to_image(settings, pixels).save(path)
}
