//! Fixed-size numeric grid handed between pool, stepper and renderer

/// Row-major `width × height` block of `f32` values
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Matrix {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 { self.width }

    #[inline]
    pub fn height(&self) -> u32 { self.height }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Copy contents from a grid of the same size.
    pub fn copy_from(&mut self, other: &Matrix) {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        self.data.copy_from_slice(&other.data);
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }
}
