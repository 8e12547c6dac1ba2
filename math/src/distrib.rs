/// A discrete probability distribution built incrementally from nonnegative
/// weights and normalized exactly once.
///
/// Sampling maps a uniform variate to a bucket index by searching the running
/// CDF. When the accumulated weight is degenerate (all zero), sampling falls
/// back to a uniform choice with probability `1/len`.
#[derive(Debug, Clone, Default)]
pub struct DiscretePdf {
    cdf: Vec<f32>,
    sum: f32,
    normalized: bool,
}

impl DiscretePdf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        DiscretePdf {
            cdf: Vec::with_capacity(n),
            sum: 0.0,
            normalized: false,
        }
    }

    /// Appends one bucket with the given weight. Panics if called after
    /// [`normalize`](Self::normalize).
    pub fn append(&mut self, weight: f32) {
        assert!(!self.normalized, "append after normalize");
        assert!(weight >= 0.0, "negative weight {}", weight);
        self.sum += weight;
        self.cdf.push(self.sum);
    }

    pub fn len(&self) -> usize {
        self.cdf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cdf.is_empty()
    }

    /// Turns the accumulated weights into a distribution and returns the
    /// pre-normalization total.
    pub fn normalize(&mut self) -> f32 {
        assert!(!self.normalized, "normalize called twice");
        let sum = self.sum;
        if sum > 0.0 {
            for v in self.cdf.iter_mut() {
                *v /= sum;
            }
            // The last entry should be exactly 1 despite rounding.
            if let Some(last) = self.cdf.last_mut() {
                *last = 1.0;
            }
        }
        self.normalized = true;
        sum
    }

    /// Probability of bucket `i`.
    pub fn pdf(&self, i: usize) -> f32 {
        assert!(self.normalized, "sampled before normalize");
        if self.sum <= 0.0 {
            return if self.cdf.is_empty() {
                0.0
            } else {
                1.0 / self.cdf.len() as f32
            };
        }
        let prev = if i == 0 { 0.0 } else { self.cdf[i - 1] };
        self.cdf[i] - prev
    }

    /// Maps `u` in `[0, 1)` to a bucket index.
    pub fn sample(&self, u: f32) -> usize {
        assert!(self.normalized, "sampled before normalize");
        assert!(!self.cdf.is_empty(), "sampled an empty distribution");
        if self.sum <= 0.0 {
            let i = (u * self.cdf.len() as f32) as usize;
            return i.min(self.cdf.len() - 1);
        }
        // First bucket whose CDF value exceeds u.
        let i = self.cdf.partition_point(|&c| c <= u);
        i.min(self.cdf.len() - 1)
    }

    /// Maps `u` to a bucket and also returns that bucket's probability.
    pub fn sample_with_pdf(&self, u: f32) -> (usize, f32) {
        let i = self.sample(u);
        (i, self.pdf(i))
    }

    /// Maps `u` to a bucket and rescales `u` to a fresh uniform variate,
    /// reusing the information left over after the discrete choice.
    pub fn sample_reuse(&self, u: &mut f32) -> (usize, f32) {
        let (i, pdf) = self.sample_with_pdf(*u);
        if pdf > 0.0 {
            let lo = if i == 0 { 0.0 } else { self.cdf[i - 1] };
            *u = ((*u - lo) / pdf).clamp(0.0, 1.0 - f32::EPSILON);
        }
        (i, pdf)
    }
}
