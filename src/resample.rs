//! Frequency-domain resampling.
//!
//! A window of `Nx` samples is transformed with a forward FFT, its spectrum is
//! truncated (or zero-padded) to `num` bins, and the inverse FFT yields `num`
//! samples spanning the same time interval. Unlike decimation or linear
//! interpolation this keeps the band-limited content of the window intact,
//! which is why values near the window edges may overshoot the input range.

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Resamples `x` to `num` samples using the Fourier method
///
/// This is a convenience wrapper that builds a fresh [`Resampler`]. When many
/// windows are processed, keep one [`Resampler`] around so FFT plans are reused.
///
/// # Examples
///
/// ```rust
/// use biosignal_windows::resample;
///
/// // 3 full cycles of a sine sampled at 200 points
/// let x: Vec<f64> = (0..200)
///     .map(|n| (2.0 * std::f64::consts::PI * 3.0 * n as f64 / 200.0).sin())
///     .collect();
///
/// let y = resample(&x, 64);
/// assert_eq!(y.len(), 64);
///
/// // The same 3 cycles, now sampled at 64 points
/// for (m, v) in y.iter().enumerate() {
///     let expected = (2.0 * std::f64::consts::PI * 3.0 * m as f64 / 64.0).sin();
///     assert!((v - expected).abs() < 1e-9);
/// }
/// ```
pub fn resample(x: &[f64], num: usize) -> Vec<f64> {
    Resampler::new().resample(x, num)
}

/// FFT resampler with a plan cache
pub struct Resampler {
    planner: FftPlanner<f64>,
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Resampler {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Resamples a real-valued window to `num` samples
    ///
    /// Empty input or `num == 0` returns an empty vector.
    pub fn resample(&mut self, x: &[f64], num: usize) -> Vec<f64> {
        let nx = x.len();
        if nx == 0 || num == 0 {
            return Vec::new();
        }

        // 正向变换
        let mut spectrum: Vec<Complex64> = x.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        self.planner.plan_fft_forward(nx).process(&mut spectrum);

        // 正频率半谱（含 Nyquist）
        let half_len = num / 2 + 1;
        let mut half = vec![Complex64::new(0.0, 0.0); half_len];
        let n = num.min(nx);
        let nyq = n / 2 + 1;
        half[..nyq].copy_from_slice(&spectrum[..nyq]);

        // 拆分/合并 Nyquist 分量
        if n % 2 == 0 {
            if num < nx {
                half[n / 2] *= 2.0;
            } else if nx < num {
                half[n / 2] *= 0.5;
            }
        }

        // 补全共轭对称谱，等价于 irfft
        let mut full = vec![Complex64::new(0.0, 0.0); num];
        full[..half_len.min(num)].copy_from_slice(&half[..half_len.min(num)]);
        for k in 1..half_len {
            let mirror = num - k;
            if mirror > k {
                full[mirror] = half[k].conj();
            }
        }

        self.planner.plan_fft_inverse(num).process(&mut full);

        // rustfft 的逆变换不做归一化：1/num 再乘 num/nx
        let scale = 1.0 / nx as f64;
        full.iter().map(|c| c.re * scale).collect()
    }
}
