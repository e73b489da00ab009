//! Best-fit offset of a reference inside a subject signal.
//!
//! The alignment code only depends on the [`Correlator`] trait. Two
//! implementations ship with the crate: a time-domain one for short inputs
//! and an FFT based one for searching whole recordings.

use realfft::num_complex::Complex;
use realfft::RealFftPlanner;

/// Inputs whose full correlation is shorter than this use the direct path.
const DIRECT_CORRELATION_LIMIT: usize = 64;

/// Locates `reference` inside `subject`.
///
/// The returned offset is the index in `subject` at which `reference`
/// starts when the two line up best. Partial overlaps at either edge are
/// considered, so the offset may be negative. Implementations must be
/// deterministic for identical inputs.
pub trait Correlator {
    /// Best-alignment position of `reference` inside `subject`.
    fn find_offset(&self, subject: &[f32], reference: &[f32]) -> isize;
}

impl<F> Correlator for F
where
    F: Fn(&[f32], &[f32]) -> isize,
{
    fn find_offset(&self, subject: &[f32], reference: &[f32]) -> isize {
        self(subject, reference)
    }
}

/// Time-domain cross-correlation, O(n·m).
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectCorrelator;

impl Correlator for DirectCorrelator {
    fn find_offset(&self, subject: &[f32], reference: &[f32]) -> isize {
        direct_offset(subject, reference)
    }
}

/// Frequency-domain cross-correlation, O((n+m)·log(n+m)).
#[derive(Clone, Copy, Debug, Default)]
pub struct FftCorrelator;

impl Correlator for FftCorrelator {
    fn find_offset(&self, subject: &[f32], reference: &[f32]) -> isize {
        if subject.is_empty() || reference.is_empty() {
            return 0;
        }
        if subject.len() + reference.len() - 1 < DIRECT_CORRELATION_LIMIT {
            return direct_offset(subject, reference);
        }
        fft_offset(subject, reference).unwrap_or_else(|| direct_offset(subject, reference))
    }
}

/// Lags considered for a full correlation, earliest first.
fn lag_range(subject_len: usize, reference_len: usize) -> std::ops::RangeInclusive<isize> {
    -(reference_len as isize - 1)..=(subject_len as isize - 1)
}

fn direct_offset(subject: &[f32], reference: &[f32]) -> isize {
    if subject.is_empty() || reference.is_empty() {
        return 0;
    }

    let mut best = (0isize, f64::NEG_INFINITY);
    for lag in lag_range(subject.len(), reference.len()) {
        // overlap: reference[j] pairs with subject[j + lag]
        let j_start = (-lag).max(0) as usize;
        let j_end = reference.len().min((subject.len() as isize - lag) as usize);
        let score: f64 = (j_start..j_end)
            .map(|j| f64::from(reference[j]) * f64::from(subject[(j as isize + lag) as usize]))
            .sum();
        if score > best.1 {
            best = (lag, score);
        }
    }
    best.0
}

fn fft_offset(subject: &[f32], reference: &[f32]) -> Option<isize> {
    let full_len = subject.len() + reference.len() - 1;
    let n = full_len.next_power_of_two();

    let mut planner = RealFftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(n);
    let inverse = planner.plan_fft_inverse(n);

    let mut subject_buf = forward.make_input_vec();
    for (dst, &s) in subject_buf.iter_mut().zip(subject) {
        *dst = f64::from(s);
    }
    let mut reference_buf = forward.make_input_vec();
    for (dst, &r) in reference_buf.iter_mut().zip(reference) {
        *dst = f64::from(r);
    }

    let mut subject_spectrum = forward.make_output_vec();
    let mut reference_spectrum = forward.make_output_vec();
    forward.process(&mut subject_buf, &mut subject_spectrum).ok()?;
    forward.process(&mut reference_buf, &mut reference_spectrum).ok()?;

    let mut product: Vec<Complex<f64>> = subject_spectrum
        .iter()
        .zip(&reference_spectrum)
        .map(|(s, r)| s * r.conj())
        .collect();
    // DC and Nyquist bins of a real signal's spectrum are real
    if let Some(first) = product.first_mut() {
        first.im = 0.0;
    }
    if let Some(last) = product.last_mut() {
        last.im = 0.0;
    }

    let mut correlation = inverse.make_output_vec();
    inverse.process(&mut product, &mut correlation).ok()?;

    // correlation[k] holds lag k, negative lags wrap to the tail
    let mut best = (0isize, f64::NEG_INFINITY);
    for lag in lag_range(subject.len(), reference.len()) {
        let index = if lag >= 0 {
            lag as usize
        } else {
            (n as isize + lag) as usize
        };
        let score = correlation[index];
        if score > best.1 {
            best = (lag, score);
        }
    }
    Some(best.0)
}
