use std::f64::consts::{E, PI};

use serde::Serialize;

use super::special::{binomial_coefficient, factorial, normal_cdf};

/// The exact binomial formula is always tried when `k` is below this value
/// (or within this distance of `n`).
pub const EXACT_SMALL_K: u64 = 50;

/// The exact binomial formula is always tried below this number of trials.
pub const EXACT_MAX_TRIALS: u64 = 1_000_000;

/// The plain Poisson formula is refused from this `k` on (`k!` overflow).
pub const POISSON_MAX_K: u64 = 150;

/// Power terms are refused when their base-10 magnitude reaches this value.
pub const MAX_LOG10_MAGNITUDE: f64 = 300.0;

/// Which formula of the cascade produced a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
	Exact,
	Poisson,
	PoissonStirling,
	Gaussian,
}

/// Value of every cascade stage for one `(k, p, n)`.
///
/// `None` means the stage guard refused the input or the formula
/// produced a non-finite number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageBreakdown {
	pub exact: Option<f64>,
	pub poisson: Option<f64>,
	pub poisson_stirling: Option<f64>,
	pub gaussian: Option<f64>,
	pub total: f64,
}

fn finite(value: f64) -> Option<f64> {
	value.is_finite().then_some(value)
}

/// Probability of observing zero occurrences of an event of probability `p` in `n` draws.
pub fn p_miss(p: f64, n: u64) -> f64 {
	(1.0 - p).powf(n as f64)
}

/// Exact binomial `C(n,k) p^k (1-p)^(n-k)`.
///
/// Only attempted for small `k`, `k` close to `n`, or fewer than a million trials.
pub fn exact_binomial(k: u64, p: f64, n: u64) -> Option<f64> {
	if !(k < EXACT_SMALL_K || k + EXACT_SMALL_K > n || n < EXACT_MAX_TRIALS) {
		return None;
	}
	if k > n {
		return Some(0.0);
	}
	let prob = binomial_coefficient(n, k) * p.powf(k as f64) * (1.0 - p).powf((n - k) as f64);
	finite(prob)
}

/// Poisson approximation `λ^k e^-λ / k!` with `λ = n p`.
pub fn poisson(k: u64, p: f64, n: u64) -> Option<f64> {
	let lambda = p * n as f64;
	// NaN guard (λ = 0 and k = 0) compares false and refuses
	if !(k < POISSON_MAX_K && lambda.log10() * (k as f64) < MAX_LOG10_MAGNITUDE) {
		return None;
	}
	finite(lambda.powf(k as f64) * (-lambda).exp() / factorial(k))
}

/// Poisson approximation with Stirling's formula for `k!`:
/// `(λ/k·e)^k e^-λ / sqrt(2πk)`.
pub fn poisson_stirling(k: u64, p: f64, n: u64) -> Option<f64> {
	if k == 0 {
		return None;
	}
	let lambda = p * n as f64;
	let k = k as f64;
	let base = lambda / k * E;
	if !(base.log10() * k < MAX_LOG10_MAGNITUDE) {
		return None;
	}
	finite(base.powf(k) * (-lambda).exp() / (2.0 * k * PI).sqrt())
}

/// Gaussian approximation `Φ((k+0.5-μ)/σ) - Φ((k-0.5-μ)/σ)`.
///
/// With `σ = 0` (p is 0 or 1) the distribution is a point mass at `μ`.
pub fn gaussian(k: u64, p: f64, n: u64) -> f64 {
	let mu = n as f64 * p;
	let sd = (n as f64 * p * (1.0 - p)).sqrt();
	let k = k as f64;
	if sd == 0.0 || !sd.is_finite() {
		return if (k - mu).abs() < 0.5 { 1.0 } else { 0.0 };
	}
	normal_cdf((k + 0.5 - mu) / sd) - normal_cdf((k - 0.5 - mu) / sd)
}

/// Probability of observing exactly `k` occurrences, and the stage that produced it.
pub fn probability_with_stage(k: u64, p: f64, n: u64) -> (f64, Stage) {
	if let Some(prob) = exact_binomial(k, p, n) {
		return (prob, Stage::Exact);
	}
	if let Some(prob) = poisson(k, p, n) {
		return (prob, Stage::Poisson);
	}
	if let Some(prob) = poisson_stirling(k, p, n) {
		return (prob, Stage::PoissonStirling);
	}
	let prob = gaussian(k, p, n);
	debug_assert!(prob.is_finite(), "gaussian stage produced {prob} for k={k} p={p} n={n}");
	(if prob.is_finite() { prob } else { 0.0 }, Stage::Gaussian)
}

/// Probability of observing an event of probability `p` exactly `k` times in `n` draws.
///
/// Falls back from the exact binomial to Poisson, Poisson-Stirling and
/// finally a Gaussian approximation whenever a stage would overflow.
/// Never fails.
pub fn probability_of_k_observations(k: u64, p: f64, n: u64) -> f64 {
	probability_with_stage(k, p, n).0
}

/// Probability of observing strictly fewer than `k` occurrences.
pub fn probability_of_fewer_than_k(k: u64, p: f64, n: u64) -> f64 {
	(0..k).map(|i| probability_of_k_observations(i, p, n)).sum()
}

/// Every stage evaluated independently, for debugging the cascade.
pub fn stage_breakdown(k: u64, p: f64, n: u64) -> StageBreakdown {
	StageBreakdown {
		exact: exact_binomial(k, p, n),
		poisson: poisson(k, p, n),
		poisson_stirling: poisson_stirling(k, p, n),
		gaussian: finite(gaussian(k, p, n)),
		total: probability_of_k_observations(k, p, n),
	}
}
