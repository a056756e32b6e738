use statrs::distribution::{Discrete, NegativeBinomial as NbDistribution};

use crate::errors::ConfigurationError;

///
/// Negative binomial count model of one strand channel.
///
/// Parametrized by the dispersion `p` of the sample and a rate argument `r`
/// (the classical `n`), with `mean = r * (1 - p) / p` and mass function
///
/// `P(k) = Γ(k + r) / (Γ(r) k!) * p^r * (1 - p)^k`
///
/// which accepts real valued `r`.
///
#[derive(Debug, Clone)]
pub struct NegativeBinomial {
    p: f64,
    r: f64,
    dist: NbDistribution,
}

impl NegativeBinomial {
    ///
    /// Create a new model.
    ///
    /// # Arguments
    /// - p: dispersion, must lie strictly inside (0, 1)
    /// - r: rate argument, must be positive and finite
    ///
    pub fn new(p: f64, r: f64) -> Result<Self, ConfigurationError> {
        if !(p.is_finite() && p > 0.0 && p < 1.0) {
            return Err(ConfigurationError::InvalidDispersion(p));
        }
        if !(r.is_finite() && r > 0.0) {
            return Err(ConfigurationError::InvalidRate(r));
        }
        let dist = NbDistribution::new(r, p)
            .map_err(|e| ConfigurationError::Distribution(e.to_string()))?;

        Ok(Self { p, r, dist })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn mean(&self) -> f64 {
        self.r * (1.0 - self.p) / self.p
    }

    pub fn variance(&self) -> f64 {
        self.r * (1.0 - self.p) / (self.p * self.p)
    }

    /// Probability mass at `k`.
    pub fn pmf(&self, k: u32) -> f64 {
        self.dist.pmf(k as u64)
    }

    /// Natural log of the probability mass at `k`.
    #[inline]
    pub fn ln_pmf(&self, k: u32) -> f64 {
        self.dist.ln_pmf(k as u64)
    }
}
