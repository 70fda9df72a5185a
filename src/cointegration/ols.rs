//! Ordinary least squares via the normal equations

/// Relative pivot size below which the design matrix is treated as singular
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Result of an OLS fit
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Coefficients, one per regressor column
    pub params: Vec<f64>,
    /// Standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// Residuals, one per observation
    pub residuals: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
}

impl OlsFit {
    pub fn nobs(&self) -> usize {
        self.residuals.len()
    }

    /// t-value of one coefficient
    pub fn t_value(&self, index: usize) -> f64 {
        self.params[index] / self.std_errors[index]
    }

    /// Akaike information criterion under Gaussian errors
    pub fn aic(&self) -> f64 {
        let n = self.nobs() as f64;
        let k = self.params.len() as f64;
        let llf = -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0);
        -2.0 * llf + 2.0 * k
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Regress `y` on the given columns (no implicit intercept)
///
/// Returns `None` when there are no more observations than regressors,
/// columns have mismatched lengths, or the design matrix is singular.
pub fn ols(y: &[f64], columns: &[&[f64]]) -> Option<OlsFit> {
    let n = y.len();
    let k = columns.len();
    if k == 0 || n <= k || columns.iter().any(|c| c.len() != n) {
        return None;
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for i in 0..k {
        for j in i..k {
            let v = dot(columns[i], columns[j]);
            xtx[i][j] = v;
            xtx[j][i] = v;
        }
        xty[i] = dot(columns[i], y);
    }

    let inv = invert(xtx)?;

    let params: Vec<f64> = inv.iter().map(|row| dot(row, &xty)).collect();

    let residuals: Vec<f64> = (0..n)
        .map(|t| {
            let fitted: f64 = columns.iter().zip(&params).map(|(c, p)| c[t] * p).sum();
            y[t] - fitted
        })
        .collect();
    let ssr = dot(&residuals, &residuals);

    let sigma2 = ssr / (n - k) as f64;
    let std_errors = (0..k).map(|i| (sigma2 * inv[i][i]).sqrt()).collect();

    Some(OlsFit {
        params,
        std_errors,
        residuals,
        ssr,
    })
}

/// Gauss-Jordan inverse with partial pivoting
fn invert(mut a: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let k = a.len();
    let scale = (0..k).map(|i| a[i][i].abs()).fold(0.0, f64::max);
    if !scale.is_finite() || scale == 0.0 {
        return None;
    }

    let mut inv: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..k {
        let pivot_row = (col..k).max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))?;
        if a[pivot_row][col].abs() <= scale * SINGULAR_TOLERANCE {
            return None;
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..k {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }

    Some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ols_exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ones = [1.0; 5];
        let y: Vec<f64> = x.iter().map(|v| 3.0 + 2.0 * v).collect();

        let fit = ols(&y, &[&ones, &x]).unwrap();
        assert!((fit.params[0] - 3.0).abs() < 1e-10);
        assert!((fit.params[1] - 2.0).abs() < 1e-10);
        assert!(fit.ssr < 1e-18);
    }

    #[test]
    fn test_ols_standard_error() {
        // y = x + e with e = [1, -1, 1, -1]; slope stays 1 only approximately
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 1.0, 4.0, 3.0];
        let fit = ols(&y, &[&x]).unwrap();

        let sxx = 30.0;
        let slope = (2.0 + 2.0 + 12.0 + 12.0) / sxx;
        assert!((fit.params[0] - slope).abs() < 1e-12);

        let ssr: f64 = x
            .iter()
            .zip(&y)
            .map(|(xi, yi)| (yi - slope * xi).powi(2))
            .sum();
        let se = (ssr / 3.0 / sxx).sqrt();
        assert!((fit.std_errors[0] - se).abs() < 1e-12);
        assert!((fit.t_value(0) - slope / se).abs() < 1e-9);
    }

    #[test]
    fn test_ols_singular_design() {
        let x = [5.0; 6];
        let ones = [1.0; 6];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert!(ols(&y, &[&ones, &x]).is_none());
    }

    #[test]
    fn test_ols_too_few_observations() {
        let x = [1.0, 2.0];
        let ones = [1.0, 1.0];
        assert!(ols(&[1.0, 2.0], &[&ones, &x]).is_none());
    }

    #[test]
    fn test_ols_length_mismatch() {
        assert!(ols(&[1.0, 2.0, 3.0], &[&[1.0, 2.0]]).is_none());
    }

    #[test]
    fn test_aic_penalizes_parameters() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let z = [0.3, -0.1, 0.4, 0.0, -0.2, 0.1];
        let y = [1.1, 2.3, 2.8, 4.2, 4.9, 6.1];

        let small = ols(&y, &[&x]).unwrap();
        let large = ols(&y, &[&x, &z]).unwrap();
        assert!(large.ssr <= small.ssr);
        let n = 6.0_f64;
        let expected = n * ((2.0 * std::f64::consts::PI).ln() + (small.ssr / n).ln() + 1.0) + 2.0;
        assert!((small.aic() - expected).abs() < 1e-9);
    }
}
