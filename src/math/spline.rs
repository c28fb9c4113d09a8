/// A natural cubic spline through a set of knots.
///
/// The spline passes exactly through every knot and is twice continuously
/// differentiable between them, with zero curvature at both ends.
#[derive(Clone, Debug)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// The second derivative of the spline at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Fits a natural cubic spline through the given knots.
    ///
    /// The x-values must be strictly increasing, and at least two knots
    /// are required.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Self {
        assert_eq!(xs.len(), ys.len());
        assert!(xs.len() >= 2);
        debug_assert!(xs.windows(2).all(|w| w[0] < w[1]));

        let n = xs.len();
        let mut m = vec![0.0; n];

        // Solve the tridiagonal system for the interior second derivatives
        // with the Thomas algorithm; the natural boundary condition pins
        // the curvature to zero at both ends.
        if n > 2 {
            let mut diag = vec![0.0; n];
            let mut rhs = vec![0.0; n];
            for i in 1..n - 1 {
                let h0 = xs[i] - xs[i - 1];
                let h1 = xs[i + 1] - xs[i];
                diag[i] = 2.0 * (h0 + h1);
                rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0);
            }
            for i in 2..n - 1 {
                let h = xs[i] - xs[i - 1];
                let w = h / diag[i - 1];
                diag[i] -= w * h;
                rhs[i] -= w * rhs[i - 1];
            }
            for i in (1..n - 1).rev() {
                let h = xs[i + 1] - xs[i];
                m[i] = (rhs[i] - h * m[i + 1]) / diag[i];
            }
        }

        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
        }
    }

    pub fn y(&self, x: f64) -> f64 {
        self.y_and_dy(x).0
    }

    pub fn dy(&self, x: f64) -> f64 {
        self.y_and_dy(x).1
    }

    /// Samples the spline and its derivative at the given x.
    ///
    /// Queries outside the knot range are evaluated on the end segments.
    pub fn y_and_dy(&self, x: f64) -> (f64, f64) {
        let i = self
            .xs
            .partition_point(|knot| *knot <= x)
            .saturating_sub(1)
            .min(self.xs.len() - 2);

        let h = self.xs[i + 1] - self.xs[i];
        let t = x - self.xs[i];

        let b = (self.ys[i + 1] - self.ys[i]) / h - h * (2.0 * self.m[i] + self.m[i + 1]) / 6.0;
        let c = self.m[i] / 2.0;
        let d = (self.m[i + 1] - self.m[i]) / (6.0 * h);

        let y = self.ys[i] + t * (b + t * (c + t * d));
        let dy = b + t * (2.0 * c + t * 3.0 * d);

        (y, dy)
    }
}
