/// Coefficients of an explicit Runge-Kutta scheme.
///
/// `a` is strictly lower triangular; entries on and above the diagonal are ignored.
pub struct ButcherTableau<const STAGES: usize> {
    pub a: [[f64; STAGES]; STAGES],
    pub b: [f64; STAGES],
    pub c: [f64; STAGES],
    pub order: usize,
}

impl ButcherTableau<1> {
    // usage is ButcherTableau::<1>::EULER
    pub const EULER: Self = Self {
        a: [[0.]],
        b: [1.],
        c: [0.],
        order: 1,
    };
}

impl ButcherTableau<2> {
    pub const MIDPOINT: Self = Self {
        a: [[0., 0.], [1. / 2., 0.]],
        b: [0., 1.],
        c: [0., 1. / 2.],
        order: 2,
    };

    pub const HEUN: Self = Self {
        a: [[0., 0.], [1., 0.]],
        b: [1. / 2., 1. / 2.],
        c: [0., 1.],
        order: 2,
    };

    pub const RALSTON: Self = Self {
        a: [[0., 0.], [2. / 3., 0.]],
        b: [1. / 4., 3. / 4.],
        c: [0., 2. / 3.],
        order: 2,
    };
}

impl ButcherTableau<4> {
    // usage is ButcherTableau::<4>::RK4
    pub const RK4: Self = Self {
        a: [
            [0., 0., 0., 0.],
            [1. / 2., 0., 0., 0.],
            [0., 1. / 2., 0., 0.],
            [0., 0., 1., 0.],
        ],
        b: [1. / 6., 1. / 3., 1. / 3., 1. / 6.],
        c: [0., 1.0 / 2.0, 1.0 / 2.0, 1.0],
        order: 4,
    };
}

impl<const STAGES: usize> ButcherTableau<STAGES> {
    /// Checks the row-sum and consistency conditions every explicit scheme must satisfy.
    pub fn is_consistent(&self) -> bool {
        const EPS: f64 = 1e-14;
        let b_sum: f64 = self.b.iter().sum();
        if (b_sum - 1.0).abs() > EPS {
            return false;
        }
        (0..STAGES).all(|s| {
            let row_sum: f64 = self.a[s][..s].iter().sum();
            (row_sum - self.c[s]).abs() < EPS
        })
    }
}
