//! Quasi-Newton directions of SuperMann

use nalgebra::{DVector, DMatrix};
use super::{FixedPointMap, SolverError};

/// Direction generator of SuperMann.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction
{
    /// Anderson acceleration on a ring buffer of residual differences.
    Anderson,
    /// Restarted Broyden with Powell's modification.
    Broyden,
}

//

const BROYDEN_THETA_BAR: f64 = 0.2;

fn heaviside(x: f64) -> f64
{
    if x >= 0. {
        1.
    }
    else {
        0.
    }
}

// minimum-norm least squares
fn lstsq(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>>
{
    let (nr, nc) = a.shape();
    let svd = a.clone().svd(true, true);
    let smax = svd.singular_values.max();
    let eps = f64::EPSILON * nr.max(nc) as f64 * smax;

    svd.solve(b, eps).ok()
}

//

/// Anderson memory.
/// 
/// Slot `i % m` holds the residual \\(x_k - T(x_k)\\) and its difference to the residual at \\(T(x_k)\\).
#[derive(Debug, Clone)]
pub struct AndersonMemory
{
    s: Vec<Option<DVector<f64>>>,
    y: Vec<Option<DVector<f64>>>,
}

impl AndersonMemory
{
    /// Creates an instance with `m` slots.
    pub fn new(m: usize) -> Self
    {
        assert!(m > 0);

        AndersonMemory {
            s: vec![None; m],
            y: vec![None; m],
        }
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize
    {
        self.s.iter().flatten().count()
    }

    /// Returns `Ok` with the direction \\(d_k\\), or `Err` if \\(T\\) fails.
    /// * `i` is the iteration index.
    /// * `x_k` is the current point.
    /// * `t_x_k` is \\(T(x_k)\\).
    /// * `map` is \\(T\\).
    pub fn direction<M: FixedPointMap>(&mut self, i: usize,
        x_k: &DVector<f64>, t_x_k: &DVector<f64>, map: &mut M) -> Result<DVector<f64>, SolverError>
    {
        let slot = i % self.s.len();

        let tt_x_k = map.apply(t_x_k)?;
        let r_k = x_k - t_x_k;
        let r_t = t_x_k - tt_x_k;

        self.y[slot] = Some(&r_k - r_t);
        self.s[slot] = Some(r_k.clone());

        let s_cols: Vec<DVector<f64>> = self.s.iter().flatten().cloned().collect();
        let y_cols: Vec<DVector<f64>> = self.y.iter().flatten().cloned().collect();
        let s_k = DMatrix::from_columns(&s_cols);
        let y_k = DMatrix::from_columns(&y_cols);

        match lstsq(&y_k, &r_k) {
            Some(t) => Ok(-&r_k - (s_k - y_k) * t),
            None => {
                log::warn!("{}: Anderson least squares failed", i);
                Ok(-r_k)
            },
        }
    }
}

//

/// Broyden memory.
/// 
/// Holds up to `m` pairs \\((s, \tilde{s})\\) and is cleared every `m` iterations.
#[derive(Debug, Clone)]
pub struct BroydenMemory
{
    m: usize,
    pairs: Vec<(DVector<f64>, DVector<f64>)>,
}

impl BroydenMemory
{
    /// Creates an instance with `m` entries.
    pub fn new(m: usize) -> Self
    {
        assert!(m > 0);

        BroydenMemory {
            m,
            pairs: Vec::with_capacity(m),
        }
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize
    {
        self.pairs.len()
    }

    /// Returns `Ok` with the direction \\(d_k\\), or `Err` if \\(T\\) fails.
    /// * `i` is the iteration index.
    /// * `x_k` is the current point.
    /// * `t_x_k` is \\(T(x_k)\\).
    /// * `map` is \\(T\\).
    /// * `eps_zero` guards the divisions.
    pub fn direction<M: FixedPointMap>(&mut self, i: usize,
        x_k: &DVector<f64>, t_x_k: &DVector<f64>, map: &mut M, eps_zero: f64) -> Result<DVector<f64>, SolverError>
    {
        let r_k = x_k - t_x_k;
        let mut d = -&r_k;

        let w_k = x_k + &d;
        let t_w_k = map.apply(&w_k)?;
        let s = &w_k - x_k;
        let mut tilde_s = &w_k - t_w_k - &r_k;

        let sq_s = s.norm_squared();
        if sq_s <= eps_zero {
            return Ok(d);
        }

        if i % self.m == 0 {
            self.pairs.clear();
            self.pairs.push((s.clone(), tilde_s.clone()));

            // restart: d is corrected by the already corrected tilde_s
            let c = s.dot(&tilde_s);
            tilde_s *= 1. + c;
            let c = s.dot(&d);
            d.axpy(c, &tilde_s, 1.);
        }
        else {
            if self.pairs.len() == self.m {
                self.pairs.remove(0);
            }
            self.pairs.push((s.clone(), tilde_s.clone()));
            for (s_j, y_j) in self.pairs.iter().rev() {
                Self::correct(s_j, y_j, &mut tilde_s, &mut d);
            }
        }

        let gamma = tilde_s.dot(&s) / sq_s;
        let theta = if gamma.abs() >= BROYDEN_THETA_BAR {
            1.
        }
        else {
            (1. - heaviside(gamma) * BROYDEN_THETA_BAR) / (1. - gamma)
        };

        let denom = (1. - theta + theta * gamma) * sq_s;
        if denom.abs() <= eps_zero {
            log::trace!("{}: Broyden update skipped", i);
            return Ok(d);
        }

        let tilde_s = (&s - tilde_s) * (theta / denom);
        let c = s.dot(&d);
        d.axpy(c, &tilde_s, 1.);

        Ok(d)
    }

    fn correct(s_j: &DVector<f64>, y_j: &DVector<f64>, tilde_s: &mut DVector<f64>, d: &mut DVector<f64>)
    {
        let c = s_j.dot(tilde_s);
        tilde_s.axpy(c, y_j, 1.);
        let c = s_j.dot(d);
        d.axpy(c, y_j, 1.);
    }
}

//

/// Memory of either direction generator.
#[derive(Debug, Clone)]
pub enum DirectionMemory
{
    Anderson(AndersonMemory),
    Broyden(BroydenMemory),
}

impl DirectionMemory
{
    /// Creates an empty memory of `m` entries for `direction`.
    pub fn new(direction: Direction, m: usize) -> Self
    {
        match direction {
            Direction::Anderson => DirectionMemory::Anderson(AndersonMemory::new(m)),
            Direction::Broyden => DirectionMemory::Broyden(BroydenMemory::new(m)),
        }
    }

    /// Returns `Ok` with the direction \\(d_k\\), or `Err` if \\(T\\) fails.
    pub fn direction<M: FixedPointMap>(&mut self, i: usize,
        x_k: &DVector<f64>, t_x_k: &DVector<f64>, map: &mut M, eps_zero: f64) -> Result<DVector<f64>, SolverError>
    {
        match self {
            DirectionMemory::Anderson(mem) => mem.direction(i, x_k, t_x_k, map),
            DirectionMemory::Broyden(mem) => mem.direction(i, x_k, t_x_k, map, eps_zero),
        }
    }
}

//

#[cfg(test)]
pub(crate) struct AffineMap
{
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
}

#[cfg(test)]
impl FixedPointMap for AffineMap
{
    fn dim(&self) -> usize
    {
        self.b.len()
    }

    fn apply(&mut self, x: &DVector<f64>) -> Result<DVector<f64>, SolverError>
    {
        Ok(&self.a * x + &self.b)
    }
}

#[test]
fn test_heaviside1()
{
    assert_eq!(heaviside(0.), 1.);
    assert_eq!(heaviside(0.3), 1.);
    assert_eq!(heaviside(-1e-9), 0.);
}

#[test]
fn test_lstsq1()
{
    use float_eq::assert_float_eq;

    let a = DMatrix::from_row_slice(3, 2, &[
        1., 0.,
        0., 1.,
        1., 1.,
    ]);
    let b = DVector::from_vec(vec![1., 2., 0.]);
    let t = lstsq(&a, &b).unwrap();

    // normal equations
    let n = a.transpose() * &a;
    let rhs = a.transpose() * &b;
    let t_ref = n.lu().solve(&rhs).unwrap();
    assert_float_eq!(t.as_slice(), t_ref.as_slice(), abs_all <= 1e-10);

    let z = DMatrix::zeros(3, 2);
    let t = lstsq(&z, &b).unwrap();
    assert_float_eq!(t.as_slice(), [0., 0.].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_anderson_memory1()
{
    let mut map = AffineMap {
        a: DMatrix::from_diagonal(&DVector::from_vec(vec![0.5, 0.2])),
        b: DVector::from_vec(vec![1., -1.]),
    };
    let mut mem = AndersonMemory::new(3);

    let mut x = DVector::from_vec(vec![0., 0.]);
    for i in 0.. 5 {
        let t_x = map.apply(&x).unwrap();
        let d = mem.direction(i, &x, &t_x, &mut map).unwrap();
        assert!(d.iter().all(|e| e.is_finite()));
        assert!(mem.len() <= 3);
        x = t_x;
    }
    assert_eq!(mem.len(), 3);
}

#[test]
fn test_anderson_memory2()
{
    use float_eq::assert_float_eq;

    // one step to the fixed point of an affine contraction
    let mut map = AffineMap {
        a: DMatrix::from_element(1, 1, 0.5),
        b: DVector::from_element(1, 1.),
    };
    let mut mem = AndersonMemory::new(1);

    let x = DVector::from_element(1, 0.);
    let t_x = map.apply(&x).unwrap();
    let d = mem.direction(0, &x, &t_x, &mut map).unwrap();
    assert_float_eq!((&x + d)[0], 2., abs <= 1e-10);
}

#[test]
fn test_broyden_memory1()
{
    let mut map = AffineMap {
        a: DMatrix::from_row_slice(2, 2, &[0.5, 0.1, -0.1, 0.3]),
        b: DVector::from_vec(vec![1., -1.]),
    };
    let mut mem = BroydenMemory::new(2);

    let mut x = DVector::from_vec(vec![0., 0.]);
    for i in 0.. 6 {
        let t_x = map.apply(&x).unwrap();
        let d = mem.direction(i, &x, &t_x, &mut map, 1e-12).unwrap();
        assert!(d.iter().all(|e| e.is_finite()));
        assert!(mem.len() <= 2);
        if i % 2 == 0 {
            assert_eq!(mem.len(), 1);
        }
        x = t_x;
    }
}

#[test]
fn test_broyden_memory2()
{
    // fixed point: residual is zero, so is the direction
    let mut map = AffineMap {
        a: DMatrix::from_element(1, 1, 0.5),
        b: DVector::from_element(1, 1.),
    };
    let mut mem = BroydenMemory::new(3);

    let x = DVector::from_element(1, 2.);
    let t_x = map.apply(&x).unwrap();
    let d = mem.direction(0, &x, &t_x, &mut map, 1e-12).unwrap();
    assert_eq!(d[0], 0.);
    assert_eq!(mem.len(), 0);
}

#[test]
fn test_broyden_memory3()
{
    use float_eq::assert_float_eq;

    // T(x) = x / 2 + 1 from x = 0:
    // d = 1, s = 1, tilde_s = 0.5 -> 0.75, d -> 1.75, gamma = 0.75,
    // tilde_s -> (1 - 0.75) / 0.75, d -> 1.75 + 1.75 / 3
    let mut map = AffineMap {
        a: DMatrix::from_element(1, 1, 0.5),
        b: DVector::from_element(1, 1.),
    };
    let mut mem = BroydenMemory::new(2);

    let x = DVector::from_element(1, 0.);
    let t_x = map.apply(&x).unwrap();
    let d = mem.direction(0, &x, &t_x, &mut map, 1e-12).unwrap();
    assert_float_eq!(d[0], 7. / 3., abs <= 1e-12);

    // stored pair keeps the uncorrected tilde_s
    assert_eq!(mem.len(), 1);
    assert_float_eq!(mem.pairs[0].0[0], 1., abs <= 1e-12);
    assert_float_eq!(mem.pairs[0].1[0], 0.5, abs <= 1e-12);
}
