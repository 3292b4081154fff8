#![allow(dead_code)]

use nalgebra::{DMatrix, DVector};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256StarStar;
use cpasocp::prelude::*;
use cpasocp::*;

//

pub fn init_logger()
{
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn mat(nr: usize, nc: usize, v: &[f64]) -> DMatrix<f64>
{
    DMatrix::from_row_slice(nr, nc, v)
}

pub fn eye(n: usize) -> DMatrix<f64>
{
    DMatrix::identity(n, n)
}

pub fn vec(v: &[f64]) -> DVector<f64>
{
    DVector::from_row_slice(v)
}

//

pub fn dyn_a() -> DMatrix<f64>
{
    mat(2, 2, &[1., 0.7, -0.1, 1.])
}

pub fn dyn_b() -> DMatrix<f64>
{
    mat(2, 2, &[1., 1., 0.5, 1.])
}

pub fn boxes(n: usize, lo: &[f64], hi: &[f64]) -> SetCartesian
{
    SetCartesian::new(
        (0.. n).map(|_| Box::new(SetBox::new(lo, hi)) as Box<dyn ConvexSet>).collect()
    )
}

/// y_t = x_t + u_t in [-2, 2], x_N in [-2, 2]
pub fn sum_problem(n: usize) -> ProbOCP
{
    ProbOCP::builder(n)
        .dynamics(dyn_a(), dyn_b())
        .cost(eye(2) * 10., eye(2), eye(2) * 5.)
        .constraints(
            eye(2), eye(2), eye(2),
            boxes(n, &[-2., -2.], &[2., 2.]), SetBox::new(-2., 2.)
        )
        .build().unwrap()
}

/// y_t = (x_t, u_t), |x| <= 2, |u| <= u_max, |x_N| <= 2
pub fn stacked_problem(n: usize, u_max: f64) -> ProbOCP
{
    ProbOCP::builder(n)
        .dynamics(dyn_a(), dyn_b())
        .cost(eye(2) * 10., eye(2), eye(2) * 5.)
        .constraints(
            stacked_gamma_x(), stacked_gamma_u(), eye(2),
            boxes(n, &[-2., -2., -u_max, -u_max], &[2., 2., u_max, u_max]), SetBox::new(-2., 2.)
        )
        .build().unwrap()
}

/// y_t = (x_t, u_t), u >= 0, free x
pub fn stacked_cone_problem(n: usize) -> ProbOCP
{
    let stage: Vec<Box<dyn ConvexSet>> = (0.. n).map(|_| {
        let s = SetCartesian::new(vec![
            Box::new(ConeReal::new().with_dim(2)),
            Box::new(ConeRPos::new().with_dim(2)),
        ]);
        Box::new(s) as Box<dyn ConvexSet>
    }).collect();

    ProbOCP::builder(n)
        .dynamics(dyn_a(), dyn_b())
        .cost(eye(2) * 10., eye(2), eye(2) * 5.)
        .constraints(
            stacked_gamma_x(), stacked_gamma_u(), eye(2),
            SetCartesian::new(stage), ConeReal::new()
        )
        .build().unwrap()
}

pub fn stacked_gamma_x() -> DMatrix<f64>
{
    mat(4, 2, &[
        1., 0.,
        0., 1.,
        0., 0.,
        0., 0.,
    ])
}

pub fn stacked_gamma_u() -> DMatrix<f64>
{
    mat(4, 2, &[
        0., 0.,
        0., 0.,
        1., 0.,
        0., 1.,
    ])
}

pub fn random_mat(rng: &mut Xoshiro256StarStar, nr: usize, nc: usize) -> DMatrix<f64>
{
    DMatrix::from_fn(nr, nc, |_, _| rng.gen_range(-1.0..1.0))
}

/// Random problem whose constraints are loose enough to stay inactive.
pub fn random_problem(rng: &mut Xoshiro256StarStar, n: usize, n_x: usize, n_u: usize, n_c: usize, n_f: usize) -> ProbOCP
{
    let a = eye(n_x) * 0.9 + random_mat(rng, n_x, n_x) * 0.1;
    let b = random_mat(rng, n_x, n_u);

    ProbOCP::builder(n)
        .dynamics(a, b)
        .cost(eye(n_x) * 10., eye(n_u), eye(n_x) * 5.)
        .constraints(
            random_mat(rng, n_c, n_x), random_mat(rng, n_c, n_u), random_mat(rng, n_f, n_x),
            SetBox::new(-1e3, 1e3), SetBox::new(-1e3, 1e3)
        )
        .build().unwrap()
}

//

/// Minimizer of the quadratic cost (plus the proximal term if `prox` is given)
/// subject to the dynamics, by a dense KKT system.
pub fn dense_lq(n: usize,
    a: &DMatrix<f64>, b: &DMatrix<f64>,
    q: &DMatrix<f64>, r: &DMatrix<f64>, p: &DMatrix<f64>,
    x0: &DVector<f64>, prox: Option<(f64, &DVector<f64>)>) -> DVector<f64>
{
    let n_x = a.nrows();
    let n_u = b.ncols();
    let n_xu = n_x + n_u;
    let n_z = n * n_xu + n_x;
    let n_e = (n + 1) * n_x;

    let mut h = DMatrix::zeros(n_z, n_z);
    let mut f = DVector::zeros(n_z);
    for t in 0.. n {
        h.view_mut((t * n_xu, t * n_xu), (n_x, n_x)).copy_from(q);
        h.view_mut((t * n_xu + n_x, t * n_xu + n_x), (n_u, n_u)).copy_from(r);
    }
    h.view_mut((n * n_xu, n * n_xu), (n_x, n_x)).copy_from(p);

    if let Some((lambda, v)) = prox {
        h += DMatrix::<f64>::identity(n_z, n_z) / lambda;
        f -= v / lambda;
    }

    let mut e = DMatrix::zeros(n_e, n_z);
    let mut e_rhs = DVector::zeros(n_e);
    e.view_mut((0, 0), (n_x, n_x)).copy_from(&eye(n_x));
    e_rhs.rows_mut(0, n_x).copy_from(x0);
    for t in 0.. n {
        let row = (t + 1) * n_x;
        e.view_mut((row, (t + 1) * n_xu), (n_x, n_x)).copy_from(&eye(n_x));
        e.view_mut((row, t * n_xu), (n_x, n_x)).copy_from(&(-a));
        e.view_mut((row, t * n_xu + n_x), (n_x, n_u)).copy_from(&(-b));
    }

    let mut kkt = DMatrix::zeros(n_z + n_e, n_z + n_e);
    kkt.view_mut((0, 0), (n_z, n_z)).copy_from(&h);
    kkt.view_mut((0, n_z), (n_z, n_e)).copy_from(&e.transpose());
    kkt.view_mut((n_z, 0), (n_e, n_z)).copy_from(&e);

    let mut rhs = DVector::zeros(n_z + n_e);
    rhs.rows_mut(0, n_z).copy_from(&(-f));
    rhs.rows_mut(n_z, n_e).copy_from(&e_rhs);

    let sol = kkt.lu().solve(&rhs).unwrap();
    sol.rows(0, n_z).into_owned()
}

/// Same as [`dense_lq`] with the data of `ocp` and no proximal term.
pub fn dense_lq_of(ocp: &ProbOCP, x0: &DVector<f64>) -> DVector<f64>
{
    let (a, b) = ocp.dynamics();
    let (q, r, p) = ocp.cost();
    dense_lq(ocp.horizon(), a, b, q, r, p, x0, None)
}
