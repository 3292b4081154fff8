use float_eq::assert_float_eq;
use nalgebra::{DMatrix, DVector};
use crate::solver::*;
use crate::{MatOp, ConeRPos, ConeSOC, SetBox, SetCartesian};

//

// h(z) = 1/2 |z - x0|^2
struct ProxDist
{
    n: usize,
    lambda: f64,
}

impl Proximal for ProxDist
{
    fn size(&self) -> usize
    {
        self.n
    }

    fn state_size(&self) -> usize
    {
        self.n
    }

    fn step(&self) -> f64
    {
        self.lambda
    }

    fn prox(&self, x0: &DVector<f64>, v: &DVector<f64>, z: &mut DVector<f64>)
    {
        z.copy_from(&((v + x0 * self.lambda) / (1. + self.lambda)));
    }
}

fn vec(v: &[f64]) -> DVector<f64>
{
    DVector::from_row_slice(v)
}

fn init_logger()
{
    let _ = env_logger::builder().is_test(true).try_init();
}

//

#[test]
fn test_cp1()
{
    init_logger();

    let eye = DMatrix::identity(3, 3);
    let prox = ProxDist {n: 3, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[1., -2., 0.5]);

    let s = ChambollePock::new().par(|p| {
        p.eps_acc = 1e-9;
    });
    let rslt = s.solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3)).unwrap();

    assert_eq!(rslt.status(), SolverStatus::Converged);
    assert_eq!(rslt.iter(), rslt.residuals().len());
    assert_float_eq!(rslt.z().as_slice(), [1., 0., 0.5].as_ref(), abs_all <= 1e-6);
}

#[test]
fn test_cp2()
{
    init_logger();

    // already at the solution
    let eye = DMatrix::identity(2, 2);
    let prox = ProxDist {n: 2, lambda: 0.5};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[1., 2.]);

    let rslt = ChambollePock::new()
        .solve((&prox, &op_l, ConeRPos::new()), &x0, &x0, &DVector::zeros(2)).unwrap();

    assert_eq!(rslt.status(), SolverStatus::Converged);
    assert_eq!(rslt.iter(), 1);
}

#[test]
fn test_cp3()
{
    init_logger();

    let eye = DMatrix::identity(3, 3);
    let prox = ProxDist {n: 3, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[1., -2., 0.5]);

    // budget runs out
    let s = ChambollePock::new().par(|p| {
        p.eps_acc = 0.;
        p.max_iter = 3;
    });
    let rslt = s.solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3)).unwrap();
    assert_eq!(rslt.status(), SolverStatus::ExcessIter);
    assert_eq!(rslt.iter(), 3);

    // converges, but too late
    let s = ChambollePock::new().par(|p| {
        p.eps_acc = 1e-9;
        p.excess_ratio = 1e-4;
    });
    let rslt = s.solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3)).unwrap();
    assert_eq!(rslt.status(), SolverStatus::ExcessIter);
    assert!(rslt.iter() < 10_000);
    assert!(rslt.residuals().last().unwrap().max() <= 1e-9);
}

#[test]
fn test_cp4()
{
    init_logger();

    let eye = DMatrix::identity(3, 3);
    let prox = ProxDist {n: 3, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[1., -2., 0.5]);

    let rslt = ChambollePock::new()
        .solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(2), &DVector::zeros(3));
    assert_eq!(rslt.unwrap_err(), SolverError::DimensionMismatch);

    let rslt = ChambollePock::new()
        .solve((&prox, &op_l, ConeRPos::new().with_dim(2)), &x0, &DVector::zeros(3), &DVector::zeros(3));
    assert_eq!(rslt.unwrap_err(), SolverError::InvalidOp);

    let bad = ProxDist {n: 3, lambda: 0.};
    let rslt = ChambollePock::new()
        .solve((&bad, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3));
    assert_eq!(rslt.unwrap_err(), SolverError::InvalidOp);

    let rslt = ChambollePock::new().par(|p| p.max_iter = 0)
        .solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3));
    assert_eq!(rslt.unwrap_err(), SolverError::InvalidParam);
}

#[test]
fn test_cp_scaling1()
{
    init_logger();

    let eye = DMatrix::identity(3, 3);
    let prox = ProxDist {n: 3, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[1., -2., 0.5]);
    let scaling = vec(&[2., 0.5, 3.]);

    let s = ChambollePock::new().par(|p| {
        p.eps_acc = 1e-9;
    });
    let rslt = s.solve_scaling((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3), &scaling).unwrap();

    assert_eq!(rslt.status(), SolverStatus::Converged);
    assert_float_eq!(rslt.z().as_slice(), [1., 0., 0.5].as_ref(), abs_all <= 1e-6);
}

#[test]
fn test_cp_scaling2()
{
    init_logger();

    let eye = DMatrix::identity(3, 3);
    let prox = ProxDist {n: 3, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[1., -2., 0.5]);
    let z0 = DVector::zeros(3);

    let rslt = ChambollePock::new()
        .solve_scaling((&prox, &op_l, ConeRPos::new()), &x0, &z0, &z0, &vec(&[1., 0., 1.]));
    assert_eq!(rslt.unwrap_err(), SolverError::InvalidScaling);

    let rslt = ChambollePock::new()
        .solve_scaling((&prox, &op_l, ConeRPos::new()), &x0, &z0, &z0, &vec(&[1., f64::NAN, 1.]));
    assert_eq!(rslt.unwrap_err(), SolverError::InvalidScaling);

    let rslt = ChambollePock::new()
        .solve_scaling((&prox, &op_l, ConeRPos::new()), &x0, &z0, &z0, &vec(&[1., 1.]));
    assert_eq!(rslt.unwrap_err(), SolverError::DimensionMismatch);
}

//

#[test]
fn test_admm1()
{
    init_logger();

    let eye = DMatrix::identity(3, 3);
    let prox = ProxDist {n: 3, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[1., -2., 0.5]);

    let s = Admm::new().par(|p| {
        p.eps_acc = 1e-9;
    });
    let rslt = s.solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3)).unwrap();

    assert_eq!(rslt.status(), SolverStatus::Converged);
    assert!(rslt.residuals().iter().all(|r| r.gap.is_none()));
    assert_float_eq!(rslt.z().as_slice(), [1., 0., 0.5].as_ref(), abs_all <= 1e-6);
}

#[test]
fn test_admm2()
{
    init_logger();

    // non-square L
    let l = DMatrix::from_row_slice(2, 3, &[
        1., 0., 0.,
        0., 1., 1.,
    ]);
    let prox = ProxDist {n: 3, lambda: 0.5};
    let op_l = MatOp::new(&l);
    let x0 = vec(&[1., -2., 0.5]);

    let rslt = Admm::new()
        .solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(2));
    assert_eq!(rslt.unwrap_err(), SolverError::DimensionMismatch);

    // Chambolle-Pock accepts it
    let s = ChambollePock::new().par(|p| {
        p.eps_acc = 1e-9;
    });
    let rslt = s.solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(2)).unwrap();
    assert_eq!(rslt.status(), SolverStatus::Converged);
    // z2 + z3 >= 0 active: (z2, z3) = (-1.25, 1.25)
    assert_float_eq!(rslt.z().as_slice(), [1., -1.25, 1.25].as_ref(), abs_all <= 1e-5);
}

#[test]
fn test_admm_scaling1()
{
    init_logger();

    let eye = DMatrix::identity(3, 3);
    let prox = ProxDist {n: 3, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[3., 4., -1.]);

    let s = Admm::new().par(|p| {
        p.eps_acc = 1e-9;
    });
    let rslt_ref = s.solve((&prox, &op_l, ConeSOC::new()), &x0, &DVector::zeros(3), &DVector::zeros(3)).unwrap();

    let s = Admm::new().par(|p| {
        p.eps_acc = 1e-9;
    });
    let scaling = DVector::from_element(3, 2.);
    let rslt = s.solve_scaling((&prox, &op_l, ConeSOC::new()), &x0, &DVector::zeros(3), &DVector::zeros(3), &scaling).unwrap();

    assert_eq!(rslt.status(), SolverStatus::Converged);
    assert_float_eq!(rslt.z().as_slice(), [1.2, 1.6, 2.].as_ref(), abs_all <= 1e-5);
    assert_float_eq!(rslt.z().as_slice(), rslt_ref.z().as_slice(), abs_all <= 1e-5);
}

//

#[test]
fn test_supermann1()
{
    init_logger();

    let eye = DMatrix::identity(3, 3);
    let prox = ProxDist {n: 3, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[1., -2., 0.5]);

    for dir in [Direction::Anderson, Direction::Broyden] {
        let s = SuperMann::new()
            .par(|p| {
                p.eps_acc = 1e-9;
            })
            .sm_par(|p| {
                p.direction = dir;
                p.memory = 3;
            });
        let rslt = s.solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3)).unwrap();

        assert_eq!(rslt.status(), SolverStatus::Converged);
        assert_float_eq!(rslt.z().as_slice(), [1., 0., 0.5].as_ref(), abs_all <= 1e-6);
    }
}

#[test]
fn test_supermann2()
{
    init_logger();

    let eye = DMatrix::identity(4, 4);
    let prox = ProxDist {n: 4, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[3., -3., 0.2, -0.1]);
    let set = || SetCartesian::new(vec![
        Box::new(SetBox::new(-2., 2.)),
        Box::new(SetBox::new(-2., 2.)),
    ]);
    let set_dims = |mut c: SetCartesian| {
        let b0: &mut [f64] = &mut [0.; 2];
        let b1: &mut [f64] = &mut [0.; 2];
        c.proj_blocks(&mut [b0, b1]).unwrap();
        c
    };

    let s = ChambollePock::new().par(|p| {
        p.eps_acc = 1e-8;
    });
    let rslt_cp = s.solve((&prox, &op_l, set_dims(set())), &x0, &DVector::zeros(4), &DVector::zeros(4)).unwrap();

    let s = SuperMann::new()
        .par(|p| {
            p.eps_acc = 1e-8;
        })
        .sm_par(|p| {
            p.direction = Direction::Broyden;
        });
    let rslt_sm = s.solve((&prox, &op_l, set_dims(set())), &x0, &DVector::zeros(4), &DVector::zeros(4)).unwrap();

    assert_eq!(rslt_cp.status(), SolverStatus::Converged);
    assert_eq!(rslt_sm.status(), SolverStatus::Converged);
    assert_float_eq!(rslt_cp.z().as_slice(), [2., -2., 0.2, -0.1].as_ref(), abs_all <= 1e-5);
    assert_float_eq!(rslt_sm.z().as_slice(), rslt_cp.z().as_slice(), abs_all <= 1e-5);
}

#[test]
fn test_supermann3()
{
    init_logger();

    let eye = DMatrix::identity(2, 2);
    let prox = ProxDist {n: 2, lambda: 0.9};
    let op_l = MatOp::new(&eye);
    let x0 = vec(&[1., 1.]);

    let rslt = SuperMann::new().sm_par(|p| p.memory = 0)
        .solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(2), &DVector::zeros(2));
    assert_eq!(rslt.unwrap_err(), SolverError::InvalidParam);

    let rslt = SuperMann::new().sm_par(|p| p.c0 = 1.)
        .solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(2), &DVector::zeros(2));
    assert_eq!(rslt.unwrap_err(), SolverError::InvalidParam);
}

#[test]
fn test_supermann4()
{
    init_logger();

    // alpha |L| close to one: the A-norm residual drops below eps_acc
    // well before the Chambolle-Pock residual does
    let l = DMatrix::<f64>::identity(3, 3) * 10.;
    let prox = ProxDist {n: 3, lambda: 0.099};
    let op_l = MatOp::new(&l);
    let x0 = vec(&[1., -2., 0.5]);
    let par = |p: &mut SolverParam| {
        p.eps_acc = 1e-6;
        p.max_iter = 3000;
    };

    let rslt_cp = ChambollePock::new().par(par)
        .solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3)).unwrap();
    assert_eq!(rslt_cp.status(), SolverStatus::Converged);

    for dir in [Direction::Anderson, Direction::Broyden] {
        let rslt = SuperMann::new().par(par)
            .sm_par(|p| p.direction = dir)
            .solve((&prox, &op_l, ConeRPos::new()), &x0, &DVector::zeros(3), &DVector::zeros(3)).unwrap();

        assert_eq!(rslt.status(), SolverStatus::Converged);
        assert!(rslt.iter() <= rslt_cp.iter());

        let (z, _) = rslt.into_parts();
        assert_float_eq!(z.as_slice(), [1., 0., 0.5].as_ref(), abs_all <= 1e-5);
    }
}
