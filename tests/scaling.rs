use float_eq::assert_float_eq;
use nalgebra::DVector;
use cpasocp::prelude::*;

mod common;
use common::*;

//

#[test]
fn test_scaling1()
{
    init_logger();

    let n = 10;
    let mut ocp = stacked_cone_problem(n);
    let x0 = vec(&[0.5, -0.3]);
    let z0 = DVector::zeros(ocp.n_z());
    let eta0 = DVector::zeros(ocp.n_l());
    let scaling = DVector::from_element(ocp.n_z(), 2.);

    let rslt_ref = ocp.chambolle_pock(1e-6, &x0, &z0, &eta0).unwrap();
    let rslt = ocp.chambolle_pock_scaling(1e-6, &x0, &z0, &eta0, &scaling).unwrap();

    assert_eq!(rslt_ref.status(), SolverStatus::Converged);
    assert_eq!(rslt.status(), SolverStatus::Converged);
    assert_float_eq!(rslt.z().as_slice(), rslt_ref.z().as_slice(), abs_all <= 1e-3);

    // inputs stay nonnegative
    for t in 0.. n {
        for e in rslt.z().rows(t * 4 + 2, 2).iter() {
            assert!(*e >= -1e-3);
        }
    }
}

#[test]
fn test_scaling2()
{
    init_logger();

    let n = 10;
    let mut ocp = stacked_cone_problem(n);
    let x0 = vec(&[0.5, -0.3]);
    let z0 = DVector::zeros(ocp.n_z());
    let eta0 = DVector::zeros(ocp.n_l());
    let scaling = DVector::from_element(ocp.n_z(), 2.);

    let rslt_ref = ocp.admm(1e-6, &x0, &z0, &eta0).unwrap();
    let rslt = ocp.admm_scaling(1e-6, &x0, &z0, &eta0, &scaling).unwrap();

    assert_eq!(rslt_ref.status(), SolverStatus::Converged);
    assert_eq!(rslt.status(), SolverStatus::Converged);
    assert!(rslt.residuals().iter().all(|r| r.gap.is_none()));
    assert_float_eq!(rslt.z().as_slice(), rslt_ref.z().as_slice(), abs_all <= 1e-3);
}

#[test]
fn test_scaling3()
{
    init_logger();

    let mut ocp = stacked_cone_problem(5);
    let x0 = vec(&[0.5, -0.3]);
    let z0 = DVector::zeros(ocp.n_z());
    let eta0 = DVector::zeros(ocp.n_l());

    let mut scaling = DVector::from_element(ocp.n_z(), 1.);
    scaling[3] = 0.;
    let rslt = ocp.chambolle_pock_scaling(1e-6, &x0, &z0, &eta0, &scaling);
    assert_eq!(rslt.unwrap_err(), SolverError::InvalidScaling);

    scaling[3] = -1.;
    let rslt = ocp.admm_scaling(1e-6, &x0, &z0, &eta0, &scaling);
    assert_eq!(rslt.unwrap_err(), SolverError::InvalidScaling);

    let short = DVector::from_element(ocp.n_z() - 1, 1.);
    let rslt = ocp.chambolle_pock_scaling(1e-6, &x0, &z0, &eta0, &short);
    assert_eq!(rslt.unwrap_err(), SolverError::DimensionMismatch);

    // n_L != n_z
    let mut ocp = sum_problem(5);
    let z0 = DVector::zeros(ocp.n_z());
    let eta0 = DVector::zeros(ocp.n_l());
    let scaling = DVector::from_element(ocp.n_z(), 1.);
    let rslt = ocp.chambolle_pock_scaling(1e-6, &x0, &z0, &eta0, &scaling);
    assert_eq!(rslt.unwrap_err(), SolverError::DimensionMismatch);
}
