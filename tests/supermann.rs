use float_eq::assert_float_eq;
use nalgebra::DVector;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256StarStar;
use cpasocp::prelude::*;

mod common;
use common::*;

//

#[test]
fn test_supermann1()
{
    init_logger();

    let n = 10;
    let mut ocp = stacked_problem(n, 0.1);
    let x0 = vec(&[0.5, -0.3]);
    let z0 = DVector::zeros(ocp.n_z());
    let eta0 = DVector::zeros(ocp.n_l());

    let rslt_cp = ocp.chambolle_pock(1e-6, &x0, &z0, &eta0).unwrap();
    assert_eq!(rslt_cp.status(), SolverStatus::Converged);

    for direction in [Direction::Anderson, Direction::Broyden] {
        let sm_par = SuperMannParam {
            direction,
            .. SuperMannParam::default()
        };
        let rslt = ocp.chambolle_pock_supermann(1e-6, &x0, &z0, &eta0, sm_par).unwrap();

        assert_eq!(rslt.status(), SolverStatus::Converged);
        assert_eq!(rslt.iter(), rslt.residuals().len());
        assert!(rslt.iter() <= rslt_cp.iter());
        assert_float_eq!(rslt.z().as_slice(), rslt_cp.z().as_slice(), abs_all <= 1e-3);
    }
}

#[test]
fn test_supermann2()
{
    init_logger();

    let mut rng = Xoshiro256StarStar::seed_from_u64(4);

    for _ in 0.. 5 {
        let mut ocp = random_problem(&mut rng, 6, 3, 2, 4, 2);
        let x0 = DVector::from_fn(3, |_, _| rng.gen_range(-1.0..1.0));
        let z0 = DVector::zeros(ocp.n_z());
        let eta0 = DVector::zeros(ocp.n_l());
        let z_ref = dense_lq_of(&ocp, &x0);

        let rslt_cp = ocp.chambolle_pock(1e-7, &x0, &z0, &eta0).unwrap();
        assert_eq!(rslt_cp.status(), SolverStatus::Converged);

        for direction in [Direction::Anderson, Direction::Broyden] {
            let sm_par = SuperMannParam {
                direction,
                memory: 3,
                .. SuperMannParam::default()
            };
            let rslt = ocp.chambolle_pock_supermann(1e-7, &x0, &z0, &eta0, sm_par).unwrap();

            assert_eq!(rslt.status(), SolverStatus::Converged);
            assert!(rslt.iter() <= rslt_cp.iter());
            assert_float_eq!(rslt.z().as_slice(), z_ref.as_slice(), abs_all <= 1e-4);
        }
    }
}

#[test]
fn test_supermann3()
{
    init_logger();

    let mut ocp = sum_problem(5);
    let x0 = vec(&[0.2, 0.5]);
    let z0 = DVector::zeros(ocp.n_z());
    let eta0 = DVector::zeros(ocp.n_l());

    let bad = [
        SuperMannParam {memory: 0, .. SuperMannParam::default()},
        SuperMannParam {c1: 1.5, .. SuperMannParam::default()},
        SuperMannParam {q: 0., .. SuperMannParam::default()},
        SuperMannParam {beta: 1., .. SuperMannParam::default()},
        SuperMannParam {lambda: 2., .. SuperMannParam::default()},
    ];
    for sm_par in bad {
        let rslt = ocp.chambolle_pock_supermann(1e-6, &x0, &z0, &eta0, sm_par);
        assert_eq!(rslt.unwrap_err(), SolverError::InvalidParam);
    }

    let rslt = ocp.chambolle_pock_supermann(1e-6, &x0, &DVector::zeros(1), &eta0, SuperMannParam::default());
    assert_eq!(rslt.unwrap_err(), SolverError::DimensionMismatch);
}
