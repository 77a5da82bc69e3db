use foehn_analysis::{compute_fohn_profile, FoehnAnalysis};
use metfor::{Celsius, HectoPascal};

pub mod path_tests;

#[allow(unused_macros)] // False alarm
macro_rules! test_scenario {
    ($test_mod_name:ident, $p:expr, $t:expr, $td:expr, $summit:expr) => {
        mod $test_mod_name {
            use crate::utils::{self, path_tests};
            use foehn_analysis::FoehnAnalysis;

            fn load_data() -> FoehnAnalysis {
                utils::analyze($p, $t, $td, $summit)
            }

            #[test]
            fn pressure_monotonic() {
                path_tests::test_pressure_monotonic(&load_data());
            }

            #[test]
            fn mixing_ratio_non_increasing() {
                path_tests::test_mixing_ratio_non_increasing(&load_data());
            }

            #[test]
            fn saturation_by_stage() {
                path_tests::test_saturation_by_stage(&load_data());
            }

            #[test]
            fn stages_contiguous() {
                path_tests::test_stages_contiguous(&load_data());
            }

            #[test]
            fn leeward_dew_point_round_trip() {
                path_tests::test_leeward_dew_point_round_trip(&load_data());
            }

            #[test]
            fn warmer_and_drier() {
                path_tests::test_warmer_and_drier(&load_data());
            }

            #[test]
            fn idempotent() {
                assert_eq!(load_data(), load_data());
            }
        }
    };
}

#[allow(dead_code)] // False alarm, used in macro expansion.
pub fn analyze(p: f64, t: f64, td: f64, summit: f64) -> FoehnAnalysis {
    compute_fohn_profile(
        HectoPascal(p),
        Celsius(t),
        Celsius(td),
        HectoPascal(summit),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    assert!(tol > 0.0);

    f64::abs(tgt - guess) <= tol
}
