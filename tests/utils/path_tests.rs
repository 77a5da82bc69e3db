use super::*;
use foehn_analysis::Stage;
use itertools::Itertools;
use metfor::Quantity;

pub fn test_pressure_monotonic(anal: &FoehnAnalysis) {
    for seg in anal.path().segments() {
        for (a, b) in seg.samples().iter().tuple_windows() {
            if seg.stage().is_ascent() {
                assert!(b.pressure < a.pressure, "{}: {:?} -> {:?}", seg.stage(), a, b);
            } else {
                assert!(b.pressure > a.pressure, "{}: {:?} -> {:?}", seg.stage(), a, b);
            }
        }
    }

    let lcl = anal.windward_lcl().pressure;
    assert!(lcl <= anal.windward_surface().pressure);
    assert!(lcl >= anal.summit().pressure);

    let lee_lcl = anal.leeward_lcl().pressure;
    assert!(lee_lcl >= anal.summit().pressure);
    assert!(lee_lcl <= anal.leeward_surface().pressure);
}

pub fn test_mixing_ratio_non_increasing(anal: &FoehnAnalysis) {
    for (a, b) in anal.path().samples().tuple_windows() {
        assert!(
            b.mixing_ratio <= a.mixing_ratio + 1.0e-9,
            "{:?} -> {:?}",
            a,
            b
        );
    }
}

pub fn test_saturation_by_stage(anal: &FoehnAnalysis) {
    for seg in anal.path().segments() {
        for pcl in seg.samples() {
            if seg.stage().is_saturated() {
                assert!(pcl.is_saturated(1.0e-9), "{}: {:?}", seg.stage(), pcl);
            } else {
                assert!(pcl.dew_point <= pcl.temperature, "{}: {:?}", seg.stage(), pcl);
            }
        }
    }

    // Past the leeward cloud base the parcel only dries.
    let dry_descent = anal.path().segment(Stage::DryDescent);
    for pcl in dry_descent.samples() {
        assert_eq!(pcl.mixing_ratio, dry_descent.first().mixing_ratio);
    }
}

pub fn test_stages_contiguous(anal: &FoehnAnalysis) {
    for (a, b) in anal.path().segments().iter().tuple_windows() {
        assert_eq!(a.last(), b.first());
    }

    assert_eq!(anal.path().segment(Stage::DryAscent).first(), anal.windward_surface());
    assert_eq!(anal.path().segment(Stage::DryDescent).last(), anal.leeward_surface());
}

pub fn test_leeward_dew_point_round_trip(anal: &FoehnAnalysis) {
    let lcl = anal.leeward_lcl();
    let sfc = anal.leeward_surface();

    let mw = metfor::mixing_ratio(lcl.dew_point, lcl.pressure).unwrap();
    let dp = metfor::dew_point_from_p_and_mw(sfc.pressure, mw).unwrap();

    assert!(approx_equal(dp.unpack(), sfc.dew_point.unpack(), 0.05));
}

pub fn test_warmer_and_drier(anal: &FoehnAnalysis) {
    let windward = anal.windward_surface();
    let leeward = anal.leeward_surface();

    assert!(leeward.temperature.unpack() >= windward.temperature.unpack() - 0.1);
    assert!(leeward.dew_point.unpack() <= windward.dew_point.unpack() + 0.1);
    let windward_rh = windward.relative_humidity().unwrap();
    assert!(anal.leeward_relative_humidity() <= windward_rh + 0.5);
}
