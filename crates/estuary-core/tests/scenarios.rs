//! End-to-end runs through the public API.

use std::io::Write;

use estuary_core::estuary::processes::biological_production;
use estuary_core::{
    Concentrations, EstuaryError, EstuaryModel, ModelParameters, RunConfig, Scenario,
    StateDerivative, StateVector, Tide,
};

fn assert_approx(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {expected} ± {tol}, got {actual}"
    );
}

fn model(params: ModelParameters) -> EstuaryModel {
    EstuaryModel::new(params, Concentrations::default()).unwrap()
}

#[test]
fn closed_estuary_holds_volume_and_salinity() {
    let params = ModelParameters {
        initial_volume: 1e9,
        depth: 5.0,
        ocean_salinity: 35.0,
        ocean_nitrogen: 20.0,
        ocean_oxygen: 231.2,
        river_oxygen: 231.2,
        river_flow_fraction: 0.0,
        tide: Tide::None,
        ..Default::default()
    };
    let t = model(params).run(&RunConfig::new(1.0, 1000.0, 48.0)).unwrap();

    assert_eq!(t.len(), 1001);
    for (&v, &s) in t.volume.iter().zip(&t.salinity) {
        assert_eq!(v, 0.0);
        assert_approx(s, 35.0, 1e-9);
    }
}

#[test]
fn row_count_and_final_time() {
    let t = model(ModelParameters::default())
        .run(&RunConfig::new(1.0, 240.0, 48.0))
        .unwrap();
    assert_eq!(t.len(), 241);
    assert_eq!(t.last().map(|r| r.time), Some(240.0));
}

#[test]
fn first_step_matches_hand_computation() {
    let m = model(ModelParameters::default());
    let t = m.run(&RunConfig::new(1.0, 1.0, 48.0)).unwrap();
    assert_eq!(t.len(), 2);

    // River only removes salt: S1 = 35 - 0.05 * 35.
    assert_approx(t.salinity[1], 33.25, 1e-9);

    // Derivative evaluated at the end of the step, t = 1.
    let area = 2e8;
    let j = biological_production(1.0, 1.0, 1.0);
    let river = 0.05 * 1e9;
    let n1 = (20e9 - j * area - river * (20.0 - 100.0)) / 1e9;
    assert_approx(t.nitrogen[1], n1, 1e-9);
}

#[test]
fn outputs_never_negative() {
    let cases = [
        ModelParameters::default(),
        ModelParameters::default().with_tide(Tide::semidiurnal()),
        ModelParameters {
            river_flow_fraction: 0.5,
            river_nitrogen: 0.0,
            gas_exchange_rate: 1.0,
            productivity_factor: 2.0,
            ..Default::default()
        }
        .with_tide(Tide::semidiurnal()),
        ModelParameters {
            river_flow_fraction: 0.0,
            gas_exchange_rate: 1.0,
            productivity_factor: 2.0,
            ..Default::default()
        },
    ];
    let config = RunConfig::new(1.0, 24.0 * 42.0, 48.0);

    for params in cases {
        let m = model(params);
        let raw = m.run_raw(&config).unwrap();
        for s in &raw.states {
            assert!(s.to_array().iter().all(|&x| x >= 0.0), "{s:?}");
        }
        let t = m.run(&config).unwrap();
        for col in [&t.salinity, &t.nitrogen, &t.oxygen, &t.tidal_height] {
            assert!(col.iter().all(|&x| x >= 0.0));
        }
    }
}

#[test]
fn upwind_source_follows_flow_sign() {
    // Internal chemistry disjoint from the ocean's.
    let inside = Concentrations::new(7.0, 90.0, 40.0);
    let quiet = ModelParameters {
        river_flow_fraction: 0.0,
        gas_exchange_rate: 0.0,
        productivity_factor: 0.0,
        ..Default::default()
    };
    let y = StateVector::from_concentrations(quiet.initial_volume, &inside);

    let flood = EstuaryModel::new(
        quiet.clone().with_tide(Tide::Constant { value: 0.1 }),
        inside,
    )
    .unwrap();
    let dy = flood.derivative(&y, 2.0, 1.0);
    assert_approx(dy.salt / dy.volume, 35.0, 1e-9);
    assert_approx(dy.nitrogen / dy.volume, 20.0, 1e-9);
    assert_approx(dy.oxygen / dy.volume, 231.2, 1e-9);

    let ebb = EstuaryModel::new(quiet.with_tide(Tide::Constant { value: -0.1 }), inside).unwrap();
    let dy = ebb.derivative(&y, 2.0, 1.0);
    assert_approx(dy.salt / dy.volume, 7.0, 1e-9);
    assert_approx(dy.nitrogen / dy.volume, 90.0, 1e-9);
    assert_approx(dy.oxygen / dy.volume, 40.0, 1e-9);
}

#[test]
fn identical_inputs_give_identical_trajectories() {
    let params = ModelParameters::default().with_tide(Tide::semidiurnal());
    let config = RunConfig::new(0.25, 240.0, 48.0);
    let a = model(params.clone()).run(&config).unwrap();
    let b = model(params).run(&config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn spinup_gating_reproducible_from_output() {
    let params = ModelParameters::default().with_tide(Tide::semidiurnal());
    let t = model(params).run(&RunConfig::new(1.0, 240.0, 48.0)).unwrap();

    // Row k was produced by the step that started at time[k - 1].
    for k in 1..t.len() {
        let started = t.time[k - 1];
        let expected = if started > 48.0 {
            let lo = k.saturating_sub(24);
            let window = &t.nitrogen[lo..k];
            window.iter().sum::<f64>() / window.len() as f64 / 20.0
        } else {
            1.0
        };
        assert_approx(t.productivity_scale[k], expected, 1e-12);
    }
}

#[test]
fn fractional_step_window_rounds_up() {
    // dt = 5 h averages ceil(24 / 5) = 5 rows.
    let t = model(ModelParameters::default())
        .run(&RunConfig::new(5.0, 100.0, 10.0))
        .unwrap();
    let k = 5; // step starting at t = 20
    let window = &t.nitrogen[0..k];
    let expected = window.iter().sum::<f64>() / 5.0 / 20.0;
    assert_approx(t.productivity_scale[k], expected, 1e-12);
}

#[test]
fn runs_are_thread_safe() {
    let m = model(ModelParameters::default().with_tide(Tide::semidiurnal()));
    let config = RunConfig::new(1.0, 200.0, 48.0);
    let reference = m.run(&config).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| m.run(&config).unwrap())).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), reference);
        }
    });
}

#[test]
fn scenario_file_drives_a_run() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
        f,
        r#"{{
            "parameters": {{
                "river_flow_fraction": 0.1,
                "tide": {{ "kind": "semidiurnal", "amplitude": 0.5, "period_hours": 12.45 }}
            }},
            "initial": {{ "salinity": 30.0 }},
            "run": {{ "time_step_hours": 0.5, "end_time_hours": 48.0 }}
        }}"#
    )
    .unwrap();

    let s = Scenario::from_path(f.path()).unwrap();
    let m = s.build().unwrap();
    assert!(m.has_tides());
    assert_eq!(m.initial_conditions().nitrogen, 20.0);

    let t = s.execute().unwrap();
    assert_eq!(t.len(), 97);
    assert_eq!(t.salinity[0], 30.0);
    // Tidal height oscillates around the mean depth.
    assert!(t.tidal_height.iter().any(|&z| z > 5.0));
    assert!(t.tidal_height.iter().any(|&z| z < 5.0));
}

#[test]
fn invalid_inputs_are_rejected() {
    let err = EstuaryModel::new(
        ModelParameters {
            initial_volume: -1.0,
            ..Default::default()
        },
        Concentrations::default(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "initial_volume = -1 must be positive");

    let m = model(ModelParameters::default());
    assert!(matches!(
        m.run(&RunConfig::new(1.0, f64::INFINITY, 0.0)),
        Err(EstuaryError::NonFinite { .. })
    ));
}

#[test]
fn summary_flags_hypoxia() {
    // No gas exchange and doubled productivity: night-time respiration
    // draws oxygen down with nothing to replace it.
    let params = ModelParameters {
        river_flow_fraction: 0.0,
        gas_exchange_rate: 0.0,
        productivity_factor: 2.0,
        ..Default::default()
    };
    let m = EstuaryModel::new(params, Concentrations::new(35.0, 20.0, 61.0)).unwrap();
    let t = m.run(&RunConfig::new(1.0, 240.0, 48.0)).unwrap();
    let summary = t.summary(48.0);
    assert_eq!(summary.rows, 241);
    assert!(summary.oxygen.min < 60.0);
    assert!(summary.hypoxic_hours > 0.0);
    assert!(summary.hypoxic_hours <= 192.0);
}

#[test]
fn drained_estuary_goes_non_finite_after_collapse() {
    // A steady ebb of 1 m/hr empties the 5 m deep basin in exactly five hours.
    let params = ModelParameters {
        river_flow_fraction: 0.0,
        ..Default::default()
    }
    .with_tide(Tide::Constant { value: -1.0 });
    let t = model(params.clone())
        .run(&RunConfig::new(1.0, 10.0, 0.0))
        .unwrap();
    assert_eq!(t.len(), 11);

    for k in 0..5 {
        let row = t.row(k).unwrap();
        assert_approx(row.tidal_height, 5.0 - k as f64, 1e-9);
        for x in [row.salinity, row.nitrogen, row.oxygen, row.productivity_scale] {
            assert!(x.is_finite(), "row {k}: {row:?}");
        }
    }
    for k in 5..11 {
        assert_eq!(t.volume[k], -100.0);
        assert_eq!(t.tidal_height[k], 0.0);
    }

    // Salt and oxygen leave with the water; nitrogen from respiration remains.
    assert!(t.salinity[5].is_nan());
    assert!(t.oxygen[5].is_nan());
    assert!(t.nitrogen[5].is_infinite());

    // The feedback factor picks up the collapse one step later.
    assert!(t.productivity_scale[5].is_finite());
    assert!(t.productivity_scale[6].is_infinite());
    assert!(t.productivity_scale[7..].iter().all(|p| p.is_nan()));
    assert!(t.salinity[6..].iter().all(|s| s.is_nan()));

    // Still inside spin-up, the factor stays at 1.0 throughout.
    let gated = model(params).run(&RunConfig::new(1.0, 10.0, 48.0)).unwrap();
    assert!(gated.productivity_scale.iter().all(|&p| p == 1.0));
    assert!(gated.nitrogen[5].is_infinite());
}

#[test]
fn failing_tide_function_reports_its_first_error() {
    let (tide, errors) = Tide::fallible(|hours: f64| {
        if hours < 3.0 {
            Ok(Tide::semidiurnal().evaluate(hours))
        } else {
            Err(format!("gauge offline at hour {hours}"))
        }
    });
    let m = model(ModelParameters::default().with_tide(tide));
    assert!(m.has_tides());
    assert!(errors.take().is_none());

    let t = m.run(&RunConfig::new(1.0, 6.0, 48.0)).unwrap();
    assert_eq!(t.len(), 7);
    assert!(t.volume[..3].iter().all(|v| v.is_finite()));
    assert!(t.volume[3..].iter().all(|v| v.is_nan()));
    assert_eq!(errors.take().as_deref(), Some("gauge offline at hour 3"));
}
