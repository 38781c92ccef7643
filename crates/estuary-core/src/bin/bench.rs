/// Pure Rust integrator benchmarks for the estuary model.
///
/// Uses std::time::Instant for timing and std::hint::black_box to prevent
/// dead-code elimination. Each case is run `REPEATS` times after a warmup
/// and the median is reported.
use std::hint::black_box;
use std::time::{Duration, Instant};

use estuary_core::config::RunConfig;
use estuary_core::estuary::params::ModelParameters;
use estuary_core::estuary::run::EstuaryModel;
use estuary_core::estuary::state::Concentrations;
use estuary_core::forcing::Tide;

const REPEATS: usize = 7;

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn bench_model(
    label: &'static str,
    tide: Tide,
    runs: &[(f64, f64)],
) -> Vec<(&'static str, usize, Duration)> {
    let params = ModelParameters::default().with_tide(tide);
    let Ok(model) = EstuaryModel::new(params, Concentrations::default()) else {
        eprintln!("{label}: invalid default parameters");
        return Vec::new();
    };
    let mut results = Vec::new();

    for &(dt, end) in runs {
        let config = RunConfig::new(dt, end, 48.0);

        // Warmup
        let rows = match black_box(model.run(&config)) {
            Ok(t) => t.len(),
            Err(e) => {
                eprintln!("{label}: {e}");
                continue;
            }
        };

        let dur = median_time(|| {
            let _ = black_box(model.run(&config));
        });
        results.push((label, rows, dur));
    }
    results
}

fn main() {
    println!("Estuary Integrator Benchmarks");
    println!("============================================================");
    println!("{:<18} {:>8}   {:>12}", "Case", "Rows", "Median (ms)");
    println!("--------------------------------------------");

    let runs = [(1.0, 1000.0), (0.1, 1000.0), (0.1, 24.0 * 365.0)];

    let mut all_results: Vec<(&str, usize, Duration)> = Vec::new();
    all_results.extend(bench_model("no_tide", Tide::None, &runs));
    all_results.extend(bench_model("semidiurnal", Tide::semidiurnal(), &runs));

    for (case, n, dur) in &all_results {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<18} {:>8}      {:>8.2}", case, n, ms);
    }

    println!("============================================================");
}
