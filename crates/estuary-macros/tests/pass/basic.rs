use estuary_macros::Timeseries;

#[derive(Debug, Clone, Copy, PartialEq, Timeseries)]
pub struct Sample {
    pub time: f64,
    pub salinity: f64,
    pub oxygen: f64,
}

fn main() {
    let r = Sample { time: 1.0, salinity: 35.0, oxygen: 231.2 };
    let mut ts = SampleTimeseries::with_capacity(10);
    assert!(ts.is_empty());
    ts.push(&r);
    assert_eq!(ts.len(), 1);
    assert_eq!(ts.row(0), Some(r));
    assert_eq!(ts.row(1), None);
    assert_eq!(ts.column("salinity"), Some(&[35.0][..]));
    assert_eq!(ts.column("nitrogen"), None);
    assert_eq!(Sample::column_names(), &["time", "salinity", "oxygen"]);
    let names: Vec<&str> = ts.columns().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["time", "salinity", "oxygen"]);
}
