use estuary_macros::Timeseries;

#[derive(Debug, Clone, Copy, Timeseries)]
#[timeseries(name = "Tidal")]
pub struct TidalRow {
    pub time: f64,
    pub tidal_height: f64,
}

fn main() {
    let r = TidalRow { time: 0.5, tidal_height: 5.0 };
    let mut ts = Tidal::with_capacity(5);
    ts.push(&r);
    assert_eq!(ts.len(), 1);
    assert_eq!(ts.tidal_height, vec![5.0]);
    assert_eq!(TidalRow::column_names(), &["time", "tidal_height"]);
}
