mod common;

use chrono::TimeDelta;
use usage_synth::error::Error;
use usage_synth::io::series_csv::{export_series_csv, load_series_csv, read_series_csv};
use usage_synth::series::shaper::SUPPRESSION_LEN;
use usage_synth::series::{SeriesSummary, SeriesVariant, generate, generate_series};

use common::{date, default_params, rng};

#[test]
fn default_run_has_two_peaks_and_suppressed_tail() {
    for seed in 0..20 {
        let points = generate(date(2024, 11, 1), date(2024, 12, 30), 100, 100, &mut rng(seed))
            .expect("generation should succeed");
        assert_eq!(points.len(), 100);

        let saturated = points.iter().filter(|p| p.is_saturated_denial()).count();
        assert!(
            (6..=12).contains(&saturated),
            "seed {seed}: expected 6..=12 saturated denial rows, got {saturated}"
        );

        let summary = SeriesSummary::from_points(&points);
        assert_eq!(summary.peak_runs.len(), 2, "seed {seed}: {:?}", summary.peak_runs);
        for run in &summary.peak_runs {
            assert!((3..=6).contains(&run.len), "seed {seed}: run {run:?}");
        }

        let after = summary
            .max_usage_after_last_run(&points, SUPPRESSION_LEN)
            .expect("samples follow the second run");
        assert!(after < 100, "seed {seed}: suppression window reached capacity");
    }
}

#[test]
fn usage_stays_within_capacity_and_denials_only_in_runs() {
    let series = generate_series(&default_params(), &mut rng(9)).unwrap();
    for p in &series.points {
        assert_eq!(p.capacity, 100);
        assert!(p.usage <= p.capacity);
        if p.denial_count > 0 {
            assert_eq!(p.usage, p.capacity);
            assert!((3..=5).contains(&p.denial_count));
        }
    }
}

#[test]
fn dates_are_evenly_spaced_between_endpoints() {
    let points = generate(date(2024, 11, 1), date(2024, 12, 30), 100, 100, &mut rng(1)).unwrap();
    assert_eq!(points[0].date, date(2024, 11, 1).and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(points[99].date, date(2024, 12, 30).and_hms_opt(0, 0, 0).unwrap());

    let gaps: Vec<TimeDelta> = points.windows(2).map(|w| w[1].date - w[0].date).collect();
    let min = gaps.iter().min().copied().unwrap();
    let max = gaps.iter().max().copied().unwrap();
    assert!(min > TimeDelta::zero());
    assert!(max - min <= TimeDelta::nanoseconds(1));
}

#[test]
fn random_peaks_variant_keeps_runs_apart() {
    let params = default_params().with_variant(SeriesVariant::RandomPeaks);
    for seed in 0..20 {
        let series = generate_series(&params, &mut rng(seed)).unwrap();
        let summary = SeriesSummary::from_points(&series.points);
        assert_eq!(summary.peak_runs.len(), 2, "seed {seed}");
        let [a, b] = [summary.peak_runs[0], summary.peak_runs[1]];
        assert!(b.start >= a.start + 7, "seed {seed}: {a:?} {b:?}");
        assert!(series.points.iter().all(|p| p.usage <= 100));
    }
}

#[test]
fn same_seed_same_series() {
    let a = generate_series(&default_params(), &mut rng(1234)).unwrap();
    let b = generate_series(&default_params(), &mut rng(1234)).unwrap();
    assert_eq!(a.points, b.points);
    assert_eq!(a.peaks, b.peaks);
}

#[test]
fn too_few_points_is_rejected() {
    let err = generate(date(2024, 11, 1), date(2024, 12, 30), 100, 16, &mut rng(0)).unwrap_err();
    assert!(matches!(err, Error::InvalidParams(_)), "got {err:?}");
}

#[test]
fn reversed_dates_are_rejected() {
    let err = generate(date(2024, 12, 30), date(2024, 11, 1), 100, 100, &mut rng(0)).unwrap_err();
    assert!(matches!(err, Error::InvalidParams(_)), "got {err:?}");
}

#[test]
fn written_file_reloads_to_the_same_points() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generated_graph_data.csv");

    let points = generate(date(2024, 11, 1), date(2024, 12, 30), 100, 100, &mut rng(5)).unwrap();
    export_series_csv(&points, &path).unwrap();
    let reloaded = load_series_csv(&path).unwrap();
    assert_eq!(reloaded, points);

    let daily = generate(date(2024, 11, 1), date(2024, 11, 30), 50, 30, &mut rng(5)).unwrap();
    export_series_csv(&daily, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Date,Quantity,Usage,Denial\n2024-11-01,50,"));
    assert_eq!(load_series_csv(&path).unwrap(), daily);
}

#[test]
fn reload_fails_fast_on_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.csv");
    std::fs::write(&path, "Date,Usage\n2024-11-01,3\n").unwrap();

    let err = load_series_csv(&path).unwrap_err();
    match err {
        Error::MissingColumns(cols) => assert_eq!(cols, vec!["Quantity", "Denial"]),
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn summary_of_reloaded_file_with_huge_denials() {
    let csv = "Date,Quantity,Usage,Denial\n2024-11-01,10,10,4294967295\n2024-11-02,10,10,4294967295\n";
    let points = read_series_csv(csv.as_bytes()).unwrap();
    let summary = SeriesSummary::from_points(&points);
    assert_eq!(summary.total_denials, 2 * u64::from(u32::MAX));
    assert_eq!(summary.peak_runs.len(), 1);
    assert_eq!(summary.peak_runs[0].denials, summary.total_denials);
}
