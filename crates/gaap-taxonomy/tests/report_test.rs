use gaap_core::TaxonomyConfig;
use gaap_taxonomy::report::{Frequency, ReportAnalyzer, ReportType};
use gaap_taxonomy::{TaxonomyLoader, TaxonomyTable};
use std::path::{Path, PathBuf};

fn fixture_config() -> TaxonomyConfig {
    TaxonomyConfig {
        root_dir: Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("us-gaap-2025"),
        ..TaxonomyConfig::default()
    }
}

fn load_fixture(config: &TaxonomyConfig) -> TaxonomyTable {
    TaxonomyLoader::from_config(config)
        .expect("create loader")
        .load()
        .expect("load fixture taxonomy")
}

#[test]
fn test_presentation_path_points_at_fixture() {
    let config = fixture_config();
    let path: PathBuf = config.presentation_path("bc");
    assert!(path.is_file(), "{}", path.display());
}

#[test]
fn test_balance_sheet_metrics() {
    let config = fixture_config();
    let table = load_fixture(&config);
    let analyzer = ReportAnalyzer::new(&table, &config);

    let metrics: Vec<String> = analyzer
        .extract_metrics("bc")
        .expect("extract metrics")
        .iter()
        .map(ToString::to_string)
        .collect();

    // Both presentation links are read, duplicates and the dei concept dropped.
    assert_eq!(
        metrics,
        vec!["Assets", "AssetsCurrent", "StatementOfFinancialPositionAbstract"]
    );
}

#[test]
fn test_full_analysis() {
    let config = fixture_config();
    let table = load_fixture(&config);
    let analysis = ReportAnalyzer::new(&table, &config)
        .run()
        .expect("run analysis");

    assert_eq!(analysis.gaap_version, "2025");
    assert_eq!(analysis.summary.len(), 2);

    let annual = &analysis.summary[&ReportType::AnnualReport];
    assert_eq!(annual.total_metrics, 4);
    assert_eq!(annual.unique_metrics, 4);
    assert_eq!(annual.sections["Balance Sheet"], 3);
    assert_eq!(annual.sections["Research Development"], 1);

    let quarterly = &analysis.summary[&ReportType::QuarterlyReport];
    assert_eq!(quarterly.total_metrics, 3);
    assert_eq!(quarterly.frequency, Frequency::Quarterly);

    let overlap = analysis
        .common_metrics
        .annual_and_quarterly
        .as_ref()
        .expect("10-K and 10-Q overlap");
    assert_eq!(overlap.count, 1);
    assert_eq!(overlap.metrics[0].as_str(), "Assets");
    assert_eq!(
        analysis.common_metrics.all_reports.as_ref().map(|all| all.count),
        Some(1)
    );

    assert_eq!(
        analysis.detailed_metrics.keys().copied().collect::<Vec<_>>(),
        vec![ReportType::AnnualReport, ReportType::QuarterlyReport]
    );
}

#[test]
fn test_labels_come_from_table() {
    let config = fixture_config();
    let table = load_fixture(&config);
    let report_metrics = ReportAnalyzer::new(&table, &config)
        .analyze()
        .expect("analyze");

    let quarterly = &report_metrics[&ReportType::QuarterlyReport];
    let label = |name: &str| {
        quarterly
            .iter()
            .find(|metric| metric.metric_name.as_str() == name)
            .map(|metric| metric.label.clone())
    };

    assert_eq!(
        label("AccumulatedOtherComprehensiveIncomeLossNetOfTax"),
        Some(Some(
            "Accumulated Other Comprehensive Income (Loss), Net of Tax".to_string()
        ))
    );
    // Presented but not declared in the fixture schema.
    assert_eq!(label("ProfitLoss"), Some(None));
}

#[test]
fn test_analysis_json_shape() {
    let config = fixture_config();
    let table = load_fixture(&config);
    let analysis = ReportAnalyzer::new(&table, &config)
        .run()
        .expect("run analysis");

    let json = serde_json::to_value(&analysis).expect("serialize analysis");
    assert_eq!(json["summary"]["10-K"]["frequency"], "Annual");
    assert_eq!(json["summary"]["10-Q"]["sections"]["Net Income Summary"], 3);
    assert_eq!(json["detailed_metrics"]["10-K"]["report_type"], "10-K");
    assert_eq!(
        json["detailed_metrics"]["10-K"]["sections"]["Research Development"][0]["metric_name"],
        "ResearchAndDevelopmentExpense"
    );
    assert_eq!(json["common_metrics"]["all_reports"]["metrics"][0], "Assets");
}
