//! Filing types and the taxonomy metrics they present.
//!
//! The taxonomy groups its disclosures into presentation linkbases under
//! `dis/`, one per disclosure group code (`bc` for the balance sheet, `ni`
//! for the net income summary, ...). Each group belongs to one filing type.
//! This module reads those linkbases and reports which elements each filing
//! type uses, with their labels from the loaded table.

use crate::{
    error::Result,
    linkbase,
    loader::read_document,
    table::TaxonomyTable,
};
use gaap_core::{ElementName, TaxonomyConfig};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Number of metrics listed as examples for the 10-K / 10-Q overlap.
pub const COMMON_SAMPLE_SIZE: usize = 10;

/// Filing types that disclosure groups belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ReportType {
    /// Annual report
    #[serde(rename = "10-K")]
    AnnualReport,
    /// Quarterly report
    #[serde(rename = "10-Q")]
    QuarterlyReport,
    /// Current report on material events
    #[serde(rename = "8-K")]
    CurrentReport,
    /// Institutional investment manager holdings
    #[serde(rename = "13-F")]
    HoldingsReport,
    /// Insurance statutory accounting
    #[serde(rename = "Insurance-SAP")]
    InsuranceStatutory,
    /// Bank call report
    #[serde(rename = "Bank-Call Report")]
    BankCallReport,
    /// Investment company report
    #[serde(rename = "Investment Company")]
    InvestmentCompany,
    /// Energy industry disclosures
    #[serde(rename = "Energy-Industry")]
    EnergyIndustry,
    /// Healthcare disclosures
    Healthcare,
    /// Credit risk disclosures
    #[serde(rename = "Credit Risk")]
    CreditRisk,
    /// Fair value disclosures
    #[serde(rename = "Fair Value")]
    FairValue,
    /// Derivative disclosures
    Derivative,
    /// Guarantee disclosures
    Guarantee,
    /// Payment system disclosures
    Payment,
}

impl ReportType {
    /// Report types that get a detailed breakdown in [`ReportAnalyzer::run`].
    pub const MAIN: [Self; 4] = [
        Self::AnnualReport,
        Self::QuarterlyReport,
        Self::HoldingsReport,
        Self::CurrentReport,
    ];

    /// Get the form name, e.g. `10-K`.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AnnualReport => "10-K",
            Self::QuarterlyReport => "10-Q",
            Self::CurrentReport => "8-K",
            Self::HoldingsReport => "13-F",
            Self::InsuranceStatutory => "Insurance-SAP",
            Self::BankCallReport => "Bank-Call Report",
            Self::InvestmentCompany => "Investment Company",
            Self::EnergyIndustry => "Energy-Industry",
            Self::Healthcare => "Healthcare",
            Self::CreditRisk => "Credit Risk",
            Self::FairValue => "Fair Value",
            Self::Derivative => "Derivative",
            Self::Guarantee => "Guarantee",
            Self::Payment => "Payment",
        }
    }

    /// How often the report is filed.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        match self {
            Self::QuarterlyReport | Self::HoldingsReport | Self::BankCallReport => {
                Frequency::Quarterly
            }
            Self::CurrentReport => Frequency::EventBased,
            Self::InsuranceStatutory => Frequency::AnnualOrQuarterly,
            Self::InvestmentCompany => Frequency::AnnualOrSemiAnnual,
            _ => Frequency::Annual,
        }
    }

    /// One-line description of the report.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::AnnualReport => {
                "Annual report with complete financial statements and detailed disclosures"
            }
            Self::QuarterlyReport => "Quarterly report updating the primary financial statements",
            Self::CurrentReport => "Current report disclosing material corporate events",
            Self::HoldingsReport => "Holdings report of institutional investment managers",
            Self::InsuranceStatutory => "Statutory accounting report for insurance companies",
            Self::BankCallReport => "Regulatory financial report filed by banks",
            Self::InvestmentCompany => "Report for mutual funds and other investment companies",
            Self::EnergyIndustry => "Disclosures specific to oil, gas and other energy companies",
            Self::Healthcare => "Disclosures specific to healthcare organizations",
            Self::CreditRisk => "Credit risk management disclosures of financial institutions",
            Self::FairValue => "Detailed fair value measurement disclosures",
            Self::Derivative => "Risks and use of derivative financial instruments",
            Self::Guarantee => "Guarantee obligations and contingent liabilities",
            Self::Payment => "Payment processing and financial services disclosures",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Filing frequency of a report type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Frequency {
    /// Once a year
    Annual,
    /// Every quarter
    Quarterly,
    /// Whenever a reportable event occurs
    #[serde(rename = "Event-based")]
    EventBased,
    /// Yearly or quarterly depending on the filer
    #[serde(rename = "Annual/Quarterly")]
    AnnualOrQuarterly,
    /// Yearly or half-yearly depending on the filer
    #[serde(rename = "Annual/Semi-annual")]
    AnnualOrSemiAnnual,
}

/// A disclosure group: one presentation linkbase and the report it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisclosureGroup {
    /// Code in the linkbase file name (`bc` in `us-gaap-dis-bc-pre-2025.xml`)
    pub code: &'static str,
    /// Report the group belongs to
    pub report_type: ReportType,
    /// Section of the report
    pub section: &'static str,
}

const fn group(code: &'static str, report_type: ReportType, section: &'static str) -> DisclosureGroup {
    DisclosureGroup {
        code,
        report_type,
        section,
    }
}

/// Every known disclosure group, in analysis order.
pub const DISCLOSURE_GROUPS: &[DisclosureGroup] = &[
    group("bc", ReportType::AnnualReport, "Balance Sheet"),
    group("ci", ReportType::AnnualReport, "Income Statement"),
    group("cf", ReportType::AnnualReport, "Cash Flow"),
    group("equity", ReportType::AnnualReport, "Equity Statement"),
    group("ap", ReportType::AnnualReport, "Accounting Policies"),
    group("debt", ReportType::AnnualReport, "Debt Disclosure"),
    group("inv", ReportType::AnnualReport, "Investment Disclosure"),
    group("ppe", ReportType::AnnualReport, "Property Plant Equipment"),
    group("eps", ReportType::AnnualReport, "Earnings Per Share"),
    group("inctax", ReportType::AnnualReport, "Income Tax"),
    group("lea", ReportType::AnnualReport, "Lease"),
    group("rd", ReportType::AnnualReport, "Research Development"),
    group("se", ReportType::AnnualReport, "Subsequent Events"),
    group("bsoff", ReportType::QuarterlyReport, "Balance Sheet Summary"),
    group("ni", ReportType::QuarterlyReport, "Net Income Summary"),
    group("ocpfs", ReportType::QuarterlyReport, "Operating Cash Flow Summary"),
    group("schedoi-hold", ReportType::HoldingsReport, "Schedule of Investments Holdings"),
    group("schedoi-sumhold", ReportType::HoldingsReport, "Summary Holdings"),
    group("schedoi-otsh", ReportType::HoldingsReport, "Other Securities Held"),
    group("schedoi-shorthold", ReportType::HoldingsReport, "Short Holdings"),
    group("schedoi-iiaa", ReportType::HoldingsReport, "Investment Adviser Activities"),
    group("schedoi-oocw", ReportType::HoldingsReport, "Other Options Contracts Written"),
    group("schedoi-fednote", ReportType::HoldingsReport, "Federal Note"),
    group("disops", ReportType::CurrentReport, "Discontinued Operations"),
    group("reorg", ReportType::CurrentReport, "Reorganization"),
    group("dise", ReportType::CurrentReport, "Disposal Events"),
    group("fs-ins", ReportType::InsuranceStatutory, "Insurance Financial Statements"),
    group("fs-mort", ReportType::InsuranceStatutory, "Mortgage Insurance"),
    group("fs-bd", ReportType::BankCallReport, "Bank Financial Data"),
    group("fs-bt", ReportType::BankCallReport, "Bank Trading"),
    group("fs-fhlb", ReportType::BankCallReport, "Federal Home Loan Bank"),
    group("invco", ReportType::InvestmentCompany, "Investment Company"),
    group("oi", ReportType::EnergyIndustry, "Oil and Gas"),
    group("regop", ReportType::EnergyIndustry, "Regulated Operations"),
    group("hco", ReportType::Healthcare, "Healthcare Operations"),
    group("crcgen", ReportType::CreditRisk, "Credit Risk General"),
    group("cecl", ReportType::CreditRisk, "Credit Loss"),
    group("fifvd", ReportType::FairValue, "Fair Value Disclosure"),
    group("dr", ReportType::Derivative, "Derivative Risk"),
    group("guar", ReportType::Guarantee, "Guarantees"),
    group("pay", ReportType::Payment, "Payment Systems"),
];

/// Look up a disclosure group by code.
#[must_use]
pub fn disclosure_group(code: &str) -> Option<&'static DisclosureGroup> {
    DISCLOSURE_GROUPS.iter().find(|group| group.code == code)
}

/// One metric presented by a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMetric {
    /// Element name
    pub metric_name: ElementName,
    /// Standard label, absent when the table lacks the element
    pub label: Option<String>,
    /// Disclosure group code
    pub role: &'static str,
    /// Section of the report
    pub section: &'static str,
    /// Report the metric belongs to
    pub report_type: ReportType,
    /// Filing frequency of the report
    pub frequency: Frequency,
}

/// Metrics per report type. Report types without metrics are absent.
pub type ReportMetrics = BTreeMap<ReportType, Vec<ReportMetric>>;

/// Counts for one report type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Metrics across all sections
    pub total_metrics: usize,
    /// Distinct element names
    pub unique_metrics: usize,
    /// Filing frequency
    pub frequency: Frequency,
    /// Metric count per section
    pub sections: BTreeMap<&'static str, usize>,
    /// Report description
    pub description: &'static str,
}

/// Metrics shared by several report types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricIntersection {
    /// Size of the intersection
    pub count: usize,
    /// Shared metrics, sorted
    pub metrics: Vec<ElementName>,
    /// What the intersection covers
    pub description: &'static str,
}

/// Overlap between report types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommonMetrics {
    /// 10-K and 10-Q overlap, metrics limited to a sample
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_and_quarterly: Option<MetricIntersection>,
    /// Metrics every analyzed report type presents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_reports: Option<MetricIntersection>,
}

/// A metric as listed in a report breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMetric {
    /// Element name
    pub metric_name: ElementName,
    /// Standard label
    pub label: Option<String>,
    /// Disclosure group code
    pub role: &'static str,
}

/// Breakdown of one report type by section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDetail {
    /// The report type
    pub report_type: ReportType,
    /// Report description
    pub description: &'static str,
    /// Filing frequency
    pub frequency: Frequency,
    /// Metrics across all sections
    pub total_metrics: usize,
    /// Metrics per section
    pub sections: BTreeMap<&'static str, Vec<SectionMetric>>,
}

/// Complete analysis output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportAnalysis {
    /// Taxonomy release year
    pub gaap_version: String,
    /// Counts per report type
    pub summary: BTreeMap<ReportType, ReportSummary>,
    /// Overlap between report types
    pub common_metrics: CommonMetrics,
    /// Breakdowns for the main report types that have metrics
    pub detailed_metrics: BTreeMap<ReportType, ReportDetail>,
}

/// Reads the presentation linkbases and relates them to report types.
pub struct ReportAnalyzer<'t> {
    table: &'t TaxonomyTable,
    config: TaxonomyConfig,
    schema_file: String,
}

impl<'t> ReportAnalyzer<'t> {
    /// Create an analyzer over a loaded table.
    #[must_use]
    pub fn new(table: &'t TaxonomyTable, config: &TaxonomyConfig) -> Self {
        let schema_file = config
            .schema_path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            table,
            config: config.clone(),
            schema_file,
        }
    }

    /// Element names presented in a disclosure group, sorted and deduplicated.
    ///
    /// A group without a presentation linkbase has no metrics.
    ///
    /// # Errors
    /// Returns error if the linkbase exists but cannot be read or parsed, or
    /// names an invalid element.
    pub fn extract_metrics(&self, code: &str) -> Result<Vec<ElementName>> {
        let path = self.config.presentation_path(code);
        if !path.is_file() {
            debug!(code, path = %path.display(), "no presentation linkbase");
            return Ok(Vec::new());
        }

        let links = linkbase::parse_linkbase(&path, &read_document(&path)?)?;
        let prefix = format!("{}_", self.config.prefix);

        let mut metrics = BTreeSet::new();
        for locator in links.iter().flat_map(|link| &link.locators) {
            if locator.document() != self.schema_file {
                continue;
            }
            let Some(name) = locator
                .fragment()
                .and_then(|fragment| fragment.strip_prefix(prefix.as_str()))
            else {
                continue;
            };
            metrics.insert(ElementName::new(name)?);
        }

        debug!(code, metrics = metrics.len(), "extracted presentation metrics");
        Ok(metrics.into_iter().collect())
    }

    /// Metrics of every disclosure group, keyed by report type.
    ///
    /// # Errors
    /// Returns the first error of [`ReportAnalyzer::extract_metrics`].
    pub fn analyze(&self) -> Result<ReportMetrics> {
        let mut report_metrics = ReportMetrics::new();

        for group in DISCLOSURE_GROUPS {
            for metric_name in self.extract_metrics(group.code)? {
                let label = self
                    .table
                    .label(metric_name.as_str())
                    .ok()
                    .map(ToString::to_string);

                report_metrics
                    .entry(group.report_type)
                    .or_default()
                    .push(ReportMetric {
                        metric_name,
                        label,
                        role: group.code,
                        section: group.section,
                        report_type: group.report_type,
                        frequency: group.report_type.frequency(),
                    });
            }
        }

        info!(
            report_types = report_metrics.len(),
            metrics = report_metrics.values().map(Vec::len).sum::<usize>(),
            "analyzed report metrics"
        );

        Ok(report_metrics)
    }

    /// Full analysis: summary, overlap and breakdowns of the main reports.
    ///
    /// # Errors
    /// Returns the first error of [`ReportAnalyzer::analyze`].
    pub fn run(&self) -> Result<ReportAnalysis> {
        let report_metrics = self.analyze()?;

        let detailed_metrics = ReportType::MAIN
            .into_iter()
            .filter_map(|report_type| {
                detail(report_type, &report_metrics).map(|detail| (report_type, detail))
            })
            .collect();

        Ok(ReportAnalysis {
            gaap_version: self.config.version.clone(),
            summary: summarize(&report_metrics),
            common_metrics: common_metrics(&report_metrics),
            detailed_metrics,
        })
    }
}

/// Count metrics per report type and section.
#[must_use]
pub fn summarize(report_metrics: &ReportMetrics) -> BTreeMap<ReportType, ReportSummary> {
    report_metrics
        .iter()
        .map(|(report_type, metrics)| {
            let mut sections = BTreeMap::new();
            for metric in metrics {
                *sections.entry(metric.section).or_insert(0) += 1;
            }

            let summary = ReportSummary {
                total_metrics: metrics.len(),
                unique_metrics: metric_names(metrics).len(),
                frequency: report_type.frequency(),
                sections,
                description: report_type.description(),
            };
            (*report_type, summary)
        })
        .collect()
}

/// Metrics shared between report types.
///
/// The 10-K / 10-Q overlap needs both reports; the overlap of all reports
/// needs at least two.
#[must_use]
pub fn common_metrics(report_metrics: &ReportMetrics) -> CommonMetrics {
    let names: BTreeMap<ReportType, BTreeSet<&ElementName>> = report_metrics
        .iter()
        .map(|(report_type, metrics)| (*report_type, metric_names(metrics)))
        .collect();

    let annual_and_quarterly = match (
        names.get(&ReportType::AnnualReport),
        names.get(&ReportType::QuarterlyReport),
    ) {
        (Some(annual), Some(quarterly)) => {
            let shared: Vec<&ElementName> = annual.intersection(quarterly).copied().collect();
            Some(MetricIntersection {
                count: shared.len(),
                metrics: shared
                    .into_iter()
                    .take(COMMON_SAMPLE_SIZE)
                    .cloned()
                    .collect(),
                description: "Core metrics required by both annual and quarterly reports",
            })
        }
        _ => None,
    };

    let all_reports = (names.len() > 1).then(|| {
        let mut sets = names.values();
        let first = sets.next().cloned().unwrap_or_default();
        let shared: BTreeSet<&ElementName> = sets.fold(first, |shared, set| {
            shared.intersection(set).copied().collect()
        });

        MetricIntersection {
            count: shared.len(),
            metrics: shared.into_iter().cloned().collect(),
            description: "Base metrics required by every report type",
        }
    });

    CommonMetrics {
        annual_and_quarterly,
        all_reports,
    }
}

/// Section breakdown of one report type, if it has metrics.
#[must_use]
pub fn detail(report_type: ReportType, report_metrics: &ReportMetrics) -> Option<ReportDetail> {
    let metrics = report_metrics.get(&report_type)?;

    let mut sections: BTreeMap<&'static str, Vec<SectionMetric>> = BTreeMap::new();
    for metric in metrics {
        sections.entry(metric.section).or_default().push(SectionMetric {
            metric_name: metric.metric_name.clone(),
            label: metric.label.clone(),
            role: metric.role,
        });
    }

    Some(ReportDetail {
        report_type,
        description: report_type.description(),
        frequency: report_type.frequency(),
        total_metrics: metrics.len(),
        sections,
    })
}

fn metric_names(metrics: &[ReportMetric]) -> BTreeSet<&ElementName> {
    metrics.iter().map(|metric| &metric.metric_name).collect()
}
