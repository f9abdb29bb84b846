use std::{
    fmt,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    compare::{DEFAULT_RTOL, assert_allclose},
    error::{Result, SphereMaskError},
    grid::GridSpec,
    mesh::Indexing,
    naive, vectorized,
    types::Value,
    util::{Timed, timed},
};

/// One `(radius, size, n_dims)` case run through both builders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestCase {
    pub radius: Value,
    pub size: usize,
    pub n_dims: usize,
}

impl TestCase {
    pub const fn new(radius: Value, size: usize, n_dims: usize) -> Self {
        Self {
            radius,
            size,
            n_dims,
        }
    }
}

/// Cases checked when no others are configured.
pub const DEFAULT_CASES: [TestCase; 4] = [
    TestCase::new(10.0, 500, 2),
    TestCase::new(250.0, 500, 2),
    TestCase::new(10.0, 100, 3),
    TestCase::new(100.0, 256, 3),
];

/// Configuration for an equivalence run.
///
/// ```rust,ignore
/// let config = HarnessConfig {
///     report_path: "out/timing.txt".into(),
///     ..Default::default()
/// };
/// harness::run_and_write(&config)?;
/// ```
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Cases to run, in order.
    pub cases: Vec<TestCase>,
    /// Report destination; overwritten on every run. Default: `data/timing.txt`.
    pub report_path: PathBuf,
    /// Relative tolerance for the naive/vectorized comparison. Default: `1e-5`.
    pub rtol: f64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            cases: DEFAULT_CASES.to_vec(),
            report_path: PathBuf::from("data/timing.txt"),
            rtol: DEFAULT_RTOL,
        }
    }
}

impl HarnessConfig {
    /// Builds the case list from parallel columns of radii, sizes and dimensions.
    ///
    /// Returns [`SphereMaskError::InvalidShape`] if the columns differ in length.
    pub fn from_columns(radii: &[Value], sizes: &[usize], n_dims: &[usize]) -> Result<Self> {
        if radii.len() != sizes.len() || sizes.len() != n_dims.len() {
            return Err(SphereMaskError::InvalidShape(format!(
                "case columns differ in length: {} radii, {} sizes, {} dims",
                radii.len(),
                sizes.len(),
                n_dims.len()
            )));
        }
        let cases = radii
            .iter()
            .zip(sizes)
            .zip(n_dims)
            .map(|((&radius, &size), &n_dims)| TestCase::new(radius, size, n_dims))
            .collect();
        Ok(Self {
            cases,
            ..Default::default()
        })
    }
}

/// Wall-clock times of both builders for one case.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    pub n_dims: usize,
    pub radius: Value,
    pub size: usize,
    pub naive_time: Duration,
    pub vectorized_time: Duration,
}

impl TimingRecord {
    /// `naive_time / vectorized_time`, or infinity if the vectorized run took no measurable time.
    pub fn speedup(&self) -> f64 {
        let v = self.vectorized_time.as_secs_f64();
        if v == 0.0 {
            f64::INFINITY
        } else {
            self.naive_time.as_secs_f64() / v
        }
    }
}

impl fmt::Display for TimingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "nDims: {} | Radius: {} | size: {}",
            self.n_dims, self.radius, self.size
        )?;
        writeln!(f, "Unopt time: {}", self.naive_time.as_secs_f64())?;
        writeln!(f, "Opt time: {}", self.vectorized_time.as_secs_f64())?;
        writeln!(f)
    }
}

/// Ordered records of one harness run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingReport {
    pub records: Vec<TimingRecord>,
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.records.iter().try_for_each(|r| write!(f, "{r}"))
    }
}

impl TimingReport {
    /// Writes the rendered report to `path`, replacing any previous content.
    ///
    /// The parent directory must already exist.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

/// Runs every case through both builders, timing each and checking that they agree.
///
/// ```text
/// per case:
///   GridSpec::new          →  InvalidRadius / InvalidShape, fatal
///   naive::sphere          →  timed
///   vectorized::sphere     →  timed
///   assert_allclose(rtol)  →  EquivalenceMismatch, fatal
/// ```
///
/// Stops at the first failing case; no partial report is returned.
pub fn run(config: &HarnessConfig) -> Result<TimingReport> {
    let _t = Timed::new("equivalence harness", log::Level::Info);
    let mut report = TimingReport::default();

    for case in &config.cases {
        let spec = GridSpec::new(case.radius, case.size, case.n_dims)?;

        let (naive_mask, naive_time) = timed("naive sphere", || naive::sphere_from_spec(&spec));
        let (vectorized_mask, vectorized_time) = timed("vectorized sphere", || {
            vectorized::sphere_from_spec(&spec, Indexing::Xy)
        });
        let vectorized_mask = vectorized_mask?;

        if let Err(e) = assert_allclose(&naive_mask, &vectorized_mask, config.rtol, 0.0) {
            tracing::error!(?case, "naive and vectorized masks disagree");
            return Err(e);
        }

        let record = TimingRecord {
            n_dims: case.n_dims,
            radius: case.radius,
            size: case.size,
            naive_time,
            vectorized_time,
        };
        tracing::info!(
            n_dims = record.n_dims,
            radius = record.radius,
            size = record.size,
            speedup = record.speedup(),
            "case timed"
        );
        report.records.push(record);
    }

    Ok(report)
}

/// [`run`], then print the report and write it to [`HarnessConfig::report_path`].
pub fn run_and_write(config: &HarnessConfig) -> Result<TimingReport> {
    let report = run(config)?;
    println!("{report}");
    report.write_to(&config.report_path)?;
    tracing::info!(path = %config.report_path.display(), "timing report written");
    Ok(report)
}
