use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::compile::{self, CompileRunOutcome};
use crate::config::Config;
use crate::process;
use crate::style;

/// File name marker distinguishing generated intermediates from
/// original test inputs.
pub const INTERMEDIATE_SUFFIX: &str = ".tmp.c";

/// Where the transpiler under test is expected, relative to the
/// working directory.
pub const DEFAULT_TRANSPILER: &str = "bin/cuik";

const TEST_FILE_PATTERN: &str = "*.c";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestReport {
    pub passed: usize,
    pub failed: usize,
}

impl TestReport {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

fn intermediate_path(src: &Path) -> PathBuf {
    let mut name = src.as_os_str().to_owned();
    name.push(INTERMEDIATE_SUFFIX);
    PathBuf::from(name)
}

/// Explicit (source, destination) chain for the transpiler passes over
/// `file`. Always contains at least one pair: for `repeat == 0` the
/// single destination receives a verbatim copy instead of transpiler
/// output.
fn transpile_plan(file: &Path, repeat: u32) -> Vec<(PathBuf, PathBuf)> {
    let mut steps = Vec::with_capacity(repeat.max(1) as usize);
    let mut src = file.to_owned();
    for _ in 0..repeat.max(1) {
        let dst = intermediate_path(&src);
        steps.push((src, dst.clone()));
        src = dst;
    }
    steps
}

async fn transpile(transpiler: &Path, cfg: &Config, src: &Path, dst: &Path) -> anyhow::Result<()> {
    let mut args: Vec<OsString> = vec!["-emit-c".into()];
    args.extend(cfg.extra_cuik_flags.iter().map(OsString::from));
    args.push(src.into());

    log::info!("Transpiling {} -> {}", src.display(), dst.display());
    let res = process::run_captured(transpiler, args).await;
    // The transpiler's own exit code and stderr are deliberately not
    // inspected: a crashed pass yields an empty or partial intermediate,
    // which then fails the downstream comparison on its own.
    fsutil::write(dst, &res.stdout)?;
    Ok(())
}

/// Runs the transpile chain for one test file and produces the two
/// compile-and-run outcomes to compare (original source, final
/// intermediate).
async fn check_file(
    cfg: &Config,
    transpiler: &Path,
    file: &Path,
    plan: &[(PathBuf, PathBuf)],
) -> anyhow::Result<(CompileRunOutcome, CompileRunOutcome)> {
    let (_, final_dst) = plan.last().context("Empty transpile plan")?;

    if cfg.repeat == 0 {
        // Identity case: exercises the harness itself, not the transpiler.
        let (src, dst) = &plan[0];
        fsutil::copy_file(src, dst)?;
    } else {
        for (src, dst) in plan {
            transpile(transpiler, cfg, src, dst).await?;
        }
    }

    let orig = compile::compile_and_run(&cfg.compiler, file, &cfg.extra_cc_flags).await?;
    let xform = compile::compile_and_run(&cfg.compiler, final_dst, &cfg.extra_cc_flags).await?;
    Ok((orig, xform))
}

fn render_line(
    verdict: Verdict,
    name: &str,
    outcomes: Option<(&CompileRunOutcome, &CompileRunOutcome)>,
) -> String {
    match outcomes {
        Some((orig, xform)) => format!(
            "{} {} {}",
            style::verdict_label(verdict),
            name,
            style::timings(orig, xform)
        ),
        None => format!("{} {}", style::verdict_label(verdict), name),
    }
}

/// Discovers every `*.c` file under `cfg.test_dir`, drives the transpile
/// chain and the two compile-and-run phases per file, and prints one
/// pass/fail line each. A single test's failure (including I/O trouble)
/// never aborts the batch.
pub async fn run_all_tests(cfg: &Config, transpiler: impl AsRef<Path>) -> anyhow::Result<TestReport> {
    let pattern = glob::Pattern::new(TEST_FILE_PATTERN).unwrap();
    let files = fsutil::walk_files_matching(&cfg.test_dir, &pattern).with_context(|| {
        format!(
            "Failed to enumerate test files under {}",
            cfg.test_dir.display()
        )
    })?;

    let mut report = TestReport::default();
    let mut intermediates: Vec<PathBuf> = Vec::new();

    for file in &files {
        if file.to_string_lossy().ends_with(INTERMEDIATE_SUFFIX) {
            continue;
        }
        let name = file
            .strip_prefix(&cfg.test_dir)
            .unwrap_or(file)
            .to_string_lossy()
            .into_owned();

        let plan = transpile_plan(file, cfg.repeat);
        intermediates.extend(plan.iter().map(|(_, dst)| dst.clone()));

        let verdict = match check_file(cfg, transpiler.as_ref(), file, &plan).await {
            Ok((orig, xform)) if orig == xform => {
                println!("{}", render_line(Verdict::Pass, &name, Some((&orig, &xform))));
                Verdict::Pass
            }
            Ok(_) => {
                println!("{}", render_line(Verdict::Fail, &name, None));
                Verdict::Fail
            }
            Err(e) => {
                log::warn!("{}: {:#}", name, e);
                println!("{}", render_line(Verdict::Fail, &name, None));
                Verdict::Fail
            }
        };
        match verdict {
            Verdict::Pass => report.passed += 1,
            Verdict::Fail => report.failed += 1,
        }
    }

    if cfg.clean {
        for path in &intermediates {
            if let Err(e) = fsutil::remove_file(path) {
                log::warn!("Failed to remove intermediate: {}", e);
            }
        }
    }
    Ok(report)
}
