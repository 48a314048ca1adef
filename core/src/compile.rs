use std::ffi::OsString;
use std::path::Path;

use anyhow::Context as _;

use crate::process::{self, ProcessOutcome};

/// Observable result of compiling one source file and executing the
/// produced binary. Equality is pairwise outcome equality (exit status
/// plus exact stdout/stderr bytes, durations ignored); this is the whole
/// equivalence oracle, so no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRunOutcome {
    pub compile: ProcessOutcome,
    pub run: ProcessOutcome,
}

/// Compiles `source` with `cc` into a scratch tempdir, then executes the
/// produced binary with no arguments. The binary never outlives this
/// call: the tempdir is removed on drop.
///
/// A compiler that fails (or is missing) leaves no binary behind, so the
/// run phase degrades to the `NotLaunched` sentinel and stays comparable.
pub async fn compile_and_run(
    cc: &str,
    source: impl AsRef<Path>,
    extra_flags: &[String],
) -> anyhow::Result<CompileRunOutcome> {
    let source = source.as_ref();
    let scratch = tempfile::tempdir().with_context(|| {
        format!(
            "Failed to create scratch dir for compiling {}",
            source.to_string_lossy()
        )
    })?;
    let exe_path = scratch.path().join("out.exe");

    let mut cc_args: Vec<OsString> = vec![source.into(), "-w".into()];
    cc_args.extend(extra_flags.iter().map(OsString::from));
    cc_args.push("-o".into());
    cc_args.push(exe_path.clone().into());

    let compile = process::run_captured(cc, cc_args).await;
    let run = process::run_captured(&exe_path, [] as [&str; 0]).await;

    Ok(CompileRunOutcome { compile, run })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::process::ProcessStatus;
    use std::time::Duration;

    /// Writes an executable `/bin/sh` script and returns its path.
    fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// A stand-in compiler: scans its args for `-o <out>` and emits a
    /// runnable script that prints the "source" file's first line.
    fn fake_cc(dir: &Path) -> std::path::PathBuf {
        write_script(
            dir,
            "fakecc",
            r#"src="$1"; out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; shift; fi
  shift
done
printf '#!/bin/sh\nhead -n1 %s\n' "$src" > "$out"
chmod +x "$out""#,
        )
    }

    #[tokio::test]
    async fn identical_sources_should_compare_equal() {
        let dir = tempfile::tempdir().unwrap();
        let cc = fake_cc(dir.path());
        std::fs::write(dir.path().join("a.c"), "hello\n").unwrap();
        std::fs::write(dir.path().join("b.c"), "hello\n").unwrap();

        let a = compile_and_run(cc.to_str().unwrap(), dir.path().join("a.c"), &[])
            .await
            .unwrap();
        let b = compile_and_run(cc.to_str().unwrap(), dir.path().join("b.c"), &[])
            .await
            .unwrap();

        assert_eq!(a.run.status, ProcessStatus::Exited(0));
        assert_eq!(a.run.stdout, b"hello\n");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn differing_run_output_should_compare_unequal() {
        let dir = tempfile::tempdir().unwrap();
        let cc = fake_cc(dir.path());
        std::fs::write(dir.path().join("a.c"), "hello\n").unwrap();
        std::fs::write(dir.path().join("b.c"), "other\n").unwrap();

        let a = compile_and_run(cc.to_str().unwrap(), dir.path().join("a.c"), &[])
            .await
            .unwrap();
        let b = compile_and_run(cc.to_str().unwrap(), dir.path().join("b.c"), &[])
            .await
            .unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn comparison_should_be_reflexive_across_reruns() {
        let dir = tempfile::tempdir().unwrap();
        let cc = fake_cc(dir.path());
        std::fs::write(dir.path().join("a.c"), "same\n").unwrap();

        let first = compile_and_run(cc.to_str().unwrap(), dir.path().join("a.c"), &[])
            .await
            .unwrap();
        let mut second = compile_and_run(cc.to_str().unwrap(), dir.path().join("a.c"), &[])
            .await
            .unwrap();
        // Durations will differ between runs; equality must not care.
        second.run.elapsed += Duration::from_millis(123);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_compiler_should_yield_sentinel_phases() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.c"), "x\n").unwrap();

        let res = compile_and_run("/no/such/cc", dir.path().join("a.c"), &[])
            .await
            .unwrap();
        assert_eq!(res.compile.status, ProcessStatus::NotLaunched);
        // No binary was produced, so the run phase is a sentinel too.
        assert_eq!(res.run.status, ProcessStatus::NotLaunched);
    }

    #[tokio::test]
    async fn extra_flags_should_be_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        // Echoes its full argv so the test can inspect flag placement.
        let cc = write_script(dir.path(), "argcc", r#"echo "$@""#);
        std::fs::write(dir.path().join("a.c"), "x\n").unwrap();

        let res = compile_and_run(
            cc.to_str().unwrap(),
            dir.path().join("a.c"),
            &["-O2".to_owned(), "-fwrapv".to_owned()],
        )
        .await
        .unwrap();
        let argv = String::from_utf8(res.compile.stdout).unwrap();
        assert!(argv.contains("-w -O2 -fwrapv -o"), "argv was: {argv}");
    }
}
