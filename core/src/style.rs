use colored::{Color, ColoredString, Colorize};

use crate::action::Verdict;

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for Verdict {
    fn color(&self) -> Color {
        match self {
            Verdict::Pass => Color::Green,
            Verdict::Fail => Color::Red,
        }
    }
}

pub fn verdict_label(v: Verdict) -> ColoredString {
    let s = match v {
        Verdict::Pass => "pass",
        Verdict::Fail => "fail",
    };
    s.color(v.color())
}

/// `(cc <orig>ms/<xform>ms, run <orig>ms/<xform>ms)`, dimmed.
pub fn timings(
    orig: &crate::compile::CompileRunOutcome,
    xform: &crate::compile::CompileRunOutcome,
) -> ColoredString {
    format!(
        "(cc {}ms/{}ms, run {}ms/{}ms)",
        orig.compile.elapsed.as_millis(),
        xform.compile.elapsed.as_millis(),
        orig.run.elapsed.as_millis(),
        xform.run.elapsed.as_millis(),
    )
    .dimmed()
}
