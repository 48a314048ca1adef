use std::path::PathBuf;
use std::result::Result as StdResult;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("Unknown flag '{0}'")]
    UnknownFlag(String),

    #[error("Flag '{0}' expects an integer, got '{1}'")]
    BadInt(&'static str, String),

    #[error("Flag '{0}' is missing its value")]
    MissingValue(&'static str),
}

/// Run configuration, built once from the command-line tokens and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub compiler: String,
    pub repeat: u32,
    pub extra_cc_flags: Vec<String>,
    pub extra_cuik_flags: Vec<String>,
    pub clean: bool,
    pub test_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compiler: "cc".to_owned(),
            repeat: 1,
            extra_cc_flags: Vec::new(),
            extra_cuik_flags: Vec::new(),
            clean: false,
            test_dir: self::default_test_dir(),
        }
    }
}

/// The built-in test tree lives next to the harness executable.
pub fn default_test_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("tests")))
        .unwrap_or_else(|| PathBuf::from("tests"))
}

// One-token-lookahead states of the argument scanner: `Flag` consumes a
// flag token, every other state consumes exactly one value token and
// returns to `Flag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Flag,
    RepeatCount,
    Compiler,
    CcFlag,
    CuikFlag,
    TestDir,
}

impl State {
    fn flag_name(self) -> &'static str {
        match self {
            State::Flag => "",
            State::RepeatCount => "-n",
            State::Compiler => "-c",
            State::CcFlag => "-Xcc",
            State::CuikFlag => "-Xcuik",
            State::TestDir => "-f",
        }
    }
}

impl Config {
    /// Parses the command-line tokens (program name excluded).
    /// Pure single pass; the first offending token aborts the parse.
    pub fn parse_args<I, S>(tokens: I) -> StdResult<Self, InvalidArgument>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cfg = Self::default();
        let mut state = State::Flag;

        for token in tokens {
            let token: String = token.into();
            state = match state {
                State::Flag => match token.as_str() {
                    "-n" => State::RepeatCount,
                    "-c" => State::Compiler,
                    "-Xcc" => State::CcFlag,
                    "-Xcuik" => State::CuikFlag,
                    "-f" => State::TestDir,
                    "--clean" => {
                        cfg.clean = true;
                        State::Flag
                    }
                    "--no-clean" => {
                        cfg.clean = false;
                        State::Flag
                    }
                    _ => return Err(InvalidArgument::UnknownFlag(token)),
                },
                State::RepeatCount => {
                    cfg.repeat = token
                        .parse()
                        .map_err(|_| InvalidArgument::BadInt("-n", token))?;
                    State::Flag
                }
                State::Compiler => {
                    cfg.compiler = token;
                    State::Flag
                }
                State::CcFlag => {
                    cfg.extra_cc_flags.push(token);
                    State::Flag
                }
                State::CuikFlag => {
                    cfg.extra_cuik_flags.push(token);
                    State::Flag
                }
                State::TestDir => {
                    cfg.test_dir = PathBuf::from(token);
                    State::Flag
                }
            };
        }

        if state != State::Flag {
            return Err(InvalidArgument::MissingValue(state.flag_name()));
        }
        Ok(cfg)
    }
}
