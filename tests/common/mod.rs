#![allow(dead_code)]

pub mod cli {
    use std::ffi::OsStr;
    use std::path::{Path, PathBuf};
    use std::process::ExitStatus;

    use assert_cmd::Command;
    use tempfile::TempDir;

    /// An isolated directory with its own data dir and user config home.
    pub struct TrkWorkspace {
        pub temp_dir: TempDir,
        pub root: PathBuf,
    }

    impl TrkWorkspace {
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("create temp dir");
            let root = temp_dir.path().to_path_buf();
            Self { temp_dir, root }
        }

        pub fn data_dir(&self) -> PathBuf {
            self.root.join(".tracker")
        }

        pub fn state_path(&self) -> PathBuf {
            self.data_dir().join("tracker-state.json")
        }

        pub fn config_home(&self) -> PathBuf {
            self.root.join("xdg")
        }

        pub fn path(&self) -> &Path {
            &self.root
        }
    }

    pub struct TrkRun {
        pub status: ExitStatus,
        pub stdout: String,
        pub stderr: String,
    }

    impl TrkRun {
        pub fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.stdout)
                .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
        }
    }

    /// Run `trk` inside `workspace`; `label` names the step in failure output.
    pub fn run_trk<I, S>(workspace: &TrkWorkspace, args: I, label: &str) -> TrkRun
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::cargo_bin("trk").expect("trk binary");
        cmd.current_dir(&workspace.root)
            .args(args)
            .env("TRACKER_DATA_DIR", workspace.data_dir())
            .env("TRACKER_ACTOR", "u_alex")
            .env("XDG_CONFIG_HOME", workspace.config_home())
            .env("HOME", &workspace.root)
            .env_remove("TRACKER_STATE_KEY")
            .env_remove("TRACKER_LOG")
            .env_remove("RUST_LOG");

        let output = cmd.output().expect("run trk");
        let run = TrkRun {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if std::env::var_os("TRK_TEST_VERBOSE").is_some() {
            eprintln!("--- {label} ---\nstdout:\n{}\nstderr:\n{}", run.stdout, run.stderr);
        }
        run
    }
}
