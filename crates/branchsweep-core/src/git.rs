//! Git CLI backend
//!
//! Runs `git -C <repo_root> ...` with one argument per `Command::arg`, so
//! branch names are never re-split or shell-quoted.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::Duration;

use chrono::DateTime;
use wait_timeout::ChildExt;

use crate::backend::RepositoryBackend;
use crate::error::SweepError;
use crate::types::{BranchActivity, CommitId, TreeId, UpstreamCommit};

/// Identity used for probe commits so they work without `user.name` set
const PROBE_IDENTITY: [(&str, &str); 4] = [
    ("GIT_AUTHOR_NAME", "branchsweep"),
    ("GIT_AUTHOR_EMAIL", "branchsweep@localhost"),
    ("GIT_COMMITTER_NAME", "branchsweep"),
    ("GIT_COMMITTER_EMAIL", "branchsweep@localhost"),
];

const PROBE_MESSAGE: &str = "branchsweep squash probe";

/// Git CLI wrapper bound to one repository
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
    timeout: Option<Duration>,
}

impl GitCli {
    /// Create a wrapper for a known repository root
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            timeout: None,
        }
    }

    /// Locate the top level of the work tree containing `path`
    pub fn discover(path: &Path) -> Result<Self, SweepError> {
        let probe = GitCli::new(path);
        match probe.run(&["rev-parse", "--show-toplevel"]) {
            Ok(top) => Ok(GitCli::new(top)),
            Err(SweepError::GitCommand { stderr, .. }) => Err(SweepError::NotAGitRepository(
                format!("{} ({})", path.display(), stderr),
            )),
            Err(e) => Err(e),
        }
    }

    /// Bound every invocation by `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(&self.repo_root)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Spawn and wait, without interpreting the exit status
    fn execute(&self, mut cmd: Command, args: &[&str]) -> Result<Output, SweepError> {
        let rendered = args.join(" ");
        tracing::debug!(command = %rendered, "running git");

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SweepError::GitNotInstalled
            } else {
                SweepError::Io(e)
            }
        })?;

        match self.timeout {
            None => Ok(child.wait_with_output()?),
            Some(limit) => wait_with_limit(child, limit, &rendered),
        }
    }

    fn output(&self, args: &[&str]) -> Result<Output, SweepError> {
        self.execute(self.command(args), args)
    }

    /// Run and return trimmed stdout, failing on a non-zero exit
    fn run(&self, args: &[&str]) -> Result<String, SweepError> {
        let output = self.output(args)?;
        check(output, args)
    }

    fn lines(&self, args: &[&str]) -> Result<Vec<String>, SweepError> {
        Ok(self
            .run(args)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

fn check(output: Output, args: &[&str]) -> Result<String, SweepError> {
    if !output.status.success() {
        return Err(SweepError::GitCommand {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Wait for `child`, killing it once `limit` elapses
///
/// Pipes are drained on separate threads so a chatty child cannot block on
/// a full pipe while we wait.
fn wait_with_limit(mut child: Child, limit: Duration, command: &str) -> Result<Output, SweepError> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_reader = thread::spawn(move || drain(stdout));
    let stderr_reader = thread::spawn(move || drain(stderr));

    match child.wait_timeout(limit)? {
        Some(status) => Ok(Output {
            status,
            stdout: stdout_reader.join().unwrap_or_default(),
            stderr: stderr_reader.join().unwrap_or_default(),
        }),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(command, secs = limit.as_secs(), "git timed out");
            Err(SweepError::GitTimeout {
                command: command.to_string(),
                secs: limit.as_secs(),
            })
        }
    }
}

fn drain<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}

/// Parse `git cherry` output into upstream comparison entries
pub(crate) fn parse_cherry(output: &str) -> Result<Vec<UpstreamCommit>, SweepError> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (marker, sha) = line
                .split_once(' ')
                .ok_or_else(|| SweepError::Parse(format!("unexpected git cherry line: {}", line)))?;
            let equivalent = match marker {
                "-" => true,
                "+" => false,
                other => {
                    return Err(SweepError::Parse(format!(
                        "unexpected git cherry marker '{}' in: {}",
                        other, line
                    )));
                }
            };
            Ok(UpstreamCommit {
                commit: CommitId(sha.trim().to_string()),
                equivalent,
            })
        })
        .collect()
}

/// Parse `<iso-strict date>|<branch>` lines from `for-each-ref`
pub(crate) fn parse_activity(output: &str) -> Result<Vec<BranchActivity>, SweepError> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (date, name) = line
                .split_once('|')
                .ok_or_else(|| SweepError::Parse(format!("unexpected for-each-ref line: {}", line)))?;
            let committed_at = DateTime::parse_from_rfc3339(date.trim())
                .map_err(|e| SweepError::Parse(format!("bad commit date '{}': {}", date, e)))?;
            Ok(BranchActivity {
                name: name.trim().to_string(),
                committed_at,
            })
        })
        .collect()
}

impl RepositoryBackend for GitCli {
    fn resolve_symbolic_ref(&self, name: &str) -> Result<Option<String>, SweepError> {
        let output = self.output(&["symbolic-ref", "--quiet", "--short", name])?;
        if !output.status.success() {
            return Ok(None);
        }
        let target = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!target.is_empty()).then_some(target))
    }

    fn ref_exists(&self, name: &str) -> bool {
        self.output(&["rev-parse", "--verify", "--quiet", name])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn current_branch(&self) -> Result<String, SweepError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn list_branches_merged_into(&self, target: &str) -> Result<Vec<String>, SweepError> {
        self.lines(&["branch", "--format=%(refname:short)", "--merged", target])
    }

    fn list_all_branches(&self) -> Result<Vec<String>, SweepError> {
        self.lines(&["branch", "--format=%(refname:short)"])
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<CommitId, SweepError> {
        self.run(&["merge-base", a, b]).map(CommitId)
    }

    fn tree_of(&self, reference: &str) -> Result<TreeId, SweepError> {
        let rev = format!("{}^{{tree}}", reference);
        self.run(&["rev-parse", "--verify", &rev]).map(TreeId)
    }

    fn synthesize_commit(&self, tree: &TreeId, parent: &CommitId) -> Result<CommitId, SweepError> {
        let args = [
            "commit-tree",
            tree.as_str(),
            "-p",
            parent.as_str(),
            "-m",
            PROBE_MESSAGE,
        ];
        let mut cmd = self.command(&args);
        cmd.envs(PROBE_IDENTITY);
        let output = self.execute(cmd, &args)?;
        check(output, &args).map(CommitId)
    }

    fn compare_upstream(
        &self,
        target: &str,
        candidate: &CommitId,
    ) -> Result<Vec<UpstreamCommit>, SweepError> {
        let output = self.run(&["cherry", target, candidate.as_str()])?;
        parse_cherry(&output)
    }

    fn commit_timestamps(&self) -> Result<Vec<BranchActivity>, SweepError> {
        let output = self.run(&[
            "for-each-ref",
            "refs/heads/",
            "--format=%(committerdate:iso-strict)|%(refname:short)",
        ])?;
        parse_activity(&output)
    }

    fn delete_branches(&self, names: &[String]) -> Result<(), SweepError> {
        if names.is_empty() {
            return Ok(());
        }
        let mut args = vec!["branch", "-D"];
        args.extend(names.iter().map(String::as_str));
        match self.run(&args) {
            Ok(_) => Ok(()),
            Err(SweepError::GitCommand { stderr, .. }) => Err(SweepError::DeletionFailed(stderr)),
            Err(e) => Err(SweepError::DeletionFailed(e.to_string())),
        }
    }

    fn switch_branch(&self, name: &str) -> Result<(), SweepError> {
        match self.run(&["checkout", name, "--"]) {
            Ok(_) => Ok(()),
            Err(SweepError::GitCommand { stderr, .. }) => Err(SweepError::SwitchFailed {
                branch: name.to_string(),
                reason: stderr,
            }),
            Err(e) => Err(e),
        }
    }
}
