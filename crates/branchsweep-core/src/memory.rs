//! In-memory repository backend
//!
//! Models a commit graph where every commit stores a full file snapshot.
//! Patch equivalence for [`RepositoryBackend::compare_upstream`] is derived
//! from the file diff against the first parent, so a squash merge of a
//! branch produces the same patch as that branch's net change, which is what
//! `git cherry` relies on.
//!
//! Operations can be made to fail with [`MemoryBackend::fail`] and
//! [`MemoryBackend::fail_for`] to exercise partial-failure paths.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

use chrono::DateTime;

use crate::backend::RepositoryBackend;
use crate::error::SweepError;
use crate::types::{BranchActivity, CommitId, TreeId, UpstreamCommit};

/// File path to content snapshot
pub type Files = BTreeMap<String, String>;

/// 2026-01-01T00:00:00Z, commit clocks count hours from here
const EPOCH_SECS: i64 = 1_767_225_600;

/// Backend operations, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ResolveSymbolicRef,
    RefExists,
    CurrentBranch,
    ListMerged,
    ListBranches,
    MergeBase,
    TreeOf,
    SynthesizeCommit,
    CompareUpstream,
    CommitTimestamps,
    DeleteBranches,
    SwitchBranch,
}

#[derive(Debug, Clone)]
struct Commit {
    parents: Vec<usize>,
    tree: usize,
    clock: i64,
}

#[derive(Debug, Default)]
struct State {
    commits: Vec<Commit>,
    trees: Vec<Files>,
    branches: BTreeMap<String, usize>,
    symbolic: BTreeMap<String, String>,
    head: String,
    clock: i64,
    failures: Vec<(Operation, Option<String>)>,
}

/// Repository held entirely in memory
#[derive(Debug)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

fn not_found(command: &str, reference: &str) -> SweepError {
    SweepError::GitCommand {
        command: command.to_string(),
        stderr: format!("fatal: ambiguous argument '{}': unknown revision", reference),
    }
}

fn commit_name(index: usize) -> String {
    format!("c{}", index)
}

fn tree_name(index: usize) -> String {
    format!("t{}", index)
}

fn parse_index(id: &str, prefix: char) -> Option<usize> {
    id.strip_prefix(prefix)?.parse().ok()
}

/// Changes from `before` to `after`, one entry per touched path
fn diff(before: &Files, after: &Files) -> Vec<(String, Option<String>, Option<String>)> {
    let paths: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
    paths
        .into_iter()
        .filter(|path| before.get(*path) != after.get(*path))
        .map(|path| {
            (
                path.clone(),
                before.get(path).cloned(),
                after.get(path).cloned(),
            )
        })
        .collect()
}

fn apply(base: &Files, changes: &[(String, Option<String>, Option<String>)]) -> Files {
    let mut files = base.clone();
    for (path, _, new) in changes {
        match new {
            Some(content) => files.insert(path.clone(), content.clone()),
            None => files.remove(path),
        };
    }
    files
}

impl State {
    fn resolve(&self, reference: &str) -> Option<usize> {
        if reference == "HEAD" {
            return self.branches.get(&self.head).copied();
        }
        if let Some(tip) = self.branches.get(reference) {
            return Some(*tip);
        }
        if let Some(target) = self.symbolic.get(reference) {
            return self.resolve(target);
        }
        parse_index(reference, 'c').filter(|i| *i < self.commits.len())
    }

    fn resolve_or(&self, command: &str, reference: &str) -> Result<usize, SweepError> {
        self.resolve(reference)
            .ok_or_else(|| not_found(command, reference))
    }

    fn ancestors(&self, start: usize) -> HashSet<usize> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(index) = queue.pop_front() {
            if seen.insert(index) {
                queue.extend(self.commits[index].parents.iter().copied());
            }
        }
        seen
    }

    fn files(&self, commit: usize) -> &Files {
        &self.trees[self.commits[commit].tree]
    }

    fn intern_tree(&mut self, files: Files) -> usize {
        if let Some(existing) = self.trees.iter().position(|t| *t == files) {
            return existing;
        }
        self.trees.push(files);
        self.trees.len() - 1
    }

    fn add_commit(&mut self, parents: Vec<usize>, files: Files) -> usize {
        let tree = self.intern_tree(files);
        self.clock += 1;
        self.commits.push(Commit {
            parents,
            tree,
            clock: self.clock,
        });
        self.commits.len() - 1
    }

    /// Patch identity of a non-merge commit
    fn patch_id(&self, commit: usize) -> Option<String> {
        let parents = &self.commits[commit].parents;
        if parents.len() > 1 {
            return None;
        }
        let empty = Files::new();
        let before = parents.first().map(|p| self.files(*p)).unwrap_or(&empty);
        Some(format!("{:?}", diff(before, self.files(commit))))
    }

    fn merge_base(&self, a: usize, b: usize) -> Option<usize> {
        let left = self.ancestors(a);
        self.ancestors(b)
            .into_iter()
            .filter(|c| left.contains(c))
            .max_by_key(|c| (self.commits[*c].clock, *c))
    }

    fn check(&self, op: Operation, args: &[&str]) -> Result<(), SweepError> {
        let injected = self.failures.iter().any(|(failing, arg)| {
            *failing == op && arg.as_deref().is_none_or(|a| args.contains(&a))
        });
        if injected {
            return Err(SweepError::GitCommand {
                command: format!("{:?} {}", op, args.join(" ")),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl MemoryBackend {
    /// Create a repository with one empty root commit on `default_branch`
    pub fn new(default_branch: &str) -> Self {
        let mut state = State::default();
        let root = state.add_commit(Vec::new(), Files::new());
        state.branches.insert(default_branch.to_string(), root);
        state.head = default_branch.to_string();
        Self {
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Commit file writes on top of `branch`
    pub fn commit(&self, branch: &str, writes: &[(&str, &str)]) -> Result<CommitId, SweepError> {
        let mut state = self.state();
        let tip = *state
            .branches
            .get(branch)
            .ok_or_else(|| not_found("commit", branch))?;
        let mut files = state.files(tip).clone();
        for (path, content) in writes {
            files.insert(path.to_string(), content.to_string());
        }
        let commit = state.add_commit(vec![tip], files);
        state.branches.insert(branch.to_string(), commit);
        Ok(CommitId(commit_name(commit)))
    }

    /// Create `name` pointing at whatever `start` resolves to
    pub fn create_branch(&self, name: &str, start: &str) -> Result<(), SweepError> {
        let mut state = self.state();
        let commit = state.resolve_or("branch", start)?;
        state.branches.insert(name.to_string(), commit);
        Ok(())
    }

    /// Merge `source` into `target`, fast-forwarding when possible
    pub fn merge(&self, target: &str, source: &str) -> Result<CommitId, SweepError> {
        let mut state = self.state();
        let ours = state.resolve_or("merge", target)?;
        let theirs = state.resolve_or("merge", source)?;
        if state.ancestors(theirs).contains(&ours) {
            state.branches.insert(target.to_string(), theirs);
            return Ok(CommitId(commit_name(theirs)));
        }
        let base = state
            .merge_base(ours, theirs)
            .ok_or_else(|| not_found("merge", source))?;
        let changes = diff(state.files(base), state.files(theirs));
        let files = apply(state.files(ours), &changes);
        let commit = state.add_commit(vec![ours, theirs], files);
        state.branches.insert(target.to_string(), commit);
        Ok(CommitId(commit_name(commit)))
    }

    /// Land the net change of `source` on `target` as one new commit
    pub fn squash_merge(&self, target: &str, source: &str) -> Result<CommitId, SweepError> {
        let mut state = self.state();
        let ours = state.resolve_or("merge --squash", target)?;
        let theirs = state.resolve_or("merge --squash", source)?;
        let base = state
            .merge_base(ours, theirs)
            .ok_or_else(|| not_found("merge --squash", source))?;
        let changes = diff(state.files(base), state.files(theirs));
        let files = apply(state.files(ours), &changes);
        let commit = state.add_commit(vec![ours], files);
        state.branches.insert(target.to_string(), commit);
        Ok(CommitId(commit_name(commit)))
    }

    /// Point symbolic ref `name` at `target` (e.g. `origin/HEAD` -> `origin/main`)
    pub fn set_symbolic_ref(&self, name: &str, target: &str) {
        self.state()
            .symbolic
            .insert(name.to_string(), target.to_string());
    }

    /// Make every call of `op` fail
    pub fn fail(&self, op: Operation) {
        self.state().failures.push((op, None));
    }

    /// Make calls of `op` fail when any argument equals `arg`
    pub fn fail_for(&self, op: Operation, arg: &str) {
        self.state().failures.push((op, Some(arg.to_string())));
    }

    /// Names of all local branches
    pub fn branch_names(&self) -> Vec<String> {
        self.state().branches.keys().cloned().collect()
    }

    /// Number of commit objects, including dangling ones
    pub fn object_count(&self) -> usize {
        self.state().commits.len()
    }
}

impl RepositoryBackend for MemoryBackend {
    fn resolve_symbolic_ref(&self, name: &str) -> Result<Option<String>, SweepError> {
        let state = self.state();
        state.check(Operation::ResolveSymbolicRef, &[name])?;
        let key = name.strip_prefix("refs/remotes/").unwrap_or(name);
        Ok(state.symbolic.get(key).cloned())
    }

    fn ref_exists(&self, name: &str) -> bool {
        let state = self.state();
        state.check(Operation::RefExists, &[name]).is_ok() && state.resolve(name).is_some()
    }

    fn current_branch(&self) -> Result<String, SweepError> {
        let state = self.state();
        state.check(Operation::CurrentBranch, &[])?;
        Ok(state.head.clone())
    }

    fn list_branches_merged_into(&self, target: &str) -> Result<Vec<String>, SweepError> {
        let state = self.state();
        state.check(Operation::ListMerged, &[target])?;
        let tip = state.resolve_or("branch --merged", target)?;
        let reachable = state.ancestors(tip);
        Ok(state
            .branches
            .iter()
            .filter(|(_, commit)| reachable.contains(commit))
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn list_all_branches(&self) -> Result<Vec<String>, SweepError> {
        let state = self.state();
        state.check(Operation::ListBranches, &[])?;
        Ok(state.branches.keys().cloned().collect())
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<CommitId, SweepError> {
        let state = self.state();
        state.check(Operation::MergeBase, &[a, b])?;
        let left = state.resolve_or("merge-base", a)?;
        let right = state.resolve_or("merge-base", b)?;
        state
            .merge_base(left, right)
            .map(|c| CommitId(commit_name(c)))
            .ok_or_else(|| SweepError::GitCommand {
                command: format!("merge-base {} {}", a, b),
                stderr: String::new(),
            })
    }

    fn tree_of(&self, reference: &str) -> Result<TreeId, SweepError> {
        let state = self.state();
        state.check(Operation::TreeOf, &[reference])?;
        let commit = state.resolve_or("rev-parse", reference)?;
        Ok(TreeId(tree_name(state.commits[commit].tree)))
    }

    fn synthesize_commit(&self, tree: &TreeId, parent: &CommitId) -> Result<CommitId, SweepError> {
        let mut state = self.state();
        state.check(Operation::SynthesizeCommit, &[tree.as_str(), parent.as_str()])?;
        let tree_index = parse_index(tree.as_str(), 't')
            .filter(|t| *t < state.trees.len())
            .ok_or_else(|| not_found("commit-tree", tree.as_str()))?;
        let parent_index = state.resolve_or("commit-tree", parent.as_str())?;
        let files = state.trees[tree_index].clone();
        let commit = state.add_commit(vec![parent_index], files);
        Ok(CommitId(commit_name(commit)))
    }

    fn compare_upstream(
        &self,
        target: &str,
        candidate: &CommitId,
    ) -> Result<Vec<UpstreamCommit>, SweepError> {
        let state = self.state();
        state.check(Operation::CompareUpstream, &[target, candidate.as_str()])?;
        let upstream = state.ancestors(state.resolve_or("cherry", target)?);
        let head = state.ancestors(state.resolve_or("cherry", candidate.as_str())?);

        let upstream_patches: HashSet<String> = upstream
            .difference(&head)
            .filter_map(|c| state.patch_id(*c))
            .collect();

        let mut ours: Vec<usize> = head
            .difference(&upstream)
            .copied()
            .filter(|c| state.commits[*c].parents.len() <= 1)
            .collect();
        ours.sort_unstable();

        Ok(ours
            .into_iter()
            .map(|c| UpstreamCommit {
                commit: CommitId(commit_name(c)),
                equivalent: state
                    .patch_id(c)
                    .is_some_and(|patch| upstream_patches.contains(&patch)),
            })
            .collect())
    }

    fn commit_timestamps(&self) -> Result<Vec<BranchActivity>, SweepError> {
        let state = self.state();
        state.check(Operation::CommitTimestamps, &[])?;
        state
            .branches
            .iter()
            .map(|(name, commit)| {
                let secs = EPOCH_SECS + state.commits[*commit].clock * 3600;
                let committed_at = DateTime::from_timestamp(secs, 0)
                    .ok_or_else(|| SweepError::Parse(format!("timestamp out of range: {}", secs)))?
                    .fixed_offset();
                Ok(BranchActivity {
                    name: name.clone(),
                    committed_at,
                })
            })
            .collect()
    }

    fn delete_branches(&self, names: &[String]) -> Result<(), SweepError> {
        let mut state = self.state();
        let args: Vec<&str> = names.iter().map(String::as_str).collect();
        state
            .check(Operation::DeleteBranches, &args)
            .map_err(|e| SweepError::DeletionFailed(e.to_string()))?;

        let mut errors = Vec::new();
        for name in names {
            if *name == state.head {
                errors.push(format!(
                    "error: cannot delete branch '{}' used by worktree at '<memory>'",
                    name
                ));
            } else if state.branches.remove(name).is_none() {
                errors.push(format!("error: branch '{}' not found.", name));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SweepError::DeletionFailed(errors.join("\n")))
        }
    }

    fn switch_branch(&self, name: &str) -> Result<(), SweepError> {
        let mut state = self.state();
        state.check(Operation::SwitchBranch, &[name])?;
        if !state.branches.contains_key(name) {
            return Err(SweepError::SwitchFailed {
                branch: name.to_string(),
                reason: format!(
                    "error: pathspec '{}' did not match any file(s) known to git",
                    name
                ),
            });
        }
        state.head = name.to_string();
        Ok(())
    }
}
