use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::FutureExt as _;
use futures::future::LocalBoxFuture;
use git2::{Diff, DiffFormat, DiffOptions, Status, Tree};
use tracing::debug;

use crate::diff::FilePatch;
use crate::root::{PatchOptions, Repository};

const INDEX_CHANGES: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE);

const WORKTREE_CHANGES: Status = Status::WT_NEW
    .union(Status::WT_MODIFIED)
    .union(Status::WT_DELETED)
    .union(Status::WT_RENAMED)
    .union(Status::WT_TYPECHANGE);

/// [`Repository`] backed by the git repository at `root`. Each query opens the
/// repository afresh so results always reflect the current index and worktree.
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
    context_lines: u32,
}

impl GitRepository {
    pub fn discover(cwd: &Path, context_lines: u32) -> Result<Self> {
        let repo = git2::Repository::discover(cwd).context("failed to discover git repository")?;
        Ok(Self {
            root: repo_root(&repo)?,
            context_lines,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True when the file has changes in the index and further changes in the
    /// worktree.
    pub fn partially_staged(&self, file_path: &str) -> Result<bool> {
        let repo = self.open()?;
        let status = repo
            .status_file(Path::new(file_path))
            .with_context(|| format!("failed to read status of {file_path}"))?;
        Ok(status.intersects(INDEX_CHANGES) && status.intersects(WORKTREE_CHANGES))
    }

    pub fn load_file_patch(&self, file_path: &str, options: PatchOptions) -> Result<FilePatch> {
        let repo = self.open()?;
        let mut diff_options = self.diff_options(file_path);

        let diff = if options.staged {
            let baseline = if options.amending {
                amended_parent_tree(&repo)
            } else {
                head_tree(&repo)
            };
            repo.diff_tree_to_index(baseline.as_ref(), None, Some(&mut diff_options))
                .context("failed to build staged diff")?
        } else {
            repo.diff_index_to_workdir(None, Some(&mut diff_options))
                .context("failed to build unstaged diff")?
        };

        let patch = render_patch(&diff)?;
        debug!(
            "loaded {} byte patch for {file_path} (staged: {}, amending: {})",
            patch.len(),
            options.staged,
            options.amending
        );
        Ok(FilePatch::parse(file_path, &patch))
    }

    fn open(&self) -> Result<git2::Repository> {
        git2::Repository::open(&self.root)
            .or_else(|_| git2::Repository::discover(&self.root))
            .context("failed to open git repository")
    }

    fn diff_options(&self, file_path: &str) -> DiffOptions {
        let mut options = DiffOptions::new();
        options
            .pathspec(file_path)
            .disable_pathspec_match(true)
            .context_lines(self.context_lines)
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .show_untracked_content(true);
        options
    }
}

impl Repository for GitRepository {
    fn is_partially_staged<'a>(&'a self, file_path: &'a str) -> LocalBoxFuture<'a, Result<bool>> {
        async move { self.partially_staged(file_path) }.boxed_local()
    }

    fn file_patch_for_path<'a>(
        &'a self,
        file_path: &'a str,
        options: PatchOptions,
    ) -> LocalBoxFuture<'a, Result<FilePatch>> {
        async move { self.load_file_patch(file_path, options) }.boxed_local()
    }
}

fn repo_root(repo: &git2::Repository) -> Result<PathBuf> {
    if let Some(workdir) = repo.workdir() {
        return Ok(workdir.to_path_buf());
    }

    repo.path()
        .parent()
        .map(|path| path.to_path_buf())
        .context("failed to resolve repository root")
}

fn head_tree(repo: &git2::Repository) -> Option<Tree<'_>> {
    repo.head().ok().and_then(|head| head.peel_to_tree().ok())
}

// The commit being amended is HEAD, so its changes are measured from HEAD's
// first parent. A root commit is measured from the empty tree.
fn amended_parent_tree(repo: &git2::Repository) -> Option<Tree<'_>> {
    repo.head()
        .ok()
        .and_then(|head| head.peel_to_commit().ok())
        .and_then(|commit| commit.parent(0).ok())
        .and_then(|parent| parent.tree().ok())
}

fn render_patch(diff: &Diff<'_>) -> Result<String> {
    let mut patch = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if matches!(line.origin(), '+' | '-' | ' ') {
            patch.push(line.origin());
        }
        patch.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .context("failed to render diff patch")?;

    Ok(patch)
}
