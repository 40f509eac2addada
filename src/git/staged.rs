//! Collect the staged change set from a repository using git2.

use std::path::Path;

use git2::{Diff, DiffFindOptions, DiffFormat, DiffOptions, ErrorCode, Repository, Tree};
use tracing::{debug, warn};

use crate::error::CollectError;
use crate::llm::GenerationContext;

/// Maximum bytes of diff text collected before truncation.
const MAX_DIFF_LENGTH: usize = 8_000;

/// Branch label used when HEAD does not name a branch.
const DETACHED_BRANCH: &str = "HEAD";

/// Open the repository containing `path`, searching parent directories.
pub fn open_repository(path: impl AsRef<Path>) -> Result<Repository, CollectError> {
    Repository::discover(path).map_err(CollectError::OpenRepository)
}

/// Collect branch, staged paths, and the staged zero-context diff.
///
/// Returns [`CollectError::NoStagedChanges`] when the index matches HEAD.
pub fn collect_staged(repo: &Repository) -> Result<GenerationContext, CollectError> {
    let head_tree = resolve_head_tree(repo)?;

    let mut opts = DiffOptions::new();
    opts.context_lines(0);
    let mut diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
        .map_err(CollectError::DiffFailed)?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(CollectError::DiffFailed)?;

    let paths = staged_paths(&diff);
    if paths.is_empty() {
        return Err(CollectError::NoStagedChanges);
    }

    let diff = diff_text(&diff);
    let branch = current_branch(repo);
    debug!(
        branch = %branch,
        files = paths.len(),
        diff_len = diff.len(),
        "Collected staged changes"
    );

    Ok(GenerationContext {
        branch,
        paths,
        diff,
        ..Default::default()
    })
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// so every indexed file counts as added.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, CollectError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(CollectError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(CollectError::DiffFailed)?;
    Ok(Some(tree))
}

/// Short branch name, the unborn branch name, or `HEAD` when detached.
fn current_branch(repo: &Repository) -> String {
    match repo.head() {
        Ok(head) if head.is_branch() => head
            .shorthand()
            .map(str::to_string)
            .unwrap_or_else(|| DETACHED_BRANCH.to_string()),
        Ok(_) => DETACHED_BRANCH.to_string(),
        Err(_) => unborn_branch_name(repo).unwrap_or_else(|| DETACHED_BRANCH.to_string()),
    }
}

fn unborn_branch_name(repo: &Repository) -> Option<String> {
    let head = repo.find_reference("HEAD").ok()?;
    let target = head.symbolic_target()?;
    target.strip_prefix("refs/heads/").map(str::to_string)
}

/// Paths touched by the diff, reporting renames under their new path.
fn staged_paths(diff: &Diff<'_>) -> Vec<String> {
    diff.deltas()
        .filter_map(|delta| {
            let new_path = delta
                .new_file()
                .path()
                .map(|p| p.to_string_lossy().to_string());
            new_path.or_else(|| {
                delta
                    .old_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string())
            })
        })
        .filter(|path| !path.is_empty())
        .collect()
}

/// Render the diff as patch text, truncated on a char boundary.
fn diff_text(diff: &Diff<'_>) -> String {
    let mut text = String::new();
    let mut truncated = false;

    let result = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if matches!(origin, '+' | '-' | ' ') {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));

        if text.len() > MAX_DIFF_LENGTH {
            truncated = true;
            return false;
        }
        true
    });

    // Aborting the callback surfaces as an error; only warn on real failures.
    if let Err(e) = result
        && !truncated
    {
        warn!("Failed to render staged diff: {e}");
    }

    if truncated {
        let mut end = MAX_DIFF_LENGTH;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("\n…");
    }

    text
}
