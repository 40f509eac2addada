//! Integration tests for staged change collection.

mod common;

use common::TestRepo;
use diffscribe::CollectError;
use diffscribe::git::{collect_staged, open_repository};
use diffscribe::llm::build_prompt;

#[test]
fn test_modified_file_is_listed_with_zero_context_diff() {
    let repo = TestRepo::new();
    repo.commit_file("notes.txt", "one\ntwo\nthree\n", "init");
    repo.stage_file("notes.txt", "one\n2\nthree\n");

    let context = collect_staged(&repo.repo).unwrap();
    assert_eq!(context.paths, vec!["notes.txt"]);
    assert!(context.diff.contains("-two"));
    assert!(context.diff.contains("+2"));
    // Zero context lines: unchanged neighbours are not included.
    assert!(!context.diff.contains(" one"));
}

#[test]
fn test_deleted_file_uses_old_path() {
    let repo = TestRepo::new();
    repo.commit_file("gone.txt", "bye\n", "init");
    repo.stage_removal("gone.txt");

    let context = collect_staged(&repo.repo).unwrap();
    assert_eq!(context.paths, vec!["gone.txt"]);
    assert!(context.diff.contains("-bye"));
}

#[test]
fn test_rename_reports_new_path() {
    let content = "a reasonably long line so similarity detection has something to match\n"
        .repeat(5);
    let repo = TestRepo::new();
    repo.commit_file("old_name.txt", &content, "init");
    repo.stage_removal("old_name.txt");
    repo.stage_file("new_name.txt", &content);

    let context = collect_staged(&repo.repo).unwrap();
    assert_eq!(context.paths, vec!["new_name.txt"]);
}

#[test]
fn test_multiple_files_in_index_order() {
    let repo = TestRepo::new();
    repo.commit_file("base.txt", "base\n", "init");
    repo.stage_file("b.txt", "b\n");
    repo.stage_file("a.txt", "a\n");

    let context = collect_staged(&repo.repo).unwrap();
    assert_eq!(context.paths, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_nothing_staged() {
    let repo = TestRepo::new();
    repo.commit_file("base.txt", "base\n", "init");

    assert!(matches!(
        collect_staged(&repo.repo),
        Err(CollectError::NoStagedChanges)
    ));
}

#[test]
fn test_not_a_repository() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does/not/exist");
    assert!(matches!(
        open_repository(&missing),
        Err(CollectError::OpenRepository(_))
    ));
}

#[test]
fn test_collected_context_feeds_prompt() {
    let repo = TestRepo::new();
    repo.commit_file("base.txt", "base\n", "init");
    repo.stage_file("feature.rs", "fn feature() {}\n");

    let context = collect_staged(&repo.repo).unwrap();
    let prompt = build_prompt(&context, 4);
    assert!(prompt.contains("- feature.rs"));
    assert!(prompt.contains("+fn feature() {}"));
    assert!(prompt.contains("Return up to 4 git commit message suggestions"));
}
