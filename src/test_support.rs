//! Throwaway git repositories for tests.

use git2::{Repository, Signature};
use std::path::Path;
use tempfile::TempDir;

/// A repository in a temp dir with `origin` set and one commit on a branch.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new(origin_url: &str, branch: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path(), origin_url);
        commit_on_branch(&repo, branch);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn open(&self) -> Repository {
        Repository::open(self.dir.path()).unwrap()
    }
}

/// Initialize an empty repository at `path` with an `origin` remote.
pub fn init_repo(path: &Path, origin_url: &str) -> Repository {
    let repo = Repository::init(path).unwrap();
    repo.remote("origin", origin_url).unwrap();
    repo
}

/// Commit the current index and check out `branch` pointing at the new commit.
pub fn commit_on_branch(repo: &Repository, branch: &str) {
    let sig = Signature::now("Test", "test@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let oid = repo
        .commit(None, &sig, &sig, "commit", &tree, &parents)
        .unwrap();
    let commit = repo.find_commit(oid).unwrap();

    repo.branch(branch, &commit, true).unwrap();
    repo.set_head(&format!("refs/heads/{}", branch)).unwrap();
}
