//! Local git working copy backed by libgit2.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{BranchType, ErrorCode, IndexAddOption, Repository, Signature};

use super::{VcsError, VersionControl};

const REMOTE: &str = "origin";

pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Find the working copy containing `path`.
    ///
    /// Returns `None` outside a repository or for a bare repository.
    pub fn detect(path: impl AsRef<Path>) -> Option<Self> {
        let repo = Repository::discover(path.as_ref()).ok()?;
        if repo.is_bare() {
            return None;
        }
        Some(Self { repo })
    }

    pub fn workdir(&self) -> Option<PathBuf> {
        self.repo.workdir().map(Path::to_path_buf)
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    fn signature(&self) -> Result<Signature<'static>, git2::Error> {
        self.repo
            .signature()
            .or_else(|_| Signature::now("bookwright", "bookwright@localhost"))
    }

    fn head_is_unborn(&self) -> bool {
        matches!(self.repo.head(), Err(ref e) if e.code() == ErrorCode::UnbornBranch)
    }
}

impl VersionControl for GitRepository {
    fn active_branch(&self) -> Result<String, VcsError> {
        match self.repo.head() {
            Ok(head) => {
                if !head.is_branch() {
                    return Err(VcsError::DetachedHead);
                }
                head.shorthand()
                    .map(str::to_string)
                    .ok_or(VcsError::DetachedHead)
            }
            // Fresh repository: HEAD names a branch that has no commits yet.
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                head.symbolic_target()
                    .and_then(|t| t.strip_prefix("refs/heads/"))
                    .map(str::to_string)
                    .ok_or(VcsError::DetachedHead)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn create_or_switch_branch(&self, name: &str) -> Result<(), VcsError> {
        let refname = format!("refs/heads/{}", name);

        if self.head_is_unborn() {
            self.repo.set_head(&refname)?;
            tracing::info!(branch = name, "Switched unborn HEAD");
            return Ok(());
        }

        match self.repo.find_branch(name, BranchType::Local) {
            Ok(_) => {
                let target = self.repo.revparse_single(&refname)?;
                self.repo
                    .checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;
                self.repo.set_head(&refname)?;
                tracing::info!(branch = name, "Switched to existing branch");
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                let commit = self.repo.head()?.peel_to_commit()?;
                self.repo.branch(name, &commit, false)?;
                self.repo.set_head(&refname)?;
                tracing::info!(branch = name, "Created branch");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn stage_and_commit(&self, message: &str) -> Result<Option<String>, VcsError> {
        let mut index = self.repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"], None)?;
        index.write()?;
        let tree_oid = index.write_tree()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };

        let unchanged = match &parent {
            Some(commit) => commit.tree_id() == tree_oid,
            None => index.is_empty(),
        };
        if unchanged {
            tracing::info!("Nothing to commit");
            return Ok(None);
        }

        let tree = self.repo.find_tree(tree_oid)?;
        let sig = self.signature()?;
        let parents: Vec<_> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        tracing::info!(commit = %oid, "Committed changes");
        Ok(Some(oid.to_string()))
    }

    fn push_current(&self) -> Result<String, VcsError> {
        let branch = self.active_branch()?;
        let mut remote = self
            .repo
            .find_remote(REMOTE)
            .map_err(|_| VcsError::Push(format!("no '{}' remote configured", REMOTE)))?;

        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
        let rejection: RefCell<Option<String>> = RefCell::new(None);

        {
            let cfg = self.repo.config().ok();
            let mut callbacks = git2::RemoteCallbacks::new();
            callbacks.credentials(move |url, username_from_url, allowed| {
                if allowed.is_ssh_key() {
                    if let Some(user) = username_from_url {
                        return git2::Cred::ssh_key_from_agent(user);
                    }
                }
                if allowed.is_user_pass_plaintext() {
                    if let Some(ref cfg) = cfg {
                        if let Ok(cred) =
                            git2::Cred::credential_helper(cfg, url, username_from_url)
                        {
                            return Ok(cred);
                        }
                    }
                }
                git2::Cred::default()
            });
            callbacks.push_update_reference(|_ref_name, status| {
                if let Some(msg) = status {
                    *rejection.borrow_mut() = Some(msg.to_string());
                }
                Ok(())
            });

            let mut options = git2::PushOptions::new();
            options.remote_callbacks(callbacks);

            remote
                .push(&[refspec.as_str()], Some(&mut options))
                .map_err(|e| VcsError::Push(e.message().to_string()))?;
        }

        if let Some(msg) = rejection.into_inner() {
            return Err(VcsError::Push(msg));
        }

        tracing::info!(remote = REMOTE, %refspec, "Pushed branch");
        Ok(refspec)
    }
}
