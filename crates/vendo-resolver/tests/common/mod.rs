//! In-memory repositories and sources shared by the engine tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use vendo_core::module::UnitMeta;
use vendo_core::naming;
use vendo_resolver::{Collaborators, ExtractError, ImportExtractor, StdlibClassifier};
use vendo_util::errors::VendoError;
use vendo_vcs::{BackendFactory, Repo, VcsKind};

#[derive(Debug, Default, Clone)]
struct Upstream {
    head: String,
    tags: Vec<String>,
    imports: Vec<String>,
    manifest: Option<String>,
    fail_fetch: bool,
}

#[derive(Debug, Default)]
struct World {
    install_root: PathBuf,
    root_imports: Vec<String>,
    upstream: HashMap<String, Upstream>,
    installed: HashSet<String>,
    current: HashMap<String, String>,
    dirty: HashSet<String>,
    fetches: HashMap<String, usize>,
    updates: HashMap<String, Vec<String>>,
}

/// A set of remote modules plus the local state of their checkouts.
#[derive(Debug, Clone)]
pub struct Fake {
    world: Arc<Mutex<World>>,
    extractor_calls: Arc<AtomicUsize>,
}

impl Fake {
    pub fn new(install_root: &Path) -> Self {
        let world = World {
            install_root: install_root.to_path_buf(),
            ..Default::default()
        };
        Self {
            world: Arc::new(Mutex::new(world)),
            extractor_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn with(self, f: impl FnOnce(&mut World)) -> Self {
        f(&mut self.world.lock().unwrap());
        self
    }

    fn upstream(self, name: &str, f: impl FnOnce(&mut Upstream)) -> Self {
        self.with(|w| {
            let up = w.upstream.entry(name.to_string()).or_insert_with(|| Upstream {
                head: format!("head-{}", name.rsplit('/').next().unwrap_or(name)),
                ..Default::default()
            });
            f(up);
        })
    }

    pub fn root_imports(self, imports: &[&str]) -> Self {
        self.with(|w| w.root_imports = imports.iter().map(|s| s.to_string()).collect())
    }

    pub fn module(self, name: &str, imports: &[&str]) -> Self {
        let imports = imports.iter().map(|s| s.to_string()).collect();
        self.upstream(name, |u| u.imports = imports)
    }

    pub fn tags(self, name: &str, tags: &[&str]) -> Self {
        let tags = tags.iter().map(|s| s.to_string()).collect();
        self.upstream(name, |u| u.tags = tags)
    }

    pub fn manifest(self, name: &str, text: &str) -> Self {
        let text = text.to_string();
        self.upstream(name, |u| u.manifest = Some(text))
    }

    pub fn failing(self, name: &str) -> Self {
        self.upstream(name, |u| u.fail_fetch = true)
    }

    /// Mark `name` as already checked out at its head.
    pub fn preinstalled(self, name: &str) -> Self {
        let fake = self.upstream(name, |_| {});
        let dir = fake.local_dir(name);
        std::fs::create_dir_all(&dir).unwrap();
        fake.with(|w| {
            let head = w.upstream[name].head.clone();
            w.installed.insert(name.to_string());
            w.current.insert(name.to_string(), head);
        })
    }

    pub fn dirty(self, name: &str) -> Self {
        self.with(|w| {
            w.dirty.insert(name.to_string());
        })
    }

    pub fn local_dir(&self, name: &str) -> PathBuf {
        vendo_util::fs::join_module_path(&self.world.lock().unwrap().install_root, name)
    }

    pub fn fetches(&self, name: &str) -> usize {
        self.world
            .lock()
            .unwrap()
            .fetches
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn updates(&self, name: &str) -> Vec<String> {
        self.world
            .lock()
            .unwrap()
            .updates
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn extractor_calls(&self) -> usize {
        self.extractor_calls.load(Ordering::SeqCst)
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            extractor: Arc::new(FakeSource(self.clone())),
            classifier: Arc::new(StdlibClassifier),
            backends: Arc::new(FakeBackends(self.clone())),
        }
    }

    fn module_at(&self, path: &Path) -> Option<String> {
        let w = self.world.lock().unwrap();
        vendo_util::fs::module_name_under(&w.install_root, path)
    }
}

struct FakeSource(Fake);

impl ImportExtractor for FakeSource {
    fn import(&self, name: &str, cwd: &Path) -> Result<UnitMeta, ExtractError> {
        self.0.extractor_calls.fetch_add(1, Ordering::SeqCst);
        let w = self.0.world.lock().unwrap();
        if name == "." {
            return Ok(UnitMeta {
                dir: cwd.to_path_buf(),
                import_path: ".".to_string(),
                imports: w.root_imports.clone(),
            });
        }
        let module = naming::strip_vendor(name);
        match w.upstream.get(module) {
            Some(up) if w.installed.contains(module) => Ok(UnitMeta {
                dir: vendo_util::fs::join_module_path(&w.install_root, module),
                import_path: name.to_string(),
                imports: up.imports.clone(),
            }),
            _ => Err(ExtractError::NotFound {
                name: name.to_string(),
            }),
        }
    }
}

struct FakeBackends(Fake);

impl BackendFactory for FakeBackends {
    fn open(&self, path: &Path) -> Option<Arc<dyn Repo>> {
        let module = self.0.module_at(path)?;
        if !self.0.world.lock().unwrap().installed.contains(&module) {
            return None;
        }
        Some(Arc::new(FakeRepo {
            fake: self.0.clone(),
            module: module.clone(),
            remote: format!("fake://{module}"),
            local: path.to_path_buf(),
        }))
    }

    fn create(
        &self,
        kind: VcsKind,
        remote: &str,
        local: &Path,
    ) -> Result<Arc<dyn Repo>, VendoError> {
        assert_ne!(kind, VcsKind::None);
        let module = self.0.module_at(local).ok_or_else(|| VendoError::Vcs {
            message: format!("{} is outside the install root", local.display()),
        })?;
        Ok(Arc::new(FakeRepo {
            fake: self.0.clone(),
            module,
            remote: remote.to_string(),
            local: local.to_path_buf(),
        }))
    }
}

#[derive(Debug)]
struct FakeRepo {
    fake: Fake,
    module: String,
    remote: String,
    local: PathBuf,
}

impl FakeRepo {
    fn world(&self) -> std::sync::MutexGuard<'_, World> {
        self.fake.world.lock().unwrap()
    }
}

impl Repo for FakeRepo {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn remote(&self) -> &str {
        &self.remote
    }

    fn local_path(&self) -> &Path {
        &self.local
    }

    fn check_local(&self) -> bool {
        self.world().installed.contains(&self.module)
    }

    fn is_dirty(&self) -> bool {
        self.world().dirty.contains(&self.module)
    }

    fn get(&self) -> Result<(), VendoError> {
        let mut w = self.world();
        let up = w.upstream.get(&self.module).cloned().unwrap_or_default();
        if up.fail_fetch {
            return Err(VendoError::Vcs {
                message: "network unreachable".to_string(),
            });
        }
        std::fs::create_dir_all(&self.local)?;
        if let Some(text) = &up.manifest {
            std::fs::write(self.local.join(vendo_core::MANIFEST_FILE), text)?;
        }
        *w.fetches.entry(self.module.clone()).or_default() += 1;
        w.installed.insert(self.module.clone());
        w.current.insert(self.module.clone(), up.head);
        Ok(())
    }

    fn update_version(&self, reference: &str) -> Result<(), VendoError> {
        let mut w = self.world();
        let up = w.upstream.get(&self.module).cloned().unwrap_or_default();
        if up.head != reference && !up.tags.iter().any(|t| t == reference) {
            return Err(VendoError::Vcs {
                message: format!("unknown revision {reference}"),
            });
        }
        w.current.insert(self.module.clone(), reference.to_string());
        w.updates
            .entry(self.module.clone())
            .or_default()
            .push(reference.to_string());
        Ok(())
    }

    fn is_reference(&self, reference: &str) -> bool {
        self.world().current.get(&self.module).map(String::as_str) == Some(reference)
    }

    fn version(&self) -> Result<String, VendoError> {
        self.world()
            .current
            .get(&self.module)
            .cloned()
            .ok_or_else(|| VendoError::Vcs {
                message: "not checked out".to_string(),
            })
    }

    fn tags(&self) -> Result<Vec<String>, VendoError> {
        Ok(self
            .world()
            .upstream
            .get(&self.module)
            .map(|u| u.tags.clone())
            .unwrap_or_default())
    }
}
