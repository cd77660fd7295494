//! What each engine operation did, returned to callers instead of only logged.

use vendo_core::module::NodeId;
use vendo_util::errors::VendoError;

use crate::imports::ResolvedImports;

/// Result of the fetch step of an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A checkout already existed locally.
    Present,
    Fetched,
    /// The fetch failed; the install carried on to the checkout step.
    Failed(String),
}

/// Result of pinning a working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The root module is never checked out.
    Root,
    /// There is no local checkout to pin.
    NotInstalled,
    /// Local modifications; the working copy was left alone.
    Dirty,
    /// Already at the requested target.
    Current,
    /// Moved to the requested target.
    Updated { reference: String },
    /// No target was requested; the current revision was recorded.
    Recorded { reference: String },
}

impl CheckoutOutcome {
    /// Whether the working copy's revision was (re)recorded on the node.
    pub fn pinned(&self) -> bool {
        matches!(self, Self::Updated { .. } | Self::Recorded { .. })
    }
}

/// What happened with a module's own manifest after checkout.
#[derive(Debug)]
pub enum ManifestOutcome {
    /// The checkout step ended early; no manifest was looked for.
    Skipped,
    /// The module's manifest was loaded, hydrating this many direct dependencies.
    Loaded { dependencies: usize },
    /// No manifest; the parent was rebuilt from source.
    Rederived(Box<BuildReport>),
    /// No manifest and no parent metadata to rebuild from.
    Absent(String),
}

#[derive(Debug)]
pub struct CheckoutReport {
    pub outcome: CheckoutOutcome,
    pub manifest: ManifestOutcome,
}

impl CheckoutReport {
    pub(crate) fn early(outcome: CheckoutOutcome) -> Self {
        Self {
            outcome,
            manifest: ManifestOutcome::Skipped,
        }
    }
}

#[derive(Debug)]
pub struct InstallReport {
    pub name: String,
    pub fetch: FetchOutcome,
    pub checkout: CheckoutReport,
}

/// Install of one child, spawned while building or installing its parent.
#[derive(Debug)]
pub struct DepInstall {
    pub id: NodeId,
    pub name: String,
    pub result: Result<InstallReport, VendoError>,
}

/// Output of [`crate::Resolver::build`].
#[derive(Debug, Default)]
pub struct BuildReport {
    pub module: String,
    pub imports: ResolvedImports,
    /// Modules attached as new children, in discovery order.
    pub created: Vec<String>,
    /// Modules already present in scope.
    pub reused: Vec<String>,
    /// Sub-packages of the module itself and names of its ancestors.
    pub skipped: Vec<String>,
    /// Installs of the created children, in the same order as `created`.
    pub installs: Vec<DepInstall>,
}

/// Totals across a tree of reports.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub fetched: usize,
    pub fetch_failures: Vec<String>,
    pub pinned: usize,
    pub current: usize,
    pub dirty: Vec<String>,
    pub errors: Vec<String>,
}

impl Summary {
    pub fn from_installs(installs: &[DepInstall]) -> Self {
        let mut s = Self::default();
        s.add_installs(installs);
        s
    }

    pub fn add_installs(&mut self, installs: &[DepInstall]) {
        for dep in installs {
            match &dep.result {
                Ok(report) => self.add_install(report),
                Err(e) => self.errors.push(e.to_string()),
            }
        }
    }

    pub fn add_build(&mut self, build: &BuildReport) {
        self.add_installs(&build.installs);
    }

    fn add_install(&mut self, report: &InstallReport) {
        match &report.fetch {
            FetchOutcome::Fetched => self.fetched += 1,
            FetchOutcome::Failed(_) => self.fetch_failures.push(report.name.clone()),
            FetchOutcome::Present => {}
        }
        match &report.checkout.outcome {
            CheckoutOutcome::Dirty => self.dirty.push(report.name.clone()),
            CheckoutOutcome::Current => self.current += 1,
            o if o.pinned() => self.pinned += 1,
            _ => {}
        }
        if let ManifestOutcome::Rederived(build) = &report.checkout.manifest {
            self.add_build(build);
        }
    }

    pub fn is_clean(&self) -> bool {
        self.fetch_failures.is_empty() && self.errors.is_empty()
    }
}
