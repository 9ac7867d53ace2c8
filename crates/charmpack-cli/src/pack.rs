//! Pack command implementation
//!
//! Decides whether the project is a charm or a bundle and dispatches to the
//! matching build path.

use crate::build::{BuildRequest, CharmBuilder};
use crate::deprecations::DeprecationNotifier;
use charmpack_core::{PackError, PackResult, ProjectConfig, ProjectKind};
use charmpack_package::{BundleAssembler, CHARM_EXTENSION, archive_path, build_zip};
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments of `charmpack pack`
#[derive(Debug, Clone, Default, Args)]
pub struct PackArgs {
    /// Project directory (default: current directory)
    #[arg(short = 'p', long = "project-dir")]
    pub project_dir: Option<PathBuf>,

    /// Entry point of the charm (charms only)
    #[arg(short = 'e', long = "entry", value_parser = useful_filepath)]
    pub entrypoint: Option<PathBuf>,

    /// File with the charm's Python dependencies; may be repeated (charms only)
    #[arg(short = 'r', long = "requirement", value_parser = useful_filepath)]
    pub requirement: Vec<PathBuf>,

    /// Index of a base to build for; may be repeated (default: all bases)
    #[arg(long = "bases-index")]
    pub bases_index: Vec<usize>,

    /// Build directly on the host instead of inside a managed instance
    #[arg(long)]
    pub destructive_mode: bool,

    /// Pack even if the charm has linting errors
    #[arg(long)]
    pub force: bool,
}

/// Value parser for options that must name an existing regular file
pub fn useful_filepath(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("Cannot access '{value}'."));
    }
    if !path.is_file() {
        return Err(format!("'{value}' is not a regular file."));
    }
    Ok(path)
}

/// What a pack invocation will do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackPlan {
    /// Assemble a bundle locally
    Bundle,
    /// Hand the request to the charm builder, then archive its output
    Charm(BuildRequest),
}

/// The pack command for one project
pub struct PackCommand<'a, B> {
    config: &'a ProjectConfig,
    builder: B,
    notifier: &'a DeprecationNotifier,
    managed_mode: bool,
}

impl<'a, B: CharmBuilder> PackCommand<'a, B> {
    pub fn new(config: &'a ProjectConfig, builder: B) -> Self {
        Self {
            config,
            builder,
            notifier: DeprecationNotifier::global(),
            managed_mode: false,
        }
    }

    /// Whether we run inside a managed instance
    #[must_use]
    pub fn managed_mode(mut self, managed_mode: bool) -> Self {
        self.managed_mode = managed_mode;
        self
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_notifier(mut self, notifier: &'a DeprecationNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Decide what to build, without touching the filesystem
    pub fn plan(&self, args: &PackArgs) -> PackResult<PackPlan> {
        match self.config.kind {
            Some(ProjectKind::Bundle) => {
                if !args.requirement.is_empty() {
                    return Err(PackError::InvalidOptionCombination {
                        flag: "-r/--requirement",
                    });
                }
                if args.entrypoint.is_some() {
                    return Err(PackError::InvalidOptionCombination { flag: "-e/--entry" });
                }
                Ok(PackPlan::Bundle)
            }
            Some(ProjectKind::Charm) | None => Ok(PackPlan::Charm(BuildRequest {
                from: self.config.project_dir().to_path_buf(),
                requirement: args.requirement.clone(),
                entrypoint: args.entrypoint.clone(),
                bases_indices: args.bases_index.clone(),
                destructive_mode: args.destructive_mode,
                force: args.force,
            })),
        }
    }

    /// Pack the project, returning the archives created
    pub fn run(&self, args: &PackArgs) -> PackResult<Vec<PathBuf>> {
        if !self.config.project.config_provided {
            self.notifier.notify("dn01", self.managed_mode);
        }

        let plan = self.plan(args)?;
        debug!("Packing {} project", plan_kind(&plan));

        match plan {
            PackPlan::Bundle => Ok(vec![BundleAssembler::new(self.config).assemble()?]),
            PackPlan::Charm(request) => self.pack_charm(&request),
        }
    }

    fn pack_charm(&self, request: &BuildRequest) -> PackResult<Vec<PathBuf>> {
        let staged = self.builder.build(request)?;

        let mut archives = Vec::with_capacity(staged.len());
        for charm in &staged {
            let zip_path = archive_path(self.config.project_dir(), &charm.name, CHARM_EXTENSION)?;
            build_zip(&zip_path, &charm.staged_dir)?;
            info!("Created '{}'.", zip_path.display());
            archives.push(zip_path);
        }
        Ok(archives)
    }
}

fn plan_kind(plan: &PackPlan) -> ProjectKind {
    match plan {
        PackPlan::Bundle => ProjectKind::Bundle,
        PackPlan::Charm(_) => ProjectKind::Charm,
    }
}
