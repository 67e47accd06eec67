// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform chain manager — runs one plan end to end.
//
// Forward: protect a copy of the source (`pre`), process the readable input
// into the output, protect the output (`post`).
//
// Reverse: peel the suffix chain of the input one layer at a time inside a
// scratch directory, then process every fully unwrapped file. The security
// primitives only ever undo a single layer; the loop lives here.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rechenwerk_core::error::{RechenError, Result};
use rechenwerk_core::{
    Artifact, ArtifactRole, EngineConfig, FormatTag, ProcessingPlan, RunOutcome, TransformChain,
    TransformKind, TransformStep, fs,
};
use rechenwerk_document::DocumentProcessor;
use rechenwerk_security::{hash_file, transforms, verify_hash};
use tracing::{debug, info, instrument};

/// Nesting beyond this is refused rather than unwound.
const MAX_UNWRAP_DEPTH: usize = 32;

/// Drives the document processor and the protective transforms.
#[derive(Debug, Clone, Default)]
pub struct TransformChainManager {
    processor: DocumentProcessor,
}

impl TransformChainManager {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            processor: DocumentProcessor::new(config),
        }
    }

    pub fn processor(&self) -> &DocumentProcessor {
        &self.processor
    }

    /// Process `plan.input` into `plan.output`, applying `pre` to the source
    /// and `post` to the result.
    ///
    /// Every file written is listed in the outcome with its SHA-256, and
    /// each fingerprint is checked against the disk before returning.
    #[instrument(skip_all, fields(input = %plan.input.display(), output = %plan.output.display()))]
    pub fn run_forward(&self, plan: &ProcessingPlan) -> Result<RunOutcome> {
        let (input_format, output_format) = plan.resolve_formats()?;
        let mut outcome = RunOutcome::default();

        if !plan.pre.is_empty() {
            protect(&plan.input, &plan.pre, ArtifactRole::ProtectedSource, &mut outcome)?;
        }

        self.processor
            .process(&plan.input, &plan.output, input_format, output_format)?;
        record(&mut outcome, &plan.output, ArtifactRole::Output)?;

        if !plan.post.is_empty() {
            protect(&plan.output, &plan.post, ArtifactRole::ProtectedOutput, &mut outcome)?;
        }
        verify_outcome(&outcome)?;

        info!(artifacts = outcome.artifacts.len(), "forward run complete");
        Ok(outcome)
    }

    /// Unwrap `plan.input` completely and process what comes out.
    ///
    /// One unwrapped file is written to `plan.output`; several are written
    /// into `plan.output` as a directory, each under its path relative to
    /// the archive it came from. Two files that would land on the same path
    /// fail the run before anything is written.
    /// Formats not fixed by the plan are inferred per file: input from the
    /// unwrapped name, output from the target name, falling back to the
    /// input format.
    #[instrument(skip_all, fields(input = %plan.input.display(), output = %plan.output.display()))]
    pub fn run_reverse(&self, plan: &ProcessingPlan) -> Result<Vec<PathBuf>> {
        let source = &plan.input;
        let chain = TransformChain::parse(source);
        if chain.is_bare() {
            return Err(RechenError::InvalidChain(format!(
                "{} carries no protective suffix",
                source.display()
            )));
        }
        debug!(state = ?chain.state(), base = %chain.base().display(), "unwinding");

        let temp_root = std::env::temp_dir();
        let scratch = tempfile::tempdir().map_err(RechenError::io_at(&temp_root))?;
        let origin = parent_dir(source);

        let unwrapped = Unwinder {
            scratch: scratch.path(),
            origin: &origin,
            layers: 0,
        }
        .unwind(source)?;
        if unwrapped.is_empty() {
            return Err(RechenError::InvalidChain(format!(
                "{} unwrapped to no files",
                source.display()
            )));
        }

        let targets = output_targets(&plan.output, &unwrapped)?;
        for (file, target) in unwrapped.iter().zip(&targets) {
            let file = &file.path;
            let input_format = match plan.input_format {
                Some(tag) => tag,
                None => FormatTag::infer(file)?,
            };
            let output_format = plan
                .output_format
                .or_else(|| FormatTag::infer(target).ok())
                .unwrap_or(input_format);
            self.processor
                .process(file, target, input_format, output_format)?;
        }

        info!(outputs = targets.len(), "reverse run complete");
        Ok(targets)
    }
}

/// Apply `steps` to `path` in order, recording every produced file.
fn protect(
    path: &Path,
    steps: &[TransformStep],
    role: ArtifactRole,
    outcome: &mut RunOutcome,
) -> Result<PathBuf> {
    let mut chain = TransformChain::bare(path);
    for &step in steps {
        let produced = transforms::apply(&chain.current_path(), step)?;
        let expected = chain.push(step);
        debug_assert_eq!(produced, expected);

        if let Some(TransformKind::Encrypt { key_file }) = chain.applied().last() {
            record(outcome, key_file, ArtifactRole::KeyFile)?;
        }
        record(outcome, &produced, role)?;
    }
    debug!(state = ?chain.state(), "protective chain applied");
    Ok(chain.current_path())
}

fn record(outcome: &mut RunOutcome, path: &Path, role: ArtifactRole) -> Result<()> {
    outcome.artifacts.push(Artifact {
        path: path.to_path_buf(),
        role,
        sha256: hash_file(path)?,
    });
    Ok(())
}

/// A later step may overwrite an earlier artifact when paths collide.
fn verify_outcome(outcome: &RunOutcome) -> Result<()> {
    for artifact in &outcome.artifacts {
        verify_hash(&fs::read(&artifact.path)?, &artifact.sha256)?;
    }
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn output_targets(output: &Path, unwrapped: &[Unwrapped]) -> Result<Vec<PathBuf>> {
    if let [_single] = unwrapped {
        return Ok(vec![output.to_path_buf()]);
    }

    let mut seen = HashSet::new();
    let targets = unwrapped
        .iter()
        .map(|file| {
            let target = output.join(&file.relative);
            if seen.insert(target.clone()) {
                Ok(target)
            } else {
                Err(RechenError::InvalidChain(format!(
                    "more than one unwrapped file maps to {}",
                    target.display()
                )))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    for target in &targets {
        let dir = parent_dir(target);
        std::fs::create_dir_all(&dir).map_err(RechenError::io_at(&dir))?;
    }
    Ok(targets)
}

/// A fully unwrapped file and where it sits relative to its archive.
#[derive(Debug)]
struct Unwrapped {
    path: PathBuf,
    relative: PathBuf,
}

/// Undoes one layer at a time, each into a fresh scratch subdirectory.
struct Unwinder<'a> {
    scratch: &'a Path,
    origin: &'a Path,
    layers: usize,
}

impl Unwinder<'_> {
    /// Fully unwrapped files, in archive order.
    fn unwind(&mut self, source: &Path) -> Result<Vec<Unwrapped>> {
        let name = source.file_name().map(PathBuf::from).ok_or_else(|| {
            RechenError::InvalidChain(format!("{} has no file name", source.display()))
        })?;
        let mut pending = vec![(source.to_path_buf(), name, 0usize)];
        let mut unwrapped = Vec::new();

        while let Some((file, relative, depth)) = pending.pop() {
            let mut chain = TransformChain::parse(&file);
            let Some(outermost) = chain.pop() else {
                unwrapped.push(Unwrapped {
                    path: file,
                    relative,
                });
                continue;
            };
            if depth >= MAX_UNWRAP_DEPTH {
                return Err(RechenError::InvalidChain(format!(
                    "{} is nested more than {MAX_UNWRAP_DEPTH} layers deep",
                    source.display()
                )));
            }

            // Paths below the layer directory, which is what `relative` tracks.
            let (layer, produced) = match outermost {
                TransformKind::Encrypt { key_file } => {
                    let decrypted = self.decrypt(&file, &chain.current_path(), &key_file)?;
                    (parent_dir(&decrypted), vec![decrypted])
                }
                TransformKind::Archive { .. } => {
                    let dest = self.fresh_dir()?;
                    let members = transforms::extract(&file, Some(&dest))?;
                    (dest, members)
                }
            };
            debug!(file = %file.display(), produced = produced.len(), depth, "layer undone");

            let base = relative.parent().map(Path::to_path_buf).unwrap_or_default();
            let mut next = Vec::with_capacity(produced.len());
            for path in produced {
                let below = path.strip_prefix(&layer).map_err(|_| {
                    RechenError::InvalidChain(format!(
                        "{} escaped its layer directory",
                        path.display()
                    ))
                })?;
                let relative = base.join(below);
                next.push((path, relative, depth + 1));
            }
            pending.extend(next.into_iter().rev());
        }
        Ok(unwrapped)
    }

    fn fresh_dir(&mut self) -> Result<PathBuf> {
        self.layers += 1;
        let dir = self.scratch.join(format!("layer-{}", self.layers));
        std::fs::create_dir(&dir).map_err(RechenError::io_at(&dir))?;
        Ok(dir)
    }

    fn decrypt(&mut self, file: &Path, inner: &Path, key_beside: &Path) -> Result<PathBuf> {
        let key = self.locate_key(key_beside)?;
        let name = inner.file_name().ok_or_else(|| {
            RechenError::InvalidChain(format!("{} has no file name", inner.display()))
        })?;
        let target = self.fresh_dir()?.join(name);
        transforms::decrypt_with_key(file, &key, Some(&target))
    }

    /// Key beside the encrypted file, else beside the original input.
    fn locate_key(&self, key_beside: &Path) -> Result<PathBuf> {
        if key_beside.is_file() {
            return Ok(key_beside.to_path_buf());
        }
        let Some(name) = key_beside.file_name() else {
            return Err(RechenError::MissingKey(key_beside.to_path_buf()));
        };
        let candidate = self.origin.join(name);
        if candidate.is_file() {
            debug!(key = %candidate.display(), "using key from the input directory");
            Ok(candidate)
        } else {
            Err(RechenError::MissingKey(candidate))
        }
    }
}
