// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator API — the only surface a UI or script needs.
//
// Every call builds its engine from the current settings, so a changed
// configuration file takes effect on the next run.

use std::path::{Path, PathBuf};

use rechenwerk_core::error::Result;
use rechenwerk_core::{Artifact, ArtifactRole, Direction, FormatTag, ProcessingPlan, RunOutcome};
use rechenwerk_document::CodecRegistry;
use rechenwerk_security::hash_file;

use super::chain::TransformChainManager;
use super::settings;

fn manager() -> Result<TransformChainManager> {
    Ok(TransformChainManager::new(&settings::engine_config()?))
}

/// Formats the engine can read and write.
pub fn list_supported_formats() -> &'static [FormatTag] {
    CodecRegistry::supported_formats()
}

/// Format implied by the file-name extension of `path`.
pub fn infer_format(path: &Path) -> Result<FormatTag> {
    FormatTag::infer(path)
}

/// Forward run from `input` to `output`; formats and protective transforms
/// come from `plan`, whose own paths and direction are ignored.
pub fn run_forward(input: &Path, output: &Path, plan: &ProcessingPlan) -> Result<RunOutcome> {
    let plan = ProcessingPlan {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        direction: Direction::Forward,
        ..plan.clone()
    };
    manager()?.run_forward(&plan)
}

/// Unwrap `path` completely and process the result into `output`.
pub fn run_reverse(path: &Path, output: &Path) -> Result<Vec<PathBuf>> {
    manager()?.run_reverse(&ProcessingPlan::reverse(path, output))
}

/// Execute `plan` in whichever direction it names.
pub fn run(plan: &ProcessingPlan) -> Result<RunOutcome> {
    let manager = manager()?;
    match plan.direction {
        Direction::Forward => manager.run_forward(plan),
        Direction::Reverse => {
            let artifacts = manager
                .run_reverse(plan)?
                .into_iter()
                .map(|path| {
                    Ok(Artifact {
                        sha256: hash_file(&path)?,
                        path,
                        role: ArtifactRole::Output,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(RunOutcome { artifacts })
        }
    }
}

#[cfg(test)]
mod tests {
    use rechenwerk_core::{RechenError, TransformStep};

    use super::*;

    #[test]
    fn every_format_is_listed() {
        let formats = list_supported_formats();
        assert_eq!(formats.len(), 6);
        assert!(formats.contains(&FormatTag::Protobuf));
    }

    #[test]
    fn inference_follows_the_suffix_table() {
        assert_eq!(infer_format(Path::new("page.HTM")).unwrap(), FormatTag::Html);
        assert_eq!(infer_format(Path::new("blob.pb")).unwrap(), FormatTag::Protobuf);
        assert!(matches!(
            infer_format(Path::new("README")),
            Err(RechenError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn run_forward_uses_the_given_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("calc.txt");
        std::fs::write(&input, "100 - 58").unwrap();
        let output = dir.path().join("calc.out");

        let plan = ProcessingPlan::forward("ignored.txt", "ignored.txt")
            .with_output_format(FormatTag::Text)
            .with_post([TransformStep::Archive]);
        let outcome = run_forward(&input, &output, &plan).unwrap();

        assert_eq!(outcome.outputs(), vec![output.as_path()]);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "42");
        assert!(dir.path().join("calc.out.zip").exists());
    }

    #[test]
    fn run_dispatches_on_direction() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("page.html");
        std::fs::write(&input, "<b>7 * 6</b>").unwrap();
        let protected = rechenwerk_security::encrypt(&input).unwrap();

        let output = dir.path().join("page.out.html");
        let outcome = run(&ProcessingPlan::reverse(&protected, &output)).unwrap();

        assert_eq!(outcome.outputs(), vec![output.as_path()]);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "<b>42</b>");
        assert_eq!(run_reverse(&protected, &output).unwrap(), vec![output.clone()]);
    }
}
