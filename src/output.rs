//! Output directory lifecycle
//!
//! [`plan_output`] inspects the output directory and settles every question
//! (including the overwrite prompt) without touching the filesystem.
//! [`apply_output`] then performs the deletions and creations. A crash
//! between deleting and recreating the output directory leaves it absent;
//! running again recreates it.

use crate::{ThorError, ThorResult};
use serde::Serialize;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// File name suffix marking results of a previous run
pub const RESULT_SUFFIX: &str = "diffpeaks.bed";

/// Decides whether to go ahead with a destructive step
pub trait Confirm {
    /// `default` is the answer assumed for an empty reply
    fn confirm(&mut self, prompt: &str, default: bool) -> ThorResult<bool>;
}

/// Fixed answer, for automation and tests
#[derive(Debug, Clone, Copy)]
pub struct AssumeAnswer(pub bool);

impl Confirm for AssumeAnswer {
    fn confirm(&mut self, prompt: &str, _default: bool) -> ThorResult<bool> {
        log::info!("{} -> {}", prompt, if self.0 { "yes" } else { "no" });
        Ok(self.0)
    }
}

/// Interactive yes/no question
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, prompt: &str, default: bool) -> ThorResult<bool> {
        let (first, second) = if default { ("y", "n") } else { ("n", "y") };
        let mut answer = String::new();

        loop {
            write!(self.output, "{} [{}]|{}: ", prompt, first, second)?;
            self.output.flush()?;

            answer.clear();
            if self.input.read_line(&mut answer)? == 0 {
                log::warn!("No answer to '{}', assuming no", prompt);
                return Ok(false);
            }

            match answer.trim() {
                "" => return Ok(default),
                "y" | "Y" => return Ok(true),
                "n" | "N" => return Ok(false),
                _ => writeln!(self.output, "please enter y or n.")?,
            }
        }
    }
}

/// What is found at the output directory path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    Absent,
    ExistsWithoutResults,
    ExistsWithResults,
}

/// Inspect `dir` for results of a previous run
pub fn inspect_dir(dir: &Path) -> ThorResult<DirState> {
    if !dir.is_dir() {
        return Ok(DirState::Absent);
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().ends_with(RESULT_SUFFIX) {
            return Ok(DirState::ExistsWithResults);
        }
    }

    Ok(DirState::ExistsWithoutResults)
}

/// Report directory and its picture subdirectories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLayout {
    pub dir: PathBuf,
    pub pics: PathBuf,
    pub data: PathBuf,
}

impl ReportLayout {
    pub fn new(output_dir: &Path, name: &str) -> Self {
        let dir = output_dir.join(format!("report_{}", name));
        let pics = dir.join("pics");
        let data = pics.join("data");
        Self { dir, pics, data }
    }
}

/// Absolute paths of everything the pipeline writes into
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLayout {
    pub output_dir: PathBuf,
    pub report: Option<ReportLayout>,
}

/// Action to take on the output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirAction {
    /// Use the directory as it is
    Keep,
    Create,
    /// Delete the directory with its content and create it again
    Recreate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub layout: OutputLayout,
    pub action: DirAction,
}

/// Refuse to empty `dir` when it holds the working directory or any of the
/// `protected` input files
fn check_removable(dir: &Path, protected: &[PathBuf]) -> ThorResult<()> {
    if std::env::current_dir()?.starts_with(dir) {
        return Err(ThorError::DirectoryConflict(format!(
            "Output directory {} contains the working directory and cannot be emptied! \
             Please choose another --output-dir",
            dir.display()
        )));
    }
    if let Some(input) = protected.iter().find(|path| path.starts_with(dir)) {
        return Err(ThorError::DirectoryConflict(format!(
            "Output directory {} contains input file {} and cannot be emptied! \
             Please choose another --output-dir",
            dir.display(),
            input.display()
        )));
    }
    Ok(())
}

/// Decide what to do with the output tree.
///
/// `output_dir` is `None` when the current directory is used; it is kept as
/// is. A given directory is always emptied: directly when it holds no
/// `*diffpeaks.bed`, after confirmation otherwise. It is never emptied when
/// it holds one of the `protected` paths or the working directory.
pub fn plan_output(
    output_dir: Option<&Path>,
    name: &str,
    report: bool,
    protected: &[PathBuf],
    confirm: &mut dyn Confirm,
) -> ThorResult<OutputPlan> {
    let (dir, action) = match output_dir {
        None => (std::env::current_dir()?, DirAction::Keep),
        Some(dir) => {
            let state = inspect_dir(dir)?;
            if state != DirState::Absent {
                check_removable(dir, protected)?;
            }
            let action = match state {
                DirState::Absent => DirAction::Create,
                DirState::ExistsWithoutResults => DirAction::Recreate,
                DirState::ExistsWithResults => {
                    if confirm.confirm("delete existing results?", true)? {
                        DirAction::Recreate
                    } else {
                        return Err(ThorError::DirectoryConflict(format!(
                            "Output directory {} contains results of a previous run! \
                             Do nothing to prevent file overwriting!",
                            dir.display()
                        )));
                    }
                }
            };
            (dir.to_path_buf(), action)
        }
    };

    let report = report.then(|| ReportLayout::new(&dir, name));
    if let Some(report) = &report {
        if action == DirAction::Keep && report.dir.exists() {
            return Err(report_conflict(report));
        }
    }

    Ok(OutputPlan {
        layout: OutputLayout {
            output_dir: dir,
            report,
        },
        action,
    })
}

fn report_conflict(report: &ReportLayout) -> ThorError {
    ThorError::DirectoryConflict(format!(
        "Folder '{}' already exists in output directory! Do nothing to prevent file overwriting! \
         Please rename report folder or change working directory with the option --output-dir",
        report
            .dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    ))
}

/// Carry out a plan made by [`plan_output`]
pub fn apply_output(plan: &OutputPlan) -> ThorResult<()> {
    let dir = &plan.layout.output_dir;

    match plan.action {
        DirAction::Keep => {}
        DirAction::Create => {
            log::info!("Creating output directory {}", dir.display());
            fs::create_dir_all(dir)?;
        }
        DirAction::Recreate => {
            log::info!("Clearing output directory {}", dir.display());
            fs::remove_dir_all(dir)?;
            fs::create_dir(dir)?;
        }
    }

    if let Some(report) = &plan.layout.report {
        match fs::create_dir(&report.dir) {
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(report_conflict(report));
            }
            other => other?,
        }
        fs::create_dir(&report.pics)?;
        fs::create_dir(&report.data)?;
        log::info!("Report will be written to {}", report.dir.display());
    }

    Ok(())
}

/// Plan and apply in one go
pub fn prepare_output(
    output_dir: Option<&Path>,
    name: &str,
    report: bool,
    protected: &[PathBuf],
    confirm: &mut dyn Confirm,
) -> ThorResult<OutputLayout> {
    let plan = plan_output(output_dir, name, report, protected, confirm)?;
    apply_output(&plan)?;
    Ok(plan.layout)
}
