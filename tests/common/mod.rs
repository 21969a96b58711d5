#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Demand table with one matched row, one unmatched style, and a second
/// program, in the column layout the reconcile command expects.
pub fn sample_demand_csv() -> String {
    [
        "Program,Style,GMT Color,Concluded Norms - Post discussion,CF,Start Date,End Date",
        "Alpha,32,Red,300,3,01/03/2024,2024-03-15",
        "Alpha,200,Red,120,2,,",
        "Beta,34,Blue,450,3,2024-04-01,",
    ]
    .join("\n")
}

/// Macro table covering the demand above: a duplicate ELS pair averaging
/// 3.0 for (32, Red), one LAC norm, and one row under a dropped group.
pub fn sample_macro_csv() -> String {
    [
        "PROC_GRP,l,GMT colour,CONSUMPTION",
        "ELS,32,Red,2.5",
        "ELS,32,Red,3.5",
        "LAC,34,Blue,1.5",
        "KNT,32,Red,9.0",
    ]
    .join("\n")
}
