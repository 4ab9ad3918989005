use std::cell::RefCell;
use std::path::{Path, PathBuf};

use takeout_reorg::error::ReorgError;
use takeout_reorg::metadata::{run_post_processing, ExifTool, MetadataTool};

use super::support::Fixture;

/// Records the directories it is asked to process.
#[derive(Default)]
struct RecordingTool {
    dirs: RefCell<Vec<PathBuf>>,
}

impl MetadataTool for RecordingTool {
    fn adjust_dates(&self, dir: &Path) -> Result<(), ReorgError> {
        self.dirs.borrow_mut().push(dir.to_path_buf());
        Ok(())
    }
}

#[test]
fn test_post_processing_after_reorganization() {
    let fx = Fixture::new();
    fx.add("Photos from 2020/a.jpg", b"alpha");
    fx.run().unwrap();

    let tool = RecordingTool::default();
    run_post_processing(&tool, &fx.layout()).unwrap();

    assert_eq!(
        *tool.dirs.borrow(),
        vec![
            fx.out("Photos"),
            fx.out("Archive"),
            fx.out("Album-only Photos"),
        ]
    );
}

#[cfg(unix)]
#[test]
fn test_successful_tool_exit() {
    let fx = Fixture::new();
    fx.run().unwrap();

    // `true` ignores its arguments and exits zero
    run_post_processing(&ExifTool::new("true"), &fx.layout()).unwrap();
}

#[cfg(unix)]
#[test]
fn test_failing_tool_exit_aborts() {
    let fx = Fixture::new();
    fx.run().unwrap();

    match run_post_processing(&ExifTool::new("false"), &fx.layout()) {
        Err(ReorgError::MetadataTool {
            program,
            dir,
            status,
        }) => {
            assert_eq!(program, "false");
            assert_eq!(dir, fx.out("Photos"));
            assert!(!status.success());
        }
        other => panic!("Expected MetadataTool error, got {:?}", other),
    }
}
