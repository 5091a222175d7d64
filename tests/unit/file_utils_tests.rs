/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use subweave::file_utils::FileManager;

use crate::common;

#[test]
fn test_writeToFile_withMissingParent_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.srt");

    FileManager::write_to_file(&path, "first")?;
    FileManager::write_to_file(&path, "second")?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path)?, "second");
    Ok(())
}

#[test]
fn test_appendLine_shouldAppendWithNewline() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("manual.txt");

    FileManager::append_line(&path, ">one")?;
    FileManager::append_line(&path, ">two")?;

    assert_eq!(FileManager::read_to_string(&path)?, ">one\n>two\n");
    Ok(())
}

#[test]
fn test_fileExists_withDirectory_shouldReturnFalse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::read_to_string(temp_dir.path().join("missing.txt")).is_err());
    Ok(())
}
