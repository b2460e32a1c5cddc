//! Commands that read or stamp the lock file: `touch`, `show`, `check`.

use super::StampContext;
use crate::cli::{CheckArgs, ShowArgs};
use lockstamp::error::{Result, StampError};
use lockstamp::exit_codes;
use lockstamp::{LAST_WRITE_SIZE, LastWrite, LockFile};
use serde::Serialize;
use tracing::info;

/// JSON shape printed by `show --json`.
#[derive(Debug, Serialize)]
struct ShowReport {
    path: String,
    last_write: Option<String>,
    size: usize,
}

pub(crate) fn cmd_touch(ctx: &StampContext) -> Result<i32> {
    let lock = LockFile::open(&ctx.lock_path)?;
    let guard = lock.write()?;
    let lw = guard.record_write()?;
    drop(guard);

    info!(path = %ctx.lock_path.display(), "recorded write");
    println!("{}", lw.to_hex());
    Ok(exit_codes::SUCCESS)
}

pub(crate) fn cmd_show(ctx: &StampContext, args: ShowArgs) -> Result<i32> {
    let current = read_current(ctx)?;

    if args.json {
        let report = ShowReport {
            path: ctx.lock_path.display().to_string(),
            last_write: current.as_ref().map(LastWrite::to_hex),
            size: LAST_WRITE_SIZE,
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            StampError::UserError(format!("failed to serialize report: {}", e))
        })?;
        println!("{}", json);
        return Ok(exit_codes::SUCCESS);
    }

    match current {
        Some(lw) => println!("{}", lw.to_hex()),
        None => println!("no writes recorded"),
    }
    Ok(exit_codes::SUCCESS)
}

pub(crate) fn cmd_check(ctx: &StampContext, args: CheckArgs) -> Result<i32> {
    let since = LastWrite::from_hex(&args.since)?;

    let lock = LockFile::open_read_only(&ctx.lock_path)?;
    let (_, modified) = lock.read()?.modified_since(&since)?;

    if modified {
        println!("modified");
        Ok(exit_codes::MODIFIED)
    } else {
        println!("unchanged");
        Ok(exit_codes::SUCCESS)
    }
}

fn read_current(ctx: &StampContext) -> Result<Option<LastWrite>> {
    let lock = LockFile::open_read_only(&ctx.lock_path)?;
    let guard = lock.read()?;
    guard.last_write()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn context(dir: &Path) -> StampContext {
        StampContext {
            lock_path: dir.join("locks").join("store.lock"),
        }
    }

    #[test]
    fn test_touch_then_check() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());

        assert_eq!(cmd_touch(&ctx).unwrap(), exit_codes::SUCCESS);
        let current = read_current(&ctx).unwrap().unwrap();

        let args = CheckArgs {
            since: current.to_hex(),
        };
        assert_eq!(cmd_check(&ctx, args).unwrap(), exit_codes::SUCCESS);

        cmd_touch(&ctx).unwrap();
        let args = CheckArgs {
            since: current.to_hex(),
        };
        assert_eq!(cmd_check(&ctx, args).unwrap(), exit_codes::MODIFIED);
    }

    #[test]
    fn test_check_rejects_malformed_token() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());
        cmd_touch(&ctx).unwrap();

        let args = CheckArgs {
            since: "zz".to_string(),
        };
        let err = cmd_check(&ctx, args).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn test_show_without_lock_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());

        let err = cmd_show(&ctx, ShowArgs { json: false }).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::IO_FAILURE);
    }

    #[test]
    fn test_show_on_empty_lock_file() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());
        LockFile::open(&ctx.lock_path).unwrap();

        assert!(read_current(&ctx).unwrap().is_none());
        assert_eq!(
            cmd_show(&ctx, ShowArgs { json: true }).unwrap(),
            exit_codes::SUCCESS
        );
    }

    #[test]
    fn test_show_report_json_shape() {
        let report = ShowReport {
            path: "store.lock".to_string(),
            last_write: None,
            size: LAST_WRITE_SIZE,
        };
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["path"], "store.lock");
        assert!(value["last_write"].is_null());
        assert_eq!(value["size"], 64);
    }
}
