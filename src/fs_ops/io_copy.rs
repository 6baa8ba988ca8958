//! Block-wise file copy with progress and cancellation.
//!
//! The source is read in fixed 8 KiB blocks. Each block is filled completely
//! before it is written (short reads are retried until EOF), so progress
//! advances in whole blocks except for the final one. Cancellation is polled
//! between blocks; a cancelled copy leaves the partial destination in place.
//! Metadata (mode, timestamps, owner) is not copied.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, trace};

use super::request::{ConflictPolicy, OpContext};
use crate::errors::{OpError, OpResult};

/// Copy block size.
pub const BLOCK_SIZE: usize = 8192;

/// Copy the contents of the regular file `src` into `dst`.
///
/// A directory source is rejected. With `ConflictPolicy::Fail` an existing
/// destination of any kind is an error; any other policy removes an existing
/// non-directory destination first.
pub fn copy_file(src: &Path, dst: &Path, policy: ConflictPolicy, ctx: OpContext<'_>) -> OpResult {
    if src.is_dir() {
        return Err(OpError::SourceIsDirectory(src.to_path_buf()));
    }
    let mut input = File::open(src).map_err(OpError::with_path("open source", src))?;

    if policy.overwrites() {
        match fs::remove_file(dst) {
            Ok(()) => trace!(path = %dst.display(), "removed existing destination"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(OpError::os("remove destination", dst, e)),
        }
    } else if fs::symlink_metadata(dst).is_ok() {
        return Err(OpError::DestinationExists(dst.to_path_buf()));
    }

    let mut output = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .create_new(!policy.overwrites())
        .open(dst)
        .map_err(OpError::with_path("create destination", dst))?;

    let _scope = ctx.scope();
    let mut buf = [0u8; BLOCK_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = fill_block(&mut input, &mut buf).map_err(OpError::with_path("read", src))?;
        if n == 0 {
            break;
        }
        if ctx.cancel_requested() {
            debug!(src = %src.display(), copied = total, "copy cancelled");
            return Err(OpError::Cancelled);
        }
        let written = output
            .write(&buf[..n])
            .map_err(OpError::with_path("write", dst))?;
        if written != n {
            return Err(OpError::ShortWrite {
                path: dst.to_path_buf(),
                written,
                expected: n,
            });
        }
        total += n as u64;
        ctx.report(n as u64, 0);
    }
    debug!(src = %src.display(), dst = %dst.display(), bytes = total, "copied file");
    Ok(())
}

/// Read until `buf` is full or EOF; returns the number of bytes read.
fn fill_block(r: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
