//! Persisting route tables.
//!
//! A snapshot holds the [`Contents`] of a table, never its payloads. Loading
//! a snapshot at startup skips the pattern parsing of every route, the
//! payloads are then bound again by registering the same routes in the same
//! order (see [`RouteTable::from_contents`](crate::RouteTable::from_contents)).
//!
//! Snapshots are JSON documents tagged with [`SNAPSHOT_VERSION`].

use crate::error::SnapshotError;
use crate::table::Contents;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Format version written into every snapshot.
///
/// Snapshots with a different version are rejected as malformed.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, E> {
    version: u32,
    routes: &'a Contents<E>,
}

#[derive(Deserialize)]
struct Envelope<E> {
    version: u32,
    routes: Contents<E>,
}

/// Writes `contents` to `target`, replacing any existing file.
///
/// The snapshot is written to `<target>.tmp` first and then renamed over
/// `target`, so a concurrent [`load_snapshot`] never reads a partial file and
/// a failed save leaves the previous snapshot in place.
pub fn save_snapshot<E: Serialize>(
    target: impl AsRef<Path>,
    contents: &Contents<E>,
) -> Result<(), SnapshotError> {
    let target = target.as_ref();

    let bytes = serde_json::to_vec(&EnvelopeRef {
        version: SNAPSHOT_VERSION,
        routes: contents,
    })
    .map_err(|err| SnapshotError::Format {
        path: target.to_path_buf(),
        message: err.to_string(),
    })?;

    // write atomically via a sibling temp file, readers see the old or the new snapshot
    let temp = temp_path(target);
    fs::write(&temp, bytes).map_err(|source| SnapshotError::Io {
        path: temp.clone(),
        source,
    })?;
    fs::rename(&temp, target).map_err(|source| {
        let _ = fs::remove_file(&temp);
        SnapshotError::Io {
            path: target.to_path_buf(),
            source,
        }
    })?;

    tracing::debug!(path = %target.display(), "saved route snapshot");
    Ok(())
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Reads the contents saved in `source`.
pub fn load_snapshot<E: DeserializeOwned>(
    source: impl AsRef<Path>,
) -> Result<Contents<E>, SnapshotError> {
    let source = source.as_ref();

    let bytes = fs::read(source).map_err(|source_err| SnapshotError::Io {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let envelope: Envelope<E> =
        serde_json::from_slice(&bytes).map_err(|err| SnapshotError::Format {
            path: source.to_path_buf(),
            message: err.to_string(),
        })?;

    if envelope.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Format {
            path: source.to_path_buf(),
            message: format!(
                "unsupported snapshot version {}, expected {}",
                envelope.version, SNAPSHOT_VERSION
            ),
        });
    }

    tracing::debug!(path = %source.display(), "loaded route snapshot");
    Ok(envelope.routes)
}
