//! SQLite-backed document store.
//!
//! Schema and access patterns: one `wills` row per live document, an
//! append-only `will_versions` ledger keyed by `(will_id, version_number)`,
//! and a `proposals` table holding the serialized patch. Content payloads
//! are JSON columns; timestamps are RFC 3339 text.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use codicil_types::{
    Proposal, ProposalId, ProposalStatus, VersionId, VersionNumber, VersionRecord, WillContent,
    WillId, WillSnapshot,
};

use crate::{StoreError, WillStore};

pub struct SqliteWillStore {
    db: Connection,
}

impl SqliteWillStore {
    const SCHEMA: &'static str = r"
        CREATE TABLE IF NOT EXISTS wills (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            content TEXT NOT NULL,
            version INTEGER NOT NULL
        );

        -- Append-only ledger; rows are never updated or deleted here.
        CREATE TABLE IF NOT EXISTS will_versions (
            id TEXT PRIMARY KEY,
            will_id TEXT NOT NULL REFERENCES wills(id) ON DELETE CASCADE,
            version_number INTEGER NOT NULL,
            content TEXT NOT NULL,
            summary TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (will_id, version_number)
        );

        CREATE TABLE IF NOT EXISTS proposals (
            id TEXT PRIMARY KEY,
            will_id TEXT NOT NULL REFERENCES wills(id) ON DELETE CASCADE,
            owner_id TEXT NOT NULL,
            status TEXT NOT NULL,
            patch TEXT NOT NULL,
            summary TEXT NOT NULL,
            created_at TEXT NOT NULL,
            approved_at TEXT,
            applied_at TEXT,
            rejected_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_versions_will
        ON will_versions(will_id);

        CREATE INDEX IF NOT EXISTS idx_proposals_will
        ON proposals(will_id);
    ";

    /// Open or create the store database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory {}", parent.display())
            })?;
        }

        let db = Connection::open(path)
            .with_context(|| format!("Failed to open will store at {}", path.display()))?;
        Self::initialize(db)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory will store")?;
        Self::initialize(db)
    }

    fn initialize(db: Connection) -> Result<Self> {
        db.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL; PRAGMA foreign_keys=ON;",
        )
        .context("Failed to set will store pragmas")?;
        db.execute_batch(Self::SCHEMA)
            .context("Failed to create will store schema")?;
        Ok(Self { db })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::Timestamp(raw.to_string()))
}

fn parse_opt_timestamp(raw: Option<String>) -> Result<Option<DateTime<Utc>>, StoreError> {
    raw.as_deref().map(parse_timestamp).transpose()
}

impl WillStore for SqliteWillStore {
    fn get_will(&self, id: &WillId) -> Result<Option<WillSnapshot>, StoreError> {
        let row = self
            .db
            .query_row(
                "SELECT owner_id, content, version FROM wills WHERE id = ?1",
                [id.as_str()],
                |row| {
                    let owner: String = row.get(0)?;
                    let content: String = row.get(1)?;
                    let version: i64 = row.get(2)?;
                    Ok((owner, content, version))
                },
            )
            .optional()?;

        let Some((owner, content_json, version)) = row else {
            return Ok(None);
        };

        let content: WillContent = serde_json::from_str(&content_json)?;
        Ok(Some(WillSnapshot {
            id: id.clone(),
            owner_id: owner.as_str().into(),
            content,
            version: VersionNumber::new(version as u64),
        }))
    }

    /// Seed or overwrite the live document. Also makes sure the ledger holds
    /// a row for the seeded version (insert-or-ignore, so an existing
    /// historical row is never touched): rollback to the initial state must
    /// be possible without a prior apply.
    fn put_will(&mut self, snapshot: &WillSnapshot) -> Result<(), StoreError> {
        let content_json = serde_json::to_string(&snapshot.content)?;
        let created_at = Utc::now().to_rfc3339();

        let tx = self.db.transaction()?;
        tx.execute(
            "INSERT INTO wills (id, owner_id, content, version)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 owner_id = excluded.owner_id,
                 content = excluded.content,
                 version = excluded.version",
            params![
                snapshot.id.as_str(),
                snapshot.owner_id.as_str(),
                content_json,
                snapshot.version.value() as i64,
            ],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO will_versions
                 (id, will_id, version_number, content, summary, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Uuid::new_v4().to_string(),
                snapshot.id.as_str(),
                snapshot.version.value() as i64,
                content_json,
                "Initial version",
                created_at,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn record_new_version(
        &mut self,
        will_id: &WillId,
        expected_version: VersionNumber,
        content: &WillContent,
        summary: &str,
    ) -> Result<VersionId, StoreError> {
        let content_json = serde_json::to_string(content)?;
        let version_id = VersionId::new(Uuid::new_v4().to_string());
        let created_at = Utc::now().to_rfc3339();

        let tx = self.db.transaction()?;

        let actual = tx
            .query_row(
                "SELECT version FROM wills WHERE id = ?1",
                [will_id.as_str()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        let Some(actual) = actual else {
            return Err(StoreError::WillNotFound(will_id.clone()));
        };
        let actual = VersionNumber::new(actual as u64);
        if actual != expected_version {
            return Err(StoreError::Conflict {
                will: will_id.clone(),
                expected: expected_version,
                actual,
            });
        }

        let next = expected_version.next();
        tx.execute(
            "INSERT INTO will_versions
                 (id, will_id, version_number, content, summary, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                version_id.as_str(),
                will_id.as_str(),
                next.value() as i64,
                content_json,
                summary,
                created_at,
            ],
        )?;
        tx.execute(
            "UPDATE wills SET content = ?1, version = ?2 WHERE id = ?3",
            params![content_json, next.value() as i64, will_id.as_str()],
        )?;

        tx.commit()?;
        Ok(version_id)
    }

    fn restore_version(
        &mut self,
        will_id: &WillId,
        version_number: VersionNumber,
    ) -> Result<(), StoreError> {
        let tx = self.db.transaction()?;

        let content_json = tx
            .query_row(
                "SELECT content FROM will_versions
                 WHERE will_id = ?1 AND version_number = ?2",
                params![will_id.as_str(), version_number.value() as i64],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        let Some(content_json) = content_json else {
            return Err(StoreError::VersionNotFound {
                will: will_id.clone(),
                version: version_number,
            });
        };

        let updated = tx.execute(
            "UPDATE wills SET content = ?1, version = ?2 WHERE id = ?3",
            params![
                content_json,
                version_number.value() as i64,
                will_id.as_str()
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::WillNotFound(will_id.clone()));
        }

        tx.commit()?;
        Ok(())
    }

    fn get_version(
        &self,
        will_id: &WillId,
        version_number: VersionNumber,
    ) -> Result<Option<VersionRecord>, StoreError> {
        let row = self
            .db
            .query_row(
                "SELECT id, content, summary, created_at FROM will_versions
                 WHERE will_id = ?1 AND version_number = ?2",
                params![will_id.as_str(), version_number.value() as i64],
                |row| {
                    let id: String = row.get(0)?;
                    let content: String = row.get(1)?;
                    let summary: String = row.get(2)?;
                    let created_at: String = row.get(3)?;
                    Ok((id, content, summary, created_at))
                },
            )
            .optional()?;

        let Some((id, content_json, summary, created_at)) = row else {
            return Ok(None);
        };

        Ok(Some(VersionRecord {
            id: VersionId::new(id),
            will_id: will_id.clone(),
            version_number,
            content: serde_json::from_str(&content_json)?,
            summary,
            created_at: parse_timestamp(&created_at)?,
        }))
    }

    fn list_versions(&self, will_id: &WillId) -> Result<Vec<VersionRecord>, StoreError> {
        let mut stmt = self.db.prepare(
            "SELECT id, version_number, content, summary, created_at
             FROM will_versions
             WHERE will_id = ?1
             ORDER BY version_number ASC",
        )?;

        let rows = stmt.query_map([will_id.as_str()], |row| {
            let id: String = row.get(0)?;
            let number: i64 = row.get(1)?;
            let content: String = row.get(2)?;
            let summary: String = row.get(3)?;
            let created_at: String = row.get(4)?;
            Ok((id, number, content, summary, created_at))
        })?;

        let mut versions = Vec::new();
        for row in rows {
            let (id, number, content_json, summary, created_at) = row?;
            versions.push(VersionRecord {
                id: VersionId::new(id),
                will_id: will_id.clone(),
                version_number: VersionNumber::new(number as u64),
                content: serde_json::from_str(&content_json)?,
                summary,
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(versions)
    }

    fn insert_proposal(&mut self, proposal: &Proposal) -> Result<(), StoreError> {
        let patch_json = serde_json::to_string(&proposal.patch)?;
        self.db.execute(
            "INSERT INTO proposals
                 (id, will_id, owner_id, status, patch, summary,
                  created_at, approved_at, applied_at, rejected_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                proposal.id.as_str(),
                proposal.will_id.as_str(),
                proposal.owner_id.as_str(),
                proposal.status.as_str(),
                patch_json,
                proposal.summary,
                proposal.created_at.to_rfc3339(),
                proposal.approved_at.map(|t| t.to_rfc3339()),
                proposal.applied_at.map(|t| t.to_rfc3339()),
                proposal.rejected_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    fn get_proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, StoreError> {
        let row = self
            .db
            .query_row(
                "SELECT will_id, owner_id, status, patch, summary,
                        created_at, approved_at, applied_at, rejected_at
                 FROM proposals WHERE id = ?1",
                [id.as_str()],
                |row| {
                    let will_id: String = row.get(0)?;
                    let owner_id: String = row.get(1)?;
                    let status: String = row.get(2)?;
                    let patch: String = row.get(3)?;
                    let summary: String = row.get(4)?;
                    let created_at: String = row.get(5)?;
                    let approved_at: Option<String> = row.get(6)?;
                    let applied_at: Option<String> = row.get(7)?;
                    let rejected_at: Option<String> = row.get(8)?;
                    Ok((
                        will_id, owner_id, status, patch, summary, created_at, approved_at,
                        applied_at, rejected_at,
                    ))
                },
            )
            .optional()?;

        let Some((
            will_id,
            owner_id,
            status_raw,
            patch_json,
            summary,
            created_at,
            approved_at,
            applied_at,
            rejected_at,
        )) = row
        else {
            return Ok(None);
        };

        let status = ProposalStatus::parse(&status_raw)
            .ok_or_else(|| StoreError::UnknownStatus(status_raw.clone()))?;

        Ok(Some(Proposal {
            id: id.clone(),
            will_id: will_id.as_str().into(),
            owner_id: owner_id.as_str().into(),
            status,
            patch: serde_json::from_str(&patch_json)?,
            summary,
            created_at: parse_timestamp(&created_at)?,
            approved_at: parse_opt_timestamp(approved_at)?,
            applied_at: parse_opt_timestamp(applied_at)?,
            rejected_at: parse_opt_timestamp(rejected_at)?,
        }))
    }

    fn set_proposal_status(
        &mut self,
        id: &ProposalId,
        status: ProposalStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        // Each status owns its timestamp column; Pending has none.
        let sql = match status {
            ProposalStatus::Pending => {
                "UPDATE proposals SET status = ?1 WHERE id = ?2"
            }
            ProposalStatus::Approved => {
                "UPDATE proposals SET status = ?1, approved_at = ?3 WHERE id = ?2"
            }
            ProposalStatus::Applied => {
                "UPDATE proposals SET status = ?1, applied_at = ?3 WHERE id = ?2"
            }
            ProposalStatus::Rejected => {
                "UPDATE proposals SET status = ?1, rejected_at = ?3 WHERE id = ?2"
            }
        };

        let updated = match status {
            ProposalStatus::Pending => self
                .db
                .execute(sql, params![status.as_str(), id.as_str()])?,
            _ => self.db.execute(
                sql,
                params![status.as_str(), id.as_str(), at.to_rfc3339()],
            )?,
        };

        if updated == 0 {
            return Err(StoreError::ProposalNotFound(id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codicil_types::{AssetId, AssetRecord, OwnerId, WillContent};

    fn seed_will(store: &mut SqliteWillStore, id: &str, version: u64) -> WillSnapshot {
        let snapshot = WillSnapshot {
            id: WillId::new(id),
            owner_id: OwnerId::new("owner-1"),
            content: WillContent::default(),
            version: VersionNumber::new(version),
        };
        store.put_will(&snapshot).expect("seed will");
        snapshot
    }

    fn content_with_asset(id: &str, title: &str) -> WillContent {
        let mut content = WillContent::default();
        content.assets.insert(
            AssetId::from(id),
            AssetRecord {
                title: title.to_string(),
                description: None,
                value: None,
            },
        );
        content
    }

    #[test]
    fn put_will_seeds_live_document_and_initial_ledger_row() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        seed_will(&mut store, "w1", 1);

        let live = store.get_will(&WillId::new("w1")).unwrap().unwrap();
        assert_eq!(live.version, VersionNumber::new(1));

        let versions = store.list_versions(&WillId::new("w1")).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version_number, VersionNumber::new(1));
        assert_eq!(versions[0].summary, "Initial version");
    }

    #[test]
    fn record_new_version_appends_and_moves_live_pointer() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        let will_id = WillId::new("w1");
        seed_will(&mut store, "w1", 1);

        let next = content_with_asset("a1", "Car");
        let version_id = store
            .record_new_version(&will_id, VersionNumber::new(1), &next, "Added Car")
            .expect("record version");
        assert!(!version_id.as_str().is_empty());

        let live = store.get_will(&will_id).unwrap().unwrap();
        assert_eq!(live.version, VersionNumber::new(2));
        assert_eq!(live.content, next);

        let recorded = store
            .get_version(&will_id, VersionNumber::new(2))
            .unwrap()
            .unwrap();
        assert_eq!(recorded.content, next);
        assert_eq!(recorded.summary, "Added Car");
    }

    #[test]
    fn record_new_version_with_stale_expected_version_is_a_conflict() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        let will_id = WillId::new("w1");
        seed_will(&mut store, "w1", 1);

        store
            .record_new_version(
                &will_id,
                VersionNumber::new(1),
                &content_with_asset("a1", "Car"),
                "Added Car",
            )
            .expect("first apply");

        // A second caller still holding version 1 loses the race.
        let err = store
            .record_new_version(
                &will_id,
                VersionNumber::new(1),
                &content_with_asset("a2", "Boat"),
                "Added Boat",
            )
            .expect_err("stale expected version");
        assert!(matches!(err, StoreError::Conflict { .. }));

        // Nothing was written: ledger and live pointer are untouched.
        let live = store.get_will(&will_id).unwrap().unwrap();
        assert_eq!(live.version, VersionNumber::new(2));
        assert_eq!(store.list_versions(&will_id).unwrap().len(), 2);
    }

    #[test]
    fn record_new_version_on_missing_will_fails() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        let err = store
            .record_new_version(
                &WillId::new("nope"),
                VersionNumber::new(1),
                &WillContent::default(),
                "x",
            )
            .expect_err("missing will");
        assert!(matches!(err, StoreError::WillNotFound(_)));
    }

    #[test]
    fn version_numbers_increase_strictly_by_one() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        let will_id = WillId::new("w1");
        seed_will(&mut store, "w1", 1);

        for (i, title) in ["Car", "Boat", "House"].iter().enumerate() {
            let live = store.get_will(&will_id).unwrap().unwrap();
            store
                .record_new_version(
                    &will_id,
                    live.version,
                    &content_with_asset(&format!("a{i}"), title),
                    title,
                )
                .expect("record");
        }

        let numbers: Vec<u64> = store
            .list_versions(&will_id)
            .unwrap()
            .iter()
            .map(|v| v.version_number.value())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn restore_version_rewinds_live_document_without_appending() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        let will_id = WillId::new("w1");
        seed_will(&mut store, "w1", 1);

        store
            .record_new_version(
                &will_id,
                VersionNumber::new(1),
                &content_with_asset("a1", "Car"),
                "Added Car",
            )
            .expect("record");

        store
            .restore_version(&will_id, VersionNumber::new(1))
            .expect("restore");

        let live = store.get_will(&will_id).unwrap().unwrap();
        assert_eq!(live.version, VersionNumber::new(1));
        assert_eq!(live.content, WillContent::default());
        // The ledger is untouched: still exactly versions 1 and 2.
        assert_eq!(store.list_versions(&will_id).unwrap().len(), 2);
    }

    #[test]
    fn restore_missing_version_leaves_live_document_unchanged() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        let will_id = WillId::new("w1");
        seed_will(&mut store, "w1", 1);

        let err = store
            .restore_version(&will_id, VersionNumber::new(9))
            .expect_err("missing version");
        assert!(matches!(err, StoreError::VersionNotFound { .. }));

        let live = store.get_will(&will_id).unwrap().unwrap();
        assert_eq!(live.version, VersionNumber::new(1));
    }

    #[test]
    fn proposal_round_trip_and_status_transitions() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        seed_will(&mut store, "w1", 1);

        let proposal = Proposal {
            id: ProposalId::new("p1"),
            will_id: WillId::new("w1"),
            owner_id: OwnerId::new("owner-1"),
            status: ProposalStatus::Pending,
            patch: codicil_types::Patch {
                ops: vec![],
                summary: "New asset \"Car\" can be added to the will".to_string(),
                safe_mode: true,
                excluded_change_count: 0,
            },
            summary: "New asset \"Car\" can be added to the will".to_string(),
            created_at: Utc::now(),
            approved_at: None,
            applied_at: None,
            rejected_at: None,
        };
        store.insert_proposal(&proposal).expect("insert");

        let loaded = store
            .get_proposal(&ProposalId::new("p1"))
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, ProposalStatus::Pending);
        assert_eq!(loaded.summary, proposal.summary);
        assert_eq!(loaded.patch, proposal.patch);

        store
            .set_proposal_status(&ProposalId::new("p1"), ProposalStatus::Applied, Utc::now())
            .expect("mark applied");
        let loaded = store
            .get_proposal(&ProposalId::new("p1"))
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, ProposalStatus::Applied);
        assert!(loaded.applied_at.is_some());
    }

    #[test]
    fn set_status_on_missing_proposal_fails() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        let err = store
            .set_proposal_status(&ProposalId::new("nope"), ProposalStatus::Rejected, Utc::now())
            .expect_err("missing proposal");
        assert!(matches!(err, StoreError::ProposalNotFound(_)));
    }

    #[test]
    fn unknown_stored_status_is_an_error_not_a_panic() {
        let mut store = SqliteWillStore::open_in_memory().expect("open store");
        seed_will(&mut store, "w1", 1);

        let proposal = Proposal {
            id: ProposalId::new("p1"),
            will_id: WillId::new("w1"),
            owner_id: OwnerId::new("owner-1"),
            status: ProposalStatus::Pending,
            patch: codicil_types::Patch {
                ops: vec![],
                summary: "s".to_string(),
                safe_mode: true,
                excluded_change_count: 0,
            },
            summary: "s".to_string(),
            created_at: Utc::now(),
            approved_at: None,
            applied_at: None,
            rejected_at: None,
        };
        store.insert_proposal(&proposal).expect("insert");

        store
            .db
            .execute("UPDATE proposals SET status = 'weird' WHERE id = 'p1'", [])
            .expect("corrupt row");

        let err = store
            .get_proposal(&ProposalId::new("p1"))
            .expect_err("unknown status");
        assert!(matches!(err, StoreError::UnknownStatus(_)));
    }

    #[test]
    fn on_disk_store_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wills.db");

        {
            let mut store = SqliteWillStore::open(&path).expect("open");
            seed_will(&mut store, "w1", 1);
        }

        let store = SqliteWillStore::open(&path).expect("reopen");
        let live = store.get_will(&WillId::new("w1")).unwrap().unwrap();
        assert_eq!(live.version, VersionNumber::new(1));
    }
}
