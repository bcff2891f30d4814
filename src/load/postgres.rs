//! PostgreSQL sink.
//!
//! The rest of the pipeline is blocking, so the sink owns a current-thread
//! runtime and drives sqlx from it. Two connections are held: one for the
//! schema statement and one for the insert. Both are closed by [`PgSink::close`]
//! or, failing that, when the sink is dropped.

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Postgres, QueryBuilder};
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::config::DbConfig;
use crate::domain::COLUMNS;
use crate::error::EtlError;
use crate::load::{AlbumRow, AlbumSink, CREATE_TABLE_SQL, LoadOutcome, TABLE_NAME};

pub struct PgSink {
    runtime: Runtime,
    schema_conn: Option<PgConnection>,
    insert_conn: Option<PgConnection>,
}

impl PgSink {
    pub fn connect(db: &DbConfig) -> Result<Self, EtlError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| EtlError::Persistence(format!("failed to start database runtime: {e}")))?;

        let options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .username(&db.user)
            .password(&db.password)
            .database(&db.name);

        let schema_conn = runtime.block_on(PgConnection::connect_with(&options))?;
        let insert_conn = runtime.block_on(PgConnection::connect_with(&options))?;
        info!(host = %db.host, port = db.port, database = %db.name, "connected to postgres");

        Ok(Self {
            runtime,
            schema_conn: Some(schema_conn),
            insert_conn: Some(insert_conn),
        })
    }

    /// Close both connections, reporting the first failure.
    pub fn close(mut self) -> Result<(), EtlError> {
        let mut result = Ok(());
        for conn in [self.schema_conn.take(), self.insert_conn.take()].into_iter().flatten() {
            if let Err(e) = self.runtime.block_on(conn.close()) {
                if result.is_ok() {
                    result = Err(e.into());
                }
            }
        }
        info!("closed database successfully");
        result
    }
}

impl Drop for PgSink {
    fn drop(&mut self) {
        for conn in [self.schema_conn.take(), self.insert_conn.take()].into_iter().flatten() {
            if let Err(e) = self.runtime.block_on(conn.close()) {
                warn!(error = %e, "failed to close postgres connection");
            }
        }
    }
}

impl AlbumSink for PgSink {
    fn ensure_table(&mut self) -> Result<(), EtlError> {
        let conn = self
            .schema_conn
            .as_mut()
            .ok_or_else(|| EtlError::Persistence("schema connection is closed".to_string()))?;
        self.runtime
            .block_on(sqlx::query(CREATE_TABLE_SQL).execute(conn))?;
        debug!(table = TABLE_NAME, "table ensured");
        Ok(())
    }

    fn insert_batch(&mut self, rows: &[AlbumRow]) -> Result<LoadOutcome, EtlError> {
        if rows.is_empty() {
            return Ok(LoadOutcome::default());
        }
        let conn = self
            .insert_conn
            .as_mut()
            .ok_or_else(|| EtlError::Persistence("insert connection is closed".to_string()))?;

        let mut builder = insert_statement(rows);
        let result = self.runtime.block_on(builder.build().execute(conn))?;

        // Rows that hit an existing album_id are skipped by ON CONFLICT.
        let inserted = usize::try_from(result.rows_affected()).unwrap_or(rows.len());
        Ok(LoadOutcome {
            inserted,
            conflicts: rows.len().saturating_sub(inserted),
        })
    }
}

/// One multi-row `INSERT` for the whole batch.
fn insert_statement(rows: &[AlbumRow]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO {TABLE_NAME} ({}) ", COLUMNS.join(", ")));
    builder.push_values(rows, |mut b, row| {
        b.push_bind(row.album_id.clone())
            .push_bind(row.album_name.clone())
            .push_bind(row.artist_name.clone())
            .push_bind(row.album_type.clone())
            .push_bind(row.total_tracks)
            .push_bind(row.release_date);
    });
    builder.push(" ON CONFLICT (album_id) DO NOTHING");
    builder
}
