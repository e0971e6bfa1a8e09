// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! [`SnapshotSource`] over a PostgreSQL materials store.
//!

use crate::{
    MqlError, config::config,
    ds::{
        AttributableKind, AttributeRow, AttributeValueRow, LinkRow, ProcessRow, SampleRow,
        SnapshotSource, StateRow,
    },
};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::debug;

const FIND_PROJECT: &str = "SELECT id FROM projects WHERE id = $1";
const PROCESSES: &str = "SELECT id, name FROM activities WHERE project_id = $1";
const SAMPLES: &str = "SELECT id, name FROM entities WHERE project_id = $1";
const STATES: &str = "SELECT es.id, es.entity_id AS sample_id \
     FROM entity_states es JOIN entities e ON es.entity_id = e.id \
     WHERE e.project_id = $1 \
     ORDER BY es.entity_id, es.id";
const ATTRIBUTES: &str = "SELECT id, name, attributable_id FROM attributes \
     WHERE project_id = $1 AND attributable_type = $2";
const ATTRIBUTE_VALUES: &str = "SELECT av.attribute_id, av.value_type, av.value_int, \
            av.value_float, av.value_string \
     FROM attribute_values av JOIN attributes a ON av.attribute_id = a.id \
     WHERE a.project_id = $1 AND a.attributable_type = $2 \
     ORDER BY av.attribute_id, av.id";
const LINKS: &str = "SELECT a2e.activity_id AS process_id, a2e.entity_id AS sample_id \
     FROM activity2entity a2e JOIN activities a ON a2e.activity_id = a.id \
     WHERE a.project_id = $1";

/// [`SnapshotSource`] binding a PostgreSQL database holding the upstream
/// materials schema (`projects`, `activities`, `entities`, `entity_states`,
/// `attributes`, `attribute_values`, `activity2entity`).
#[derive(Debug)]
pub struct PgSnapshotSource {
    pool: PgPool,
}

impl PgSnapshotSource {
    /// Connect using the configured DSN --see [crate::config].
    pub async fn connect() -> Result<Self, MqlError> {
        Self::from_url(config().db_dsn()).await
    }

    /// Connect to an explicit database URL.
    pub async fn from_url(url: &str) -> Result<Self, MqlError> {
        let opts = url.parse::<PgConnectOptions>()?;
        let pool = PgPoolOptions::new()
            .max_connections(config().pg_max_connections())
            .connect_with(opts)
            .await?;
        debug!("connected to materials store");
        Ok(Self { pool })
    }

    /// Return this pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SnapshotSource for PgSnapshotSource {
    async fn project_exists(&self, project_id: i64) -> Result<bool, MqlError> {
        let row: Option<(i64,)> = sqlx::query_as(FIND_PROJECT)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn processes(&self, project_id: i64) -> Result<Vec<ProcessRow>, MqlError> {
        let it = sqlx::query_as::<_, ProcessRow>(PROCESSES)
            .bind(project_id)
            .fetch(&self.pool)
            .try_collect()
            .await?;
        Ok(it)
    }

    async fn samples(&self, project_id: i64) -> Result<Vec<SampleRow>, MqlError> {
        let it = sqlx::query_as::<_, SampleRow>(SAMPLES)
            .bind(project_id)
            .fetch(&self.pool)
            .try_collect()
            .await?;
        Ok(it)
    }

    async fn sample_states(&self, project_id: i64) -> Result<Vec<StateRow>, MqlError> {
        let it = sqlx::query_as::<_, StateRow>(STATES)
            .bind(project_id)
            .fetch(&self.pool)
            .try_collect()
            .await?;
        Ok(it)
    }

    async fn attributes(
        &self,
        project_id: i64,
        kind: AttributableKind,
    ) -> Result<Vec<AttributeRow>, MqlError> {
        let it = sqlx::query_as::<_, AttributeRow>(ATTRIBUTES)
            .bind(project_id)
            .bind(kind.as_str())
            .fetch(&self.pool)
            .try_collect()
            .await?;
        Ok(it)
    }

    async fn attribute_values(
        &self,
        project_id: i64,
        kind: AttributableKind,
    ) -> Result<Vec<AttributeValueRow>, MqlError> {
        let it = sqlx::query_as::<_, AttributeValueRow>(ATTRIBUTE_VALUES)
            .bind(project_id)
            .bind(kind.as_str())
            .fetch(&self.pool)
            .try_collect()
            .await?;
        Ok(it)
    }

    async fn links(&self, project_id: i64) -> Result<Vec<LinkRow>, MqlError> {
        let it = sqlx::query_as::<_, LinkRow>(LINKS)
            .bind(project_id)
            .fetch(&self.pool)
            .try_collect()
            .await?;
        Ok(it)
    }
}
