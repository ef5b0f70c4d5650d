//! LanceDB connection and housekeeping helpers.

use anyhow::Result;
use arrow_array::RecordBatchIterator;
use lancedb::{connect, Connection};
use std::sync::Arc;

use crate::schema::build_arrow_schema;

pub async fn open_db(uri: &str) -> Result<Connection> {
    Ok(connect(uri).execute().await?)
}

pub async fn ensure_table(conn: &Connection, name: &str, schema: Arc<arrow_schema::Schema>) -> Result<()> {
    let names = conn.table_names().execute().await?;
    if names.contains(&name.to_string()) {
        return Ok(());
    }
    // create empty table with 0 rows
    let iter = RecordBatchIterator::new(vec![].into_iter(), schema.clone());
    conn.create_table(name, Box::new(iter)).execute().await?;
    Ok(())
}

pub async fn ensure_fragments_table(conn: &Connection, name: &str) -> Result<()> {
    ensure_table(conn, name, build_arrow_schema()).await
}
