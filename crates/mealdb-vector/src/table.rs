//! LanceDB connection helpers.
use anyhow::{Result, bail};
use lancedb::{connect, Connection, Table};

pub async fn open_db(uri: &str) -> Result<Connection> {
    Ok(connect(uri).execute().await?)
}

pub async fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let names = conn.table_names().execute().await?;
    Ok(names.iter().any(|n| n == name))
}

/// Open an existing table; a missing table is an error, never created here.
pub async fn open_table(conn: &Connection, name: &str) -> Result<Table> {
    if !table_exists(conn, name).await? {
        bail!("LanceDB table '{}' does not exist; run the ingestion job first", name);
    }
    Ok(conn.open_table(name).execute().await?)
}
