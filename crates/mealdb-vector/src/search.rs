use anyhow::{Result, anyhow};
use arrow_array::{Array, Float32Array, Int32Array, RecordBatch, StringArray};
use futures::TryStreamExt;
use lancedb::Table;
use lancedb::query::{ExecutableQuery, QueryBase};
use std::path::Path;
use tracing::{debug, info};

use mealdb_core::traits::VectorIndex;
use mealdb_core::types::{Candidate, MealMeta};

use crate::schema;
use crate::table::{open_db, open_table};

/// Read-only view over a pre-built LanceDB meal table.
///
/// Queries are synchronous: the index owns a tokio runtime and blocks on it,
/// so it must not be called from inside another runtime.
pub struct LanceMealIndex { rt: tokio::runtime::Runtime, table: Table, table_name: String }

impl LanceMealIndex {
	pub fn open(db_path: &Path, table_name: &str) -> Result<Self> {
		let rt = tokio::runtime::Runtime::new()?;
		let uri = db_path.to_string_lossy().to_string();
		let table = rt.block_on(async {
			let db = open_db(&uri).await?;
			open_table(&db, table_name).await
		})?;
		let rows = rt.block_on(table.count_rows(None))?;
		info!(table = table_name, rows, path = %db_path.display(), "opened meal index");
		Ok(Self { rt, table, table_name: table_name.to_string() })
	}

	pub fn table_name(&self) -> &str { &self.table_name }

	pub fn len(&self) -> Result<usize> { Ok(self.rt.block_on(self.table.count_rows(None))?) }

	pub fn is_empty(&self) -> Result<bool> { Ok(self.len()? == 0) }
}

impl VectorIndex for LanceMealIndex {
	fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Candidate>> {
		// Over-fetch can saturate; never ask LanceDB for more rows than the table holds.
		let k = k.min(self.len()?);
		if k == 0 { return Ok(Vec::new()); }
		let batches: Vec<RecordBatch> = self.rt.block_on(async {
			let stream = self.table.vector_search(vector.to_vec())?.limit(k).execute().await?;
			stream.try_collect::<Vec<_>>().await
		})?;
		let mut candidates = Vec::new();
		for batch in &batches { candidates.extend(decode_batch(batch)?); }
		// Stream batches are not guaranteed to arrive in rank order.
		candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
		candidates.truncate(k);
		debug!(table = %self.table_name, k, returned = candidates.len(), "vector search");
		Ok(candidates)
	}
}

fn string_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
	batch.column_by_name(name).and_then(|c| c.as_any().downcast_ref::<StringArray>()).ok_or_else(|| anyhow!("column '{}' missing or not utf8", name))
}

/// Convert one result batch into candidates, in row order.
pub fn decode_batch(batch: &RecordBatch) -> Result<Vec<Candidate>> {
	let ids = string_col(batch, schema::ID)?;
	let names = string_col(batch, schema::MEAL_NAME)?;
	let categories = string_col(batch, schema::CATEGORY)?;
	let areas = string_col(batch, schema::AREA)?;
	let documents = string_col(batch, schema::DOCUMENT)?;
	let counts = batch.column_by_name(schema::INGREDIENT_COUNT).and_then(|c| c.as_any().downcast_ref::<Int32Array>()).ok_or_else(|| anyhow!("column '{}' missing or not int32", schema::INGREDIENT_COUNT))?;
	let distances = batch.column_by_name(schema::DISTANCE).and_then(|c| c.as_any().downcast_ref::<Float32Array>()).ok_or_else(|| anyhow!("column '{}' missing; was this a vector search?", schema::DISTANCE))?;

	let mut out = Vec::with_capacity(batch.num_rows());
	for i in 0..batch.num_rows() {
		let ingredient_count = if counts.is_null(i) { 0 } else { u32::try_from(counts.value(i)).unwrap_or(0) };
		let distance = if distances.is_null(i) { f32::INFINITY } else { distances.value(i) };
		out.push(Candidate {
			id: ids.value(i).to_string(),
			document: documents.value(i).to_string(),
			metadata: MealMeta {
				meal_name: names.value(i).to_string(),
				category: categories.value(i).to_string(),
				area: areas.value(i).to_string(),
				ingredient_count,
				..MealMeta::default()
			},
			distance,
		});
	}
	Ok(out)
}
