use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

pub const ID: &str = "id";
pub const MEAL_NAME: &str = "meal_name";
pub const CATEGORY: &str = "category";
pub const AREA: &str = "area";
pub const INGREDIENT_COUNT: &str = "ingredient_count";
pub const DOCUMENT: &str = "document";
pub const VECTOR: &str = "vector";
/// Column LanceDB appends to vector-search results.
pub const DISTANCE: &str = "_distance";

/// Layout of the meal table produced by the ingestion job.
pub fn build_meal_schema(dim: i32) -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new(ID, DataType::Utf8, false),
		Field::new(MEAL_NAME, DataType::Utf8, false),
		Field::new(CATEGORY, DataType::Utf8, false),
		Field::new(AREA, DataType::Utf8, false),
		Field::new(INGREDIENT_COUNT, DataType::Int32, false),
		Field::new(DOCUMENT, DataType::Utf8, false),
		Field::new(VECTOR, DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim), true),
	]))
}
