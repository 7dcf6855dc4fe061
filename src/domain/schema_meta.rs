//! Schema metadata domain types.
//!
//! Editable descriptions of the target database, used both by the schema
//! browsing API and by the prompt builder of the query feature.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Described table of the target database
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SchemaTable {
    pub id: Uuid,
    #[schema(example = "orders")]
    pub table_name: String,
    /// Business description shown to the LLM
    pub description: String,
    pub columns: Vec<SchemaColumn>,
}

/// Described column
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SchemaColumn {
    pub id: Uuid,
    pub table_id: Uuid,
    #[schema(example = "order_total")]
    pub column_name: String,
    #[schema(example = "DECIMAL")]
    pub data_type: String,
    pub description: String,
}

impl SchemaTable {
    /// Render this table as a prompt fragment.
    pub fn prompt_fragment(&self) -> String {
        let mut out = format!("Table {}: {}\n", self.table_name, self.description);
        for col in &self.columns {
            out.push_str(&format!(
                "  - {} ({}): {}\n",
                col.column_name, col.data_type, col.description
            ));
        }
        out
    }
}
