use sqlx::FromRow;

/// One table column as reported by the metadata scan.
#[derive(FromRow, Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRecord {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub data_type: String,
    /// `-1` means unbounded (`max`).
    pub char_max_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub nullable: bool,
    pub default_expr: Option<String>,
    pub is_primary_key: bool,
    pub is_identity: bool,
    pub is_unique: bool,
}

/// One column pair of a foreign key constraint.
#[derive(FromRow, Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignKeyRecord {
    pub fk_schema: String,
    pub fk_table: String,
    pub fk_column: String,
    pub pk_schema: String,
    pub pk_table: String,
    pub pk_column: String,
    pub delete_action: Option<String>,
    pub update_action: Option<String>,
}

// Contiguous column rows sharing the same schema and table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock<'a> {
    pub schema: &'a str,
    pub table: &'a str,
    pub columns: Vec<&'a ColumnRecord>,
}

impl<'a> TableBlock<'a> {
    pub fn open(column: &'a ColumnRecord) -> Self {
        Self {
            schema: &column.schema,
            table: &column.table,
            columns: vec![column],
        }
    }

    pub fn holds(&self, column: &ColumnRecord) -> bool {
        self.schema == column.schema && self.table == column.table
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    pub tables: usize,
    pub columns: usize,
    pub foreign_keys: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub text: String,
    pub summary: DocumentSummary,
}
