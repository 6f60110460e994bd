use crate::app::models::{
    ColumnRecord, DocumentSummary, ForeignKeyRecord, RenderedDocument, TableBlock,
};

const LENGTH_TYPES: [&str; 4] = ["varchar", "nvarchar", "char", "nchar"];
const PRECISION_TYPES: [&str; 2] = ["decimal", "numeric"];
const UNBOUNDED_LENGTH: i32 = -1;
const NO_ACTION: &str = "NO_ACTION";
const RULE_WIDTH: usize = 60;

/// Type name with its length or precision suffix, e.g. `varchar(max)` or `decimal(10,2)`.
pub fn render_type(column: &ColumnRecord) -> String {
    let data_type = column.data_type.as_str();

    if LENGTH_TYPES.contains(&data_type) {
        if let Some(length) = column.char_max_length {
            return match length {
                UNBOUNDED_LENGTH => format!("{}(max)", data_type),
                n => format!("{}({})", data_type, n),
            };
        }
    }

    if PRECISION_TYPES.contains(&data_type) {
        if let Some(precision) = column.numeric_precision {
            // A zero scale is treated the same as a missing one.
            return match column.numeric_scale {
                Some(scale) if scale != 0 => format!("{}({},{})", data_type, precision, scale),
                _ => format!("{}({})", data_type, precision),
            };
        }
    }

    data_type.to_string()
}

/// Strips the wrapping parentheses and quotes engines put around default expressions.
/// Returns `None` when nothing usable is left or the default is `NULL`.
pub fn clean_default(raw: &str) -> Option<String> {
    let value = raw
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    let value = value.strip_prefix('\'').unwrap_or(value);
    let value = value.strip_suffix('\'').unwrap_or(value);

    if value.is_empty() || value == "NULL" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Attribute list in output order: pk, increment, unique, null, default.
pub fn column_attributes(column: &ColumnRecord) -> Vec<String> {
    let mut attrs = Vec::new();

    if column.is_primary_key {
        attrs.push("pk".to_string());
    }
    if column.is_identity {
        attrs.push("increment".to_string());
    }
    if column.is_unique && !column.is_primary_key {
        attrs.push("unique".to_string());
    }
    if column.nullable {
        attrs.push("null".to_string());
    }
    if let Some(value) = column.default_expr.as_deref().and_then(clean_default) {
        attrs.push(format!("default: '{}'", value));
    }

    attrs
}

pub fn render_column(column: &ColumnRecord) -> String {
    let attrs = column_attributes(column);
    let type_name = render_type(column);

    if attrs.is_empty() {
        format!("  {} {}", column.column, type_name)
    } else {
        format!("  {} {} [{}]", column.column, type_name, attrs.join(", "))
    }
}

/// Folds the ordered column stream into one block per run of rows sharing
/// schema and table. Rows that come back to an earlier table open a new block.
pub fn group_tables(columns: &[ColumnRecord]) -> Vec<TableBlock<'_>> {
    columns.iter().fold(Vec::new(), |mut blocks, column| {
        match blocks.last_mut() {
            Some(block) if block.holds(column) => block.columns.push(column),
            _ => blocks.push(TableBlock::open(column)),
        }
        blocks
    })
}

fn render_block(block: &TableBlock<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(block.columns.len() + 3);
    lines.push(format!("Table {} {{", block.qualified_name()));
    lines.extend(block.columns.iter().map(|column| render_column(column)));
    lines.push("}".to_string());
    lines.push(String::new());
    lines
}

pub fn render_tables(blocks: &[TableBlock<'_>]) -> Vec<String> {
    blocks.iter().flat_map(render_block).collect()
}

/// Counts as they will appear in the rendered document.
pub fn summarize(columns: &[ColumnRecord], fks: &[ForeignKeyRecord]) -> DocumentSummary {
    DocumentSummary {
        tables: group_tables(columns).len(),
        columns: columns.len(),
        foreign_keys: fks.len(),
    }
}

/// `SET_NULL` -> `set null`. Only the first underscore is replaced.
pub fn normalize_action(action: &str) -> String {
    action.to_lowercase().replacen('_', " ", 1)
}

fn explicit_action(action: Option<&str>) -> Option<String> {
    action
        .filter(|action| *action != NO_ACTION)
        .map(normalize_action)
}

pub fn render_ref(fk: &ForeignKeyRecord) -> String {
    let mut line = format!(
        "Ref: {}.{}.{} > {}.{}.{}",
        fk.fk_schema, fk.fk_table, fk.fk_column, fk.pk_schema, fk.pk_table, fk.pk_column
    );

    let mut actions = Vec::new();
    if let Some(action) = explicit_action(fk.delete_action.as_deref()) {
        actions.push(format!("delete: {}", action));
    }
    if let Some(action) = explicit_action(fk.update_action.as_deref()) {
        actions.push(format!("update: {}", action));
    }

    if !actions.is_empty() {
        line.push_str(&format!(" [{}]", actions.join(", ")));
    }
    line
}

pub fn render_refs(fks: &[ForeignKeyRecord]) -> Vec<String> {
    fks.iter().map(render_ref).collect()
}

pub fn header_comments(database: &str, server: &str, generated_at: &str) -> Vec<String> {
    vec![
        format!("// Generated from database: {}", database),
        format!("// Server: {}", server),
        format!("// Generated at: {}", generated_at),
    ]
}

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn generate_dbml(
        header: &[String],
        columns: &[ColumnRecord],
        fks: &[ForeignKeyRecord],
    ) -> RenderedDocument {
        let mut lines: Vec<String> = header.to_vec();
        if !header.is_empty() {
            lines.push(String::new());
        }

        let blocks = group_tables(columns);
        lines.extend(render_tables(&blocks));

        if !fks.is_empty() {
            lines.push("// Foreign Key Relationships".to_string());
            lines.push(format!("// {}", "-".repeat(RULE_WIDTH)));
            lines.extend(render_refs(fks));
        }

        RenderedDocument {
            text: lines.join("\n"),
            summary: DocumentSummary {
                tables: blocks.len(),
                columns: columns.len(),
                foreign_keys: fks.len(),
            },
        }
    }
}
