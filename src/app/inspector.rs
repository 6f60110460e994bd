use crate::app::config::SchemaFilter;
use crate::app::models::{ColumnRecord, ForeignKeyRecord};
use anyhow::{Context, Result};

// Owns every query against the catalog.
//
// Rows are shaped in SQL so they already match what the formatter expects:
// short type names, serial columns flagged as identity, `::type` casts
// stripped from defaults and referential actions spelled with underscores.
// Only casts right after a closing quote or paren are stripped, so `::` inside
// a string literal survives. Foreign keys are read from `pg_constraint` because
// a key may reference a unique index that is not itself a constraint.
// Schema lists are bound as `text[]` parameters; an empty include list means
// "every schema not excluded".

const COLUMNS_QUERY: &str = r#"
    SELECT
        c.table_schema::text AS "schema",
        c.table_name::text AS "table",
        c.column_name::text AS "column",
        CASE c.udt_name::text WHEN 'bpchar' THEN 'char' ELSE c.udt_name::text END AS data_type,
        c.character_maximum_length::int4 AS char_max_length,
        c.numeric_precision::int4 AS numeric_precision,
        c.numeric_scale::int4 AS numeric_scale,
        (c.is_nullable = 'YES') AS nullable,
        CASE
            WHEN c.column_default LIKE 'nextval(%' THEN NULL
            ELSE regexp_replace(c.column_default::text, '(''|\))::[a-zA-Z_ ]+(\[\])?', '\1', 'g')
        END AS default_expr,
        (pk.column_name IS NOT NULL) AS is_primary_key,
        (c.is_identity = 'YES' OR COALESCE(c.column_default LIKE 'nextval(%', false)) AS is_identity,
        (uq.column_name IS NOT NULL) AS is_unique
    FROM information_schema.tables t
    JOIN information_schema.columns c
        ON t.table_name = c.table_name
        AND t.table_schema = c.table_schema
    LEFT JOIN (
        SELECT DISTINCT ku.table_schema, ku.table_name, ku.column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage ku
            ON tc.constraint_name = ku.constraint_name
            AND tc.table_schema = ku.table_schema
        WHERE tc.constraint_type = 'PRIMARY KEY'
    ) pk ON c.table_name = pk.table_name
        AND c.column_name = pk.column_name
        AND c.table_schema = pk.table_schema
    LEFT JOIN (
        SELECT DISTINCT ku.table_schema, ku.table_name, ku.column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage ku
            ON tc.constraint_name = ku.constraint_name
            AND tc.table_schema = ku.table_schema
        WHERE tc.constraint_type = 'UNIQUE'
    ) uq ON c.table_name = uq.table_name
        AND c.column_name = uq.column_name
        AND c.table_schema = uq.table_schema
    WHERE t.table_type = 'BASE TABLE'
        AND (cardinality($1::text[]) = 0 OR t.table_schema::text = ANY($1::text[]))
        AND NOT (t.table_schema::text = ANY($2::text[]))
    ORDER BY t.table_schema, t.table_name, c.ordinal_position
"#;

const FOREIGN_KEYS_QUERY: &str = r#"
    SELECT
        fns.nspname::text AS fk_schema,
        fc.relname::text AS fk_table,
        fa.attname::text AS fk_column,
        rn.nspname::text AS pk_schema,
        rc.relname::text AS pk_table,
        ra.attname::text AS pk_column,
        CASE con.confdeltype
            WHEN 'a' THEN 'NO_ACTION'
            WHEN 'r' THEN 'RESTRICT'
            WHEN 'c' THEN 'CASCADE'
            WHEN 'n' THEN 'SET_NULL'
            WHEN 'd' THEN 'SET_DEFAULT'
        END AS delete_action,
        CASE con.confupdtype
            WHEN 'a' THEN 'NO_ACTION'
            WHEN 'r' THEN 'RESTRICT'
            WHEN 'c' THEN 'CASCADE'
            WHEN 'n' THEN 'SET_NULL'
            WHEN 'd' THEN 'SET_DEFAULT'
        END AS update_action
    FROM pg_constraint con
    CROSS JOIN LATERAL unnest(con.conkey, con.confkey)
        WITH ORDINALITY AS k(attnum, ref_attnum, ord)
    JOIN pg_class fc ON fc.oid = con.conrelid
    JOIN pg_namespace fns ON fns.oid = fc.relnamespace
    JOIN pg_attribute fa ON fa.attrelid = con.conrelid AND fa.attnum = k.attnum
    JOIN pg_class rc ON rc.oid = con.confrelid
    JOIN pg_namespace rn ON rn.oid = rc.relnamespace
    JOIN pg_attribute ra ON ra.attrelid = con.confrelid AND ra.attnum = k.ref_attnum
    WHERE con.contype = 'f'
        AND (cardinality($1::text[]) = 0 OR fns.nspname::text = ANY($1::text[]))
        AND NOT (fns.nspname::text = ANY($2::text[]))
    ORDER BY con.conname, fns.nspname, fc.relname, k.ord
"#;

pub struct Inspector<'a> {
    pool: &'a sqlx::PgPool,
    filter: &'a SchemaFilter,
}

impl<'a> Inspector<'a> {
    pub fn new(pool: &'a sqlx::PgPool, filter: &'a SchemaFilter) -> Self {
        Self { pool, filter }
    }

    /// Columns of every base table, ordered by schema, table and ordinal position.
    pub async fn columns(&self) -> Result<Vec<ColumnRecord>> {
        sqlx::query_as::<_, ColumnRecord>(COLUMNS_QUERY)
            .bind(self.filter.included())
            .bind(self.filter.excluded())
            .fetch_all(self.pool)
            .await
            .context("Failed to fetch tables and columns")
    }

    /// One row per foreign key column pair, ordered by constraint name.
    pub async fn foreign_keys(&self) -> Result<Vec<ForeignKeyRecord>> {
        sqlx::query_as::<_, ForeignKeyRecord>(FOREIGN_KEYS_QUERY)
            .bind(self.filter.included())
            .bind(self.filter.excluded())
            .fetch_all(self.pool)
            .await
            .context("Failed to fetch foreign key relationships")
    }
}
