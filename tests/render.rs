use sql_dbml::app::formatter::header_comments;
use sql_dbml::{ColumnRecord, DocumentSummary, ForeignKeyRecord, OutputGenerator};

fn users_columns() -> Vec<ColumnRecord> {
    vec![
        ColumnRecord {
            schema: "dbo".to_string(),
            table: "Users".to_string(),
            column: "Id".to_string(),
            data_type: "int".to_string(),
            numeric_precision: Some(10),
            numeric_scale: Some(0),
            is_primary_key: true,
            is_identity: true,
            ..Default::default()
        },
        ColumnRecord {
            schema: "dbo".to_string(),
            table: "Users".to_string(),
            column: "Name".to_string(),
            data_type: "nvarchar".to_string(),
            char_max_length: Some(100),
            nullable: true,
            ..Default::default()
        },
    ]
}

fn role_ref() -> ForeignKeyRecord {
    ForeignKeyRecord {
        fk_schema: "dbo".to_string(),
        fk_table: "Users".to_string(),
        fk_column: "Id".to_string(),
        pk_schema: "dbo".to_string(),
        pk_table: "Roles".to_string(),
        pk_column: "Id".to_string(),
        delete_action: Some("CASCADE".to_string()),
        update_action: Some("NO_ACTION".to_string()),
    }
}

#[test]
fn renders_tables_then_refs() {
    let header = header_comments("app", "localhost:5432", "2024-03-01T12:00:00.000Z");
    let doc = OutputGenerator::generate_dbml(&header, &users_columns(), &[role_ref()]);

    let expected = "\
// Generated from database: app
// Server: localhost:5432
// Generated at: 2024-03-01T12:00:00.000Z

Table dbo.Users {
  Id int [pk, increment]
  Name nvarchar(100) [null]
}

// Foreign Key Relationships
// ------------------------------------------------------------
Ref: dbo.Users.Id > dbo.Roles.Id [delete: cascade]";

    assert_eq!(doc.text, expected);
    assert_eq!(
        doc.summary,
        DocumentSummary {
            tables: 1,
            columns: 2,
            foreign_keys: 1
        }
    );
}

#[test]
fn omits_relationship_section_without_foreign_keys() {
    let doc = OutputGenerator::generate_dbml(&[], &users_columns(), &[]);

    assert!(!doc.text.contains("//"));
    assert!(!doc.text.contains("Ref:"));
    assert!(doc.text.ends_with("}\n"));
    assert_eq!(doc.summary.foreign_keys, 0);
}

#[test]
fn one_block_per_table_in_input_order() {
    let mut columns = users_columns();
    columns.push(ColumnRecord {
        schema: "dbo".to_string(),
        table: "Roles".to_string(),
        column: "Id".to_string(),
        data_type: "int".to_string(),
        is_primary_key: true,
        is_unique: true,
        ..Default::default()
    });
    columns.push(ColumnRecord {
        schema: "dbo".to_string(),
        table: "Roles".to_string(),
        column: "Status".to_string(),
        data_type: "varchar".to_string(),
        char_max_length: Some(-1),
        default_expr: Some("(('draft'))".to_string()),
        ..Default::default()
    });

    let doc = OutputGenerator::generate_dbml(&[], &columns, &[]);

    assert_eq!(doc.text.matches("Table ").count(), 2);
    let roles = doc
        .text
        .split("Table dbo.Roles {\n")
        .nth(1)
        .expect("roles block");
    assert_eq!(
        roles,
        "  Id int [pk]\n  Status varchar(max) [default: 'draft']\n}\n"
    );
    assert_eq!(doc.summary.tables, 2);
    assert_eq!(doc.summary.columns, 4);
}
