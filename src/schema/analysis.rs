//! Text-level checks over the statement list.
//!
//! Statements are inspected as SQL text rather than through the table
//! registry, so the checks also hold for any hand-edited payload.

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;
use tracing::debug;

use super::Statement;
use crate::error::MigrationError;

static DROP_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*DROP\s+TABLE\s+(?:IF\s+EXISTS\s+)?public\.(\w+)").unwrap()
});
static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?public\.(\w+)").unwrap()
});
static REFERENCES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)REFERENCES\s+(\w+)\.(\w+)\s*\(").unwrap());
static TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:\bON|ALTER\s+TABLE)\s+public\.(\w+)").unwrap());
static SUBQUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFROM\s+public\.(\w+)").unwrap());

/// A `REFERENCES schema.table(...)` target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn is_external(&self) -> bool {
        !self.schema.eq_ignore_ascii_case("public")
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub statements: usize,
    pub tables: usize,
    /// Referenced tables outside `public`, e.g. `auth.users`.
    pub external_references: Vec<String>,
}

pub fn dropped_table(sql: &str) -> Option<&str> {
    DROP_TABLE
        .captures(sql)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn created_table(sql: &str) -> Option<&str> {
    CREATE_TABLE
        .captures(sql)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn references(sql: &str) -> Vec<TableRef> {
    REFERENCES
        .captures_iter(sql)
        .map(|c| TableRef {
            schema: c[1].to_string(),
            table: c[2].to_string(),
        })
        .collect()
}

/// Tables a non-DDL statement depends on: its target plus any subquery sources.
fn dependencies(sql: &str) -> Vec<&str> {
    TARGET
        .captures_iter(sql)
        .chain(SUBQUERY.captures_iter(sql))
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Check drop/create ordering and foreign-key creation order.
pub fn verify(statements: &[Statement]) -> Result<Summary, MigrationError> {
    let mut drops: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut created: HashMap<&str, usize> = HashMap::new();
    let mut external = BTreeSet::new();

    for (idx, stmt) in statements.iter().enumerate() {
        let sql = stmt.sql.as_str();

        if let Some(name) = dropped_table(sql) {
            drops.entry(name).or_default().push(idx);
            continue;
        }

        if let Some(name) = created_table(sql) {
            if created.contains_key(name) {
                return Err(MigrationError::schema(format!(
                    "table {} is created more than once",
                    name
                )));
            }
            match drops.get(name).map(Vec::as_slice) {
                Some([_]) => {}
                Some(positions) if positions.len() > 1 => {
                    return Err(MigrationError::schema(format!(
                        "table {} is dropped {} times",
                        name,
                        positions.len()
                    )))
                }
                _ => {
                    return Err(MigrationError::schema(format!(
                        "table {} is created without a preceding drop",
                        name
                    )))
                }
            }

            for target in references(sql) {
                if target.is_external() {
                    external.insert(target.qualified());
                } else if target.table != name && !created.contains_key(target.table.as_str()) {
                    return Err(MigrationError::schema(format!(
                        "table {} references public.{} before it is created",
                        name, target.table
                    )));
                }
            }

            debug!("Statement {}: create {}", idx, name);
            created.insert(name, idx);
            continue;
        }

        for dep in dependencies(sql) {
            if !created.contains_key(dep) {
                return Err(MigrationError::schema(format!(
                    "statement {} depends on public.{} before it is created",
                    idx, dep
                )));
            }
        }
    }

    for (name, positions) in &drops {
        if positions.len() > 1 {
            return Err(MigrationError::schema(format!(
                "table {} is dropped {} times",
                name,
                positions.len()
            )));
        }
    }

    Ok(Summary {
        statements: statements.len(),
        tables: created.len(),
        external_references: external.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Phase;

    fn stmt(phase: Phase, sql: &str) -> Statement {
        Statement {
            phase,
            table: None,
            sql: sql.to_string(),
        }
    }

    #[test]
    fn test_extract_names() {
        assert_eq!(
            dropped_table("DROP TABLE IF EXISTS public.clients CASCADE"),
            Some("clients")
        );
        assert_eq!(
            created_table("CREATE TABLE public.clients (\n  id UUID\n)"),
            Some("clients")
        );
        assert_eq!(created_table("CREATE INDEX idx ON public.clients(id)"), None);
    }

    #[test]
    fn test_references() {
        let refs = references(
            "owner_id UUID REFERENCES auth.users(id), ws UUID REFERENCES public.workspaces(id)",
        );
        assert_eq!(refs.len(), 2);
        assert!(refs[0].is_external());
        assert_eq!(refs[0].qualified(), "auth.users");
        assert!(!refs[1].is_external());
        assert_eq!(refs[1].table, "workspaces");
    }

    #[test]
    fn test_child_before_parent_rejected() {
        let stmts = vec![
            stmt(Phase::DropTables, "DROP TABLE IF EXISTS public.clients CASCADE"),
            stmt(Phase::DropTables, "DROP TABLE IF EXISTS public.workspaces CASCADE"),
            stmt(
                Phase::CreateTables,
                "CREATE TABLE public.clients (workspace_id UUID REFERENCES public.workspaces(id))",
            ),
            stmt(Phase::CreateTables, "CREATE TABLE public.workspaces (id UUID)"),
        ];
        let err = verify(&stmts).unwrap_err();
        assert!(err.to_string().contains("references public.workspaces"));
    }

    #[test]
    fn test_missing_drop_rejected() {
        let stmts = vec![stmt(Phase::CreateTables, "CREATE TABLE public.tasks (id UUID)")];
        assert!(matches!(verify(&stmts), Err(MigrationError::Schema(_))));
    }

    #[test]
    fn test_index_on_unknown_table_rejected() {
        let stmts = vec![stmt(Phase::Indexes, "CREATE INDEX idx_x ON public.ghosts(id)")];
        assert!(verify(&stmts).is_err());
    }

    #[test]
    fn test_double_drop_rejected() {
        let stmts = vec![
            stmt(Phase::DropTables, "DROP TABLE IF EXISTS public.tasks CASCADE"),
            stmt(Phase::DropTables, "DROP TABLE IF EXISTS public.tasks CASCADE"),
            stmt(Phase::CreateTables, "CREATE TABLE public.tasks (id UUID)"),
        ];
        let err = verify(&stmts).unwrap_err();
        assert_eq!(err.to_string(), "Schema error: table tasks is dropped 2 times");
    }

    #[test]
    fn test_double_create_rejected() {
        let stmts = vec![
            stmt(Phase::DropTables, "DROP TABLE IF EXISTS public.tasks CASCADE"),
            stmt(Phase::CreateTables, "CREATE TABLE public.tasks (id UUID)"),
            stmt(Phase::CreateTables, "CREATE TABLE public.tasks (id UUID)"),
        ];
        let err = verify(&stmts).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Schema error: table tasks is created more than once"
        );
    }

    #[test]
    fn test_drop_only_after_create_rejected() {
        let stmts = vec![
            stmt(Phase::CreateTables, "CREATE TABLE public.tasks (id UUID)"),
            stmt(Phase::DropTables, "DROP TABLE IF EXISTS public.tasks CASCADE"),
        ];
        let err = verify(&stmts).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Schema error: table tasks is created without a preceding drop"
        );
    }

    #[test]
    fn test_trailing_drop_after_create_rejected() {
        let stmts = vec![
            stmt(Phase::DropTables, "DROP TABLE IF EXISTS public.tasks CASCADE"),
            stmt(Phase::CreateTables, "CREATE TABLE public.tasks (id UUID)"),
            stmt(Phase::DropTables, "DROP TABLE IF EXISTS public.tasks CASCADE"),
        ];
        let err = verify(&stmts).unwrap_err();
        assert_eq!(err.to_string(), "Schema error: table tasks is dropped 2 times");
    }

    #[test]
    fn test_minimal_payload_passes() {
        let stmts = vec![
            stmt(Phase::DropTables, "DROP TABLE IF EXISTS public.workspaces CASCADE"),
            stmt(
                Phase::CreateTables,
                "CREATE TABLE public.workspaces (owner_id UUID REFERENCES auth.users(id))",
            ),
            stmt(
                Phase::EnableRls,
                "ALTER TABLE public.workspaces ENABLE ROW LEVEL SECURITY",
            ),
        ];
        let summary = verify(&stmts).unwrap();
        assert_eq!(summary.tables, 1);
        assert_eq!(summary.external_references, vec!["auth.users".to_string()]);
    }
}
