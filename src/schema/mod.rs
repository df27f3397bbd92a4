//! Schema payload for the Opelle database
//!
//! The migration is an ordered list of independent statements: drop every
//! table, recreate it, enable row-level security, attach policies and indexes,
//! then install the `updated_at` trigger.

pub mod analysis;
pub mod policies;
pub mod tables;

use std::fmt;

pub use policies::{PolicyCommand, PortalPolicy, CLIENT_PORTAL_POLICIES};
pub use tables::{DROP_ORDER, TABLES};

pub const SET_UPDATED_AT_FUNCTION: &str = "CREATE OR REPLACE FUNCTION public.set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
  NEW.updated_at = now();
  RETURN NEW;
END;
$$ LANGUAGE plpgsql";

/// How the workspace owner is granted access to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerAccess {
    /// The row itself names the owner (`owner_id = auth.uid()`).
    Owner,
    /// Separate SELECT/INSERT/UPDATE/DELETE policies.
    PerCommand,
    /// A single `FOR ALL` policy.
    All,
}

#[derive(Debug, Clone, Copy)]
pub struct IndexDef {
    pub name: &'static str,
    pub columns: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    /// Column and constraint list, without the surrounding parentheses.
    pub columns: &'static str,
    pub owner_access: OwnerAccess,
    pub indexes: &'static [IndexDef],
}

impl TableDef {
    pub fn has_updated_at(&self) -> bool {
        self.columns
            .lines()
            .any(|line| line.trim_start().starts_with("updated_at "))
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS public.{} CASCADE", self.name)
    }

    pub fn create_sql(&self) -> String {
        format!("CREATE TABLE public.{} (\n{}\n)", self.name, self.columns)
    }

    pub fn enable_rls_sql(&self) -> String {
        format!("ALTER TABLE public.{} ENABLE ROW LEVEL SECURITY", self.name)
    }

    pub fn index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE INDEX {} ON public.{}({})",
                    index.name, self.name, index.columns
                )
            })
            .collect()
    }

    pub fn trigger_sql(&self) -> Option<String> {
        self.has_updated_at().then(|| {
            format!(
                "CREATE TRIGGER set_updated_at BEFORE UPDATE ON public.{} FOR EACH ROW EXECUTE FUNCTION public.set_updated_at()",
                self.name
            )
        })
    }
}

/// Migration phases, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    DropTables,
    CreateTables,
    EnableRls,
    OwnerPolicies,
    PortalPolicies,
    Indexes,
    TriggerFunction,
    Triggers,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::DropTables => "Drop tables",
            Phase::CreateTables => "Create tables",
            Phase::EnableRls => "Enable RLS",
            Phase::OwnerPolicies => "Workspace owner policies",
            Phase::PortalPolicies => "Client portal policies",
            Phase::Indexes => "Indexes",
            Phase::TriggerFunction => "Trigger function",
            Phase::Triggers => "Triggers",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub phase: Phase,
    /// Target table, `None` for the trigger function.
    pub table: Option<&'static str>,
    pub sql: String,
}

impl Statement {
    fn new(phase: Phase, table: Option<&'static str>, sql: String) -> Self {
        Self { phase, table, sql }
    }
}

/// Look up a table definition by its unqualified name.
pub fn table(name: &str) -> Option<&'static TableDef> {
    TABLES.iter().find(|t| t.name == name)
}

/// The full migration payload in application order.
pub fn statements() -> Vec<Statement> {
    let mut out = Vec::new();

    for t in DROP_ORDER.iter().filter_map(|name| table(name)) {
        out.push(Statement::new(Phase::DropTables, Some(t.name), t.drop_sql()));
    }
    for t in TABLES {
        out.push(Statement::new(Phase::CreateTables, Some(t.name), t.create_sql()));
    }
    for t in TABLES {
        out.push(Statement::new(Phase::EnableRls, Some(t.name), t.enable_rls_sql()));
    }
    for t in TABLES {
        for sql in policies::owner_policies(t) {
            out.push(Statement::new(Phase::OwnerPolicies, Some(t.name), sql));
        }
    }
    for policy in CLIENT_PORTAL_POLICIES {
        out.push(Statement::new(
            Phase::PortalPolicies,
            Some(policy.table),
            policies::portal_policy(policy),
        ));
    }
    for t in TABLES {
        for sql in t.index_sql() {
            out.push(Statement::new(Phase::Indexes, Some(t.name), sql));
        }
    }
    out.push(Statement::new(
        Phase::TriggerFunction,
        None,
        SET_UPDATED_AT_FUNCTION.to_string(),
    ));
    for t in TABLES {
        if let Some(sql) = t.trigger_sql() {
            out.push(Statement::new(Phase::Triggers, Some(t.name), sql));
        }
    }

    out
}

/// Render statements as a single script, one comment header per phase.
pub fn render_script(statements: &[Statement]) -> String {
    let mut script = String::new();
    let mut current = None;

    for stmt in statements {
        if current != Some(stmt.phase) {
            if current.is_some() {
                script.push('\n');
            }
            script.push_str(&format!("-- {}\n", stmt.phase));
            current = Some(stmt.phase);
        }
        script.push_str(&stmt.sql);
        script.push_str(";\n");
    }

    script
}
