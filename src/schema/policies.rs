//! Row-level-security policy statements.
//!
//! Two families: workspace-owner policies (one set per table, shaped by
//! [`OwnerAccess`]) and client-portal policies that let a linked portal user
//! read or submit rows for their own client record.

use std::fmt;

use super::{OwnerAccess, TableDef};

const OWNER_PREDICATE: &str = "owner_id = auth.uid()";
const WORKSPACE_OWNER_PREDICATE: &str =
    "workspace_id IN (SELECT id FROM public.workspaces WHERE owner_id = auth.uid())";
const PORTAL_CLIENT_PREDICATE: &str =
    "client_id IN (SELECT client_id FROM public.client_users WHERE user_id = auth.uid())";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyCommand {
    All,
    Select,
    Insert,
    Update,
    Delete,
}

impl PolicyCommand {
    pub const CRUD: [PolicyCommand; 4] = [
        PolicyCommand::Select,
        PolicyCommand::Insert,
        PolicyCommand::Update,
        PolicyCommand::Delete,
    ];

    /// INSERT policies constrain new rows, so they take `WITH CHECK`.
    fn clause(self) -> &'static str {
        match self {
            PolicyCommand::Insert => "WITH CHECK",
            _ => "USING",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            PolicyCommand::All => "all",
            PolicyCommand::Select => "select",
            PolicyCommand::Insert => "insert",
            PolicyCommand::Update => "update",
            PolicyCommand::Delete => "delete",
        }
    }
}

impl fmt::Display for PolicyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffix().to_uppercase())
    }
}

/// A policy granting a client-portal user access to their own rows.
#[derive(Debug, Clone, Copy)]
pub struct PortalPolicy {
    pub name: &'static str,
    pub table: &'static str,
    pub command: PolicyCommand,
}

pub const CLIENT_PORTAL_POLICIES: &[PortalPolicy] = &[
    PortalPolicy {
        name: "client_user_select_own",
        table: "intake_responses",
        command: PolicyCommand::Select,
    },
    PortalPolicy {
        name: "client_user_insert_own",
        table: "intake_responses",
        command: PolicyCommand::Insert,
    },
    PortalPolicy {
        name: "client_user_select_aftercare",
        table: "aftercare_plans",
        command: PolicyCommand::Select,
    },
    PortalPolicy {
        name: "client_user_select_consents",
        table: "consents",
        command: PolicyCommand::Select,
    },
    PortalPolicy {
        name: "client_user_insert_consents",
        table: "consents",
        command: PolicyCommand::Insert,
    },
    PortalPolicy {
        name: "client_user_select_rebook",
        table: "rebook_requests",
        command: PolicyCommand::Select,
    },
    PortalPolicy {
        name: "client_user_insert_rebook",
        table: "rebook_requests",
        command: PolicyCommand::Insert,
    },
];

pub fn create_policy(name: &str, table: &str, command: PolicyCommand, predicate: &str) -> String {
    format!(
        "CREATE POLICY \"{}\" ON public.{} FOR {} {} ({})",
        name,
        table,
        command,
        command.clause(),
        predicate
    )
}

/// Owner policies for one table.
pub fn owner_policies(table: &TableDef) -> Vec<String> {
    match table.owner_access {
        OwnerAccess::Owner => vec![create_policy(
            "workspace_owner_all",
            table.name,
            PolicyCommand::All,
            OWNER_PREDICATE,
        )],
        OwnerAccess::All => vec![create_policy(
            "workspace_owner_all",
            table.name,
            PolicyCommand::All,
            WORKSPACE_OWNER_PREDICATE,
        )],
        OwnerAccess::PerCommand => PolicyCommand::CRUD
            .iter()
            .map(|&command| {
                create_policy(
                    &format!("workspace_owner_{}", command.suffix()),
                    table.name,
                    command,
                    WORKSPACE_OWNER_PREDICATE,
                )
            })
            .collect(),
    }
}

pub fn portal_policy(policy: &PortalPolicy) -> String {
    create_policy(policy.name, policy.table, policy.command, PORTAL_CLIENT_PREDICATE)
}
