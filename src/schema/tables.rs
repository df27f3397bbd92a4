//! Table registry for the Opelle schema, in creation order.
//!
//! Parents come before children so every `CREATE TABLE` can resolve its
//! foreign keys. `workspaces` is the tenant root; it references the external
//! `auth.users` table owned by the hosted auth service.

use super::{IndexDef, OwnerAccess, TableDef};

/// Drop order for the rendered script. Drops cascade, so any order is valid.
pub const DROP_ORDER: &[&str] = &[
    "aftercare_plans",
    "rebook_requests",
    "consents",
    "intake_responses",
    "client_users",
    "client_invites",
    "tasks",
    "photos",
    "service_logs",
    "formulas",
    "appointments",
    "services",
    "clients",
    "workspaces",
];

pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "workspaces",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  owner_id UUID NOT NULL REFERENCES auth.users(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  created_at TIMESTAMPTZ DEFAULT now(),
  updated_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::Owner,
        indexes: &[IndexDef {
            name: "idx_workspaces_owner_id",
            columns: "owner_id",
        }],
    },
    TableDef {
        name: "clients",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  first_name TEXT NOT NULL,
  last_name TEXT,
  pronouns TEXT,
  phone TEXT,
  email TEXT,
  notes TEXT,
  tags TEXT[] DEFAULT '{}',
  created_at TIMESTAMPTZ DEFAULT now(),
  updated_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::PerCommand,
        indexes: &[
            IndexDef {
                name: "idx_clients_workspace_id",
                columns: "workspace_id",
            },
            IndexDef {
                name: "idx_clients_workspace_created",
                columns: "workspace_id, created_at DESC",
            },
        ],
    },
    TableDef {
        name: "services",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  duration_mins INT DEFAULT 60,
  default_template JSONB DEFAULT '{}',
  created_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::PerCommand,
        indexes: &[],
    },
    TableDef {
        name: "appointments",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  client_id UUID NOT NULL REFERENCES public.clients(id) ON DELETE CASCADE,
  service_id UUID REFERENCES public.services(id) ON DELETE SET NULL,
  service_name TEXT NOT NULL,
  start_at TIMESTAMPTZ NOT NULL,
  end_at TIMESTAMPTZ,
  duration_mins INT NOT NULL DEFAULT 60,
  status TEXT NOT NULL DEFAULT 'scheduled' CHECK (status IN ('scheduled', 'completed', 'cancelled')),
  notes TEXT,
  created_at TIMESTAMPTZ DEFAULT now(),
  updated_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::PerCommand,
        indexes: &[
            IndexDef {
                name: "idx_appointments_workspace_id",
                columns: "workspace_id",
            },
            IndexDef {
                name: "idx_appointments_workspace_start",
                columns: "workspace_id, start_at",
            },
            IndexDef {
                name: "idx_appointments_client_id",
                columns: "client_id",
            },
        ],
    },
    TableDef {
        name: "service_logs",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  appointment_id UUID NOT NULL UNIQUE REFERENCES public.appointments(id) ON DELETE CASCADE,
  consult_notes TEXT,
  aftercare_notes TEXT,
  learning_notes TEXT,
  created_at TIMESTAMPTZ DEFAULT now(),
  updated_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::PerCommand,
        indexes: &[],
    },
    TableDef {
        name: "formulas",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  client_id UUID REFERENCES public.clients(id) ON DELETE SET NULL,
  appointment_id UUID REFERENCES public.appointments(id) ON DELETE SET NULL,
  service_type TEXT NOT NULL CHECK (service_type IN ('color', 'lighten', 'tone', 'gloss', 'other')),
  title TEXT NOT NULL,
  color_line TEXT,
  steps JSONB NOT NULL DEFAULT '[]',
  notes TEXT,
  tags TEXT[] DEFAULT '{}',
  created_at TIMESTAMPTZ DEFAULT now(),
  updated_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::PerCommand,
        indexes: &[
            IndexDef {
                name: "idx_formulas_workspace_id",
                columns: "workspace_id",
            },
            IndexDef {
                name: "idx_formulas_client_id",
                columns: "client_id",
            },
        ],
    },
    TableDef {
        name: "photos",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  client_id UUID REFERENCES public.clients(id) ON DELETE SET NULL,
  appointment_id UUID REFERENCES public.appointments(id) ON DELETE SET NULL,
  url TEXT NOT NULL,
  caption TEXT,
  photo_type TEXT CHECK (photo_type IN ('before', 'after', 'progress', 'other')),
  created_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::PerCommand,
        indexes: &[
            IndexDef {
                name: "idx_photos_client_id",
                columns: "client_id",
            },
            IndexDef {
                name: "idx_photos_appointment_id",
                columns: "appointment_id",
            },
        ],
    },
    TableDef {
        name: "tasks",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  title TEXT NOT NULL,
  notes TEXT,
  status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'in_progress', 'completed')),
  due_at TIMESTAMPTZ,
  created_at TIMESTAMPTZ DEFAULT now(),
  updated_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::PerCommand,
        indexes: &[IndexDef {
            name: "idx_tasks_workspace_id",
            columns: "workspace_id",
        }],
    },
    TableDef {
        name: "client_invites",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  client_id UUID NOT NULL REFERENCES public.clients(id) ON DELETE CASCADE,
  token TEXT NOT NULL UNIQUE,
  expires_at TIMESTAMPTZ NOT NULL,
  used_at TIMESTAMPTZ,
  created_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::PerCommand,
        indexes: &[IndexDef {
            name: "idx_client_invites_token",
            columns: "token",
        }],
    },
    TableDef {
        name: "client_users",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  user_id UUID NOT NULL REFERENCES auth.users(id) ON DELETE CASCADE,
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  client_id UUID NOT NULL REFERENCES public.clients(id) ON DELETE CASCADE,
  created_at TIMESTAMPTZ DEFAULT now(),
  UNIQUE(user_id, workspace_id)",
        owner_access: OwnerAccess::All,
        indexes: &[
            IndexDef {
                name: "idx_client_users_user_id",
                columns: "user_id",
            },
            IndexDef {
                name: "idx_client_users_client_id",
                columns: "client_id",
            },
        ],
    },
    TableDef {
        name: "intake_responses",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  client_id UUID NOT NULL REFERENCES public.clients(id) ON DELETE CASCADE,
  appointment_id UUID REFERENCES public.appointments(id) ON DELETE SET NULL,
  answers JSONB NOT NULL DEFAULT '{}',
  created_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::All,
        indexes: &[],
    },
    TableDef {
        name: "consents",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  client_id UUID NOT NULL REFERENCES public.clients(id) ON DELETE CASCADE,
  photo_consent BOOLEAN DEFAULT false,
  chemical_consent BOOLEAN DEFAULT false,
  signature_name TEXT,
  created_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::All,
        indexes: &[],
    },
    TableDef {
        name: "rebook_requests",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  client_id UUID NOT NULL REFERENCES public.clients(id) ON DELETE CASCADE,
  preferred_dates JSONB DEFAULT '[]',
  service_type TEXT,
  notes TEXT,
  status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'confirmed', 'declined')),
  created_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::All,
        indexes: &[],
    },
    TableDef {
        name: "aftercare_plans",
        columns: "  id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
  workspace_id UUID NOT NULL REFERENCES public.workspaces(id) ON DELETE CASCADE,
  appointment_id UUID NOT NULL REFERENCES public.appointments(id) ON DELETE CASCADE,
  client_id UUID NOT NULL REFERENCES public.clients(id) ON DELETE CASCADE,
  client_visible_notes TEXT,
  recommended_products JSONB DEFAULT '[]',
  published_at TIMESTAMPTZ DEFAULT now()",
        owner_access: OwnerAccess::All,
        indexes: &[],
    },
];
