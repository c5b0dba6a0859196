//! Status and phase enums mapping to SMALLINT columns.
//!
//! Each enum variant's discriminant matches the value stored in the
//! corresponding SMALLINT column (1-based), so encoding is a cast and
//! decoding is a checked lookup. The label strings are the wire/audit
//! representation.

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in discriminant order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Decode a database status ID. Returns `None` for unknown IDs.
            pub fn from_id(id: StatusId) -> Option<Self> {
                Self::ALL.iter().copied().find(|value| value.id() == id)
            }

            /// The snake_case label used in audit entries and error messages.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Task workflow status.
    TaskStatus {
        Pending = 1 => "pending",
        InProgress = 2 => "in_progress",
        Completed = 3 => "completed",
        Blocked = 4 => "blocked",
    }
}

define_status_enum! {
    /// Project lifecycle phase. The discriminant order is the one and only
    /// legal progression order.
    ProjectPhase {
        ClientAcquisition = 1 => "client_acquisition",
        StrategyPlanning = 2 => "strategy_planning",
        Production = 3 => "production",
        PostProduction = 4 => "post_production",
        Delivery = 5 => "delivery",
    }
}

define_status_enum! {
    /// Project priority.
    ProjectPriority {
        Low = 1 => "low",
        Medium = 2 => "medium",
        High = 3 => "high",
    }
}

impl TaskStatus {
    /// Whether the edge `self -> next` is permitted.
    ///
    /// Allowed edges: pending -> in_progress, in_progress -> completed,
    /// in_progress -> blocked, blocked -> in_progress. `Completed` is
    /// terminal: no edge leaves it.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::{Blocked, Completed, InProgress, Pending};
        matches!(
            (self, next),
            (Pending, InProgress)
                | (InProgress, Completed)
                | (InProgress, Blocked)
                | (Blocked, InProgress)
        )
    }

    /// Validate the edge `self -> next`, naming the rejected edge on failure.
    pub fn validate_transition(self, next: TaskStatus) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.label(),
                to: next.label(),
            })
        }
    }
}

impl ProjectPhase {
    /// The phase immediately following this one, or `None` for `Delivery`.
    pub fn next(self) -> Option<ProjectPhase> {
        ProjectPhase::from_id(self.id() + 1)
    }

    /// Validate that `requested` is exactly the phase following `self`.
    ///
    /// Rejects skips, regressions, and staying in place -- a phase only ever
    /// advances forward by one step.
    pub fn validate_advance(self, requested: ProjectPhase) -> Result<(), CoreError> {
        if self.next() == Some(requested) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.label(),
                to: requested.label(),
            })
        }
    }
}
