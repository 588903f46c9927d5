//! Caller identity and the per-resource visibility rules.
//!
//! Every collection endpoint resolves a [`RowScope`] from the caller before it
//! touches the database. The rules live here as plain functions so they can be
//! tested without a store:
//!
//! | Resource | Who may access        | Visible rows                          |
//! |----------|-----------------------|---------------------------------------|
//! | Client   | administrators only   | all                                   |
//! | Payment  | any authenticated     | admin: all; others: own client's rows |
//! | Product  | any authenticated     | all                                   |
//! | Order    | any authenticated     | admin: all; others: own client's rows |

use crate::error::CoreError;
use crate::types::DbId;

/// The authenticated identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: DbId,
    pub is_staff: bool,
}

impl Caller {
    pub fn admin(user_id: DbId) -> Self {
        Self {
            user_id,
            is_staff: true,
        }
    }

    pub fn customer(user_id: DbId) -> Self {
        Self {
            user_id,
            is_staff: false,
        }
    }
}

/// The record types exposed through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Client,
    Payment,
    Product,
    Order,
}

impl Resource {
    /// Name used in not-found messages.
    pub const fn entity_name(self) -> &'static str {
        match self {
            Resource::Client => "Client",
            Resource::Payment => "Payment",
            Resource::Product => "Product",
            Resource::Order => "Order",
        }
    }
}

/// The subset of rows a caller may see for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    /// Every row.
    All,
    /// Only rows whose client is linked to this user id.
    OwnedBy(DbId),
}

impl RowScope {
    /// The owner filter to bind into a query, `None` meaning "no filter".
    pub fn owner(self) -> Option<DbId> {
        match self {
            RowScope::All => None,
            RowScope::OwnedBy(user_id) => Some(user_id),
        }
    }

    pub fn is_unrestricted(self) -> bool {
        matches!(self, RowScope::All)
    }
}

/// Resolve the visible scope of `resource` for `caller`.
///
/// Fails with [`CoreError::Forbidden`] when the caller may not use the
/// resource at all.
pub fn scope_for(resource: Resource, caller: &Caller) -> Result<RowScope, CoreError> {
    match resource {
        Resource::Client if caller.is_staff => Ok(RowScope::All),
        Resource::Client => Err(CoreError::Forbidden(
            "You do not have permission to perform this action".into(),
        )),
        Resource::Product => Ok(RowScope::All),
        Resource::Payment | Resource::Order => Ok(owner_scope(caller)),
    }
}

fn owner_scope(caller: &Caller) -> RowScope {
    if caller.is_staff {
        RowScope::All
    } else {
        RowScope::OwnedBy(caller.user_id)
    }
}
