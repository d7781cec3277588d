use chrono::NaiveDate;

use crate::domain::entity::account::TeamRef;
use crate::domain::value_object::{account_role::AccountRole, rut::Rut};

/// RUT admitted by an administrator, not necessarily registered yet
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub rut: Rut,
    pub role: AccountRole,
    pub team: Option<TeamRef>,
    pub admitted_on: NaiveDate,
}
