//! Value Object Module

pub mod account_id;
pub mod account_role;
pub mod email;
pub mod login_issue;
pub mod person_name;
pub mod rut;
