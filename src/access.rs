//! Who can see which classes.
//!
//! Admins see every class. Everyone else only sees the classes they teach.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Class;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Faculty,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Faculty => write!(f, "faculty"),
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub role: Role,
}

impl Identity {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn can_view(&self, class: &Class) -> bool {
        self.role == Role::Admin || class.faculty == self.name
    }
}
