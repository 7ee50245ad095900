//! Tab, category, department and employee rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Top level of the two-level classification hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tab {
    /// Tab identifier.
    pub tab_id: i32,
    /// Short code.
    pub tab_code: String,
    /// Display name.
    pub tab_name: String,
    /// Whether the tab accepts new files.
    pub is_active: bool,
}

/// Second level of the classification hierarchy. Belongs to exactly one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    /// Category identifier.
    pub category_id: i32,
    /// Parent tab.
    pub tab_id: i32,
    /// Short code.
    pub category_code: String,
    /// Display name.
    pub category_name: String,
    /// Whether the category accepts new files.
    pub is_active: bool,
}

impl Category {
    /// Whether this category may be used under `tab_id`.
    pub fn belongs_to(&self, tab_id: i32) -> bool {
        self.tab_id == tab_id
    }
}

/// An organizational department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Department {
    /// Department identifier.
    pub department_id: i32,
    /// Short code.
    pub department_code: String,
    /// Display name.
    pub department_name: String,
    /// Whether the department is active.
    pub is_active: bool,
}

/// An employee who may upload or act on files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Employee identifier.
    pub employee_id: i32,
    /// Staff code.
    pub employee_code: String,
    /// Full name.
    pub full_name: String,
    /// E-mail address.
    pub email: String,
    /// Job title.
    pub position: String,
    /// Home department.
    pub department_id: i32,
    /// Whether the employee is active.
    pub is_active: bool,
}
